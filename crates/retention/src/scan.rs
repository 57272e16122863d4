// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scan/index (`spec.md` §4.7): walk `recording_root`, match directories
//! to known Streams, upsert a [`Recording`] per matched file.

use crate::error::RetentionError;
use crate::policy::RetentionPolicy;
use chrono::{DateTime, NaiveDateTime, Utc};
use relcore_core::{Recording, SegmentType, Stream};
use relcore_storage::{MetadataStore, RecordingFilter};
use std::path::Path;
use walkdir::WalkDir;

const ALLOWED_EXTENSIONS: [&str; 4] = ["ts", "mp4", "mkv", "flv"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: usize,
    pub matched: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

pub struct Scanner<S> {
    store: S,
    policy: RetentionPolicy,
}

impl<S: MetadataStore> Scanner<S> {
    pub fn new(store: S, policy: RetentionPolicy) -> Self {
        Self { store, policy }
    }

    /// `force_rescan` refreshes size and start time on existing rows;
    /// otherwise a file already indexed by `file_path` is left untouched.
    pub async fn scan(
        &self,
        recording_root: &Path,
        now: DateTime<Utc>,
        force_rescan: bool,
    ) -> Result<ScanReport, RetentionError> {
        let streams = self.store.list_streams(None).await?;
        let existing = self.store.list_recordings(RecordingFilter::default()).await?;
        let mut report = ScanReport::default();

        for entry in WalkDir::new(recording_root).min_depth(1).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            report.scanned += 1;
            let path = entry.path();

            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                report.skipped += 1;
                continue;
            };
            if !ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                report.skipped += 1;
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                report.skipped += 1;
                continue;
            };
            let Some(start_time) = parse_timestamp(stem) else {
                report.skipped += 1;
                continue;
            };

            let rel_dir = path
                .parent()
                .and_then(|p| p.strip_prefix(recording_root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();

            let Some(stream) = find_stream(&streams, &rel_dir) else {
                report.skipped += 1;
                continue;
            };

            let file_size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let file_path = path.to_string_lossy().into_owned();

            match existing.iter().find(|r| r.file_path == file_path) {
                Some(_) if !force_rescan => {
                    report.matched += 1;
                }
                Some(existing_recording) => {
                    let mut updated = existing_recording.clone();
                    updated.file_size = file_size;
                    updated.start_time = start_time;
                    self.store.update_recording(updated).await?;
                    report.updated += 1;
                }
                None => {
                    let expires_at = Recording::expires_at_from(start_time, self.policy.continuous_retention_days);
                    let recording = Recording {
                        id: None,
                        node: stream.node.clone(),
                        stream_path: stream.path.clone(),
                        file_path,
                        file_size,
                        duration_s: None,
                        start_time,
                        end_time: None,
                        segment_type: SegmentType::Continuous,
                        triggered_by_event_id: None,
                        retention_days: self.policy.continuous_retention_days,
                        expires_at,
                        is_archived: false,
                        archive_path: None,
                    };
                    self.store.insert_recording(recording).await?;
                    report.inserted += 1;
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            inserted = report.inserted,
            updated = report.updated,
            matched = report.matched,
            skipped = report.skipped,
            "recording scan complete"
        );
        Ok(report)
    }
}

fn parse_timestamp(stem: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stem, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Matches a recording's parent directory to a Stream by, in order:
/// exact path, path with/without a leading separator, and a fuzzy
/// comparison that equates `-`/`_` and is case/separator-insensitive
/// (`spec.md` §4.7).
fn find_stream<'a>(streams: &'a [Stream], rel_dir: &str) -> Option<&'a Stream> {
    if let Some(s) = streams.iter().find(|s| s.path == rel_dir) {
        return Some(s);
    }
    let trimmed = rel_dir.trim_start_matches('/');
    if let Some(s) = streams.iter().find(|s| s.path.trim_start_matches('/') == trimmed) {
        return Some(s);
    }
    let normalized = normalize_key(rel_dir);
    streams.iter().find(|s| normalize_key(&s.path) == normalized)
}

fn normalize_key(s: &str) -> String {
    s.trim_start_matches(['/', '\\'])
        .to_ascii_lowercase()
        .replace(['-', '_'], "")
        .replace('\\', "/")
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod scan_tests;
