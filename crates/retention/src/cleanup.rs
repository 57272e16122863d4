// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cleanup (`spec.md` §4.7): two ordered passes — expire, then relieve
//! disk pressure.

use crate::disk::DiskUsage;
use crate::error::RetentionError;
use crate::policy::RetentionPolicy;
use chrono::{DateTime, Utc};
use relcore_core::{RecordingId, SegmentType};
use relcore_storage::{MetadataStore, RecordingFilter};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupReason {
    Expired,
    DiskPressure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletedEntry {
    pub id: Option<RecordingId>,
    pub file_path: String,
    pub size: u64,
    pub reason: CleanupReason,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CleanupResult {
    pub dry_run: bool,
    pub deleted: Vec<DeletedEntry>,
    pub freed_bytes: u64,
}

pub struct Cleaner<S, D> {
    store: S,
    disk: D,
    policy: RetentionPolicy,
}

const MAX_DISK_PRESSURE_VICTIMS: usize = 100;

impl<S, D> Cleaner<S, D>
where
    S: MetadataStore,
    D: DiskUsage,
{
    pub fn new(store: S, disk: D, policy: RetentionPolicy) -> Self {
        Self { store, disk, policy }
    }

    /// `dry_run` performs no filesystem/DB writes and returns the
    /// would-be victim list.
    pub async fn cleanup(
        &self,
        recording_root: &Path,
        now: DateTime<Utc>,
        dry_run: bool,
    ) -> Result<CleanupResult, RetentionError> {
        let mut deleted = Vec::new();
        let mut freed_bytes = 0u64;

        let expired = self.store.list_expired_recordings(now).await?;
        for recording in expired.into_iter().filter(|r| !r.is_archived) {
            if !dry_run && !self.remove_file(&recording.file_path).await {
                continue;
            }
            if !dry_run {
                if let Some(id) = recording.id {
                    self.store.delete_recording(id).await?;
                }
            }
            freed_bytes += recording.file_size;
            deleted.push(DeletedEntry {
                id: recording.id,
                file_path: recording.file_path,
                size: recording.file_size,
                reason: CleanupReason::Expired,
            });
        }

        let stats = self.disk.usage(recording_root)?;
        if stats.usage_ratio() >= self.policy.disk_usage_threshold {
            let mut candidates = self
                .store
                .list_recordings(RecordingFilter { unarchived_only: true, ..Default::default() })
                .await?;
            candidates.retain(|r| r.segment_type == SegmentType::Continuous);
            candidates.sort_by_key(|r| r.start_time);
            candidates.truncate(MAX_DISK_PRESSURE_VICTIMS);

            let mut free_gb = stats.free_gb();
            for recording in candidates {
                if free_gb >= self.policy.min_free_space_gb as f64 {
                    break;
                }
                if !dry_run && !self.remove_file(&recording.file_path).await {
                    continue;
                }
                if !dry_run {
                    if let Some(id) = recording.id {
                        self.store.delete_recording(id).await?;
                    }
                }
                freed_bytes += recording.file_size;
                free_gb += recording.file_size as f64 / 1_000_000_000.0;
                deleted.push(DeletedEntry {
                    id: recording.id,
                    file_path: recording.file_path,
                    size: recording.file_size,
                    reason: CleanupReason::DiskPressure,
                });
            }
        }

        tracing::info!(dry_run, deleted = deleted.len(), freed_bytes, "retention cleanup complete");
        Ok(CleanupResult { dry_run, deleted, freed_bytes })
    }

    async fn remove_file(&self, path: &str) -> bool {
        match tokio::fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!(file = %path, error = %e, "failed to delete recording file");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod cleanup_tests;
