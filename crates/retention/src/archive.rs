// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archive (`spec.md` §4.7): copy a recording into the archive tree and
//! mark it archived. `archive_after_days` gates sweep eligibility
//! (`SPEC_FULL.md` §4.7).

use crate::error::RetentionError;
use crate::policy::RetentionPolicy;
use chrono::{DateTime, Utc};
use relcore_core::{Recording, SegmentType};
use relcore_storage::{MetadataStore, RecordingFilter};
use std::path::{Path, PathBuf};

pub struct Archiver<S> {
    store: S,
    policy: RetentionPolicy,
}

impl<S: MetadataStore> Archiver<S> {
    pub fn new(store: S, policy: RetentionPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn archive(
        &self,
        archive_root: &Path,
        recording: &Recording,
        now: DateTime<Utc>,
    ) -> Result<Recording, RetentionError> {
        if recording.is_archived {
            return Ok(recording.clone());
        }
        let dest = archive_destination(archive_root, recording);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&recording.file_path, &dest).await?;

        let mut updated = recording.clone();
        updated.is_archived = true;
        updated.archive_path = Some(dest.to_string_lossy().into_owned());
        self.store.update_recording(updated.clone()).await?;

        tracing::info!(file = %recording.file_path, archive_path = %dest.display(), "recording archived");
        let _ = now;
        Ok(updated)
    }

    /// Archives up to `batch_size` eligible continuous recordings, oldest
    /// first. A recording is eligible once its age meets
    /// `archive_after_days`.
    pub async fn sweep(
        &self,
        archive_root: &Path,
        now: DateTime<Utc>,
        batch_size: usize,
    ) -> Result<Vec<Recording>, RetentionError> {
        let mut candidates =
            self.store.list_recordings(RecordingFilter { unarchived_only: true, ..Default::default() }).await?;
        let min_age = chrono::Duration::days(self.policy.archive_after_days as i64);
        candidates.retain(|r| r.segment_type == SegmentType::Continuous && r.age(now) >= min_age);
        candidates.sort_by_key(|r| r.start_time);
        candidates.truncate(batch_size);

        let mut archived = Vec::new();
        for recording in candidates {
            match self.archive(archive_root, &recording, now).await {
                Ok(updated) => archived.push(updated),
                Err(e) => {
                    tracing::warn!(file = %recording.file_path, error = %e, "archive sweep entry failed");
                }
            }
        }
        Ok(archived)
    }
}

fn archive_destination(archive_root: &Path, recording: &Recording) -> PathBuf {
    let date = recording.start_time.format("%Y/%m/%d").to_string();
    let flat = recording.stream_path.replace(['/', '\\'], "_");
    let filename = Path::new(&recording.file_path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_string());
    archive_root.join(date).join(flat).join(filename)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod archive_tests;
