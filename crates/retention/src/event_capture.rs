// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-triggered capture (`spec.md` §4.7): launch the capture
//! subprocess and index a `Recording` row for it. Fire-and-forget — this
//! engine does not wait on the subprocess.

use crate::error::RetentionError;
use crate::policy::RetentionPolicy;
use chrono::{DateTime, Utc};
use relcore_adapters::EventCapture;
use relcore_core::{Recording, RecordingId, SegmentType, StreamEventId};
use relcore_storage::MetadataStore;
use std::path::Path;

pub struct EventRecorder<S, E> {
    store: S,
    capture: E,
    policy: RetentionPolicy,
}

impl<S, E> EventRecorder<S, E>
where
    S: MetadataStore,
    E: EventCapture,
{
    pub fn new(store: S, capture: E, policy: RetentionPolicy) -> Self {
        Self { store, capture, policy }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn capture(
        &self,
        node: &str,
        stream_path: &str,
        media_url: &str,
        output_path: &Path,
        event_id: StreamEventId,
        duration_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<RecordingId, RetentionError> {
        self.capture.start(media_url, output_path, duration_seconds).await?;

        let expires_at = now + chrono::Duration::days(self.policy.event_retention_days as i64);
        let recording = Recording {
            id: None,
            node: node.to_string(),
            stream_path: stream_path.to_string(),
            file_path: output_path.to_string_lossy().into_owned(),
            file_size: 0,
            duration_s: Some(duration_seconds as f64),
            start_time: now,
            end_time: None,
            segment_type: SegmentType::Event,
            triggered_by_event_id: Some(event_id),
            retention_days: self.policy.event_retention_days,
            expires_at,
            is_archived: false,
            archive_path: None,
        };
        let id = self.store.insert_recording(recording).await?;
        tracing::info!(node, %stream_path, recording_id = %id, "event capture started");
        Ok(id)
    }
}

#[cfg(test)]
#[path = "event_capture_tests.rs"]
mod event_capture_tests;
