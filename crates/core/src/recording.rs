// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording segments produced by the Retention Engine (C8).

use crate::define_surrogate_id;
use crate::event::StreamEventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

define_surrogate_id! {
    /// Surrogate ID for a [`Recording`], assigned by the `MetadataStore`.
    pub struct RecordingId;
}

/// How a recording segment came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    Continuous,
    Event,
    Manual,
}

crate::simple_display! {
    SegmentType {
        Continuous => "continuous",
        Event => "event",
        Manual => "manual",
    }
}

/// One recorded media segment (`spec.md` §3, §4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordingId>,
    pub node: String,
    pub stream_path: String,
    pub file_path: String,
    pub file_size: u64,
    pub duration_s: Option<f64>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub segment_type: SegmentType,
    pub triggered_by_event_id: Option<StreamEventId>,
    pub retention_days: u32,
    pub expires_at: DateTime<Utc>,
    pub is_archived: bool,
    pub archive_path: Option<String>,
}

impl Recording {
    pub fn expires_at_from(start_time: DateTime<Utc>, retention_days: u32) -> DateTime<Utc> {
        start_time + chrono::Duration::days(retention_days as i64)
    }

    /// Age of the recording relative to `now`, used by the archive sweep's
    /// `archive_after_days` gate (`SPEC_FULL.md` §4.7).
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.start_time
    }
}
