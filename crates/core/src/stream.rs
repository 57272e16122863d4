// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A stream: the core's record of a node's path, with status and metrics.

use crate::protocol::Protocol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health status assigned by the Health Classifier (`spec.md` §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

crate::simple_display! {
    StreamStatus {
        Healthy => "healthy",
        Degraded => "degraded",
        Unhealthy => "unhealthy",
        Unknown => "unknown",
    }
}

/// Last-observed playback metrics for a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamMetrics {
    pub fps: Option<f64>,
    pub bitrate_bps: Option<u64>,
    pub latency_ms: Option<u64>,
    pub keyframe_interval_s: Option<f64>,
}

/// The core's record of one `(node, path)` pair on a relay.
///
/// Invariant: a stream cannot exist without its node (`spec.md` §3);
/// enforced by the owning `MetadataStore` implementation, not by this
/// type itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub node: String,
    pub path: String,
    pub source_url: Option<String>,
    pub protocol: Protocol,
    pub status: StreamStatus,
    pub metrics: StreamMetrics,
    pub auto_remediate: bool,
    pub remediation_count: u32,
    pub last_remediation: Option<DateTime<Utc>>,
    pub recording_enabled: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Stream {
    pub fn new(node: impl Into<String>, path: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            node: node.into(),
            path: path.into(),
            source_url: None,
            protocol: Protocol::Unknown,
            status: StreamStatus::Unknown,
            metrics: StreamMetrics::default(),
            auto_remediate: true,
            remediation_count: 0,
            last_remediation: None,
            recording_enabled: false,
            last_check: None,
            updated_at: now,
        }
    }

    /// The media URL a deep probe should target for this stream
    /// (`spec.md` §4.3): the stream's own `source_url` if set, else
    /// `node.media_base_url + "/" + path`.
    pub fn media_url(&self, node: &crate::Node) -> Option<String> {
        self.source_url.clone().or_else(|| node.media_url_for_path(&self.path))
    }
}
