// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only stream events (`spec.md` §3).

use crate::define_surrogate_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

define_surrogate_id! {
    /// Surrogate ID for a [`StreamEvent`], assigned by the `MetadataStore`.
    pub struct StreamEventId;
}

/// The kind of observation or action a [`StreamEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventKind {
    Disconnected,
    Reconnected,
    BlackScreen,
    Frozen,
    AudioSilent,
    FpsDrop,
    KeyframeIssue,
    HighLatency,
    RemediationStarted,
    RemediationSuccess,
    RemediationFailed,
}

crate::simple_display! {
    StreamEventKind {
        Disconnected => "disconnected",
        Reconnected => "reconnected",
        BlackScreen => "black_screen",
        Frozen => "frozen",
        AudioSilent => "audio_silent",
        FpsDrop => "fps_drop",
        KeyframeIssue => "keyframe_issue",
        HighLatency => "high_latency",
        RemediationStarted => "remediation_started",
        RemediationSuccess => "remediation_success",
        RemediationFailed => "remediation_failed",
    }
}

/// Severity of a [`StreamEvent`], also used to pick the `tracing` level
/// emitted alongside it (`SPEC_FULL.md` §8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

crate::simple_display! {
    Severity {
        Info => "info",
        Warning => "warning",
        Error => "error",
        Critical => "critical",
    }
}

/// One append-only record in a stream's event log.
///
/// Never mutated except to flip `resolved` (`spec.md` §3). Events are
/// totally ordered per stream by insertion order; the `MetadataStore`
/// is responsible for preserving that order on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<StreamEventId>,
    pub node: String,
    pub path: String,
    pub kind: StreamEventKind,
    pub severity: Severity,
    pub detail: Option<serde_json::Value>,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl StreamEvent {
    pub fn new(
        node: impl Into<String>,
        path: impl Into<String>,
        kind: StreamEventKind,
        severity: Severity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            node: node.into(),
            path: path.into(),
            kind,
            severity,
            detail: None,
            resolved: false,
            created_at,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}
