// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wraps an external probe subprocess (C3, `spec.md` §4.2).
//!
//! Treated as an async command with an explicit argv and deadline,
//! never shelled out (`spec.md` §9 redesign flag).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe failed: {0}")]
    Failed(String),
    #[error("probe timed out")]
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Video,
    Audio,
}

/// One stream reported by the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeStream {
    pub kind: StreamKind,
    pub codec: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Decoded from a `"num/den"` or decimal string; `"x/0"` decodes to `None`.
    pub frame_rate: Option<f64>,
    pub avg_frame_rate: Option<f64>,
    pub bitrate: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub ok: bool,
    pub streams: Vec<ProbeStream>,
    pub issues: Vec<String>,
}

impl ProbeResult {
    pub fn video(&self) -> Option<&ProbeStream> {
        self.streams.iter().find(|s| s.kind == StreamKind::Video)
    }

    pub fn audio(&self) -> Option<&ProbeStream> {
        self.streams.iter().find(|s| s.kind == StreamKind::Audio)
    }
}

/// Parse a probe-reported frame rate string (`"30000/1001"`, `"25"`,
/// `"0/0"`) into a decimal rate. `"x/0"` is unknown, not a division error
/// (`spec.md` §4.2).
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    raw.trim().parse().ok()
}

#[async_trait]
pub trait MediaProber: Send + Sync + 'static {
    async fn probe(&self, media_url: &str, deadline: Duration) -> Result<ProbeResult, ProbeError>;
    async fn detect_black_screen(&self, media_url: &str, deadline: Duration) -> Result<bool, ProbeError>;
    async fn detect_freeze(&self, media_url: &str, deadline: Duration) -> Result<bool, ProbeError>;
    async fn detect_audio_silence(&self, media_url: &str, deadline: Duration) -> Result<bool, ProbeError>;
}
