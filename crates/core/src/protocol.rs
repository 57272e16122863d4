// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The media protocols a relay node speaks, and the static tables keyed by it.
//!
//! `spec.md` §9 asks for dynamic per-protocol endpoint tables to be
//! re-architected as "static tagged-variant maps keyed by a `Protocol`
//! enum", with the "404 means disabled" rule a property of the table
//! rather than a one-off exception. [`Protocol::ALL_SESSION_PROTOCOLS`]
//! and [`Protocol::sessions_segment`] are that table.

use serde::{Deserialize, Serialize};

/// A media protocol a relay node exposes for ingest, playback, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Rtsp,
    Rtsps,
    WebRtc,
    Rtmp,
    Srt,
    Hls,
    /// Protocol could not be determined from the node's reported source type.
    Unknown,
}

crate::simple_display! {
    Protocol {
        Rtsp => "rtsp",
        Rtsps => "rtsps",
        WebRtc => "webrtc",
        Rtmp => "rtmp",
        Srt => "srt",
        Hls => "hls",
        Unknown => "unknown",
    }
}

impl Protocol {
    /// The five protocols that expose a `/v3/{...}/list` session endpoint
    /// (`spec.md` §4.1, §6). `Hls` and `Unknown` do not.
    pub const ALL_SESSION_PROTOCOLS: [Protocol; 5] =
        [Protocol::Rtsp, Protocol::Rtsps, Protocol::WebRtc, Protocol::Rtmp, Protocol::Srt];

    /// The URL path segment for this protocol's session-list/kick endpoints,
    /// e.g. `/v3/{segment}/list`. Matches the literal paths in `spec.md` §6.
    pub fn sessions_segment(self) -> Option<&'static str> {
        match self {
            Protocol::Rtsp => Some("rtspsessions"),
            Protocol::Rtsps => Some("rtspssessions"),
            Protocol::WebRtc => Some("webrtcsessions"),
            Protocol::Rtmp => Some("rtmpconns"),
            Protocol::Srt => Some("srtconns"),
            Protocol::Hls | Protocol::Unknown => None,
        }
    }

    /// Detect a stream's protocol from a relay path's reported `source.type`
    /// field, per `spec.md` §4.5 ("detect protocol from `source.type`").
    pub fn from_source_type(source_type: &str) -> Protocol {
        let lower = source_type.to_ascii_lowercase();
        if lower.starts_with("rtsps") {
            Protocol::Rtsps
        } else if lower.starts_with("rtsp") {
            Protocol::Rtsp
        } else if lower.starts_with("rtmp") {
            Protocol::Rtmp
        } else if lower.starts_with("webrtc") {
            Protocol::WebRtc
        } else if lower.starts_with("hls") {
            Protocol::Hls
        } else {
            Protocol::Unknown
        }
    }
}
