// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playback URL derivation, grounded in the original's
//! `RetentionManager.get_playback_url` / `_detect_format`.

use relcore_core::Recording;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackInfo {
    pub file_path: String,
    pub playback_url: String,
    pub duration_seconds: Option<f64>,
    pub content_type: &'static str,
}

/// Resolves the file a recording's playback should read from (the
/// archive copy, when present) and the content type implied by its
/// extension.
pub fn playback_info(recording: &Recording) -> Option<PlaybackInfo> {
    let id = recording.id?;
    let file_path = if recording.is_archived {
        recording.archive_path.clone().unwrap_or_else(|| recording.file_path.clone())
    } else {
        recording.file_path.clone()
    };
    Some(PlaybackInfo {
        playback_url: format!("/api/recordings/{id}/download"),
        content_type: detect_content_type(&file_path),
        duration_seconds: recording.duration_s,
        file_path,
    })
}

fn detect_content_type(file_path: &str) -> &'static str {
    match Path::new(file_path).extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("mp4") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("ts") => "video/mp2t",
        Some("flv") => "video/x-flv",
        Some("webm") => "video/webm",
        _ => "video/mp4",
    }
}

#[cfg(test)]
#[path = "playback_tests.rs"]
mod playback_tests;
