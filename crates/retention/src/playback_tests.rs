// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use relcore_core::SegmentType;

fn recording(id: Option<u64>, file_path: &str, is_archived: bool, archive_path: Option<&str>) -> Recording {
    let now = Utc::now();
    Recording {
        id: id.map(Into::into),
        node: "edge-1".into(),
        stream_path: "cam1".into(),
        file_path: file_path.into(),
        file_size: 0,
        duration_s: Some(12.5),
        start_time: now,
        end_time: None,
        segment_type: SegmentType::Continuous,
        triggered_by_event_id: None,
        retention_days: 7,
        expires_at: now + chrono::Duration::days(7),
        is_archived,
        archive_path: archive_path.map(str::to_string),
    }
}

#[test]
fn unarchived_recording_uses_file_path() {
    let rec = recording(Some(1), "/data/cam1/clip.mp4", false, None);
    let info = playback_info(&rec).unwrap();
    assert_eq!(info.file_path, "/data/cam1/clip.mp4");
    assert_eq!(info.content_type, "video/mp4");
    assert_eq!(info.playback_url, "/api/recordings/1/download");
    assert_eq!(info.duration_seconds, Some(12.5));
}

#[test]
fn archived_recording_prefers_archive_path() {
    let rec = recording(Some(2), "/data/cam1/clip.ts", true, Some("/archive/2024/01/01/cam1/clip.ts"));
    let info = playback_info(&rec).unwrap();
    assert_eq!(info.file_path, "/archive/2024/01/01/cam1/clip.ts");
    assert_eq!(info.content_type, "video/mp2t");
}

#[test]
fn unpersisted_recording_without_id_has_no_playback_info() {
    let rec = recording(None, "/data/cam1/clip.mp4", false, None);
    assert!(playback_info(&rec).is_none());
}

#[test]
fn unknown_extension_falls_back_to_mp4() {
    let rec = recording(Some(3), "/data/cam1/clip.avi", false, None);
    let info = playback_info(&rec).unwrap();
    assert_eq!(info.content_type, "video/mp4");
}
