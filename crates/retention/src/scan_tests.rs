// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use relcore_storage::InMemoryStore;
use std::fs;

fn write_file(dir: &Path, name: &str, contents: &[u8]) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

#[tokio::test]
async fn scan_matches_exact_path_and_inserts_recording() {
    let tmp = tempfile::tempdir().unwrap();
    let now = Utc::now();
    write_file(&tmp.path().join("cam1"), "2024-01-01_10-00-00.mp4", b"0123456789");

    let store = InMemoryStore::new();
    store.upsert_stream(Stream::new("edge-1", "cam1", now)).await.unwrap();

    let scanner = Scanner::new(store.clone(), RetentionPolicy::default());
    let report = scanner.scan(tmp.path(), now, false).await.unwrap();

    assert_eq!(report, ScanReport { scanned: 1, matched: 0, inserted: 1, updated: 0, skipped: 0 });
    let recordings = store.list_recordings(RecordingFilter::default()).await.unwrap();
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].file_size, 10);
    assert_eq!(recordings[0].segment_type, SegmentType::Continuous);
}

#[tokio::test]
async fn fuzzy_match_equates_dash_and_underscore() {
    let tmp = tempfile::tempdir().unwrap();
    let now = Utc::now();
    write_file(&tmp.path().join("front-door"), "2024-01-01_10-00-00.ts", b"x");

    let store = InMemoryStore::new();
    store.upsert_stream(Stream::new("edge-1", "front_door", now)).await.unwrap();

    let scanner = Scanner::new(store.clone(), RetentionPolicy::default());
    let report = scanner.scan(tmp.path(), now, false).await.unwrap();
    assert_eq!(report.inserted, 1);
}

#[tokio::test]
async fn unparseable_filenames_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let now = Utc::now();
    write_file(&tmp.path().join("cam1"), "not-a-timestamp.mp4", b"x");

    let store = InMemoryStore::new();
    store.upsert_stream(Stream::new("edge-1", "cam1", now)).await.unwrap();

    let scanner = Scanner::new(store.clone(), RetentionPolicy::default());
    let report = scanner.scan(tmp.path(), now, false).await.unwrap();
    assert_eq!(report, ScanReport { scanned: 1, matched: 0, inserted: 0, updated: 0, skipped: 1 });
}

/// Testable property 8: scanning the same tree twice without
/// `force_rescan` does not insert duplicate rows.
#[tokio::test]
async fn repeat_scan_without_force_rescan_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let now = Utc::now();
    write_file(&tmp.path().join("cam1"), "2024-01-01_10-00-00.mp4", b"0123456789");

    let store = InMemoryStore::new();
    store.upsert_stream(Stream::new("edge-1", "cam1", now)).await.unwrap();

    let scanner = Scanner::new(store.clone(), RetentionPolicy::default());
    scanner.scan(tmp.path(), now, false).await.unwrap();
    let second = scanner.scan(tmp.path(), now, false).await.unwrap();

    assert_eq!(second, ScanReport { scanned: 1, matched: 1, inserted: 0, updated: 0, skipped: 0 });
    assert_eq!(store.list_recordings(RecordingFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn force_rescan_refreshes_size_and_start_time() {
    let tmp = tempfile::tempdir().unwrap();
    let now = Utc::now();
    write_file(&tmp.path().join("cam1"), "2024-01-01_10-00-00.mp4", b"12345");

    let store = InMemoryStore::new();
    store.upsert_stream(Stream::new("edge-1", "cam1", now)).await.unwrap();
    let scanner = Scanner::new(store.clone(), RetentionPolicy::default());
    scanner.scan(tmp.path(), now, false).await.unwrap();

    write_file(&tmp.path().join("cam1"), "2024-01-01_10-00-00.mp4", b"123456789abcdef");
    let report = scanner.scan(tmp.path(), now, true).await.unwrap();
    assert_eq!(report.updated, 1);

    let recordings = store.list_recordings(RecordingFilter::default()).await.unwrap();
    assert_eq!(recordings[0].file_size, 15);
}
