// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use relcore_storage::InMemoryStore;
use std::fs;

fn recording(file_path: String, start_time: DateTime<Utc>) -> Recording {
    Recording {
        id: None,
        node: "edge-1".into(),
        stream_path: "front/door".into(),
        file_path,
        file_size: 4,
        duration_s: None,
        start_time,
        end_time: None,
        segment_type: SegmentType::Continuous,
        triggered_by_event_id: None,
        retention_days: 7,
        expires_at: start_time + chrono::Duration::days(7),
        is_archived: false,
        archive_path: None,
    }
}

#[tokio::test]
async fn archive_copies_file_and_flattens_stream_path() {
    let src_dir = tempfile::tempdir().unwrap();
    let archive_dir = tempfile::tempdir().unwrap();
    let now = Utc::now();
    let start = DateTime::parse_from_rfc3339("2024-03-05T00:00:00Z").unwrap().with_timezone(&Utc);

    let src = src_dir.path().join("clip.mp4");
    fs::write(&src, b"data").unwrap();

    let store = InMemoryStore::new();
    let rec = recording(src.to_string_lossy().into_owned(), start);
    let id = store.insert_recording(rec.clone()).await.unwrap();
    let mut rec = rec;
    rec.id = Some(id);

    let archiver = Archiver::new(store.clone(), RetentionPolicy::default());
    let updated = archiver.archive(archive_dir.path(), &rec, now).await.unwrap();

    assert!(updated.is_archived);
    let archive_path = Path::new(updated.archive_path.as_ref().unwrap());
    assert!(archive_path.exists());
    assert!(archive_path.to_string_lossy().contains("2024/03/05"));
    assert!(archive_path.to_string_lossy().contains("front_door"));
}

#[tokio::test]
async fn already_archived_recording_is_a_no_op() {
    let archive_dir = tempfile::tempdir().unwrap();
    let now = Utc::now();
    let store = InMemoryStore::new();
    let mut rec = recording("irrelevant.mp4".into(), now);
    rec.is_archived = true;
    rec.archive_path = Some("already/there.mp4".into());

    let archiver = Archiver::new(store, RetentionPolicy::default());
    let updated = archiver.archive(archive_dir.path(), &rec, now).await.unwrap();
    assert_eq!(updated.archive_path, rec.archive_path);
}

#[tokio::test]
async fn sweep_skips_recordings_younger_than_archive_after_days() {
    let src_dir = tempfile::tempdir().unwrap();
    let archive_dir = tempfile::tempdir().unwrap();
    let now = Utc::now();

    let src = src_dir.path().join("clip.mp4");
    fs::write(&src, b"data").unwrap();

    let store = InMemoryStore::new();
    // Only 1 day old; default archive_after_days is 3.
    store.insert_recording(recording(src.to_string_lossy().into_owned(), now - chrono::Duration::days(1))).await.unwrap();

    let archiver = Archiver::new(store.clone(), RetentionPolicy::default());
    let archived = archiver.sweep(archive_dir.path(), now, 100).await.unwrap();
    assert!(archived.is_empty());
}

#[tokio::test]
async fn sweep_archives_eligible_recordings_oldest_first_up_to_batch_size() {
    let src_dir = tempfile::tempdir().unwrap();
    let archive_dir = tempfile::tempdir().unwrap();
    let now = Utc::now();
    let store = InMemoryStore::new();

    for i in 0i64..3 {
        let src = src_dir.path().join(format!("clip{i}.mp4"));
        fs::write(&src, b"data").unwrap();
        let rec = recording(src.to_string_lossy().into_owned(), now - chrono::Duration::days(10 + i));
        store.insert_recording(rec).await.unwrap();
    }

    let archiver = Archiver::new(store.clone(), RetentionPolicy::default());
    let archived = archiver.sweep(archive_dir.path(), now, 2).await.unwrap();
    assert_eq!(archived.len(), 2);
    assert!(archived.iter().all(|r| r.is_archived));
}
