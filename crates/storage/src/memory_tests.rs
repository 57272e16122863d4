// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use relcore_core::{Severity, StreamEventKind};

fn node(name: &str) -> Node {
    Node::new(name, format!("http://{name}:9997"))
}

#[tokio::test]
async fn node_cascade_delete_removes_dependent_rows() {
    let store = InMemoryStore::new();
    store.upsert_node(node("edge-1")).await.unwrap();
    store.upsert_stream(Stream::new("edge-1", "cam1", Utc::now())).await.unwrap();
    store
        .append_event(StreamEvent::new("edge-1", "cam1", StreamEventKind::Disconnected, Severity::Warning, Utc::now()))
        .await
        .unwrap();

    store.delete_node("edge-1").await.unwrap();

    assert!(store.get_node("edge-1").await.unwrap().is_none());
    assert!(store.list_streams(Some("edge-1")).await.unwrap().is_empty());
    assert!(store.list_events("edge-1", "cam1", None, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn deactivate_node_is_not_a_delete() {
    let store = InMemoryStore::new();
    store.upsert_node(node("edge-1")).await.unwrap();
    store.deactivate_node("edge-1").await.unwrap();
    let got = store.get_node("edge-1").await.unwrap().unwrap();
    assert!(!got.is_active);
}

#[tokio::test]
async fn deactivate_unknown_node_errors() {
    let store = InMemoryStore::new();
    assert!(store.deactivate_node("nope").await.is_err());
}

#[tokio::test]
async fn list_events_respects_limit_and_order() {
    let store = InMemoryStore::new();
    for i in 0..5u32 {
        store
            .append_event(StreamEvent::new(
                "edge-1",
                "cam1",
                StreamEventKind::FpsDrop,
                Severity::Info,
                Utc::now() + chrono::Duration::seconds(i as i64),
            ))
            .await
            .unwrap();
    }
    let got = store.list_events("edge-1", "cam1", None, 2).await.unwrap();
    assert_eq!(got.len(), 2);
}

#[tokio::test]
async fn recordings_round_trip_and_expire() {
    let store = InMemoryStore::new();
    let now = Utc::now();
    let recording = Recording {
        id: None,
        node: "edge-1".to_string(),
        stream_path: "cam1".to_string(),
        file_path: "/data/cam1/2026-07-28.mp4".to_string(),
        file_size: 1024,
        duration_s: Some(60.0),
        start_time: now - chrono::Duration::days(10),
        end_time: None,
        segment_type: relcore_core::SegmentType::Continuous,
        triggered_by_event_id: None,
        retention_days: 7,
        expires_at: relcore_core::Recording::expires_at_from(now - chrono::Duration::days(10), 7),
        is_archived: false,
        archive_path: None,
    };
    let id = store.insert_recording(recording).await.unwrap();
    assert!(store.get_snapshot(ConfigSnapshotId::new(id.get())).await.unwrap().is_none());

    let expired = store.list_expired_recordings(now).await.unwrap();
    assert_eq!(expired.len(), 1);
}

#[tokio::test]
async fn ip_block_insert_and_deactivate() {
    let store = InMemoryStore::new();
    let entry = IPBlockEntry::new(
        "1.2.3.4",
        relcore_core::BlockScope::default(),
        relcore_core::BlockDuration::OneHour,
        Utc::now(),
    );
    store.insert_block(entry).await.unwrap();
    assert_eq!(store.list_active_blocks().await.unwrap().len(), 1);
    store.deactivate_block("1.2.3.4").await.unwrap();
    assert_eq!(store.list_active_blocks().await.unwrap().len(), 0);
}
