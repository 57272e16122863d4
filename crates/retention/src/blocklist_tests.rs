// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use relcore_storage::InMemoryStore;

#[tokio::test]
async fn blocked_address_is_reported_blocked_within_scope() {
    let store = InMemoryStore::new();
    let blocklist = Blocklist::new(store);
    let now = Utc::now();
    let scope = BlockScope { path_pattern: None, node: Some("edge-1".to_string()) };
    blocklist.block("1.2.3.4", scope, BlockDuration::OneHour, Some("abuse".into()), None, now).await.unwrap();

    assert!(blocklist.is_blocked("1.2.3.4", "edge-1", "cam1", now).await.unwrap());
    assert!(!blocklist.is_blocked("1.2.3.4", "edge-2", "cam1", now).await.unwrap());
    assert!(!blocklist.is_blocked("5.6.7.8", "edge-1", "cam1", now).await.unwrap());
}

#[tokio::test]
async fn expired_block_is_not_reported_blocked() {
    let store = InMemoryStore::new();
    let blocklist = Blocklist::new(store);
    let now = Utc::now();
    blocklist.block("1.2.3.4", BlockScope::default(), BlockDuration::FiveMinutes, None, None, now).await.unwrap();

    assert!(!blocklist.is_blocked("1.2.3.4", "edge-1", "cam1", now + chrono::Duration::minutes(10)).await.unwrap());
}

#[tokio::test]
async fn unblock_deactivates_entry() {
    let store = InMemoryStore::new();
    let blocklist = Blocklist::new(store);
    let now = Utc::now();
    blocklist.block("1.2.3.4", BlockScope::default(), BlockDuration::Permanent, None, None, now).await.unwrap();
    blocklist.unblock("1.2.3.4").await.unwrap();

    assert!(!blocklist.is_blocked("1.2.3.4", "edge-1", "cam1", now).await.unwrap());
}

#[tokio::test]
async fn sweep_expired_deactivates_only_timed_out_entries() {
    let store = InMemoryStore::new();
    let blocklist = Blocklist::new(store);
    let now = Utc::now();
    blocklist.block("1.2.3.4", BlockScope::default(), BlockDuration::FiveMinutes, None, None, now).await.unwrap();
    blocklist.block("5.6.7.8", BlockScope::default(), BlockDuration::Permanent, None, None, now).await.unwrap();

    let later = now + chrono::Duration::minutes(10);
    let swept = blocklist.sweep_expired(later).await.unwrap();
    assert_eq!(swept, 1);
    assert!(!blocklist.is_blocked("1.2.3.4", "edge-1", "cam1", later).await.unwrap());
    assert!(blocklist.is_blocked("5.6.7.8", "edge-1", "cam1", later).await.unwrap());
}
