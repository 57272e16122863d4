// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use relcore_adapters::{PathInfo, RawSession, RelayClient, RelayClientError, SourceInfo};
use relcore_core::FakeClock;
use relcore_storage::InMemoryStore;

struct FakeRelay {
    paths: Vec<PathInfo>,
}

#[async_trait]
impl RelayClient for FakeRelay {
    async fn list_paths(&self) -> Result<Vec<PathInfo>, RelayClientError> {
        Ok(self.paths.clone())
    }
    async fn get_path_config(&self, _path: &str) -> Result<String, RelayClientError> {
        Ok("{}".to_string())
    }
    async fn add_path(&self, _path: &str, _body: &str) -> Result<(), RelayClientError> {
        Ok(())
    }
    async fn delete_path(&self, _path: &str) -> Result<(), RelayClientError> {
        Ok(())
    }
    async fn get_global_config(&self) -> Result<String, RelayClientError> {
        Err(RelayClientError::BadStatus(404))
    }
    async fn patch_global_config(&self, _body: &str) -> Result<(), RelayClientError> {
        Ok(())
    }
    async fn list_sessions(&self, _protocol: Protocol) -> Result<Vec<RawSession>, RelayClientError> {
        Ok(vec![])
    }
    async fn kick_session(&self, _protocol: Protocol, _id: &str) -> Result<(), RelayClientError> {
        Ok(())
    }
    async fn list_rtsp_sessions_on_path(&self, _path: &str) -> Result<Vec<String>, RelayClientError> {
        Ok(vec![])
    }
}

struct FakeRelayFactory {
    paths: Vec<PathInfo>,
}

impl RelayClientFactory for FakeRelayFactory {
    fn client_for(&self, _node: &Node) -> std::sync::Arc<dyn RelayClient> {
        std::sync::Arc::new(FakeRelay { paths: self.paths.clone() })
    }
}

fn path(name: &str, source_type: &str) -> PathInfo {
    PathInfo {
        name: name.to_string(),
        ready: true,
        source: Some(SourceInfo { source_type: source_type.to_string(), id: None }),
        conf_name: None,
        bytes_received: 0,
    }
}

#[tokio::test]
async fn sync_creates_updates_and_prunes_streams() {
    let store = InMemoryStore::new();
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    store.upsert_node(node.clone()).await.unwrap();

    // cam1 already exists locally and is still reported -> updated.
    store.upsert_stream(Stream::new("edge-1", "cam1", clock.now())).await.unwrap();
    // stale-path already exists locally but is no longer reported -> deleted.
    store.upsert_stream(Stream::new("edge-1", "stale-path", clock.now())).await.unwrap();

    let factory = FakeRelayFactory { paths: vec![path("cam1", "rtspSource"), path("cam2", "rtmpConn")] };
    let sync = FleetSynchronizer::new(factory, store.clone(), clock);

    let counts = sync.sync_node(&node).await.unwrap();
    assert_eq!(counts, SyncCounts { total: 2, created: 1, updated: 1, deleted: 1 });

    let streams = store.list_streams(Some("edge-1")).await.unwrap();
    let mut paths: Vec<&str> = streams.iter().map(|s| s.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["cam1", "cam2"]);

    let cam1 = streams.iter().find(|s| s.path == "cam1").unwrap();
    assert_eq!(cam1.protocol, Protocol::Rtsp);
    let cam2 = streams.iter().find(|s| s.path == "cam2").unwrap();
    assert_eq!(cam2.protocol, Protocol::Rtmp);

    let updated_node = store.get_node("edge-1").await.unwrap().unwrap();
    assert!(updated_node.last_seen.is_some());
}

#[tokio::test]
async fn sync_with_no_paths_deletes_all_existing_streams() {
    let store = InMemoryStore::new();
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    store.upsert_stream(Stream::new("edge-1", "cam1", clock.now())).await.unwrap();

    let factory = FakeRelayFactory { paths: vec![] };
    let sync = FleetSynchronizer::new(factory, store.clone(), clock);
    let counts = sync.sync_node(&node).await.unwrap();
    assert_eq!(counts, SyncCounts { total: 0, created: 0, updated: 0, deleted: 1 });
    assert!(store.list_streams(Some("edge-1")).await.unwrap().is_empty());
}
