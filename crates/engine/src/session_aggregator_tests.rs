// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use relcore_adapters::{PathInfo, RelayClient, RelayClientError};
use relcore_core::FakeClock;
use std::sync::Arc;

struct FakeRelay;

#[async_trait]
impl RelayClient for FakeRelay {
    async fn list_paths(&self) -> Result<Vec<PathInfo>, RelayClientError> {
        Ok(vec![])
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
    async fn list_sessions(&self, protocol: Protocol) -> Result<Vec<RawSession>, RelayClientError> {
        if protocol != Protocol::Rtsp {
            return Ok(vec![]); // other protocols disabled on this fake node
        }
        Ok(vec![
            RawSession {
                id: "sess-viewer".into(),
                path: Some("cam1".into()),
                remote_addr: Some("203.0.113.5:51000".into()),
                state: Some("read".into()),
                created: Some("1970-01-01T00:00:00Z".into()),
                bytes_received: Some(100),
                bytes_sent: Some(0),
                transport: Some("tcp".into()),
            },
            RawSession {
                id: "sess-publisher".into(),
                path: Some("cam1".into()),
                remote_addr: Some("[2001:db8::1]:5100".into()),
                state: Some("publish".into()),
                created: Some("1970-01-01T00:00:00Z".into()),
                bytes_received: Some(0),
                bytes_sent: Some(200),
                transport: Some("udp".into()),
            },
        ])
    }
    async fn kick_session(&self, _protocol: Protocol, _id: &str) -> Result<(), RelayClientError> {
        Ok(())
    }
    async fn list_rtsp_sessions_on_path(&self, _path: &str) -> Result<Vec<String>, RelayClientError> {
        Ok(vec![])
    }
}

struct FakeRelayFactory;

impl RelayClientFactory for FakeRelayFactory {
    fn client_for(&self, _node: &Node) -> Arc<dyn RelayClient> {
        Arc::new(FakeRelay)
    }
}

#[tokio::test]
async fn list_normalizes_addresses_and_computes_summary() {
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    let aggregator = SessionAggregator::new(FakeRelayFactory, clock);

    let page = aggregator.list(&[node], false, 0, 10).await;
    assert_eq!(page.sessions.len(), 2);

    let viewer = page.sessions.iter().find(|s| s.id == "sess-viewer").unwrap();
    assert_eq!(viewer.client_ip.as_deref(), Some("203.0.113.5"));
    assert_eq!(viewer.client_port, Some(51000));
    assert_eq!(viewer.duration_s, Some(0));

    let publisher = page.sessions.iter().find(|s| s.id == "sess-publisher").unwrap();
    assert_eq!(publisher.client_ip.as_deref(), Some("2001:db8::1"));
    assert_eq!(publisher.client_port, Some(5100));

    assert_eq!(page.summary.total_viewers, 1);
    assert_eq!(page.summary.by_protocol.get("rtsp"), Some(&2));
    assert_eq!(page.summary.by_node.get("edge-1"), Some(&2));
    assert_eq!(page.summary.by_path.get("cam1"), Some(&2));
}

#[tokio::test]
async fn viewers_only_filters_to_read_state() {
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    let aggregator = SessionAggregator::new(FakeRelayFactory, clock);

    let page = aggregator.list(&[node], true, 0, 10).await;
    assert_eq!(page.sessions.len(), 1);
    assert_eq!(page.sessions[0].id, "sess-viewer");
}

#[tokio::test]
async fn pagination_limits_page_size() {
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    let aggregator = SessionAggregator::new(FakeRelayFactory, clock);

    let page = aggregator.list(&[node], false, 0, 1).await;
    assert_eq!(page.sessions.len(), 1);
    // summary still reflects the full set, not just the page.
    assert_eq!(page.summary.by_protocol.get("rtsp"), Some(&2));
}

#[test]
fn parse_addr_handles_ipv4_and_ipv6() {
    assert_eq!(parse_addr("10.0.0.1:8080"), (Some("10.0.0.1".to_string()), Some(8080)));
    assert_eq!(parse_addr("[::1]:9000"), (Some("::1".to_string()), Some(9000)));
    assert_eq!(parse_addr("no-port"), (Some("no-port".to_string()), None));
}
