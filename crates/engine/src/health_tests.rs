// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use relcore_adapters::{
    PathInfo, ProbeError, ProbeResult, ProbeStream, RawSession, RelayClient, RelayClientError,
    SourceInfo, StreamKind,
};
use relcore_core::{FakeClock, Protocol, Stream};
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
        Err(RelayClientError::BadStatus(404))
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
    fn client_for(&self, _node: &Node) -> Arc<dyn RelayClient> {
        Arc::new(FakeRelay { paths: self.paths.clone() })
    }
}

struct FakeProber {
    result: ProbeResult,
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, _media_url: &str, _deadline: Duration) -> Result<ProbeResult, ProbeError> {
        Ok(self.result.clone())
    }
    async fn detect_black_screen(&self, _media_url: &str, _deadline: Duration) -> Result<bool, ProbeError> {
        Ok(false)
    }
    async fn detect_freeze(&self, _media_url: &str, _deadline: Duration) -> Result<bool, ProbeError> {
        Ok(false)
    }
    async fn detect_audio_silence(&self, _media_url: &str, _deadline: Duration) -> Result<bool, ProbeError> {
        Ok(false)
    }
}

fn path_info(name: &str, ready: bool, has_source: bool, conf_name: Option<&str>) -> PathInfo {
    PathInfo {
        name: name.to_string(),
        ready,
        source: has_source.then(|| SourceInfo { source_type: "rtspSource".into(), id: None }),
        conf_name: conf_name.map(str::to_string),
        bytes_received: 0,
    }
}

/// S1 — Fast classifier scenario from `spec.md` §8.
#[tokio::test]
async fn s1_fast_classifier_assigns_expected_statuses_and_emits_one_event_each() {
    let paths = vec![
        path_info("cam1", true, true, None),
        path_info("cam2", false, true, None),
        path_info("cam3", false, false, Some("cam3")),
    ];
    let factory = FakeRelayFactory { paths };
    let store = InMemoryStore::new();
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    store.upsert_node(node.clone()).await.unwrap();
    for path in ["cam1", "cam2", "cam3"] {
        store.upsert_stream(Stream::new("edge-1", path, clock.now())).await.unwrap();
    }

    let classifier =
        HealthClassifier::new(factory, store.clone(), FakeProber { result: ProbeResult::default() }, clock);
    classifier.fast_check(&node).await.unwrap();

    let cam1 = store.get_stream("edge-1", "cam1").await.unwrap().unwrap();
    let cam2 = store.get_stream("edge-1", "cam2").await.unwrap().unwrap();
    let cam3 = store.get_stream("edge-1", "cam3").await.unwrap().unwrap();
    assert_eq!(cam1.status, StreamStatus::Healthy);
    assert_eq!(cam2.status, StreamStatus::Degraded);
    assert_eq!(cam3.status, StreamStatus::Degraded);

    for path in ["cam1", "cam2", "cam3"] {
        let events = store.list_events("edge-1", path, None, 10).await.unwrap();
        assert_eq!(events.len(), 1, "expected exactly one transition event for {path}");
    }
}

#[tokio::test]
async fn fast_check_missing_path_is_unhealthy_and_updates_node_last_seen() {
    let factory = FakeRelayFactory { paths: vec![] };
    let store = InMemoryStore::new();
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    store.upsert_node(node.clone()).await.unwrap();
    store.upsert_stream(Stream::new("edge-1", "cam1", clock.now())).await.unwrap();

    let classifier =
        HealthClassifier::new(factory, store.clone(), FakeProber { result: ProbeResult::default() }, clock);
    classifier.fast_check(&node).await.unwrap();

    let cam1 = store.get_stream("edge-1", "cam1").await.unwrap().unwrap();
    assert_eq!(cam1.status, StreamStatus::Unhealthy);
    let refreshed_node = store.get_node("edge-1").await.unwrap().unwrap();
    assert!(refreshed_node.last_seen.is_some());
}

#[tokio::test]
async fn repeat_fast_check_with_unchanged_status_emits_no_further_event() {
    let paths = vec![path_info("cam1", true, true, None)];
    let factory = FakeRelayFactory { paths: paths.clone() };
    let store = InMemoryStore::new();
    let clock = FakeClock::new();
    let node = Node::new("edge-1", "http://edge-1:9997");
    store.upsert_node(node.clone()).await.unwrap();
    store.upsert_stream(Stream::new("edge-1", "cam1", clock.now())).await.unwrap();

    let classifier =
        HealthClassifier::new(factory, store.clone(), FakeProber { result: ProbeResult::default() }, clock);
    classifier.fast_check(&node).await.unwrap();
    classifier.fast_check(&node).await.unwrap();

    let events = store.list_events("edge-1", "cam1", None, 10).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[test]
fn deep_classify_no_streams_is_unhealthy() {
    let (status, reason) = classify_deep(&ProbeResult::default());
    assert_eq!(status, StreamStatus::Unhealthy);
    assert_eq!(reason, DeepReason::NoStreams);
}

#[test]
fn deep_classify_low_fps_is_degraded() {
    let probe = ProbeResult {
        ok: true,
        streams: vec![ProbeStream {
            kind: StreamKind::Video,
            codec: "h264".into(),
            width: Some(1920),
            height: Some(1080),
            frame_rate: Some(5.0),
            avg_frame_rate: Some(5.0),
            bitrate: None,
        }],
        issues: vec![],
    };
    let (status, reason) = classify_deep(&probe);
    assert_eq!(status, StreamStatus::Degraded);
    assert_eq!(reason, DeepReason::FpsDrop);
}

#[test]
fn deep_classify_keyframe_issue_when_rates_diverge() {
    let probe = ProbeResult {
        ok: true,
        streams: vec![ProbeStream {
            kind: StreamKind::Video,
            codec: "h264".into(),
            width: Some(1920),
            height: Some(1080),
            frame_rate: Some(30.0),
            avg_frame_rate: Some(15.0),
            bitrate: None,
        }],
        issues: vec![],
    };
    let (status, reason) = classify_deep(&probe);
    assert_eq!(status, StreamStatus::Degraded);
    assert_eq!(reason, DeepReason::KeyframeIssue);
}

#[test]
fn deep_classify_healthy_video_is_healthy_regardless_of_missing_audio() {
    let probe = ProbeResult {
        ok: true,
        streams: vec![ProbeStream {
            kind: StreamKind::Video,
            codec: "h264".into(),
            width: Some(1920),
            height: Some(1080),
            frame_rate: Some(30.0),
            avg_frame_rate: Some(29.8),
            bitrate: None,
        }],
        issues: vec![],
    };
    let (status, reason) = classify_deep(&probe);
    assert_eq!(status, StreamStatus::Healthy);
    assert_eq!(reason, DeepReason::Healthy);
}
