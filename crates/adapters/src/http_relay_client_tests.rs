// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{HttpRelayClient, RelayClient, RelayClientError};
use relcore_core::Protocol;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn list_paths_unwraps_items_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/paths/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"name": "cam1", "ready": true, "source": {"type": "rtspSession"}, "bytesReceived": 10}]
        })))
        .mount(&server)
        .await;

    let client = HttpRelayClient::new(server.uri(), Duration::from_secs(5));
    let paths = client.list_paths().await.unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].name, "cam1");
    assert!(paths[0].ready);
}

#[tokio::test]
async fn sessions_404_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/hlssessions/list"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpRelayClient::new(server.uri(), Duration::from_secs(5));
    // Hls has no sessions_segment, so this never reaches the mock — exercises
    // the static-table short-circuit instead of the 404 path.
    let sessions = client.list_sessions(Protocol::Hls).await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn sessions_404_from_node_returns_empty_not_err() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/rtspsessions/list"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpRelayClient::new(server.uri(), Duration::from_secs(5));
    let sessions = client.list_sessions(Protocol::Rtsp).await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn bad_status_surfaces_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/paths/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpRelayClient::new(server.uri(), Duration::from_secs(5));
    let err = client.list_paths().await.unwrap_err();
    assert!(matches!(err, RelayClientError::BadStatus(500)));
}
