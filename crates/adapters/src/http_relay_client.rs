// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reqwest`-backed [`RelayClient`].

use crate::relay_client::{PathInfo, RawSession, RelayClient, RelayClientError, RelayClientFactory};
use async_trait::async_trait;
use relcore_core::{Node, Protocol};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Mutation responses in `{200, 201, 204}` are treated as success
/// (`spec.md` §6).
fn is_success_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200 | 201 | 204)
}

#[derive(Clone)]
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();
        Self { client, base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_text(&self, path: &str) -> Result<String, RelayClientError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| RelayClientError::Unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RelayClientError::BadStatus(response.status().as_u16()));
        }
        response.text().await.map_err(|e| RelayClientError::DecodeError(e.to_string()))
    }

    async fn send_body(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&str>,
    ) -> Result<(), RelayClientError> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.body(body.to_string());
        }
        let response =
            request.send().await.map_err(|e| RelayClientError::Unreachable(e.to_string()))?;
        if !is_success_status(response.status()) {
            return Err(RelayClientError::BadStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn list_paths(&self) -> Result<Vec<PathInfo>, RelayClientError> {
        let body = self.get_text("/v3/paths/list").await?;
        let parsed: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| RelayClientError::DecodeError(e.to_string()))?;
        let items = parsed.get("items").cloned().unwrap_or(parsed);
        serde_json::from_value(items).map_err(|e| RelayClientError::DecodeError(e.to_string()))
    }

    async fn get_path_config(&self, path: &str) -> Result<String, RelayClientError> {
        self.get_text(&format!("/v3/config/paths/get/{path}")).await
    }

    async fn add_path(&self, path: &str, body: &str) -> Result<(), RelayClientError> {
        self.send_body(reqwest::Method::POST, &format!("/v3/config/paths/add/{path}"), Some(body))
            .await
    }

    async fn delete_path(&self, path: &str) -> Result<(), RelayClientError> {
        self.send_body(reqwest::Method::DELETE, &format!("/v3/config/paths/delete/{path}"), None)
            .await
    }

    async fn get_global_config(&self) -> Result<String, RelayClientError> {
        self.get_text("/v3/config/global/get").await
    }

    async fn patch_global_config(&self, body: &str) -> Result<(), RelayClientError> {
        self.send_body(reqwest::Method::PATCH, "/v3/config/global/patch", Some(body)).await
    }

    async fn list_sessions(&self, protocol: Protocol) -> Result<Vec<RawSession>, RelayClientError> {
        let Some(segment) = protocol.sessions_segment() else {
            return Ok(Vec::new());
        };
        let response = self
            .client
            .get(self.url(&format!("/v3/{segment}/list")))
            .send()
            .await
            .map_err(|e| RelayClientError::Unreachable(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(RelayClientError::BadStatus(response.status().as_u16()));
        }
        let body = response.text().await.map_err(|e| RelayClientError::DecodeError(e.to_string()))?;
        let parsed: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| RelayClientError::DecodeError(e.to_string()))?;
        let items = parsed.get("items").cloned().unwrap_or(parsed);
        serde_json::from_value(items).map_err(|e| RelayClientError::DecodeError(e.to_string()))
    }

    async fn kick_session(&self, protocol: Protocol, id: &str) -> Result<(), RelayClientError> {
        let Some(segment) = protocol.sessions_segment() else {
            return Ok(());
        };
        self.send_body(reqwest::Method::POST, &format!("/v3/{segment}/kick/{id}"), None).await
    }

    async fn list_rtsp_sessions_on_path(&self, path: &str) -> Result<Vec<String>, RelayClientError> {
        let mut ids = Vec::new();
        for protocol in [Protocol::Rtsp, Protocol::Rtsps] {
            let sessions = self.list_sessions(protocol).await?;
            ids.extend(
                sessions.into_iter().filter(|s| s.path.as_deref() == Some(path)).map(|s| s.id),
            );
        }
        Ok(ids)
    }
}

/// Builds an [`HttpRelayClient`] from a node's `control_base_url` with a
/// fixed per-call timeout.
#[derive(Clone)]
pub struct HttpRelayClientFactory {
    timeout: Duration,
}

impl HttpRelayClientFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl RelayClientFactory for HttpRelayClientFactory {
    fn client_for(&self, node: &Node) -> Arc<dyn RelayClient> {
        Arc::new(HttpRelayClient::new(node.control_base_url.clone(), self.timeout))
    }
}
