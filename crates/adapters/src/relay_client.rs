// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed wrapper over one node's control API (C2, `spec.md` §4.1, §6).
//!
//! Every operation is idempotent at the node, bounded by a timeout, and
//! never retried at this layer — retries belong to C5 and C9 only
//! (`spec.md` §4.10).

use async_trait::async_trait;
use relcore_core::{Node, Protocol};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayClientError {
    #[error("node unreachable: {0}")]
    Unreachable(String),
    #[error("bad status: {0}")]
    BadStatus(u16),
    #[error("decode error: {0}")]
    DecodeError(String),
}

/// One entry of `GET /v3/paths/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    pub name: String,
    pub ready: bool,
    pub source: Option<SourceInfo>,
    #[serde(rename = "confName")]
    pub conf_name: Option<String>,
    #[serde(rename = "bytesReceived", default)]
    pub bytes_received: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(rename = "type")]
    pub source_type: String,
    pub id: Option<String>,
}

/// One session entry as reported verbatim by a protocol's session-list
/// endpoint. Field names follow `spec.md` §4.9's normalized shape;
/// per-protocol responses that omit a field leave it `None` here rather
/// than failing decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSession {
    pub id: String,
    pub path: Option<String>,
    #[serde(rename = "remoteAddr")]
    pub remote_addr: Option<String>,
    pub state: Option<String>,
    pub created: Option<String>,
    #[serde(rename = "bytesReceived", default)]
    pub bytes_received: Option<u64>,
    #[serde(rename = "bytesSent", default)]
    pub bytes_sent: Option<u64>,
    pub transport: Option<String>,
}

#[async_trait]
pub trait RelayClient: Send + Sync + 'static {
    async fn list_paths(&self) -> Result<Vec<PathInfo>, RelayClientError>;
    async fn get_path_config(&self, path: &str) -> Result<String, RelayClientError>;
    async fn add_path(&self, path: &str, body: &str) -> Result<(), RelayClientError>;
    async fn delete_path(&self, path: &str) -> Result<(), RelayClientError>;
    async fn get_global_config(&self) -> Result<String, RelayClientError>;
    async fn patch_global_config(&self, body: &str) -> Result<(), RelayClientError>;

    /// 404 from the node means "protocol disabled", reported as `Ok(vec![])`
    /// rather than an error (`spec.md` §4.1, §9 redesign flag).
    async fn list_sessions(&self, protocol: Protocol) -> Result<Vec<RawSession>, RelayClientError>;

    /// Best-effort; callers should not treat a failure here as fatal.
    async fn kick_session(&self, protocol: Protocol, id: &str) -> Result<(), RelayClientError>;

    /// RTSP and RTSPS session ids currently bound to `path`, used by the
    /// Remediation Engine's reconnect tier (`spec.md` §4.4).
    async fn list_rtsp_sessions_on_path(&self, path: &str) -> Result<Vec<String>, RelayClientError>;
}

/// Produces a [`RelayClient`] for a given node.
///
/// Replaces the teacher's ambient-framework access pattern with explicit
/// dependency injection (`spec.md` §9: "every component receives a
/// `Deps` handle containing ... a relay client factory"). `Deps` in
/// `relcore-daemon` holds one of these, not a per-node client map.
pub trait RelayClientFactory: Send + Sync + 'static {
    fn client_for(&self, node: &Node) -> Arc<dyn RelayClient>;
}
