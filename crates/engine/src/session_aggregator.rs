// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Aggregator (C10, `spec.md` §4.9): union of per-protocol
//! session lists across nodes, normalized to one shape.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use relcore_adapters::{RawSession, RelayClientFactory};
use relcore_core::{Clock, Node, Protocol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedSession {
    pub id: String,
    pub node: String,
    pub path: Option<String>,
    pub protocol: Protocol,
    pub remote_addr: Option<String>,
    pub client_ip: Option<String>,
    pub client_port: Option<u16>,
    pub state: Option<String>,
    pub created: Option<String>,
    pub duration_s: Option<i64>,
    pub bytes_rx: Option<u64>,
    pub bytes_tx: Option<u64>,
    pub transport: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub by_protocol: HashMap<String, usize>,
    pub by_node: HashMap<String, usize>,
    pub by_path: HashMap<String, usize>,
    pub total_viewers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPage {
    pub sessions: Vec<NormalizedSession>,
    pub summary: SessionSummary,
}

pub struct SessionAggregator<F, C> {
    factory: F,
    clock: C,
}

impl<F, C> SessionAggregator<F, C>
where
    F: RelayClientFactory,
    C: Clock,
{
    pub fn new(factory: F, clock: C) -> Self {
        Self { factory, clock }
    }

    /// Queries every active node for every session-bearing protocol in
    /// parallel, normalizes, optionally filters to viewers, sorts by
    /// `created` descending, and paginates (`spec.md` §4.9).
    pub async fn list(
        &self,
        nodes: &[Node],
        viewers_only: bool,
        offset: usize,
        limit: usize,
    ) -> SessionPage {
        let now = self.clock.now();
        let futs = nodes.iter().flat_map(|node| {
            Protocol::ALL_SESSION_PROTOCOLS.iter().map(move |protocol| (node.clone(), *protocol))
        });

        let results = futures::future::join_all(futs.map(|(node, protocol)| {
            let client = self.factory.client_for(&node);
            async move {
                match client.list_sessions(protocol).await {
                    Ok(raw) => raw
                        .into_iter()
                        .map(|r| normalize(&node.name, protocol, r, now))
                        .collect::<Vec<_>>(),
                    Err(e) => {
                        tracing::warn!(node = %node.name, protocol = %protocol, error = %e, "session list failed");
                        vec![]
                    }
                }
            }
        }))
        .await;

        let mut sessions: Vec<NormalizedSession> = results.into_iter().flatten().collect();
        if viewers_only {
            sessions.retain(|s| s.state.as_deref() == Some("read"));
        }
        sessions.sort_by(|a, b| b.created.cmp(&a.created));

        let summary = summarize(&sessions);
        let page = sessions.into_iter().skip(offset).take(limit).collect();
        SessionPage { sessions: page, summary }
    }

    pub async fn kick(&self, node: &Node, protocol: Protocol, id: &str) -> Result<(), EngineError> {
        let client = self.factory.client_for(node);
        client.kick_session(protocol, id).await?;
        Ok(())
    }
}

fn normalize(node: &str, protocol: Protocol, raw: RawSession, now: DateTime<Utc>) -> NormalizedSession {
    let (client_ip, client_port) = raw
        .remote_addr
        .as_deref()
        .map(parse_addr)
        .unwrap_or((None, None));
    let duration_s = raw
        .created
        .as_deref()
        .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
        .map(|dt| (now - dt.with_timezone(&Utc)).num_seconds());

    NormalizedSession {
        id: raw.id,
        node: node.to_string(),
        path: raw.path,
        protocol,
        remote_addr: raw.remote_addr,
        client_ip,
        client_port,
        state: raw.state,
        created: raw.created,
        duration_s,
        bytes_rx: raw.bytes_received,
        bytes_tx: raw.bytes_sent,
        transport: raw.transport,
    }
}

/// Splits `[ipv6]:port` and `ipv4:port` forms (`spec.md` §4.9).
fn parse_addr(addr: &str) -> (Option<String>, Option<u16>) {
    if let Some(rest) = addr.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let ip = rest[..end].to_string();
            let port = rest[end + 1..].strip_prefix(':').and_then(|p| p.parse().ok());
            return (Some(ip), port);
        }
    }
    if let Some((ip, port)) = addr.rsplit_once(':') {
        if let Ok(port) = port.parse() {
            return (Some(ip.to_string()), Some(port));
        }
    }
    (Some(addr.to_string()), None)
}

fn summarize(sessions: &[NormalizedSession]) -> SessionSummary {
    let mut summary = SessionSummary::default();
    for s in sessions {
        *summary.by_protocol.entry(s.protocol.to_string()).or_insert(0) += 1;
        *summary.by_node.entry(s.node.clone()).or_insert(0) += 1;
        if let Some(path) = &s.path {
            *summary.by_path.entry(path.clone()).or_insert(0) += 1;
        }
        if s.state.as_deref() == Some("read") {
            summary.total_viewers += 1;
        }
    }
    summary
}

#[cfg(test)]
#[path = "session_aggregator_tests.rs"]
mod session_aggregator_tests;
