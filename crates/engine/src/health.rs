// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health Classifier (C4, `spec.md` §4.3): fast path from a node's
//! `list_paths` reply, deep path from a probe of one stream's media URL.

use crate::error::EngineError;
use parking_lot::Mutex as SyncMutex;
use relcore_adapters::{MediaProber, RelayClientFactory};
use relcore_core::{Clock, Node, Severity, Stream, StreamEvent, StreamEventKind, StreamStatus};
use relcore_storage::MetadataStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;

/// Deep-path minimum acceptable frame rate (`spec.md` §4.3).
pub const MIN_FPS: f64 = 10.0;
/// Declared latency threshold (`spec.md` §4.3); not yet gated by a
/// classification rule of its own, carried for parity with the spec's
/// threshold table.
pub const MAX_LATENCY_MS: u64 = 5000;
/// Deadline used for the prober's freeze-detection filter.
pub const FREEZE_DURATION: Duration = Duration::from_secs(5);

/// Deep-path classification reason, used to pick the stored event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepReason {
    NoStreams,
    FpsDrop,
    KeyframeIssue,
    NoVideo,
    Healthy,
}

/// Per-stream mutual exclusion so the fast and deep paths never
/// interleave for the same `(node, path)` (`spec.md` §5 ordering
/// guarantee).
#[derive(Default)]
struct StreamLocks {
    locks: SyncMutex<HashMap<(String, String), Arc<AsyncMutex<()>>>>,
}

impl StreamLocks {
    fn entry(&self, node: &str, path: &str) -> Arc<AsyncMutex<()>> {
        self.locks
            .lock()
            .entry((node.to_string(), path.to_string()))
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

pub struct HealthClassifier<F, S, P, C> {
    factory: F,
    store: S,
    prober: P,
    clock: C,
    locks: StreamLocks,
}

impl<F, S, P, C> HealthClassifier<F, S, P, C>
where
    F: RelayClientFactory,
    S: MetadataStore,
    P: MediaProber,
    C: Clock,
{
    pub fn new(factory: F, store: S, prober: P, clock: C) -> Self {
        Self { factory, store, prober, clock, locks: StreamLocks::default() }
    }

    fn transition_event(
        &self,
        node: &str,
        path: &str,
        old: StreamStatus,
        new: StreamStatus,
        reason: &str,
    ) -> Option<StreamEvent> {
        if old == new {
            return None;
        }
        let (kind, severity) = match new {
            StreamStatus::Healthy => (StreamEventKind::Reconnected, Severity::Info),
            StreamStatus::Degraded => match reason {
                "fps_drop" => (StreamEventKind::FpsDrop, Severity::Warning),
                "keyframe_issue" => (StreamEventKind::KeyframeIssue, Severity::Warning),
                _ => (StreamEventKind::Disconnected, Severity::Warning),
            },
            StreamStatus::Unhealthy | StreamStatus::Unknown => {
                (StreamEventKind::Disconnected, Severity::Error)
            }
        };
        let event = StreamEvent::new(node, path, kind, severity, self.clock.now())
            .with_detail(serde_json::json!({ "reason": reason, "from": old.to_string(), "to": new.to_string() }));
        match severity {
            Severity::Error | Severity::Critical => {
                tracing::error!(%node, %path, %reason, from = %old, to = %new, "stream transition")
            }
            Severity::Warning => {
                tracing::warn!(%node, %path, %reason, from = %old, to = %new, "stream transition")
            }
            Severity::Info => {
                tracing::info!(%node, %path, %reason, from = %old, to = %new, "stream transition")
            }
        }
        Some(event)
    }

    /// `spec.md` §4.3 fast path: classify every local stream on `node`
    /// against one `list_paths` reply.
    pub async fn fast_check(&self, node: &Node) -> Result<(), EngineError> {
        let client = self.factory.client_for(node);
        let paths = client.list_paths().await?;
        let streams = self.store.list_streams(Some(&node.name)).await?;

        for stream in streams {
            let guard = self.locks.entry(&stream.node, &stream.path);
            let _lock = guard.lock().await;

            let info = paths.iter().find(|p| p.name == stream.path);
            let (new_status, reason) = match info {
                Some(p) if p.ready => (StreamStatus::Healthy, "ready"),
                Some(p) if p.source.is_some() => (StreamStatus::Degraded, "connecting"),
                Some(p) if p.conf_name.is_some() => (StreamStatus::Degraded, "on_demand"),
                _ => (StreamStatus::Unhealthy, "missing"),
            };

            let old_status = stream.status;
            let mut updated = stream.clone();
            updated.status = new_status;
            updated.last_check = Some(self.clock.now());
            updated.updated_at = self.clock.now();
            self.store.upsert_stream(updated).await?;

            if let Some(event) = self.transition_event(&stream.node, &stream.path, old_status, new_status, reason)
            {
                self.store.append_event(event).await?;
            }
        }

        let mut updated_node = node.clone();
        updated_node.last_seen = Some(self.clock.now());
        self.store.upsert_node(updated_node).await?;

        Ok(())
    }

    /// `spec.md` §4.3 deep path: probe one stream's media URL.
    pub async fn deep_check(
        &self,
        node: &Node,
        stream: &Stream,
        deadline: Duration,
    ) -> Result<(), EngineError> {
        let guard = self.locks.entry(&stream.node, &stream.path);
        let _lock = guard.lock().await;

        let Some(media_url) = stream.media_url(node) else {
            return Err(EngineError::StreamNotFound(stream.node.clone(), stream.path.clone()));
        };

        let probe = self.prober.probe(&media_url, deadline).await?;
        let (new_status, reason) = classify_deep(&probe);

        let mut updated = stream.clone();
        let old_status = updated.status;
        updated.status = new_status;
        updated.last_check = Some(self.clock.now());
        updated.updated_at = self.clock.now();
        if let Some(video) = probe.video() {
            updated.metrics.fps = video.frame_rate;
            updated.metrics.bitrate_bps = video.bitrate;
        }
        if probe.audio().is_none() {
            tracing::warn!(node = %stream.node, path = %stream.path, "deep probe found no audio stream");
        }
        self.store.upsert_stream(updated).await?;

        let reason_str = match reason {
            DeepReason::NoStreams => "no_streams",
            DeepReason::FpsDrop => "fps_drop",
            DeepReason::KeyframeIssue => "keyframe_issue",
            DeepReason::NoVideo => "disconnected",
            DeepReason::Healthy => "healthy",
        };
        if let Some(event) =
            self.transition_event(&stream.node, &stream.path, old_status, new_status, reason_str)
        {
            self.store.append_event(event).await?;
        }

        Ok(())
    }
}

/// Pure classification function for the deep path (`spec.md` §4.3),
/// separated from I/O so it can be unit tested directly.
fn classify_deep(probe: &relcore_adapters::ProbeResult) -> (StreamStatus, DeepReason) {
    if probe.streams.is_empty() {
        return (StreamStatus::Unhealthy, DeepReason::NoStreams);
    }
    let Some(video) = probe.video() else {
        return (StreamStatus::Unhealthy, DeepReason::NoVideo);
    };
    if let Some(fps) = video.frame_rate {
        if fps < MIN_FPS {
            return (StreamStatus::Degraded, DeepReason::FpsDrop);
        }
        if let Some(avg) = video.avg_frame_rate {
            if (fps - avg).abs() > 0.3 * fps.abs() {
                return (StreamStatus::Degraded, DeepReason::KeyframeIssue);
            }
        }
    }
    (StreamStatus::Healthy, DeepReason::Healthy)
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod health_tests;
