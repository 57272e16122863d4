// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `MetadataStore`, the only store shipped in this crate
//! (`spec.md` §1 excludes a durable backing store). Shaped after the
//! teacher's `MaterializedState`: one `HashMap` per entity guarded by a
//! single lock, with cascading deletes applied inline.

use crate::error::StorageError;
use crate::store::{MetadataStore, RecordingFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use relcore_core::{
    ConfigSnapshot, ConfigSnapshotId, IPBlockEntry, Node, Recording, RecordingId, Stream,
    StreamEvent, StreamEventId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    nodes: HashMap<String, Node>,
    streams: HashMap<(String, String), Stream>,
    events: HashMap<u64, StreamEvent>,
    event_order: Vec<u64>,
    recordings: HashMap<u64, Recording>,
    snapshots: HashMap<u64, ConfigSnapshot>,
    blocks: HashMap<String, IPBlockEntry>,
}

/// `MetadataStore` backed by in-process `HashMap`s behind one lock.
///
/// Cheap to clone: internally `Arc`-wrapped, so every clone shares the
/// same state, matching how the daemon wires one store into every
/// engine component.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
    next_event_id: Arc<AtomicU64>,
    next_recording_id: Arc<AtomicU64>,
    next_snapshot_id: Arc<AtomicU64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            next_event_id: Arc::new(AtomicU64::new(1)),
            next_recording_id: Arc::new(AtomicU64::new(1)),
            next_snapshot_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn upsert_node(&self, node: Node) -> Result<(), StorageError> {
        self.inner.lock().nodes.insert(node.name.clone(), node);
        Ok(())
    }

    async fn get_node(&self, name: &str) -> Result<Option<Node>, StorageError> {
        Ok(self.inner.lock().nodes.get(name).cloned())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, StorageError> {
        Ok(self.inner.lock().nodes.values().cloned().collect())
    }

    async fn deactivate_node(&self, name: &str) -> Result<(), StorageError> {
        let mut guard = self.inner.lock();
        let node = guard.nodes.get_mut(name).ok_or_else(|| StorageError::NodeNotFound(name.to_string()))?;
        node.is_active = false;
        Ok(())
    }

    async fn delete_node(&self, name: &str) -> Result<(), StorageError> {
        let mut guard = self.inner.lock();
        if guard.nodes.remove(name).is_none() {
            return Err(StorageError::NodeNotFound(name.to_string()));
        }
        guard.streams.retain(|(n, _), _| n != name);
        guard.events.retain(|_, e| e.node != name);
        guard.event_order.retain(|id| guard.events.contains_key(id));
        guard.recordings.retain(|_, r| r.node != name);
        guard.snapshots.retain(|_, s| s.node.as_deref() != Some(name));
        Ok(())
    }

    async fn upsert_stream(&self, stream: Stream) -> Result<(), StorageError> {
        let key = (stream.node.clone(), stream.path.clone());
        self.inner.lock().streams.insert(key, stream);
        Ok(())
    }

    async fn get_stream(&self, node: &str, path: &str) -> Result<Option<Stream>, StorageError> {
        Ok(self.inner.lock().streams.get(&(node.to_string(), path.to_string())).cloned())
    }

    async fn list_streams(&self, node: Option<&str>) -> Result<Vec<Stream>, StorageError> {
        let guard = self.inner.lock();
        Ok(guard
            .streams
            .values()
            .filter(|s| node.is_none_or(|n| s.node == n))
            .cloned()
            .collect())
    }

    async fn delete_stream(&self, node: &str, path: &str) -> Result<(), StorageError> {
        let mut guard = self.inner.lock();
        guard.streams.remove(&(node.to_string(), path.to_string()));
        Ok(())
    }

    async fn append_event(&self, mut event: StreamEvent) -> Result<StreamEventId, StorageError> {
        let raw = self.next_event_id.fetch_add(1, Ordering::Relaxed);
        let id = StreamEventId::new(raw);
        event.id = Some(id);
        let mut guard = self.inner.lock();
        guard.events.insert(raw, event);
        guard.event_order.push(raw);
        Ok(id)
    }

    async fn list_events(
        &self,
        node: &str,
        path: &str,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<StreamEvent>, StorageError> {
        let guard = self.inner.lock();
        let mut out: Vec<StreamEvent> = guard
            .event_order
            .iter()
            .filter_map(|id| guard.events.get(id))
            .filter(|e| e.node == node && e.path == path)
            .filter(|e| since.is_none_or(|s| e.created_at >= s))
            .cloned()
            .collect();
        if out.len() > limit {
            out = out.split_off(out.len() - limit);
        }
        Ok(out)
    }

    async fn resolve_event(&self, id: StreamEventId) -> Result<(), StorageError> {
        if let Some(event) = self.inner.lock().events.get_mut(&id.get()) {
            event.resolved = true;
        }
        Ok(())
    }

    async fn insert_recording(&self, mut recording: Recording) -> Result<RecordingId, StorageError> {
        let raw = self.next_recording_id.fetch_add(1, Ordering::Relaxed);
        let id = RecordingId::new(raw);
        recording.id = Some(id);
        self.inner.lock().recordings.insert(raw, recording);
        Ok(id)
    }

    async fn update_recording(&self, recording: Recording) -> Result<(), StorageError> {
        let id = recording.id.ok_or_else(|| StorageError::SnapshotNotFound(0))?;
        self.inner.lock().recordings.insert(id.get(), recording);
        Ok(())
    }

    async fn list_recordings(&self, filter: RecordingFilter) -> Result<Vec<Recording>, StorageError> {
        let guard = self.inner.lock();
        Ok(guard
            .recordings
            .values()
            .filter(|r| filter.node.as_deref().is_none_or(|n| r.node == n))
            .filter(|r| filter.stream_path.as_deref().is_none_or(|p| r.stream_path == p))
            .filter(|r| !filter.unarchived_only || !r.is_archived)
            .cloned()
            .collect())
    }

    async fn list_expired_recordings(&self, now: DateTime<Utc>) -> Result<Vec<Recording>, StorageError> {
        let guard = self.inner.lock();
        Ok(guard.recordings.values().filter(|r| r.expires_at <= now).cloned().collect())
    }

    async fn delete_recording(&self, id: RecordingId) -> Result<(), StorageError> {
        self.inner.lock().recordings.remove(&id.get());
        Ok(())
    }

    async fn insert_snapshot(&self, mut snapshot: ConfigSnapshot) -> Result<ConfigSnapshotId, StorageError> {
        let raw = self.next_snapshot_id.fetch_add(1, Ordering::Relaxed);
        let id = ConfigSnapshotId::new(raw);
        snapshot.id = Some(id);
        self.inner.lock().snapshots.insert(raw, snapshot);
        Ok(id)
    }

    async fn get_snapshot(&self, id: ConfigSnapshotId) -> Result<Option<ConfigSnapshot>, StorageError> {
        Ok(self.inner.lock().snapshots.get(&id.get()).cloned())
    }

    async fn list_snapshots(&self, node: Option<&str>) -> Result<Vec<ConfigSnapshot>, StorageError> {
        let guard = self.inner.lock();
        Ok(guard
            .snapshots
            .values()
            .filter(|s| node.is_none_or(|n| s.node.as_deref() == Some(n)))
            .cloned()
            .collect())
    }

    async fn mark_snapshot_applied(
        &self,
        id: ConfigSnapshotId,
        applied_at: DateTime<Utc>,
        applied_by: &str,
    ) -> Result<(), StorageError> {
        let mut guard = self.inner.lock();
        let snapshot =
            guard.snapshots.get_mut(&id.get()).ok_or(StorageError::SnapshotNotFound(id.get()))?;
        snapshot.applied = true;
        snapshot.applied_at = Some(applied_at);
        snapshot.applied_by = Some(applied_by.to_string());
        Ok(())
    }

    async fn insert_block(&self, entry: IPBlockEntry) -> Result<(), StorageError> {
        self.inner.lock().blocks.insert(entry.address.clone(), entry);
        Ok(())
    }

    async fn get_block(&self, address: &str) -> Result<Option<IPBlockEntry>, StorageError> {
        Ok(self.inner.lock().blocks.get(address).cloned())
    }

    async fn list_active_blocks(&self) -> Result<Vec<IPBlockEntry>, StorageError> {
        Ok(self.inner.lock().blocks.values().filter(|b| b.is_active).cloned().collect())
    }

    async fn deactivate_block(&self, address: &str) -> Result<(), StorageError> {
        if let Some(entry) = self.inner.lock().blocks.get_mut(address) {
            entry.is_active = false;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
