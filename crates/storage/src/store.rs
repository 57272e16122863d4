// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `MetadataStore` trait: persistence for every entity in `spec.md`
//! §3, generalized from the teacher's per-entity `state/*.rs` modules
//! into one method group per entity (C1). The real durable backing store
//! is out of scope (`spec.md` §1, Non-goals); [`crate::memory::InMemoryStore`]
//! is the only implementation shipped here.

use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relcore_core::{
    ConfigSnapshot, ConfigSnapshotId, IPBlockEntry, Node, Recording, RecordingId, Stream,
    StreamEvent, StreamEventId,
};

/// Filters accepted by [`MetadataStore::list_recordings`].
#[derive(Debug, Clone, Default)]
pub struct RecordingFilter {
    pub node: Option<String>,
    pub stream_path: Option<String>,
    pub unarchived_only: bool,
}

#[async_trait]
pub trait MetadataStore: Send + Sync + 'static {
    // -- Nodes ------------------------------------------------------------
    async fn upsert_node(&self, node: Node) -> Result<(), StorageError>;
    async fn get_node(&self, name: &str) -> Result<Option<Node>, StorageError>;
    async fn list_nodes(&self) -> Result<Vec<Node>, StorageError>;
    /// Soft-delete: flips `is_active` rather than removing the row.
    async fn deactivate_node(&self, name: &str) -> Result<(), StorageError>;
    /// Hard delete, cascading to the node's streams, events, recordings,
    /// and config snapshots (`spec.md` §3).
    async fn delete_node(&self, name: &str) -> Result<(), StorageError>;

    // -- Streams ------------------------------------------------------------
    async fn upsert_stream(&self, stream: Stream) -> Result<(), StorageError>;
    async fn get_stream(&self, node: &str, path: &str) -> Result<Option<Stream>, StorageError>;
    async fn list_streams(&self, node: Option<&str>) -> Result<Vec<Stream>, StorageError>;
    async fn delete_stream(&self, node: &str, path: &str) -> Result<(), StorageError>;

    // -- Stream events --------------------------------------------------------
    async fn append_event(&self, event: StreamEvent) -> Result<StreamEventId, StorageError>;
    async fn list_events(
        &self,
        node: &str,
        path: &str,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<StreamEvent>, StorageError>;
    async fn resolve_event(&self, id: StreamEventId) -> Result<(), StorageError>;

    // -- Recordings --------------------------------------------------------
    async fn insert_recording(&self, recording: Recording) -> Result<RecordingId, StorageError>;
    async fn update_recording(&self, recording: Recording) -> Result<(), StorageError>;
    async fn list_recordings(&self, filter: RecordingFilter) -> Result<Vec<Recording>, StorageError>;
    async fn list_expired_recordings(&self, now: DateTime<Utc>) -> Result<Vec<Recording>, StorageError>;
    async fn delete_recording(&self, id: RecordingId) -> Result<(), StorageError>;

    // -- Config snapshots --------------------------------------------------
    async fn insert_snapshot(&self, snapshot: ConfigSnapshot) -> Result<ConfigSnapshotId, StorageError>;
    async fn get_snapshot(&self, id: ConfigSnapshotId) -> Result<Option<ConfigSnapshot>, StorageError>;
    async fn list_snapshots(&self, node: Option<&str>) -> Result<Vec<ConfigSnapshot>, StorageError>;
    async fn mark_snapshot_applied(
        &self,
        id: ConfigSnapshotId,
        applied_at: DateTime<Utc>,
        applied_by: &str,
    ) -> Result<(), StorageError>;

    // -- IP blocklist --------------------------------------------------------
    async fn insert_block(&self, entry: IPBlockEntry) -> Result<(), StorageError>;
    async fn get_block(&self, address: &str) -> Result<Option<IPBlockEntry>, StorageError>;
    async fn list_active_blocks(&self) -> Result<Vec<IPBlockEntry>, StorageError>;
    async fn deactivate_block(&self, address: &str) -> Result<(), StorageError>;
}
