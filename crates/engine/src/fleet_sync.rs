// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet Synchronizer (C6, `spec.md` §4.5): reconciles one node's
//! reported paths against local `Stream` rows.

use crate::error::EngineError;
use relcore_adapters::RelayClientFactory;
use relcore_core::{Clock, Node, Protocol, Stream};
use relcore_storage::MetadataStore;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

pub struct FleetSynchronizer<F, S, C> {
    factory: F,
    store: S,
    clock: C,
}

impl<F, S, C> FleetSynchronizer<F, S, C>
where
    F: RelayClientFactory,
    S: MetadataStore,
    C: Clock,
{
    pub fn new(factory: F, store: S, clock: C) -> Self {
        Self { factory, store, clock }
    }

    /// At most one sync in flight per node is the caller's
    /// responsibility (`spec.md` §5); this method itself does not retry
    /// on error (`spec.md` §4.5: "Errors surface; no retries at this
    /// layer").
    pub async fn sync_node(&self, node: &Node) -> Result<SyncCounts, EngineError> {
        let client = self.factory.client_for(node);
        let paths = client.list_paths().await?;
        let existing = self.store.list_streams(Some(&node.name)).await?;

        let seen: HashSet<&str> = paths.iter().map(|p| p.name.as_str()).collect();
        let mut created = 0;
        let mut updated = 0;

        for path_info in &paths {
            let protocol = path_info
                .source
                .as_ref()
                .map(|s| Protocol::from_source_type(&s.source_type))
                .unwrap_or(Protocol::Unknown);

            match existing.iter().find(|s| s.path == path_info.name) {
                Some(existing_stream) => {
                    let mut stream = existing_stream.clone();
                    stream.protocol = protocol;
                    stream.updated_at = self.clock.now();
                    self.store.upsert_stream(stream).await?;
                    updated += 1;
                }
                None => {
                    let mut stream = Stream::new(node.name.clone(), path_info.name.clone(), self.clock.now());
                    stream.protocol = protocol;
                    self.store.upsert_stream(stream).await?;
                    created += 1;
                }
            }
        }

        let mut deleted = 0;
        for existing_stream in &existing {
            if !seen.contains(existing_stream.path.as_str()) {
                self.store.delete_stream(&node.name, &existing_stream.path).await?;
                deleted += 1;
            }
        }

        let mut updated_node = node.clone();
        updated_node.last_seen = Some(self.clock.now());
        self.store.upsert_node(updated_node).await?;

        tracing::info!(node = %node.name, total = paths.len(), created, updated, deleted, "fleet sync complete");
        Ok(SyncCounts { total: paths.len(), created, updated, deleted })
    }
}

#[cfg(test)]
#[path = "fleet_sync_tests.rs"]
mod fleet_sync_tests;
