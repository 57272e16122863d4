// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IP blocklist operations (`SPEC_FULL.md` §4.11, grounded in the
//! original's `blacklist_manager.py`). Record-keeping only — enforcement
//! happens at the relay or the external API.

use crate::error::RetentionError;
use chrono::{DateTime, Utc};
use relcore_core::{BlockDuration, BlockScope, IPBlockEntry};
use relcore_storage::MetadataStore;

pub struct Blocklist<S> {
    store: S,
}

impl<S: MetadataStore> Blocklist<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn block(
        &self,
        address: &str,
        scope: BlockScope,
        duration: BlockDuration,
        reason: Option<String>,
        blocked_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<IPBlockEntry, RetentionError> {
        let mut entry = IPBlockEntry::new(address, scope, duration, now);
        entry.reason = reason;
        entry.blocked_by = blocked_by;
        self.store.insert_block(entry.clone()).await?;
        tracing::info!(address, "address blocked");
        Ok(entry)
    }

    pub async fn unblock(&self, address: &str) -> Result<(), RetentionError> {
        self.store.deactivate_block(address).await?;
        tracing::info!(address, "address unblocked");
        Ok(())
    }

    pub async fn is_blocked(
        &self,
        address: &str,
        node: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, RetentionError> {
        let Some(entry) = self.store.get_block(address).await? else {
            return Ok(false);
        };
        Ok(entry.is_active && !entry.is_expired(now) && entry.scope.matches(node, path))
    }

    /// Deactivates every active block whose timed expiry has passed.
    /// Returns the number of entries swept.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, RetentionError> {
        let active = self.store.list_active_blocks().await?;
        let mut swept = 0;
        for entry in active.into_iter().filter(|e| e.is_expired(now)) {
            self.store.deactivate_block(&entry.address).await?;
            swept += 1;
        }
        if swept > 0 {
            tracing::info!(swept, "expired blocks swept");
        }
        Ok(swept)
    }
}

#[cfg(test)]
#[path = "blocklist_tests.rs"]
mod blocklist_tests;
