// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable, content-addressed snapshots of node configuration (C7).

use crate::define_surrogate_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

define_surrogate_id! {
    /// Surrogate ID for a [`ConfigSnapshot`], assigned by the `MetadataStore`.
    pub struct ConfigSnapshotId;
}

/// An immutable copy of a node's YAML configuration, content-addressed by
/// `hash` (`spec.md` §3, §4.6). Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ConfigSnapshotId>,
    /// `None` for a fleet-wide template snapshot not tied to one node.
    pub node: Option<String>,
    pub hash: String,
    pub yaml: String,
    pub environment: String,
    pub applied: bool,
    pub applied_at: Option<DateTime<Utc>>,
    pub applied_by: Option<String>,
    /// Weak reference to the snapshot this one rolls back, if any.
    pub rollback_of: Option<ConfigSnapshotId>,
    pub notes: String,
}

impl ConfigSnapshot {
    pub fn new(node: Option<String>, hash: String, yaml: String, environment: String) -> Self {
        Self {
            id: None,
            node,
            hash,
            yaml,
            environment,
            applied: false,
            applied_at: None,
            applied_by: None,
            rollback_of: None,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}
