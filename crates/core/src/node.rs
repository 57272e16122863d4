// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A managed media relay node.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A managed media relay instance with a control API.
///
/// `name` is the natural key (`spec.md` §3: "uniqueness on `(Node.name)`").
/// Deleting a node cascades to its streams; logically removing one just
/// flips `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub control_base_url: String,
    pub media_base_url: Option<String>,
    pub environment: String,
    pub is_active: bool,
    pub last_seen: Option<DateTime<Utc>>,
    /// Opaque, caller-defined metadata (never interpreted by the core).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Node {
    pub fn new(name: impl Into<String>, control_base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            control_base_url: control_base_url.into(),
            media_base_url: None,
            environment: String::new(),
            is_active: true,
            last_seen: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_media_base_url(mut self, url: impl Into<String>) -> Self {
        self.media_base_url = Some(url.into());
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// The URL a deep probe should hit for `path` when a stream has no
    /// explicit `source_url` of its own (`spec.md` §4.3).
    pub fn media_url_for_path(&self, path: &str) -> Option<String> {
        self.media_base_url.as_ref().map(|base| format!("{}/{}", base.trim_end_matches('/'), path))
    }
}
