// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default retention policy (`SPEC_FULL.md` §4.7), supplemented from the
//! original's `retention_manager.py::default_policy`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub continuous_retention_days: u32,
    pub event_retention_days: u32,
    pub manual_retention_days: u32,
    /// A continuous recording is eligible for archival only once its age
    /// meets this threshold.
    pub archive_after_days: u32,
    pub disk_usage_threshold: f64,
    pub min_free_space_gb: u64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            continuous_retention_days: 7,
            event_retention_days: 30,
            manual_retention_days: 90,
            archive_after_days: 3,
            disk_usage_threshold: 0.85,
            min_free_space_gb: 50,
        }
    }
}
