// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IP blocklist entries (`spec.md` §3; supplemented in `SPEC_FULL.md` §4.11
//! from the original's `blacklist_manager.py`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named block durations, matching the original's `BLOCK_DURATIONS` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockDuration {
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    SixHours,
    OneDay,
    SevenDays,
    ThirtyDays,
    Permanent,
}

impl BlockDuration {
    /// Resolve to a concrete expiry, or `None` for `Permanent`.
    pub fn to_expiry(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        use chrono::Duration;
        let delta = match self {
            BlockDuration::FiveMinutes => Duration::minutes(5),
            BlockDuration::FifteenMinutes => Duration::minutes(15),
            BlockDuration::ThirtyMinutes => Duration::minutes(30),
            BlockDuration::OneHour => Duration::hours(1),
            BlockDuration::SixHours => Duration::hours(6),
            BlockDuration::OneDay => Duration::hours(24),
            BlockDuration::SevenDays => Duration::days(7),
            BlockDuration::ThirtyDays => Duration::days(30),
            BlockDuration::Permanent => return None,
        };
        Some(now + delta)
    }
}

/// The scope an [`IPBlockEntry`] restricts a block to. A path pattern
/// ending in `*` matches any path sharing that literal prefix; `None` in
/// both fields means the block applies fleet-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockScope {
    pub path_pattern: Option<String>,
    pub node: Option<String>,
}

impl BlockScope {
    pub fn matches(&self, node: &str, path: &str) -> bool {
        if let Some(want_node) = &self.node {
            if want_node != node {
                return false;
            }
        }
        if let Some(pattern) = &self.path_pattern {
            if let Some(prefix) = pattern.strip_suffix('*') {
                return path.starts_with(prefix);
            }
            return pattern == path;
        }
        true
    }
}

/// A record-keeping IP block entry. Per the original's own docstring,
/// this does not itself prevent reconnection — enforcement is the
/// relay's or the external API's job; the core only tracks the decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IPBlockEntry {
    pub address: String,
    pub scope: BlockScope,
    pub reason: Option<String>,
    pub blocked_by: Option<String>,
    pub is_permanent: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl IPBlockEntry {
    pub fn new(
        address: impl Into<String>,
        scope: BlockScope,
        duration: BlockDuration,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = duration.to_expiry(now);
        Self {
            address: address.into(),
            scope,
            reason: None,
            blocked_by: None,
            is_permanent: matches!(duration, BlockDuration::Permanent),
            expires_at,
            is_active: true,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.is_permanent && self.expires_at.is_some_and(|exp| exp <= now)
    }
}
