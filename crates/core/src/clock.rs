// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! Every component that compares timestamps (cooldowns, circuit-breaker
//! windows, `expires_at`, backoff) goes through this trait instead of
//! calling `chrono::Utc::now()`/`Instant::now()` directly, so tests can
//! drive time deterministically.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides both wall-clock and monotonic time.
///
/// Wall-clock time (`now`) is used for anything persisted or compared
/// against a stored timestamp (`expires_at`, `last_seen`,
/// `last_remediation`). Monotonic time (`monotonic`) is used for
/// measuring elapsed durations within a single process lifetime (backoff
/// sleeps, per-task deadlines).
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
    fn monotonic(&self) -> Instant;
}

/// Real system clock.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Instant {
        Instant::now()
    }
}

/// Fake clock for testing with controllable, independently-advanceable time.
#[derive(Clone)]
pub struct FakeClock {
    wall: Arc<Mutex<DateTime<Utc>>>,
    mono: Arc<Mutex<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        let epoch = DateTime::from_timestamp(0, 0).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { wall: Arc::new(Mutex::new(epoch)), mono: Arc::new(Mutex::new(Instant::now())) }
    }

    pub fn at(wall: DateTime<Utc>) -> Self {
        Self { wall: Arc::new(Mutex::new(wall)), mono: Arc::new(Mutex::new(Instant::now())) }
    }

    /// Advance both the wall clock and the monotonic clock by `duration`.
    pub fn advance(&self, duration: Duration) {
        *self.wall.lock() += duration;
        *self.mono.lock() += duration;
    }

    pub fn set(&self, wall: DateTime<Utc>) {
        *self.wall.lock() = wall;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.wall.lock()
    }

    fn monotonic(&self) -> Instant {
        *self.mono.lock()
    }
}
