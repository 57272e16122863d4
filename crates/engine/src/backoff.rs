// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jittered exponential backoff for remediation attempts (`spec.md` §4.4).

use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    pub base: Duration,
    pub jitter: f64,
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self { base: Duration::from_secs(1), jitter: 0.3, max_delay: Duration::from_secs(60) }
    }
}

/// `backoff(i) = min(base * 2^i * (1 + U[0, jitter]), max_delay)`.
pub fn backoff(config: BackoffConfig, attempt: u32) -> Duration {
    backoff_with_rng(config, attempt, &mut rand::thread_rng())
}

fn backoff_with_rng(config: BackoffConfig, attempt: u32, rng: &mut impl Rng) -> Duration {
    let exponent = 2f64.powi(attempt as i32);
    let jitter_factor = 1.0 + rng.gen_range(0.0..=config.jitter);
    let scaled = config.base.as_secs_f64() * exponent * jitter_factor;
    Duration::from_secs_f64(scaled).min(config.max_delay)
}
