// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! relcore-engine: the components that read and reconcile fleet state —
//! Health Classifier (C4), Remediation Engine (C5), Fleet Synchronizer
//! (C6), and Session Aggregator (C10).

pub mod backoff;
pub mod error;
pub mod fleet_sync;
pub mod health;
pub mod remediation;
pub mod session_aggregator;

pub use backoff::{backoff, BackoffConfig};
pub use error::EngineError;
pub use fleet_sync::{FleetSynchronizer, SyncCounts};
pub use health::{DeepReason, HealthClassifier, FREEZE_DURATION, MAX_LATENCY_MS, MIN_FPS};
pub use remediation::{RemediationAttempt, RemediationEngine, RemediationRun, Tier, N_MAX_DEFAULT};
pub use session_aggregator::{NormalizedSession, SessionAggregator, SessionPage, SessionSummary};
