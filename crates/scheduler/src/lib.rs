// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! relcore-scheduler: generic periodic-job runner with bounded
//! concurrency and a per-job soft deadline (C9), plus the deep-health
//! sampling rule that decides which Streams a deep-health tick covers.

pub mod deep_sample;
pub mod error;
pub mod job;
pub mod scheduler;

pub use deep_sample::{select_deep_sample, DEEP_SAMPLE_CAP};
pub use error::JobError;
pub use job::Job;
pub use scheduler::{JobScheduler, JobSpec};
