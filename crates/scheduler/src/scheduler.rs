// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The periodic job runner (`spec.md` §4.8, §5): fixed-cadence ticks,
//! one bounded worker pool shared across jobs, a soft per-job deadline,
//! and cooperative cancellation on shutdown.

use crate::job::Job;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A registered job: what to run, how often, and its soft deadline.
pub struct JobSpec {
    pub cadence: Duration,
    pub timeout: Duration,
    pub job: Arc<dyn Job>,
}

impl JobSpec {
    pub fn new(job: Arc<dyn Job>, cadence: Duration, timeout: Duration) -> Self {
        Self { cadence, timeout, job }
    }
}

/// Runs every registered [`JobSpec`] on its own cadence, fanning each
/// tick's execution out through a single `concurrency`-wide semaphore
/// shared across all jobs (`spec.md` §4.8: "single configurable
/// concurrency ceiling").
pub struct JobScheduler {
    specs: Vec<JobSpec>,
    concurrency: usize,
}

impl JobScheduler {
    pub fn new(concurrency: usize) -> Self {
        Self { specs: Vec::new(), concurrency: concurrency.max(1) }
    }

    pub fn register(&mut self, spec: JobSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    /// Runs until `shutdown` is cancelled. Each job's own tasks are
    /// cancelled in turn via a child token, so an in-flight job gets the
    /// chance to unwind cleanly (`spec.md` §5's cancellation contract)
    /// before this function returns.
    pub async fn run(self, shutdown: CancellationToken) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let handles: Vec<JoinHandle<()>> = self
            .specs
            .into_iter()
            .map(|spec| spawn_job_loop(spec, semaphore.clone(), shutdown.clone()))
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "scheduler job loop panicked");
            }
        }
    }
}

fn spawn_job_loop(spec: JobSpec, semaphore: Arc<Semaphore>, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = spec.job.name().to_string();
        let mut ticker = tokio::time::interval(spec.cadence);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let permit = tokio::select! {
                _ = shutdown.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
            };

            let job = spec.job.clone();
            let job_name = name.clone();
            let job_cancel = shutdown.child_token();
            let timeout = spec.timeout;
            tokio::spawn(async move {
                let _permit = permit;
                match tokio::time::timeout(timeout, job.run(job_cancel)).await {
                    Ok(Ok(())) => tracing::debug!(job = %job_name, "job tick completed"),
                    Ok(Err(e)) => tracing::warn!(job = %job_name, error = %e, "job tick failed"),
                    Err(_) => tracing::warn!(job = %job_name, deadline_s = timeout.as_secs(), "job tick exceeded its deadline"),
                }
            });
        }
    })
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
