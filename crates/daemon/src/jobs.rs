// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relcore_scheduler::Job` implementations wiring `Deps` into the
//! cadences from `spec.md` §4.8.

use crate::deps::{Controller, Factory, Prober, Store};
use async_trait::async_trait;
use relcore_core::{Clock, StreamStatus, SystemClock};
use relcore_engine::{FleetSynchronizer, HealthClassifier, RemediationEngine};
use relcore_retention::{Archiver, Cleaner, Scanner, SysinfoDiskUsage};
use relcore_scheduler::{Job, JobError};
use relcore_storage::MetadataStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEEP_PROBE_DEADLINE: Duration = Duration::from_secs(60);

/// One task per active Node, in parallel (`spec.md` §4.8, §5).
pub struct FastHealthJob {
    pub health: Arc<HealthClassifier<Factory, Store, Prober, SystemClock>>,
    pub store: Store,
}

#[async_trait]
impl Job for FastHealthJob {
    fn name(&self) -> &str {
        "fast_health"
    }

    async fn run(&self, _cancel: CancellationToken) -> Result<(), JobError> {
        let nodes = self.store.list_nodes().await?;
        let results = futures::future::join_all(
            nodes.iter().filter(|n| n.is_active).map(|node| self.health.fast_check(node)),
        )
        .await;
        for (node, result) in nodes.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(node = %node.name, error = %e, "fast health check failed");
            }
        }
        Ok(())
    }
}

/// Bounded, missing-fps-first sample of Streams, with auto-remediation
/// on an `unhealthy` verdict (`spec.md` §4.8).
pub struct DeepHealthJob {
    pub health: Arc<HealthClassifier<Factory, Store, Prober, SystemClock>>,
    pub remediation: Arc<RemediationEngine<Factory, Controller, Store, SystemClock>>,
    pub store: Store,
}

#[async_trait]
impl Job for DeepHealthJob {
    fn name(&self) -> &str {
        "deep_health"
    }

    async fn run(&self, _cancel: CancellationToken) -> Result<(), JobError> {
        let streams = self.store.list_streams(None).await?;
        let nodes = self.store.list_nodes().await?;
        let sample = relcore_scheduler::select_deep_sample(&streams, relcore_scheduler::DEEP_SAMPLE_CAP);

        let tasks = sample.into_iter().filter_map(|stream| {
            let node = nodes.iter().find(|n| n.name == stream.node)?.clone();
            Some(self.probe_and_maybe_remediate(node, stream.clone()))
        });
        futures::future::join_all(tasks).await;
        Ok(())
    }
}

impl DeepHealthJob {
    async fn probe_and_maybe_remediate(&self, node: relcore_core::Node, stream: relcore_core::Stream) {
        if let Err(e) = self.health.deep_check(&node, &stream, DEEP_PROBE_DEADLINE).await {
            tracing::warn!(node = %stream.node, path = %stream.path, error = %e, "deep health check failed");
            return;
        }

        let Ok(Some(refreshed)) = self.store.get_stream(&stream.node, &stream.path).await else {
            return;
        };
        if refreshed.status != StreamStatus::Unhealthy {
            return;
        }
        match self.remediation.should_auto_remediate(&refreshed).await {
            Ok(true) => {
                if let Err(e) = self.remediation.run(&node, &refreshed, false, None).await {
                    tracing::warn!(node = %stream.node, path = %stream.path, error = %e, "auto-remediation failed");
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(node = %stream.node, path = %stream.path, error = %e, "should_auto_remediate check failed"),
        }
    }
}

/// One task per active Node, in parallel (`spec.md` §4.8, §5).
pub struct FleetSyncJob {
    pub fleet_sync: Arc<FleetSynchronizer<Factory, Store, SystemClock>>,
    pub store: Store,
}

#[async_trait]
impl Job for FleetSyncJob {
    fn name(&self) -> &str {
        "fleet_sync"
    }

    async fn run(&self, _cancel: CancellationToken) -> Result<(), JobError> {
        let nodes = self.store.list_nodes().await?;
        let results =
            futures::future::join_all(nodes.iter().filter(|n| n.is_active).map(|node| self.fleet_sync.sync_node(node)))
                .await;
        for (node, result) in nodes.iter().zip(results) {
            match result {
                Ok(counts) => tracing::debug!(node = %node.name, ?counts, "fleet sync complete"),
                Err(e) => tracing::warn!(node = %node.name, error = %e, "fleet sync failed"),
            }
        }
        Ok(())
    }
}

/// Single hourly task scanning for new recordings, then running the
/// expiry/disk-pressure cleanup pass (`spec.md` §4.7, §4.8).
pub struct RetentionCleanupJob {
    pub scanner: Arc<Scanner<Store>>,
    pub cleaner: Arc<Cleaner<Store, SysinfoDiskUsage>>,
    pub recording_root: PathBuf,
}

#[async_trait]
impl Job for RetentionCleanupJob {
    fn name(&self) -> &str {
        "retention_cleanup"
    }

    async fn run(&self, _cancel: CancellationToken) -> Result<(), JobError> {
        let now = SystemClock.now();
        let report = self.scanner.scan(&self.recording_root, now, false).await?;
        tracing::info!(scanned = report.scanned, inserted = report.inserted, "retention scan complete");

        let result = self.cleaner.cleanup(&self.recording_root, now, false).await?;
        tracing::info!(deleted = result.deleted.len(), freed_bytes = result.freed_bytes, "retention cleanup complete");
        Ok(())
    }
}

/// Daily bounded-batch archive sweep (`spec.md` §4.7, §4.8).
pub struct ArchiveSweepJob {
    pub archiver: Arc<Archiver<Store>>,
    pub archive_root: PathBuf,
    pub batch_size: usize,
}

#[async_trait]
impl Job for ArchiveSweepJob {
    fn name(&self) -> &str {
        "archive_sweep"
    }

    async fn run(&self, _cancel: CancellationToken) -> Result<(), JobError> {
        let now = SystemClock.now();
        let archived = self.archiver.sweep(&self.archive_root, now, self.batch_size).await?;
        tracing::info!(archived = archived.len(), "archive sweep complete");
        Ok(())
    }
}
