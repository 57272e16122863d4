// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan/apply/rollback/rolling-update orchestration (C7, `spec.md` §4.6),
//! generalized from the teacher's runbook parse → validate → diff
//! pipeline shape, generic over the relay client factory, store, and
//! clock the way the teacher's `Runtime<A, N, C>` is generic over its
//! adapters (`spec.md` §9: explicit `Deps`, no globals).

use crate::diff::{diff, ConfigDiff};
use crate::error::ConfigError;
use crate::hash::canonical_hash;
use crate::validate::{validate, ValidationResult};
use relcore_adapters::{RelayClientError, RelayClientFactory};
use relcore_core::{Clock, ConfigSnapshot, ConfigSnapshotId, Node};
use relcore_storage::MetadataStore;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub can_apply: bool,
    pub validation: ValidationResult,
    pub diff: ConfigDiff,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyResult {
    pub success: bool,
    pub rolled_back: bool,
    pub snapshot_id: Option<ConfigSnapshotId>,
}

pub struct ConfigEngine<F, S, C> {
    factory: F,
    store: S,
    clock: C,
}

impl<F, S, C> ConfigEngine<F, S, C>
where
    F: RelayClientFactory,
    S: MetadataStore,
    C: Clock,
{
    pub fn new(factory: F, store: S, clock: C) -> Self {
        Self { factory, store, clock }
    }

    /// Fetch the node's current global config, treating a 404 (no config
    /// yet applied) as "none" rather than an error.
    async fn current_config(&self, node: &Node) -> Result<Option<String>, ConfigError> {
        let client = self.factory.client_for(node);
        match client.get_global_config().await {
            Ok(yaml) => Ok(Some(yaml)),
            Err(RelayClientError::BadStatus(404)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// `spec.md` §4.6 Plan: "Validate new; fetch current from node (if
    /// any); return `{can_apply, validation, diff, summary}`;
    /// non-valid ⇒ `can_apply=false`."
    pub async fn plan(&self, node: &Node, new_yaml: &str) -> Result<Plan, ConfigError> {
        let validation = validate(new_yaml);
        let current = self.current_config(node).await?;
        let diff_result = match &current {
            Some(cur) if validation.valid => diff(cur, new_yaml)?,
            _ => ConfigDiff::default(),
        };
        let summary = match &current {
            Some(_) => format!(
                "{} structural change(s) against the node's current config",
                diff_result.structural.len()
            ),
            None => "no config currently applied on node".to_string(),
        };
        Ok(Plan { can_apply: validation.valid, validation, diff: diff_result, summary })
    }

    /// `spec.md` §4.6 Apply. Persists the backup snapshot only after the
    /// current config is actually fetched (§4.10: a DB write that must be
    /// atomic with a side effect is committed only after the side effect
    /// is observed).
    pub async fn apply(
        &self,
        node: &Node,
        new_yaml: &str,
        applied_by: &str,
    ) -> Result<ApplyResult, ConfigError> {
        self.apply_inner(node, new_yaml, applied_by, None).await
    }

    async fn apply_inner(
        &self,
        node: &Node,
        new_yaml: &str,
        applied_by: &str,
        rollback_of: Option<ConfigSnapshotId>,
    ) -> Result<ApplyResult, ConfigError> {
        let plan = self.plan(node, new_yaml).await?;
        if !plan.can_apply {
            return Ok(ApplyResult { success: false, rolled_back: false, snapshot_id: None });
        }

        let client = self.factory.client_for(node);
        let current = client.get_global_config().await.ok();

        if let Some(current_yaml) = &current {
            let backup_hash = canonical_hash(current_yaml)?;
            let mut backup = ConfigSnapshot::new(
                Some(node.name.clone()),
                backup_hash,
                current_yaml.clone(),
                node.environment.clone(),
            )
            .with_notes("auto-backup before apply");
            backup.applied = true;
            let backup_id = self.store.insert_snapshot(backup).await?;
            self.store
                .mark_snapshot_applied(backup_id, self.clock.now(), "system:pre-apply-backup")
                .await?;
        }

        if let Err(send_err) = client.patch_global_config(new_yaml).await {
            let rolled_back = match &current {
                Some(current_yaml) => client.patch_global_config(current_yaml).await.is_ok(),
                None => false,
            };
            tracing::warn!(node = %node.name, error = %send_err, rolled_back, "config apply failed");
            return Ok(ApplyResult { success: false, rolled_back, snapshot_id: None });
        }

        let new_hash = canonical_hash(new_yaml)?;
        let mut snapshot = ConfigSnapshot::new(
            Some(node.name.clone()),
            new_hash,
            new_yaml.to_string(),
            node.environment.clone(),
        );
        snapshot.rollback_of = rollback_of;
        let snapshot_id = self.store.insert_snapshot(snapshot).await?;
        self.store.mark_snapshot_applied(snapshot_id, self.clock.now(), applied_by).await?;

        Ok(ApplyResult { success: true, rolled_back: false, snapshot_id: Some(snapshot_id) })
    }

    /// Thin wrapper over `apply` that re-sends a prior snapshot's YAML
    /// and tags the resulting snapshot with `rollback_of`.
    pub async fn rollback(
        &self,
        node: &Node,
        snapshot_id: ConfigSnapshotId,
        applied_by: &str,
    ) -> Result<ApplyResult, ConfigError> {
        let snapshot = self
            .store
            .get_snapshot(snapshot_id)
            .await?
            .ok_or(ConfigError::RollbackTargetMissing)?;

        self.apply_inner(node, &snapshot.yaml, applied_by, Some(snapshot_id)).await
    }

    /// `spec.md` §4.6 Rolling update: partition `nodes` (already filtered
    /// by environment by the caller) into batches of `batch_size`, apply
    /// each batch in parallel, abort before the next batch on any
    /// failure, sleep `delay_between_batches` in between.
    pub async fn rolling_update(
        &self,
        nodes: &[Node],
        new_yaml: &str,
        batch_size: usize,
        delay_between_batches: Duration,
        applied_by: &str,
    ) -> Vec<(String, ApplyResult)> {
        let batch_size = batch_size.max(1);
        let mut results = Vec::with_capacity(nodes.len());

        for (batch_index, batch) in nodes.chunks(batch_size).enumerate() {
            if batch_index > 0 {
                tokio::time::sleep(delay_between_batches).await;
            }

            let outcomes = futures::future::join_all(batch.iter().map(|node| async move {
                let result = self.apply(node, new_yaml, applied_by).await;
                (node.name.clone(), result)
            }))
            .await;

            let mut batch_failed = false;
            for (name, outcome) in outcomes {
                let result = match outcome {
                    Ok(r) => {
                        if !r.success {
                            batch_failed = true;
                        }
                        r
                    }
                    Err(e) => {
                        tracing::warn!(node = %name, error = %e, "rolling update apply errored");
                        batch_failed = true;
                        ApplyResult { success: false, rolled_back: false, snapshot_id: None }
                    }
                };
                results.push((name, result));
            }

            if batch_failed {
                break;
            }
        }

        results
    }
}
