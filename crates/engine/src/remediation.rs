// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remediation Engine (C5, `spec.md` §4.4): a tiered recovery state
//! machine, directly modeled on the teacher's escalation-trigger /
//! decision-builder shape (`EscalationTrigger` in
//! `crates/daemon/src/engine/decision.rs`) — a tagged trigger/tier enum
//! with exhaustive matching at each consumer site, here driving a
//! side-effecting action instead of building an operator decision.

use crate::backoff::{backoff, BackoffConfig};
use crate::error::EngineError;
use chrono::Duration as ChronoDuration;
use relcore_adapters::{RelayClientError, RelayClientFactory, RelayProcessController};
use relcore_core::{Clock, Node, Outcome, ReasonCode, Severity, Stream, StreamEvent, StreamEventKind};
use relcore_storage::MetadataStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default max attempts per tier (`spec.md` §4.4).
pub const N_MAX_DEFAULT: u32 = 5;
/// Fixed pause between delete-then-recreate steps within tiers 2 and 3.
const RESTART_WAIT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Reconnect,
    RestartSidecar,
    RestartPath,
    RestartRelay,
}

impl Tier {
    pub fn number(self) -> u8 {
        match self {
            Tier::Reconnect => 1,
            Tier::RestartSidecar => 2,
            Tier::RestartPath => 3,
            Tier::RestartRelay => 4,
        }
    }

    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Reconnect => Some(Tier::RestartSidecar),
            Tier::RestartSidecar => Some(Tier::RestartPath),
            Tier::RestartPath => Some(Tier::RestartRelay),
            Tier::RestartRelay => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationAttempt {
    pub tier: Tier,
    pub attempt: u32,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationRun {
    pub success: bool,
    pub attempts: Vec<RemediationAttempt>,
    pub final_tier: Option<Tier>,
    /// Set when the run never started because an entry-policy check
    /// denied it (only possible for non-forced runs).
    pub denied: Option<ReasonCode>,
}

pub struct RemediationEngine<F, R, S, C> {
    factory: F,
    controller: R,
    store: S,
    clock: C,
    n_max: u32,
    backoff_config: BackoffConfig,
}

impl<F, R, S, C> RemediationEngine<F, R, S, C>
where
    F: RelayClientFactory,
    R: RelayProcessController,
    S: MetadataStore,
    C: Clock,
{
    pub fn new(factory: F, controller: R, store: S, clock: C) -> Self {
        Self {
            factory,
            controller,
            store,
            clock,
            n_max: N_MAX_DEFAULT,
            backoff_config: BackoffConfig::default(),
        }
    }

    pub fn with_n_max(mut self, n_max: u32) -> Self {
        self.n_max = n_max;
        self
    }

    pub fn with_backoff(mut self, backoff_config: BackoffConfig) -> Self {
        self.backoff_config = backoff_config;
        self
    }

    /// `spec.md` §4.4 entry policy plus circuit breaker, surfaced as a
    /// plain bool for scheduler callers (`spec.md` §4.8).
    pub async fn should_auto_remediate(&self, stream: &Stream) -> Result<bool, EngineError> {
        Ok(self.entry_denial(stream).await?.is_none())
    }

    async fn entry_denial(&self, stream: &Stream) -> Result<Option<ReasonCode>, EngineError> {
        if !stream.auto_remediate {
            return Ok(Some(ReasonCode::PreconditionFailed));
        }
        if let Some(last) = stream.last_remediation {
            if self.clock.now() - last < ChronoDuration::minutes(5) {
                return Ok(Some(ReasonCode::CooldownActive));
            }
        }
        if self.circuit_breaker_open(stream).await? {
            return Ok(Some(ReasonCode::CircuitBreakerOpen));
        }
        Ok(None)
    }

    /// Testable property 4: true after >= 10 `remediation_failed` events
    /// in the trailing 60 minutes for this stream.
    async fn circuit_breaker_open(&self, stream: &Stream) -> Result<bool, EngineError> {
        let since = self.clock.now() - ChronoDuration::hours(1);
        let events = self.store.list_events(&stream.node, &stream.path, Some(since), 10_000).await?;
        let failed = events.iter().filter(|e| e.kind == StreamEventKind::RemediationFailed).count();
        Ok(failed >= 10)
    }

    /// `spec.md` §4.4: tier chosen from recent `remediation_started`
    /// counts in the trailing 60 minutes, unless the caller overrides it.
    async fn start_tier(&self, stream: &Stream) -> Result<Tier, EngineError> {
        let since = self.clock.now() - ChronoDuration::hours(1);
        let events = self.store.list_events(&stream.node, &stream.path, Some(since), 10_000).await?;
        let started = events.iter().filter(|e| e.kind == StreamEventKind::RemediationStarted).count();
        Ok(if started >= 5 {
            Tier::RestartPath
        } else if started >= 2 {
            Tier::RestartSidecar
        } else {
            Tier::Reconnect
        })
    }

    /// Run the tiered recovery state machine for `stream` on `node`.
    /// `forced` bypasses the entry policy and circuit breaker
    /// (`spec.md` §4.4: "These checks do not apply to an operator-forced
    /// run").
    pub async fn run(
        &self,
        node: &Node,
        stream: &Stream,
        forced: bool,
        tier_override: Option<Tier>,
    ) -> Result<RemediationRun, EngineError> {
        if !forced {
            if let Some(reason) = self.entry_denial(stream).await? {
                return Ok(RemediationRun { success: false, attempts: vec![], final_tier: None, denied: Some(reason) });
            }
        }

        let mut tier = match tier_override {
            Some(t) => t,
            None => self.start_tier(stream).await?,
        };

        let started = StreamEvent::new(
            &stream.node,
            &stream.path,
            StreamEventKind::RemediationStarted,
            Severity::Info,
            self.clock.now(),
        )
        .with_detail(serde_json::json!({ "start_tier": tier.number(), "forced": forced }));
        tracing::info!(node = %stream.node, path = %stream.path, tier = tier.number(), "remediation started");
        self.store.append_event(started).await?;

        let mut attempts = Vec::new();

        loop {
            if tier == Tier::RestartPath && stream.source_url.is_none() {
                attempts.push(RemediationAttempt {
                    tier,
                    attempt: 1,
                    outcome: Outcome::failed(ReasonCode::PreconditionFailed, "tier 3 requires source_url"),
                });
                match tier.next() {
                    Some(next) => {
                        tier = next;
                        continue;
                    }
                    None => return self.finish(stream, false, tier, attempts).await,
                }
            }

            let mut attempt_number = 0u32;
            loop {
                attempt_number += 1;
                let outcome = self.try_tier(node, stream, tier).await;
                let succeeded = outcome.success;
                attempts.push(RemediationAttempt { tier, attempt: attempt_number, outcome });
                if succeeded {
                    return self.finish(stream, true, tier, attempts).await;
                }
                if attempt_number >= self.n_max {
                    break;
                }
                tokio::time::sleep(backoff(self.backoff_config, attempt_number - 1)).await;
            }

            match tier.next() {
                Some(next) => tier = next,
                None => return self.finish(stream, false, tier, attempts).await,
            }
        }
    }

    async fn finish(
        &self,
        stream: &Stream,
        success: bool,
        final_tier: Tier,
        attempts: Vec<RemediationAttempt>,
    ) -> Result<RemediationRun, EngineError> {
        let mut updated = stream.clone();
        updated.remediation_count += 1;
        updated.last_remediation = Some(self.clock.now());
        self.store.upsert_stream(updated).await?;

        let (kind, severity) = if success {
            (StreamEventKind::RemediationSuccess, Severity::Info)
        } else {
            (StreamEventKind::RemediationFailed, Severity::Error)
        };
        let detail = serde_json::json!({
            "final_tier": final_tier.number(),
            "attempts": attempts,
        });
        let event = StreamEvent::new(&stream.node, &stream.path, kind, severity, self.clock.now())
            .with_detail(detail);
        if success {
            tracing::info!(node = %stream.node, path = %stream.path, tier = final_tier.number(), attempts = attempts.len(), "remediation succeeded");
        } else {
            tracing::error!(node = %stream.node, path = %stream.path, tier = final_tier.number(), attempts = attempts.len(), "remediation failed");
        }
        self.store.append_event(event).await?;

        Ok(RemediationRun { success, attempts, final_tier: Some(final_tier), denied: None })
    }

    async fn try_tier(&self, node: &Node, stream: &Stream, tier: Tier) -> Outcome {
        let result = match tier {
            Tier::Reconnect => self.try_reconnect(node, stream).await,
            Tier::RestartSidecar => self.try_restart_sidecar(node, stream).await,
            Tier::RestartPath => self.try_restart_path(node, stream).await,
            Tier::RestartRelay => self
                .controller
                .restart(node)
                .await
                .map_err(|e| RelayClientError::Unreachable(e.to_string())),
        };
        match result {
            Ok(()) => Outcome::ok(),
            Err(e) => Outcome::failed(reason_for(&e), e.to_string()),
        }
    }

    async fn try_reconnect(&self, node: &Node, stream: &Stream) -> Result<(), RelayClientError> {
        let client = self.factory.client_for(node);
        let ids = client.list_rtsp_sessions_on_path(&stream.path).await?;
        let mut kicked = 0;
        for id in &ids {
            if client.kick_session(relcore_core::Protocol::Rtsp, id).await.is_ok()
                || client.kick_session(relcore_core::Protocol::Rtsps, id).await.is_ok()
            {
                kicked += 1;
            }
        }
        if kicked >= 1 {
            Ok(())
        } else {
            Err(RelayClientError::Unreachable("no sessions kicked".to_string()))
        }
    }

    async fn try_restart_sidecar(&self, node: &Node, stream: &Stream) -> Result<(), RelayClientError> {
        let client = self.factory.client_for(node);
        let body = client.get_path_config(&stream.path).await?;
        client.delete_path(&stream.path).await?;
        tokio::time::sleep(RESTART_WAIT).await;
        client.add_path(&stream.path, &body).await
    }

    async fn try_restart_path(&self, node: &Node, stream: &Stream) -> Result<(), RelayClientError> {
        let Some(source_url) = &stream.source_url else {
            return Err(RelayClientError::Unreachable("no source_url".to_string()));
        };
        let client = self.factory.client_for(node);
        client.delete_path(&stream.path).await?;
        tokio::time::sleep(RESTART_WAIT).await;
        let body = serde_json::json!({ "source": source_url }).to_string();
        client.add_path(&stream.path, &body).await
    }
}

fn reason_for(error: &RelayClientError) -> ReasonCode {
    match error {
        RelayClientError::Unreachable(_) => ReasonCode::Unreachable,
        RelayClientError::BadStatus(_) => ReasonCode::BadStatus,
        RelayClientError::DecodeError(_) => ReasonCode::DecodeError,
    }
}

#[cfg(test)]
#[path = "remediation_tests.rs"]
mod remediation_tests;
