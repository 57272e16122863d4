// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root: concrete adapters and the components built on top
//! of them. No durable `MetadataStore` backend ships here (`spec.md`
//! §1 Non-goals) — [`relcore_storage::InMemoryStore`] stands in until an
//! embedding process wires a real one through the same trait.

use crate::config::Settings;
use relcore_adapters::{HttpRelayClientFactory, ProcessEventCapture, ProcessMediaProber, ProcessRelayController};
use relcore_core::SystemClock;
use relcore_engine::{FleetSynchronizer, HealthClassifier, RemediationEngine, SessionAggregator};
use relcore_retention::{Archiver, Blocklist, Cleaner, EventRecorder, RetentionPolicy, Scanner, SysinfoDiskUsage};
use relcore_storage::InMemoryStore;
use std::sync::Arc;

pub type Store = InMemoryStore;
pub type Factory = HttpRelayClientFactory;
pub type Prober = ProcessMediaProber;
pub type Controller = ProcessRelayController;
pub type Capture = ProcessEventCapture;

/// Every component the scheduler's jobs (and an embedding caller) need,
/// constructed once from [`Settings`] and shared behind `Arc`.
pub struct Deps {
    pub settings: Arc<Settings>,
    pub store: Store,

    pub health: Arc<HealthClassifier<Factory, Store, Prober, SystemClock>>,
    pub remediation: Arc<RemediationEngine<Factory, Controller, Store, SystemClock>>,
    pub fleet_sync: Arc<FleetSynchronizer<Factory, Store, SystemClock>>,
    pub sessions: Arc<SessionAggregator<Factory, SystemClock>>,

    pub scanner: Arc<Scanner<Store>>,
    pub cleaner: Arc<Cleaner<Store, SysinfoDiskUsage>>,
    pub archiver: Arc<Archiver<Store>>,
    pub event_capture: Arc<EventRecorder<Store, Capture>>,
    pub blocklist: Arc<Blocklist<Store>>,
}

impl Deps {
    pub fn build(settings: Settings) -> Self {
        let settings = Arc::new(settings);
        let store = Store::new();
        let clock = SystemClock;
        let factory = Factory::new(settings.relay_timeout);
        let prober = Prober::new(settings.probe_binary.clone());
        let controller = Controller::new(settings.restart_binary.clone(), settings.restart_args.clone());
        let capture = Capture::new(settings.capture_binary.clone());
        let policy = RetentionPolicy::default();

        let health = Arc::new(HealthClassifier::new(factory.clone(), store.clone(), prober, clock));
        let remediation = Arc::new(RemediationEngine::new(factory.clone(), controller, store.clone(), clock));
        let fleet_sync = Arc::new(FleetSynchronizer::new(factory.clone(), store.clone(), clock));
        let sessions = Arc::new(SessionAggregator::new(factory, clock));

        let scanner = Arc::new(Scanner::new(store.clone(), policy.clone()));
        let cleaner = Arc::new(Cleaner::new(store.clone(), SysinfoDiskUsage, policy.clone()));
        let archiver = Arc::new(Archiver::new(store.clone(), policy.clone()));
        let event_capture = Arc::new(EventRecorder::new(store.clone(), capture, policy));
        let blocklist = Arc::new(Blocklist::new(store.clone()));

        Self {
            settings,
            store,
            health,
            remediation,
            fleet_sync,
            sessions,
            scanner,
            cleaner,
            archiver,
            event_capture,
            blocklist,
        }
    }
}
