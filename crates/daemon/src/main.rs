// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! relcored — reliability control plane daemon.
//!
//! Background process that periodically fast-health-checks every active
//! Node, deep-probes a bounded sample of Streams, auto-remediates
//! confirmed-unhealthy ones, reconciles fleet metadata, and sweeps
//! recordings for retention and archival (`spec.md` §4.8).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;
use std::time::Duration;

use relcore_daemon::config::Settings;
use relcore_daemon::deps::Deps;
use relcore_daemon::jobs::{ArchiveSweepJob, DeepHealthJob, FastHealthJob, FleetSyncJob, RetentionCleanupJob};
use relcore_scheduler::{JobScheduler, JobSpec};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::info;

const ARCHIVE_BATCH_SIZE: usize = 200;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("relcored {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("relcored {}", env!("CARGO_PKG_VERSION"));
                println!("Reliability control plane daemon for a fleet of media relay nodes");
                println!();
                println!("USAGE:");
                println!("    relcored");
                println!();
                println!("Runs until SIGTERM/SIGINT, registering health, remediation,");
                println!("fleet-sync, and retention jobs on the cadences set by RELCORE_*");
                println!("environment variables.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: relcored [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let settings = Settings::from_env();
    let _log_guard = setup_logging(&settings)?;

    info!("starting relcored");

    let deps = Deps::build(settings);
    let settings = deps.settings.clone();

    let mut scheduler = JobScheduler::new(settings.scheduler_concurrency);
    scheduler
        .register(JobSpec::new(
            Arc::new(FastHealthJob { health: deps.health.clone(), store: deps.store.clone() }),
            settings.fast_health_interval,
            Duration::from_secs(8),
        ))
        .register(JobSpec::new(
            Arc::new(DeepHealthJob {
                health: deps.health.clone(),
                remediation: deps.remediation.clone(),
                store: deps.store.clone(),
            }),
            settings.deep_health_interval,
            Duration::from_secs(120),
        ))
        .register(JobSpec::new(
            Arc::new(FleetSyncJob { fleet_sync: deps.fleet_sync.clone(), store: deps.store.clone() }),
            settings.fleet_sync_interval,
            Duration::from_secs(120),
        ))
        .register(JobSpec::new(
            Arc::new(RetentionCleanupJob {
                scanner: deps.scanner.clone(),
                cleaner: deps.cleaner.clone(),
                recording_root: settings.recording_root.clone(),
            }),
            settings.retention_interval,
            Duration::from_secs(600),
        ))
        .register(JobSpec::new(
            Arc::new(ArchiveSweepJob {
                archiver: deps.archiver.clone(),
                archive_root: settings.archive_root.clone(),
                batch_size: ARCHIVE_BATCH_SIZE,
            }),
            settings.archive_interval,
            Duration::from_secs(1800),
        ));

    let shutdown = CancellationToken::new();
    let scheduler_shutdown = shutdown.clone();
    let scheduler_task = tokio::spawn(scheduler.run(scheduler_shutdown));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("relcored ready");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    shutdown.cancel();
    let _ = scheduler_task.await;
    info!("relcored stopped");
    Ok(())
}

fn setup_logging(settings: &Settings) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(&settings.state_dir)?;

    let file_appender = tracing_appender::rolling::never(&settings.state_dir, "relcored.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
