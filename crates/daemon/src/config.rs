// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment-variable access for the daemon crate
//! (`SPEC_FULL.md` §9), generalizing the teacher's `oj-daemon::env`.

use std::path::PathBuf;
use std::time::Duration;

fn env_duration_ms(key: &str, default_ms: u64) -> Duration {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis).unwrap_or(Duration::from_millis(default_ms))
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).ok().filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
}

/// Process-wide, read-only configuration block (`spec.md` §5's
/// "shared-resource policy"), constructed once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub state_dir: PathBuf,
    pub recording_root: PathBuf,
    pub archive_root: PathBuf,

    pub fast_health_interval: Duration,
    pub deep_health_interval: Duration,
    pub fleet_sync_interval: Duration,
    pub retention_interval: Duration,
    pub archive_interval: Duration,
    pub scheduler_concurrency: usize,

    pub probe_binary: String,
    pub capture_binary: String,
    pub restart_binary: String,
    pub restart_args: Vec<String>,

    pub relay_timeout: Duration,
    pub log_filter: String,
}

impl Settings {
    /// Resolve every setting from its `RELCORE_*` environment variable,
    /// falling back to the documented default.
    pub fn from_env() -> Self {
        let state_dir = state_dir();
        Self {
            recording_root: std::env::var("RELCORE_RECORDING_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| state_dir.join("recordings")),
            archive_root: std::env::var("RELCORE_ARCHIVE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| state_dir.join("archive")),
            state_dir,

            fast_health_interval: env_duration_ms("RELCORE_FAST_HEALTH_INTERVAL_MS", 10_000),
            deep_health_interval: env_duration_ms("RELCORE_DEEP_HEALTH_INTERVAL_MS", 300_000),
            fleet_sync_interval: env_duration_ms("RELCORE_FLEET_SYNC_INTERVAL_MS", 300_000),
            retention_interval: env_duration_ms("RELCORE_RETENTION_INTERVAL_MS", 3_600_000),
            archive_interval: env_duration_ms("RELCORE_ARCHIVE_INTERVAL_MS", 86_400_000),
            scheduler_concurrency: std::env::var("RELCORE_SCHEDULER_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)),

            probe_binary: env_string("RELCORE_PROBE_BINARY", "ffprobe"),
            capture_binary: env_string("RELCORE_CAPTURE_BINARY", "ffmpeg"),
            restart_binary: env_string("RELCORE_RESTART_BINARY", "docker"),
            restart_args: std::env::var("RELCORE_RESTART_ARGS")
                .ok()
                .map(|s| s.split(',').map(str::to_string).collect())
                .unwrap_or_else(|| vec!["restart".to_string(), "{node}".to_string()]),

            relay_timeout: env_duration_ms("RELCORE_RELAY_TIMEOUT_MS", 5_000),
            log_filter: env_string("RELCORE_LOG", "info"),
        }
    }
}

/// `RELCORE_STATE_DIR` > `XDG_STATE_HOME/relcore` > `~/.local/state/relcore`.
fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RELCORE_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("relcore");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/state/relcore")
}
