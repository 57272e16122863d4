// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-triggered capture subprocess launcher, used by the Retention
//! Engine's event capture path (`spec.md` §4.7: "fire-and-forget; this
//! engine does not wait").

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to launch capture: {0}")]
    SpawnFailed(String),
}

#[async_trait]
pub trait EventCapture: Send + Sync + 'static {
    /// Launch the capture binary against `media_url` for
    /// `duration_seconds`, writing to `output_path`. Returns as soon as
    /// the process has been spawned; does not wait for it to exit.
    async fn start(
        &self,
        media_url: &str,
        output_path: &Path,
        duration_seconds: u64,
    ) -> Result<(), CaptureError>;
}

#[derive(Clone)]
pub struct ProcessEventCapture {
    capture_binary: String,
}

impl ProcessEventCapture {
    pub fn new(capture_binary: impl Into<String>) -> Self {
        Self { capture_binary: capture_binary.into() }
    }
}

#[async_trait]
impl EventCapture for ProcessEventCapture {
    async fn start(
        &self,
        media_url: &str,
        output_path: &Path,
        duration_seconds: u64,
    ) -> Result<(), CaptureError> {
        let duration = duration_seconds.to_string();
        let output = output_path.to_string_lossy().into_owned();
        Command::new(&self.capture_binary)
            .args(["-y", "-i", media_url, "-t", &duration, "-c", "copy", &output])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| CaptureError::SpawnFailed(e.to_string()))?;
        Ok(())
    }
}
