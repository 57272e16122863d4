// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess-backed [`MediaProber`], invoking an external probe binary
//! (`ffprobe` by convention, `SPEC_FULL.md` §9) with an explicit argv and
//! deadline. Stdout/stderr are read to EOF before returning
//! (`spec.md` §5).

use crate::media_prober::{parse_frame_rate, MediaProber, ProbeError, ProbeResult, ProbeStream, StreamKind};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// Bounded single-probe run used by the black-screen/freeze/silence
/// helpers (`spec.md` §4.2: "each a bounded-duration run of the probe
/// with a specific filter").
const FILTER_PROBE_DURATION: &str = "5";

#[derive(Clone)]
pub struct ProcessMediaProber {
    probe_binary: String,
}

impl ProcessMediaProber {
    pub fn new(probe_binary: impl Into<String>) -> Self {
        Self { probe_binary: probe_binary.into() }
    }

    async fn run(&self, args: &[&str], deadline: Duration) -> Result<(bool, String, String), ProbeError> {
        let mut command = Command::new(&self.probe_binary);
        command.args(args).stdout(std::process::Stdio::piped()).stderr(std::process::Stdio::piped());

        let child = command.spawn().map_err(|e| ProbeError::Failed(e.to_string()))?;
        let output = match tokio::time::timeout(deadline, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ProbeError::Failed(e.to_string()))?,
            Err(_) => return Err(ProbeError::Timeout),
        };
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Ok((output.status.success(), stdout, stderr))
    }

    fn parse_probe_json(stdout: &str) -> Result<ProbeResult, ProbeError> {
        let parsed: serde_json::Value =
            serde_json::from_str(stdout).map_err(|e| ProbeError::Failed(e.to_string()))?;
        let mut streams = Vec::new();
        if let Some(entries) = parsed.get("streams").and_then(|v| v.as_array()) {
            for entry in entries {
                let codec_type = entry.get("codec_type").and_then(|v| v.as_str()).unwrap_or("");
                let kind = match codec_type {
                    "video" => StreamKind::Video,
                    "audio" => StreamKind::Audio,
                    _ => continue,
                };
                streams.push(ProbeStream {
                    kind,
                    codec: entry.get("codec_name").and_then(|v| v.as_str()).unwrap_or("unknown").to_string(),
                    width: entry.get("width").and_then(|v| v.as_u64()).map(|v| v as u32),
                    height: entry.get("height").and_then(|v| v.as_u64()).map(|v| v as u32),
                    frame_rate: entry.get("r_frame_rate").and_then(|v| v.as_str()).and_then(parse_frame_rate),
                    avg_frame_rate: entry
                        .get("avg_frame_rate")
                        .and_then(|v| v.as_str())
                        .and_then(parse_frame_rate),
                    bitrate: entry
                        .get("bit_rate")
                        .and_then(|v| v.as_str())
                        .and_then(|s| s.parse().ok()),
                });
            }
        }
        Ok(ProbeResult { ok: true, streams, issues: Vec::new() })
    }
}

#[async_trait]
impl MediaProber for ProcessMediaProber {
    async fn probe(&self, media_url: &str, deadline: Duration) -> Result<ProbeResult, ProbeError> {
        let args = [
            "-v", "quiet", "-print_format", "json", "-show_streams",
            "-rtsp_transport", "tcp", media_url,
        ];
        let (success, stdout, stderr) = self.run(&args, deadline).await?;
        if !success && stdout.trim().is_empty() {
            return Err(ProbeError::Failed(stderr));
        }
        Self::parse_probe_json(&stdout)
    }

    async fn detect_black_screen(&self, media_url: &str, deadline: Duration) -> Result<bool, ProbeError> {
        let filter = format!("blackdetect=d={FILTER_PROBE_DURATION}");
        let args = ["-v", "error", "-t", FILTER_PROBE_DURATION, "-vf", &filter, "-f", "null", media_url, "-"];
        let (success, _stdout, stderr) = self.run(&args, deadline).await?;
        if !success && stderr.trim().is_empty() {
            return Err(ProbeError::Failed(stderr));
        }
        Ok(stderr.contains("black_start"))
    }

    async fn detect_freeze(&self, media_url: &str, deadline: Duration) -> Result<bool, ProbeError> {
        let filter = format!("freezedetect=d={FILTER_PROBE_DURATION}");
        let args = ["-v", "error", "-t", FILTER_PROBE_DURATION, "-vf", &filter, "-f", "null", media_url, "-"];
        let (success, _stdout, stderr) = self.run(&args, deadline).await?;
        if !success && stderr.trim().is_empty() {
            return Err(ProbeError::Failed(stderr));
        }
        Ok(stderr.contains("freeze_start"))
    }

    async fn detect_audio_silence(&self, media_url: &str, deadline: Duration) -> Result<bool, ProbeError> {
        let filter = format!("silencedetect=d={FILTER_PROBE_DURATION}");
        let args = ["-v", "error", "-t", FILTER_PROBE_DURATION, "-af", &filter, "-f", "null", media_url, "-"];
        let (success, _stdout, stderr) = self.run(&args, deadline).await?;
        if !success && stderr.trim().is_empty() {
            return Err(ProbeError::Failed(stderr));
        }
        Ok(stderr.contains("silence_start"))
    }
}
