// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! relcore-adapters: outbound side-effect channels to relay nodes — the
//! control-API client (C2) and the media prober (C3).

pub mod capture;
pub mod http_relay_client;
pub mod media_prober;
pub mod process_controller;
pub mod process_prober;
pub mod relay_client;

pub use capture::{CaptureError, EventCapture, ProcessEventCapture};
pub use http_relay_client::{HttpRelayClient, HttpRelayClientFactory};
pub use media_prober::{MediaProber, ProbeError, ProbeResult, ProbeStream, StreamKind};
pub use process_controller::{ProcessControlError, ProcessRelayController, RelayProcessController};
pub use process_prober::ProcessMediaProber;
pub use relay_client::{PathInfo, RawSession, RelayClient, RelayClientError, RelayClientFactory, SourceInfo};

#[cfg(test)]
#[path = "http_relay_client_tests.rs"]
mod http_relay_client_tests;
