// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("relay request failed: {0}")]
    Relay(#[from] relcore_adapters::RelayClientError),
    #[error("probe failed: {0}")]
    Probe(#[from] relcore_adapters::ProbeError),
    #[error("storage error: {0}")]
    Storage(#[from] relcore_storage::StorageError),
    #[error("stream not found: {0}/{1}")]
    StreamNotFound(String, String),
    #[error("node not found: {0}")]
    NodeNotFound(String),
}
