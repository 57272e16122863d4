// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml parse error: {0}")]
    ParseError(String),
    #[error("relay request failed: {0}")]
    Relay(#[from] relcore_adapters::RelayClientError),
    #[error("storage error: {0}")]
    Storage(#[from] relcore_storage::StorageError),
    #[error("rollback target not found")]
    RollbackTargetMissing,
}
