// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("stream not found: {0}/{1}")]
    StreamNotFound(String, String),
    #[error("config snapshot not found: {0}")]
    SnapshotNotFound(u64),
    #[error("node already exists: {0}")]
    NodeAlreadyExists(String),
}
