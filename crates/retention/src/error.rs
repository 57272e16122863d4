// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("storage error: {0}")]
    Storage(#[from] relcore_storage::StorageError),
    #[error("capture error: {0}")]
    Capture(#[from] relcore_adapters::CaptureError),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("disk usage unavailable: {0}")]
    DiskUsage(String),
}
