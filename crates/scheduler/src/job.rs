// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::JobError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// One unit of periodic work (`spec.md` §4.8: fast health, deep health,
/// fleet sync, retention cleanup, archive sweep).
///
/// `run` should respect `cancel` at its suspension points — the
/// scheduler signals it both on a per-tick deadline and on process
/// shutdown (`spec.md` §5, "every long-running operation receives a
/// cancellation signal").
#[async_trait]
pub trait Job: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn run(&self, cancel: CancellationToken) -> Result<(), JobError>;
}
