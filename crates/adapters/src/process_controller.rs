// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tier-4 remediation: restarting the relay process on a node is an
//! operator-managed mechanism (`spec.md` §4.4), e.g. a container runtime
//! command. Modeled the same way as [`crate::process_prober`]: an async
//! command with explicit argv, never shelled out.

use async_trait::async_trait;
use relcore_core::Node;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessControlError {
    #[error("relay restart failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait RelayProcessController: Send + Sync + 'static {
    /// Restart the relay process on `node`. Affects every stream on that
    /// node (`spec.md` §4.4 tier 4).
    async fn restart(&self, node: &Node) -> Result<(), ProcessControlError>;
}

/// Runs an operator-configured command to restart a node's relay
/// process, e.g. `docker restart <container>` or `systemctl restart
/// <unit>`. `{node}` in `args` is substituted with `node.name`.
pub struct ProcessRelayController {
    pub binary: String,
    pub args: Vec<String>,
}

impl ProcessRelayController {
    pub fn new(binary: impl Into<String>, args: Vec<String>) -> Self {
        Self { binary: binary.into(), args }
    }

    fn render_args(&self, node: &Node) -> Vec<String> {
        self.args.iter().map(|arg| arg.replace("{node}", &node.name)).collect()
    }
}

#[async_trait]
impl RelayProcessController for ProcessRelayController {
    async fn restart(&self, node: &Node) -> Result<(), ProcessControlError> {
        let args = self.render_args(node);
        let output = tokio::process::Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| ProcessControlError::Failed(e.to_string()))?;

        if !output.status.success() {
            return Err(ProcessControlError::Failed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(())
    }
}
