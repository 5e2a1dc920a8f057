use crate::crypto::Digest;
use crate::error::CasperHelperError;
use serde::Deserialize;

/// Outcome of executing a deploy in a block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum ExecutionResult {
    Success { cost: String },
    Failure { error_message: String, cost: String },
}

impl ExecutionResult {
    /// Gas cost in motes, as the decimal string reported by the node.
    pub fn cost(&self) -> &str {
        match self {
            Self::Success { cost } | Self::Failure { cost, .. } => cost,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockExecutionResult {
    pub block_hash: Digest,
    pub result: ExecutionResult,
}

/// The node's answer to `info_get_deploy`.
///
/// Only the execution results are kept; the echoed deploy body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetDeployResponse {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub execution_results: Vec<BlockExecutionResult>,
}

impl GetDeployResponse {
    /// Derives the deploy status from the first reported execution result.
    pub fn status(&self) -> DeployStatus {
        match self.execution_results.first() {
            Some(entry) => DeployStatus::Processed {
                block_hash: entry.block_hash,
                result: entry.result.clone(),
            },
            None => DeployStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployStatus {
    /// Accepted by the node but not yet included in a block.
    Pending,
    Processed {
        block_hash: Digest,
        result: ExecutionResult,
    },
}

impl DeployStatus {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    /// Returns the block hash of a successful execution, or `DeployFailed`
    /// carrying the node's error message.
    pub fn into_result(self) -> Result<Digest, CasperHelperError> {
        match self {
            Self::Processed {
                block_hash,
                result: ExecutionResult::Success { .. },
            } => Ok(block_hash),
            Self::Processed {
                result: ExecutionResult::Failure { error_message, .. },
                ..
            } => Err(CasperHelperError::DeployFailed(error_message)),
            Self::Pending => Err(CasperHelperError::DeployFailed(
                "Deploy has not been processed yet".to_string(),
            )),
        }
    }
}
