//! Operand reconciliation errors

use thiserror::Error;

use crate::client::ClientError;

/// Errors that can abort one resource's reconciliation pass.
///
/// None of these are recovered internally and none abort reconciliation of
/// other, unrelated operands; the orchestrator owns isolation and requeueing.
#[derive(Debug, Error)]
pub enum OperandError {
    /// Cluster get/create/update failure, conflicts included
    #[error("cluster client error: {0}")]
    Client(#[from] ClientError),

    /// The fetched object's concrete kind does not match the hook's kind
    #[error("can't convert {found} to {expected}")]
    TypeMismatch {
        /// Kind the hook manages
        expected: &'static str,
        /// Kind actually stored under the fetch key
        found: String,
    },

    /// The hook could not produce a usable desired object
    #[error("invalid desired object: {0}")]
    InvalidCr(String),

    /// Typed/dynamic object conversion failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
