//! Operations and operation statuses

use serde::{Deserialize, Serialize};

/// The operations a provisioner can be asked to perform.
///
/// The registry is keyed by `(resource type, operation)`, so a provisioner
/// may own some operations for a type while the generic control-plane
/// client owns the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    CheckStatus,
    List,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::CheckStatus => write!(f, "check_status"),
            Operation::List => write!(f, "list"),
        }
    }
}

/// Status of an asynchronous provider operation.
///
/// `Success` and `Failure` are terminal; the orchestrator polls
/// `check_status` with the request token until one of them is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Success,
    Failure,
}

impl OperationStatus {
    /// Whether this status ends the operation's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Success | OperationStatus::Failure)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "pending"),
            OperationStatus::InProgress => write!(f, "in_progress"),
            OperationStatus::Success => write!(f, "success"),
            OperationStatus::Failure => write!(f, "failure"),
        }
    }
}
