//! Handler error codes

use serde::{Deserialize, Serialize};

/// Closed taxonomy of handler error codes surfaced to the orchestrator.
///
/// Derived from the provider's own exception codes by the classifier in
/// `nimbus-api`; provider codes with no mapping are passed through as
/// [`ErrorCode::Unclassified`] rather than swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    NotFound,
    AlreadyExists,
    ResourceConflict,
    InvalidRequest,
    InvalidCredentials,
    NetworkFailure,
    NotStabilized,
    NotUpdatable,
    AccessDenied,
    ServiceInternalError,
    ServiceLimitExceeded,
    Throttling,
    InternalFailure,
    GeneralServiceException,
    /// Provider error code with no mapping; the original code is preserved.
    Unclassified(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::NotFound => "NotFound",
            ErrorCode::AlreadyExists => "AlreadyExists",
            ErrorCode::ResourceConflict => "ResourceConflict",
            ErrorCode::InvalidRequest => "InvalidRequest",
            ErrorCode::InvalidCredentials => "InvalidCredentials",
            ErrorCode::NetworkFailure => "NetworkFailure",
            ErrorCode::NotStabilized => "NotStabilized",
            ErrorCode::NotUpdatable => "NotUpdatable",
            ErrorCode::AccessDenied => "AccessDenied",
            ErrorCode::ServiceInternalError => "ServiceInternalError",
            ErrorCode::ServiceLimitExceeded => "ServiceLimitExceeded",
            ErrorCode::Throttling => "Throttling",
            ErrorCode::InternalFailure => "InternalFailure",
            ErrorCode::GeneralServiceException => "GeneralServiceException",
            ErrorCode::Unclassified(code) => code,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ErrorCode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "NotFound" => ErrorCode::NotFound,
            "AlreadyExists" => ErrorCode::AlreadyExists,
            "ResourceConflict" => ErrorCode::ResourceConflict,
            "InvalidRequest" => ErrorCode::InvalidRequest,
            "InvalidCredentials" => ErrorCode::InvalidCredentials,
            "NetworkFailure" => ErrorCode::NetworkFailure,
            "NotStabilized" => ErrorCode::NotStabilized,
            "NotUpdatable" => ErrorCode::NotUpdatable,
            "AccessDenied" => ErrorCode::AccessDenied,
            "ServiceInternalError" => ErrorCode::ServiceInternalError,
            "ServiceLimitExceeded" => ErrorCode::ServiceLimitExceeded,
            "Throttling" => ErrorCode::Throttling,
            "InternalFailure" => ErrorCode::InternalFailure,
            "GeneralServiceException" => ErrorCode::GeneralServiceException,
            _ => ErrorCode::Unclassified(s),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(s: &str) -> Self {
        ErrorCode::from(s.to_string())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}
