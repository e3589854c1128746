//! Provider exception classification
//!
//! The provider reports failures with its own exception codes. This module
//! is the closed mapping from those codes into the handler [`ErrorCode`]
//! taxonomy the orchestrator understands. Codes outside the mapping are
//! passed through as `Unclassified` with the original code preserved.

use nimbus_resource::ErrorCode;

pub fn classify_provider_code(code: &str) -> ErrorCode {
    match code {
        "ResourceNotFound" => ErrorCode::NotFound,
        "TypeNotFound" => ErrorCode::NotFound,
        "RequestTokenNotFound" => ErrorCode::NotFound,
        "AlreadyExists" => ErrorCode::AlreadyExists,
        "ResourceConflict" => ErrorCode::ResourceConflict,
        "ClientTokenConflict" => ErrorCode::ResourceConflict,
        "ConcurrentModification" => ErrorCode::ResourceConflict,
        "ConcurrentOperation" => ErrorCode::ResourceConflict,
        "InvalidRequest" => ErrorCode::InvalidRequest,
        "UnsupportedAction" => ErrorCode::InvalidRequest,
        "InvalidCredentials" => ErrorCode::InvalidCredentials,
        "NetworkFailure" => ErrorCode::NetworkFailure,
        "NotStabilized" => ErrorCode::NotStabilized,
        "NotUpdatable" => ErrorCode::NotUpdatable,
        "AccessDenied" => ErrorCode::AccessDenied,
        "PrivateType" => ErrorCode::AccessDenied,
        "ServiceInternalError" => ErrorCode::ServiceInternalError,
        "ServiceLimitExceeded" => ErrorCode::ServiceLimitExceeded,
        "Throttling" => ErrorCode::Throttling,
        "HandlerFailure" => ErrorCode::InternalFailure,
        "HandlerInternalFailure" => ErrorCode::InternalFailure,
        "GeneralServiceException" => ErrorCode::GeneralServiceException,
        other => ErrorCode::Unclassified(other.to_string()),
    }
}
