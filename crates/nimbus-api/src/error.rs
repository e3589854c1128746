//! Provider API error types

use crate::classify::classify_provider_code;
use nimbus_resource::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no API token configured: set ApiToken in the target configuration or NIMBUS_API_TOKEN")]
    MissingToken,

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },

    #[error("malformed provider response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Handler error code for provider-reported failures; `None` for
    /// transport and decoding failures, which never reached the provider's
    /// error taxonomy.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Provider { code, .. } => Some(classify_provider_code(code)),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.error_code() == Some(ErrorCode::NotFound)
    }

    /// Whether retrying the same request could plausibly succeed.
    /// Kept narrow: transport failures and provider-side throttling.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            ApiError::Provider { code, .. } => matches!(
                classify_provider_code(code),
                ErrorCode::Throttling | ErrorCode::NetworkFailure
            ),
            _ => false,
        }
    }
}
