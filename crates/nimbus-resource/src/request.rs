//! Request and result types for the six plugin operations

use crate::error::ErrorCode;
use crate::operation::{Operation, OperationStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Progress of a provider operation, synchronous or asynchronous.
///
/// Asynchronous submissions come back as `InProgress` with a request token;
/// the orchestrator polls `check_status` with that token until a terminal
/// status is reached. `resource_properties` is populated only on terminal
/// success of non-delete operations, and only best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResult {
    /// Operation this progress belongs to.
    pub operation: Operation,

    /// Current status as reported by the provider.
    pub status: OperationStatus,

    /// Opaque token identifying the in-flight provider operation.
    /// Empty for operations that completed synchronously.
    #[serde(default)]
    pub request_token: String,

    /// Native identifier of the resource, once known.
    #[serde(default)]
    pub native_id: String,

    /// Handler error code, when the provider reported one.
    #[serde(default)]
    pub error_code: Option<ErrorCode>,

    /// Human-readable status message from the provider.
    #[serde(default)]
    pub status_message: Option<String>,

    /// Final resource properties, attached on terminal success of
    /// non-delete operations.
    #[serde(default)]
    pub resource_properties: Option<Value>,
}

impl ProgressResult {
    pub fn new(operation: Operation, status: OperationStatus) -> Self {
        Self {
            operation,
            status,
            request_token: String::new(),
            native_id: String::new(),
            error_code: None,
            status_message: None,
            resource_properties: None,
        }
    }

    pub fn with_request_token(mut self, token: impl Into<String>) -> Self {
        self.request_token = token.into();
        self
    }

    pub fn with_native_id(mut self, native_id: impl Into<String>) -> Self {
        self.native_id = native_id.into();
        self
    }

    pub fn with_error_code(mut self, code: ErrorCode) -> Self {
        self.error_code = Some(code);
        self
    }

    pub fn with_status_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.resource_properties = Some(properties);
        self
    }
}

/// Request to create a resource from desired-state properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    pub resource_type: String,

    /// Desired-state property document, shaped per resource type.
    pub properties: Value,

    /// Opaque target configuration supplied by the orchestrator.
    #[serde(default)]
    pub target_config: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResult {
    pub progress: ProgressResult,
}

/// Request to update a live resource.
///
/// Carries both the orchestrator's patch document and the full prior and
/// desired property documents; which of the two a provisioner consumes
/// depends on the resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub resource_type: String,
    pub native_id: String,

    /// JSON-patch style document, when the control plane supports it for
    /// this type.
    #[serde(default)]
    pub patch_document: Option<Value>,

    pub desired_properties: Value,
    pub prior_properties: Value,

    #[serde(default)]
    pub target_config: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    pub progress: ProgressResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub resource_type: String,
    pub native_id: String,

    #[serde(default)]
    pub target_config: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    pub progress: ProgressResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    pub resource_type: String,
    pub native_id: String,

    /// When set, sensitive values (secret material) are left out of the
    /// returned properties.
    #[serde(default)]
    pub redact_sensitive: bool,

    #[serde(default)]
    pub target_config: Value,
}

/// Result of reading a resource's current properties.
///
/// Provider-reported absence is a structured `NotFound` here, not an
/// error: "failed to ask" and "asked and the answer is absence" are
/// different outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResult {
    pub resource_type: String,

    #[serde(default)]
    pub properties: Option<Value>,

    #[serde(default)]
    pub error_code: Option<ErrorCode>,
}

impl ReadResult {
    pub fn found(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: Some(properties),
            error_code: None,
        }
    }

    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: None,
            error_code: Some(ErrorCode::NotFound),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.error_code == Some(ErrorCode::NotFound)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    /// May be empty when the orchestrator only holds a request token.
    #[serde(default)]
    pub resource_type: String,

    pub request_token: String,

    #[serde(default)]
    pub native_id: String,

    #[serde(default)]
    pub target_config: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult {
    pub progress: ProgressResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {
    pub resource_type: String,

    /// Extra addressing the provider needs to scope the listing
    /// (for example the zone or bucket to list within).
    #[serde(default)]
    pub additional_properties: HashMap<String, String>,

    pub page_size: i32,

    #[serde(default)]
    pub page_token: Option<String>,

    #[serde(default)]
    pub target_config: Value,
}

/// One page of native identifiers. The plugin never aggregates pages;
/// the caller follows `next_page_token` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult {
    pub native_ids: Vec<String>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}
