//! Provisioner trait and provisioning errors

use async_trait::async_trait;
use nimbus_api::ApiError;
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ErrorCode, ListRequest, ListResult,
    PropertyError, ReadRequest, ReadResult, StatusRequest, StatusResult, UpdateRequest,
    UpdateResult,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Request rejected before any provider call was made.
    #[error("{0}")]
    Validation(String),

    /// Operation deliberately unsupported for this resource type.
    #[error("{0}")]
    NotImplemented(&'static str),

    #[error(transparent)]
    Provider(#[from] ApiError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    pub fn validation(message: impl Into<String>) -> Self {
        ProvisionError::Validation(message.into())
    }

    /// Handler error code for the orchestrator, where one applies.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ProvisionError::Validation(_) => Some(ErrorCode::InvalidRequest),
            ProvisionError::Property(_) => Some(ErrorCode::InvalidRequest),
            ProvisionError::Provider(err) => err.error_code(),
            _ => None,
        }
    }
}

/// A type-specific handler implementing the six-operation capability set.
///
/// A provisioner either overrides the generic control-plane behavior for
/// its type or bypasses the control plane entirely with native service
/// calls. Instances are bound to one target configuration and live for a
/// single request.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn create(&self, request: &CreateRequest) -> Result<CreateResult>;

    async fn update(&self, request: &UpdateRequest) -> Result<UpdateResult>;

    async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult>;

    async fn status(&self, request: &StatusRequest) -> Result<StatusResult>;

    async fn read(&self, request: &ReadRequest) -> Result<ReadResult>;

    async fn list(&self, request: &ListRequest) -> Result<ListResult>;
}
