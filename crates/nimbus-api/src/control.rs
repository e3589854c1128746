//! Generic Resource Control API client
//!
//! The control plane is the provider's schema-driven CRUD surface: any
//! resource type can be created from a desired-state document, patched,
//! deleted, read, and listed without bespoke code. Mutations are
//! asynchronous; they return a progress event carrying a request token
//! that is polled until a terminal status.

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::wire::Transport;
use async_trait::async_trait;
use nimbus_resource::{Operation, OperationStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Progress of one asynchronous control-plane operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// `CREATE`, `UPDATE`, or `DELETE`.
    #[serde(default)]
    pub operation: Option<String>,

    /// `PENDING`, `IN_PROGRESS`, `SUCCESS`, or `FAILED`.
    pub status: String,

    #[serde(default)]
    pub request_token: String,

    /// Native identifier, populated once the provider has assigned one.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Handler error code reported with the event, if any.
    #[serde(default)]
    pub error_code: Option<String>,

    #[serde(default)]
    pub status_message: Option<String>,

    #[serde(default)]
    pub type_name: Option<String>,
}

impl ProgressEvent {
    pub fn operation_kind(&self) -> Option<Operation> {
        match self.operation.as_deref() {
            Some("CREATE") => Some(Operation::Create),
            Some("UPDATE") => Some(Operation::Update),
            Some("DELETE") => Some(Operation::Delete),
            _ => None,
        }
    }

    pub fn status_kind(&self) -> Option<OperationStatus> {
        match self.status.as_str() {
            "PENDING" => Some(OperationStatus::Pending),
            "IN_PROGRESS" => Some(OperationStatus::InProgress),
            "SUCCESS" => Some(OperationStatus::Success),
            "FAILED" => Some(OperationStatus::Failure),
            _ => None,
        }
    }
}

/// A resource as described by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescription {
    pub type_name: String,
    pub identifier: String,
    pub properties: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceList {
    pub resources: Vec<ResourceDescription>,

    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResourcesRequest {
    pub type_name: String,

    /// Provider-side filter document scoping the listing (for example the
    /// parent resource to list within).
    pub resource_model: Option<Value>,

    pub page_size: i32,
    pub page_token: Option<String>,
}

#[async_trait]
pub trait ControlApi: Send + Sync {
    async fn create_resource(&self, type_name: &str, desired_state: &Value)
    -> Result<ProgressEvent>;

    async fn update_resource(
        &self,
        type_name: &str,
        identifier: &str,
        patch_document: &Value,
    ) -> Result<ProgressEvent>;

    async fn delete_resource(&self, type_name: &str, identifier: &str) -> Result<ProgressEvent>;

    async fn get_resource(&self, type_name: &str, identifier: &str)
    -> Result<ResourceDescription>;

    async fn get_request_status(&self, request_token: &str) -> Result<ProgressEvent>;

    async fn list_resources(&self, request: &ListResourcesRequest) -> Result<ResourceList>;
}

/// HTTP implementation over the provider endpoint.
pub struct HttpControlApi {
    transport: Transport,
}

impl HttpControlApi {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(cfg)?,
        })
    }
}

#[derive(Serialize)]
struct CreateResourceBody<'a> {
    type_name: &'a str,
    desired_state: &'a Value,
}

#[derive(Serialize)]
struct UpdateResourceBody<'a> {
    type_name: &'a str,
    identifier: &'a str,
    patch_document: &'a Value,
}

#[derive(Serialize)]
struct DeleteResourceBody<'a> {
    type_name: &'a str,
    identifier: &'a str,
}

#[async_trait]
impl ControlApi for HttpControlApi {
    async fn create_resource(
        &self,
        type_name: &str,
        desired_state: &Value,
    ) -> Result<ProgressEvent> {
        self.transport
            .post_json(
                "/control/resources",
                &CreateResourceBody {
                    type_name,
                    desired_state,
                },
            )
            .await
    }

    async fn update_resource(
        &self,
        type_name: &str,
        identifier: &str,
        patch_document: &Value,
    ) -> Result<ProgressEvent> {
        self.transport
            .post_json(
                "/control/resources/update",
                &UpdateResourceBody {
                    type_name,
                    identifier,
                    patch_document,
                },
            )
            .await
    }

    async fn delete_resource(&self, type_name: &str, identifier: &str) -> Result<ProgressEvent> {
        self.transport
            .post_json(
                "/control/resources/delete",
                &DeleteResourceBody {
                    type_name,
                    identifier,
                },
            )
            .await
    }

    async fn get_resource(
        &self,
        type_name: &str,
        identifier: &str,
    ) -> Result<ResourceDescription> {
        self.transport
            .get_json(
                "/control/resources/describe",
                &[
                    ("type_name", type_name.to_string()),
                    ("identifier", identifier.to_string()),
                ],
            )
            .await
    }

    async fn get_request_status(&self, request_token: &str) -> Result<ProgressEvent> {
        self.transport
            .get_json(
                "/control/requests/status",
                &[("request_token", request_token.to_string())],
            )
            .await
    }

    async fn list_resources(&self, request: &ListResourcesRequest) -> Result<ResourceList> {
        self.transport
            .post_json("/control/resources/list", request)
            .await
    }
}
