//! Generic control-plane client
//!
//! Implements the six operations against the provider's Resource Control
//! API for any resource type without a specialized provisioner. On top of
//! the raw API this layer owns the property round-tripping rules: tag
//! shape normalization, write-only patch rewriting, and stripping of
//! fields the provider reports but cannot round-trip.

use crate::provisioner::{ProvisionError, Result};
use crate::provisioners::secret;
use async_trait::async_trait;
use nimbus_api::{
    ControlApi, HttpControlApi, ListResourcesRequest, ProgressEvent, ProviderConfig,
};
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ErrorCode, ListRequest, ListResult,
    Operation, OperationStatus, ProgressResult, ReadRequest, ReadResult, StatusRequest,
    StatusResult, UpdateRequest, UpdateResult, props,
};
use serde_json::Value;

/// Fields stripped from read results before they are returned: unstable or
/// sensitive per-type paths the provider reports but will not accept back.
fn ignored_fields(resource_type: &str) -> &'static [&'static str] {
    match resource_type {
        "Nimbus::Network::SecurityGroup" => &["$.IngressRules", "$.EgressRules"],
        "Nimbus::IAM::Role" => &["$.Policies"],
        _ => &[],
    }
}

/// Something that can read a resource's current properties. The status
/// poll uses this to attach final properties on terminal success; the
/// façade passes itself so specialized read paths (secret enrichment)
/// stay in effect.
#[async_trait]
pub trait PropertyReader: Send + Sync {
    async fn read_properties(&self, request: &ReadRequest) -> Result<ReadResult>;
}

pub struct ControlClient {
    api: Box<dyn ControlApi>,
}

impl ControlClient {
    pub fn new(api: Box<dyn ControlApi>) -> Self {
        Self { api }
    }

    pub fn from_config(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(Box::new(HttpControlApi::new(cfg)?)))
    }

    pub async fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        let mut properties = request.properties.clone();
        if props::requires_map_tags(&request.resource_type) {
            let object = properties
                .as_object_mut()
                .ok_or_else(|| ProvisionError::validation("properties must be an object"))?;
            props::tags_to_map(object);
        }

        let event = self
            .api
            .create_resource(&request.resource_type, &properties)
            .await?;

        Ok(CreateResult {
            progress: progress_from_event(Operation::Create, &event),
        })
    }

    pub async fn update(&self, request: &UpdateRequest) -> Result<UpdateResult> {
        // Existence check first, so updating a missing resource fails as a
        // classified NotFound instead of an opaque submission failure.
        self.api
            .get_resource(&request.resource_type, &request.native_id)
            .await?;

        if props::requires_map_tags(&request.resource_type) && request.patch_document.is_some() {
            return Err(ProvisionError::validation(
                "update operations for resources with map tags are not supported",
            ));
        }

        let mut patch_document = request.patch_document.clone().unwrap_or(Value::Null);
        if request.resource_type == secret::RESOURCE_TYPE {
            rewrite_write_only_patch(&mut patch_document, "/SecretValue");
        }

        let event = self
            .api
            .update_resource(&request.resource_type, &request.native_id, &patch_document)
            .await?;

        Ok(UpdateResult {
            progress: progress_from_event(Operation::Update, &event),
        })
    }

    pub async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult> {
        let event = self
            .api
            .delete_resource(&request.resource_type, &request.native_id)
            .await?;

        let mut progress = progress_from_event(Operation::Delete, &event);
        // The resource being gone already is what a delete wants.
        if progress.error_code == Some(ErrorCode::NotFound) {
            progress.status = OperationStatus::Success;
        }

        Ok(DeleteResult { progress })
    }

    pub async fn read(&self, request: &ReadRequest) -> Result<ReadResult> {
        let description = match self
            .api
            .get_resource(&request.resource_type, &request.native_id)
            .await
        {
            Ok(description) => description,
            Err(err) => match err.error_code() {
                Some(ErrorCode::Unclassified(_)) | None => return Err(err.into()),
                Some(code) => {
                    return Ok(ReadResult {
                        resource_type: request.resource_type.clone(),
                        properties: None,
                        error_code: Some(code),
                    });
                }
            },
        };

        let mut properties = description.properties;
        let object = properties
            .as_object_mut()
            .ok_or_else(|| ProvisionError::validation("provider returned non-object properties"))?;

        if props::requires_map_tags(&request.resource_type) {
            props::tags_to_array(object);
        }
        props::strip_fields(object, ignored_fields(&request.resource_type))?;

        Ok(ReadResult::found(description.type_name, properties))
    }

    pub async fn status(
        &self,
        request: &StatusRequest,
        reader: &dyn PropertyReader,
    ) -> Result<StatusResult> {
        let event = self.api.get_request_status(&request.request_token).await?;

        let mut progress = progress_from_event(Operation::CheckStatus, &event);
        progress.request_token = request.request_token.clone();

        let is_delete = event.operation_kind() == Some(Operation::Delete);
        if is_delete && progress.error_code == Some(ErrorCode::NotFound) {
            progress.status = OperationStatus::Success;
            return Ok(StatusResult { progress });
        }

        if progress.status == OperationStatus::Success && !is_delete {
            let resource_type = event
                .type_name
                .clone()
                .unwrap_or_else(|| request.resource_type.clone());
            let read_request = ReadRequest {
                resource_type,
                native_id: progress.native_id.clone(),
                redact_sensitive: false,
                target_config: request.target_config.clone(),
            };
            // Best effort: a failed read-back only omits the properties.
            match reader.read_properties(&read_request).await {
                Ok(result) => progress.resource_properties = result.properties,
                Err(err) => {
                    tracing::debug!(error = %err, "read after successful operation failed");
                }
            }
        }

        Ok(StatusResult { progress })
    }

    pub async fn list(&self, request: &ListRequest) -> Result<ListResult> {
        let resource_model = if request.additional_properties.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&request.additional_properties)?)
        };

        let list_request = ListResourcesRequest {
            type_name: request.resource_type.clone(),
            resource_model,
            page_size: request.page_size,
            page_token: request.page_token.clone(),
        };

        match self.api.list_resources(&list_request).await {
            Ok(result) => Ok(ListResult {
                native_ids: result
                    .resources
                    .into_iter()
                    .map(|resource| resource.identifier)
                    .collect(),
                next_page_token: result.next_token,
            }),
            // A missing parent resource lists as empty, not as a failure.
            Err(err) if err.is_not_found() => Ok(ListResult {
                native_ids: Vec::new(),
                next_page_token: None,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl PropertyReader for ControlClient {
    async fn read_properties(&self, request: &ReadRequest) -> Result<ReadResult> {
        self.read(request).await
    }
}

fn progress_from_event(fallback: Operation, event: &ProgressEvent) -> ProgressResult {
    let mut progress = ProgressResult::new(
        event.operation_kind().unwrap_or(fallback),
        event.status_kind().unwrap_or(OperationStatus::InProgress),
    );
    progress.request_token = event.request_token.clone();
    progress.native_id = event.identifier.clone().unwrap_or_default();
    progress.error_code = event.error_code.clone().map(ErrorCode::from);
    progress.status_message = event.status_message.clone();
    progress
}

/// The control plane requires write-only properties to be patched with
/// `add`, even when the orchestrator diffs them as `replace`.
fn rewrite_write_only_patch(patch_document: &mut Value, path: &str) {
    let Some(operations) = patch_document.as_array_mut() else {
        return;
    };
    for operation in operations {
        let Some(object) = operation.as_object_mut() else {
            continue;
        };
        if object.get("op").and_then(Value::as_str) == Some("replace")
            && object.get("path").and_then(Value::as_str) == Some(path)
        {
            object.insert("op".to_string(), Value::String("add".to_string()));
        }
    }
}
