//! Nimbus provisioning engine
//!
//! The dispatch and operation-lifecycle core of the plugin: an external
//! orchestrator drives six operations (create, read, update, delete,
//! check-status, list) against arbitrary provider resource types, and this
//! crate routes each `(resource type, operation)` pair to either a
//! specialized provisioner or the generic control-plane client.
//!
//! ```text
//!  orchestrator
//!       │
//!  ┌────▼──────────────────────────────────────────┐
//!  │                 Plugin façade                 │
//!  │  registry lookup (resource type, operation)   │
//!  └──────┬───────────────────────────┬────────────┘
//!         │ specialized               │ fallback
//!  ┌──────▼──────────┐      ┌─────────▼────────────┐
//!  │ provisioners::* │      │    ControlClient     │
//!  │ (dns, storage…) │      │ (Resource Control)   │
//!  └──────┬──────────┘      └─────────┬────────────┘
//!         │  native service APIs      │
//!  ┌──────▼───────────────────────────▼────────────┐
//!  │               Nimbus provider                 │
//!  └───────────────────────────────────────────────┘
//! ```
//!
//! The plugin holds no state between calls; the registry is built once at
//! startup and read-only afterwards, and the provider is the sole source
//! of truth for resource state.

pub mod control;
pub mod provisioner;
pub mod provisioners;
pub mod registry;

// Re-exports
pub use control::{ControlClient, PropertyReader};
pub use provisioner::{ProvisionError, Provisioner, Result};
pub use registry::Registry;

use async_trait::async_trait;
use nimbus_api::ProviderConfig;
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult, Operation,
    ReadRequest, ReadResult, StatusRequest, StatusResult, UpdateRequest, UpdateResult,
};
use serde_json::Value;

/// The orchestrator-facing plugin: six operations, dispatched through the
/// registry with the generic control-plane client as the fallback.
pub struct Plugin {
    registry: Registry,
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new(Registry::builtin())
    }
}

impl Plugin {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn specialized(
        &self,
        resource_type: &str,
        operation: Operation,
        target_config: &Value,
    ) -> Option<Box<dyn Provisioner>> {
        if !self.registry.has_provisioner(resource_type, operation) {
            return None;
        }
        self.registry.get(
            resource_type,
            operation,
            &ProviderConfig::from_target_config(target_config),
        )
    }

    fn control(&self, target_config: &Value) -> Result<ControlClient> {
        ControlClient::from_config(&ProviderConfig::from_target_config(target_config))
    }

    pub async fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        if let Some(provisioner) =
            self.specialized(&request.resource_type, Operation::Create, &request.target_config)
        {
            return provisioner.create(request).await;
        }
        self.control(&request.target_config)?.create(request).await
    }

    pub async fn update(&self, request: &UpdateRequest) -> Result<UpdateResult> {
        if let Some(provisioner) =
            self.specialized(&request.resource_type, Operation::Update, &request.target_config)
        {
            return provisioner.update(request).await;
        }
        self.control(&request.target_config)?.update(request).await
    }

    pub async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult> {
        if let Some(provisioner) =
            self.specialized(&request.resource_type, Operation::Delete, &request.target_config)
        {
            return provisioner.delete(request).await;
        }
        self.control(&request.target_config)?.delete(request).await
    }

    /// Status requests may arrive with only a request token; the registry
    /// is consulted only when the resource type is known.
    pub async fn status(&self, request: &StatusRequest) -> Result<StatusResult> {
        if !request.resource_type.is_empty() {
            if let Some(provisioner) = self.specialized(
                &request.resource_type,
                Operation::CheckStatus,
                &request.target_config,
            ) {
                return provisioner.status(request).await;
            }
        }
        self.control(&request.target_config)?
            .status(request, self)
            .await
    }

    pub async fn read(&self, request: &ReadRequest) -> Result<ReadResult> {
        if let Some(provisioner) =
            self.specialized(&request.resource_type, Operation::Read, &request.target_config)
        {
            return provisioner.read(request).await;
        }
        self.control(&request.target_config)?.read(request).await
    }

    pub async fn list(&self, request: &ListRequest) -> Result<ListResult> {
        if let Some(provisioner) =
            self.specialized(&request.resource_type, Operation::List, &request.target_config)
        {
            return provisioner.list(request).await;
        }
        self.control(&request.target_config)?.list(request).await
    }
}

#[async_trait]
impl PropertyReader for Plugin {
    async fn read_properties(&self, request: &ReadRequest) -> Result<ReadResult> {
        self.read(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_resource::{OperationStatus, ProgressResult};

    /// Stub that reports success for everything and remembers nothing.
    struct StubProvisioner;

    #[async_trait]
    impl Provisioner for StubProvisioner {
        async fn create(&self, _request: &CreateRequest) -> Result<CreateResult> {
            Ok(CreateResult {
                progress: ProgressResult::new(Operation::Create, OperationStatus::Success)
                    .with_native_id("stub-id"),
            })
        }
        async fn update(&self, _request: &UpdateRequest) -> Result<UpdateResult> {
            Ok(UpdateResult {
                progress: ProgressResult::new(Operation::Update, OperationStatus::Success),
            })
        }
        async fn delete(&self, _request: &DeleteRequest) -> Result<DeleteResult> {
            Ok(DeleteResult {
                progress: ProgressResult::new(Operation::Delete, OperationStatus::Success),
            })
        }
        async fn status(&self, _request: &StatusRequest) -> Result<StatusResult> {
            Ok(StatusResult {
                progress: ProgressResult::new(Operation::CheckStatus, OperationStatus::Success),
            })
        }
        async fn read(&self, _request: &ReadRequest) -> Result<ReadResult> {
            Ok(ReadResult::found("Stub::Type", Value::Null))
        }
        async fn list(&self, _request: &ListRequest) -> Result<ListResult> {
            Ok(ListResult {
                native_ids: vec!["stub-id".to_string()],
                next_page_token: None,
            })
        }
    }

    fn plugin_with_stub() -> Plugin {
        let mut registry = Registry::new();
        registry.register(
            "Stub::Type",
            &[Operation::Create, Operation::CheckStatus],
            |_cfg| Box::new(StubProvisioner),
        );
        Plugin::new(registry)
    }

    #[tokio::test]
    async fn create_dispatches_to_the_registered_provisioner() {
        let plugin = plugin_with_stub();

        let result = plugin
            .create(&CreateRequest {
                resource_type: "Stub::Type".to_string(),
                properties: Value::Null,
                target_config: Value::Null,
            })
            .await
            .unwrap();

        assert_eq!(result.progress.native_id, "stub-id");
    }

    #[tokio::test]
    async fn unregistered_operations_fall_back_to_the_control_plane() {
        let plugin = plugin_with_stub();

        // Update is not registered for the stub type, so the façade builds
        // a control client instead; with an unreachable endpoint that can
        // only fail — which is exactly the proof the fallback was chosen.
        let result = plugin
            .update(&UpdateRequest {
                resource_type: "Stub::Type".to_string(),
                native_id: "stub-id".to_string(),
                patch_document: None,
                desired_properties: Value::Null,
                prior_properties: Value::Null,
                target_config: serde_json::json!({
                    "Endpoint": "http://127.0.0.1:9",
                    "ApiToken": "test-token"
                }),
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn status_without_a_resource_type_skips_the_registry() {
        let plugin = plugin_with_stub();

        // With a type the stub answers; without one the fallback client is
        // built and fails against the unreachable endpoint.
        let with_type = plugin
            .status(&StatusRequest {
                resource_type: "Stub::Type".to_string(),
                request_token: "req-1".to_string(),
                native_id: String::new(),
                target_config: Value::Null,
            })
            .await
            .unwrap();
        assert_eq!(with_type.progress.status, OperationStatus::Success);

        let without_type = plugin
            .status(&StatusRequest {
                resource_type: String::new(),
                request_token: "req-1".to_string(),
                native_id: String::new(),
                target_config: serde_json::json!({
                    "Endpoint": "http://127.0.0.1:9",
                    "ApiToken": "test-token"
                }),
            })
            .await;
        assert!(without_type.is_err());
    }
}
