//! Gateway method provisioner
//!
//! Methods are plain control-plane resources except for one rewrite:
//! orchestrator configs reference the backing function by its NRN, but the
//! provider wants the computed invocation URI. Create and Update perform
//! that rewrite before delegating; everything else passes straight
//! through.

use crate::control::{ControlClient, PropertyReader};
use crate::provisioner::{ProvisionError, Provisioner, Result};
use async_trait::async_trait;
use nimbus_api::ProviderConfig;
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult,
    ReadRequest, ReadResult, StatusRequest, StatusResult, UpdateRequest, UpdateResult,
};
use serde_json::Value;

pub const RESOURCE_TYPE: &str = "Nimbus::Gateway::Method";

pub struct GatewayMethodProvisioner {
    cfg: ProviderConfig,
}

impl GatewayMethodProvisioner {
    pub fn new(cfg: ProviderConfig) -> Self {
        Self { cfg }
    }

    fn control(&self) -> Result<ControlClient> {
        ControlClient::from_config(&self.cfg)
    }
}

/// Function NRNs look like `nrn:nimbus:function:{region}:{account}:{name}`.
fn region_from_function_nrn(nrn: &str) -> Result<String> {
    let parts: Vec<&str> = nrn.split(':').collect();
    if parts.len() >= 4 && parts[0] == "nrn" && parts[1] == "nimbus" && parts[2] == "function" {
        return Ok(parts[3].to_string());
    }
    Err(ProvisionError::validation(format!(
        "invalid function NRN format: {nrn}"
    )))
}

/// Rewrites `Integration.FunctionId` into the provider invocation URI the
/// gateway actually accepts. Documents without a function integration are
/// returned untouched.
pub(crate) fn rewrite_function_integration(properties: &Value) -> Result<Value> {
    let mut properties = properties.clone();

    let function_id = properties
        .get("Integration")
        .and_then(Value::as_object)
        .and_then(|integration| integration.get("FunctionId"))
        .cloned();
    let Some(function_id) = function_id else {
        return Ok(properties);
    };
    let Some(function_nrn) = function_id.as_str() else {
        return Err(ProvisionError::validation(format!(
            "expected FunctionId to be a resolved string, got {function_id}"
        )));
    };

    let region = region_from_function_nrn(function_nrn)?;
    let uri = format!("nrn:nimbus:gateway:{region}:function:invoke/{function_nrn}");

    tracing::debug!(function_nrn, uri, "rewrote function integration");

    if let Some(integration) = properties
        .get_mut("Integration")
        .and_then(Value::as_object_mut)
    {
        integration.remove("FunctionId");
        integration.insert("Uri".to_string(), Value::String(uri));
    }

    Ok(properties)
}

#[async_trait]
impl Provisioner for GatewayMethodProvisioner {
    async fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        let mut request = request.clone();
        request.properties = rewrite_function_integration(&request.properties)?;
        self.control()?.create(&request).await
    }

    async fn update(&self, request: &UpdateRequest) -> Result<UpdateResult> {
        let mut request = request.clone();
        request.desired_properties = rewrite_function_integration(&request.desired_properties)?;
        self.control()?.update(&request).await
    }

    async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult> {
        self.control()?.delete(request).await
    }

    async fn status(&self, request: &StatusRequest) -> Result<StatusResult> {
        self.control()?.status(request, self).await
    }

    async fn read(&self, request: &ReadRequest) -> Result<ReadResult> {
        self.control()?.read(request).await
    }

    async fn list(&self, _request: &ListRequest) -> Result<ListResult> {
        Err(ProvisionError::NotImplemented(
            "list operation is not supported for Nimbus::Gateway::Method",
        ))
    }
}

#[async_trait]
impl PropertyReader for GatewayMethodProvisioner {
    async fn read_properties(&self, request: &ReadRequest) -> Result<ReadResult> {
        Provisioner::read(self, request).await
    }
}
