//! Secret provisioner
//!
//! Secrets ride the control plane for their whole lifecycle; the
//! specialization is read-side only. The control plane never returns the
//! secret material, so Read enriches its document with the live value from
//! the secrets service — unless the caller asked for redaction, and only
//! best-effort: a value lookup failure degrades to the plain control-plane
//! result rather than failing the read.

use crate::control::{ControlClient, PropertyReader};
use crate::provisioner::{ProvisionError, Provisioner, Result};
use async_trait::async_trait;
use nimbus_api::{HttpSecretsApi, ProviderConfig, SecretsApi};
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult,
    ReadRequest, ReadResult, StatusRequest, StatusResult, UpdateRequest, UpdateResult,
};
use serde_json::Value;

pub const RESOURCE_TYPE: &str = "Nimbus::Secrets::Secret";

pub struct SecretProvisioner {
    cfg: ProviderConfig,
}

impl SecretProvisioner {
    pub fn new(cfg: ProviderConfig) -> Self {
        Self { cfg }
    }

    fn control(&self) -> Result<ControlClient> {
        ControlClient::from_config(&self.cfg)
    }

    async fn read_with(
        &self,
        control: &ControlClient,
        secrets: &dyn SecretsApi,
        request: &ReadRequest,
    ) -> Result<ReadResult> {
        let mut result = control.read(request).await?;

        if request.redact_sensitive {
            return Ok(result);
        }
        let Some(properties) = result.properties.as_mut() else {
            return Ok(result);
        };

        let value = match secrets.get_secret_value(&request.native_id).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    secret_id = request.native_id,
                    "secret value lookup failed, returning control-plane result only"
                );
                return Ok(result);
            }
        };

        let object = properties.as_object_mut().ok_or_else(|| {
            ProvisionError::validation("control plane returned non-object properties")
        })?;
        if let Some(secret_string) = value.secret_string {
            object.insert("SecretValue".to_string(), Value::String(secret_string));
        }
        if let Some(secret_binary) = value.secret_binary {
            object.insert("SecretBinary".to_string(), Value::String(secret_binary));
        }

        Ok(result)
    }
}

#[async_trait]
impl Provisioner for SecretProvisioner {
    async fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        self.control()?.create(request).await
    }

    async fn update(&self, request: &UpdateRequest) -> Result<UpdateResult> {
        self.control()?.update(request).await
    }

    async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult> {
        self.control()?.delete(request).await
    }

    async fn status(&self, request: &StatusRequest) -> Result<StatusResult> {
        // Pass ourselves as the reader so a successful operation's
        // read-back carries the enriched secret value.
        self.control()?.status(request, self).await
    }

    async fn read(&self, request: &ReadRequest) -> Result<ReadResult> {
        let control = self.control()?;
        let secrets = HttpSecretsApi::new(&self.cfg)?;
        self.read_with(&control, &secrets, request).await
    }

    async fn list(&self, _request: &ListRequest) -> Result<ListResult> {
        Err(ProvisionError::NotImplemented(
            "list not implemented for the secret provisioner - the control plane natively supports this operation",
        ))
    }
}

#[async_trait]
impl PropertyReader for SecretProvisioner {
    async fn read_properties(&self, request: &ReadRequest) -> Result<ReadResult> {
        Provisioner::read(self, request).await
    }
}
