//! Inline role policy provisioner
//!
//! The control plane owns the whole CRUD lifecycle for role policies; it
//! just cannot enumerate them. Only List is registered here, and the
//! remaining operations fail loudly so a registry change can never route
//! them this way silently.

use crate::provisioner::{ProvisionError, Provisioner, Result};
use async_trait::async_trait;
use nimbus_api::{HttpIamApi, IamApi, ProviderConfig};
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult,
    ReadRequest, ReadResult, StatusRequest, StatusResult, UpdateRequest, UpdateResult,
};

pub const RESOURCE_TYPE: &str = "Nimbus::IAM::RolePolicy";

const DEFAULT_PAGE_SIZE: i32 = 100;

pub struct RolePolicyProvisioner {
    cfg: ProviderConfig,
}

impl RolePolicyProvisioner {
    pub fn new(cfg: ProviderConfig) -> Self {
        Self { cfg }
    }

    async fn list_with(&self, api: &dyn IamApi, request: &ListRequest) -> Result<ListResult> {
        let role_name = request
            .additional_properties
            .get("RoleName")
            .filter(|role_name| !role_name.is_empty())
            .ok_or_else(|| {
                ProvisionError::validation(
                    "RoleName must be provided in additional properties for listing role policies",
                )
            })?;

        let page_size = if request.page_size > 0 {
            request.page_size
        } else {
            DEFAULT_PAGE_SIZE
        };

        let page = match api
            .list_role_policies(role_name, page_size, request.page_token.as_deref())
            .await
        {
            Ok(page) => page,
            // The role being gone mid-destroy reads as "no policies left".
            Err(err) if err.is_not_found() => {
                return Ok(ListResult {
                    native_ids: Vec::new(),
                    next_page_token: None,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let native_ids = page
            .policy_names
            .iter()
            .map(|policy_name| format!("{policy_name}|{role_name}"))
            .collect();

        Ok(ListResult {
            native_ids,
            next_page_token: page.marker,
        })
    }
}

#[async_trait]
impl Provisioner for RolePolicyProvisioner {
    async fn create(&self, _request: &CreateRequest) -> Result<CreateResult> {
        Err(ProvisionError::NotImplemented(
            "create not implemented - the control plane handles this operation",
        ))
    }

    async fn update(&self, _request: &UpdateRequest) -> Result<UpdateResult> {
        Err(ProvisionError::NotImplemented(
            "update not implemented - the control plane handles this operation",
        ))
    }

    async fn delete(&self, _request: &DeleteRequest) -> Result<DeleteResult> {
        Err(ProvisionError::NotImplemented(
            "delete not implemented - the control plane handles this operation",
        ))
    }

    async fn status(&self, _request: &StatusRequest) -> Result<StatusResult> {
        Err(ProvisionError::NotImplemented(
            "status not implemented - the control plane handles this operation",
        ))
    }

    async fn read(&self, _request: &ReadRequest) -> Result<ReadResult> {
        Err(ProvisionError::NotImplemented(
            "read not implemented - the control plane handles this operation",
        ))
    }

    async fn list(&self, request: &ListRequest) -> Result<ListResult> {
        let api = HttpIamApi::new(&self.cfg)?;
        self.list_with(&api, request).await
    }
}
