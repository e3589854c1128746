//! Nimbus IAM API client
//!
//! Only the inline role-policy listing is needed here; everything else
//! about IAM resources goes through the control plane.

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::wire::Transport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePolicyPage {
    pub policy_names: Vec<String>,

    /// Continuation marker; absent on the last page.
    #[serde(default)]
    pub marker: Option<String>,
}

#[async_trait]
pub trait IamApi: Send + Sync {
    async fn list_role_policies(
        &self,
        role_name: &str,
        max_items: i32,
        marker: Option<&str>,
    ) -> Result<RolePolicyPage>;
}

/// HTTP implementation over the provider endpoint.
pub struct HttpIamApi {
    transport: Transport,
}

impl HttpIamApi {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(cfg)?,
        })
    }
}

#[async_trait]
impl IamApi for HttpIamApi {
    async fn list_role_policies(
        &self,
        role_name: &str,
        max_items: i32,
        marker: Option<&str>,
    ) -> Result<RolePolicyPage> {
        let mut params = vec![
            ("role_name", role_name.to_string()),
            ("max_items", max_items.to_string()),
        ];
        if let Some(marker) = marker {
            params.push(("marker", marker.to_string()));
        }

        self.transport.get_json("/iam/role-policies", &params).await
    }
}
