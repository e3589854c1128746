//! Nimbus network API client
//!
//! Routes are not modeled by the control plane at all; the plugin talks to
//! the network service directly. A route is addressed by its route table
//! and destination block, and carries exactly one target. Routes cannot be
//! mutated in place — callers delete and recreate.

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::wire::Transport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    pub destination_cidr: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_gateway_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_interface_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peering_connection_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTable {
    pub route_table_id: String,

    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateRouteRequest {
    pub route_table_id: String,
    pub destination_cidr: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_gateway_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_interface_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub peering_connection_id: Option<String>,
}

#[async_trait]
pub trait NetworkApi: Send + Sync {
    async fn describe_route_table(&self, route_table_id: &str) -> Result<RouteTable>;

    async fn create_route(&self, request: &CreateRouteRequest) -> Result<()>;

    async fn delete_route(&self, route_table_id: &str, destination_cidr: &str) -> Result<()>;
}

/// HTTP implementation over the provider endpoint.
pub struct HttpNetworkApi {
    transport: Transport,
}

impl HttpNetworkApi {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(cfg)?,
        })
    }
}

#[derive(Serialize)]
struct DeleteRouteBody<'a> {
    route_table_id: &'a str,
    destination_cidr: &'a str,
}

#[async_trait]
impl NetworkApi for HttpNetworkApi {
    async fn describe_route_table(&self, route_table_id: &str) -> Result<RouteTable> {
        self.transport
            .get_json(
                "/network/route-tables/describe",
                &[("route_table_id", route_table_id.to_string())],
            )
            .await
    }

    async fn create_route(&self, request: &CreateRouteRequest) -> Result<()> {
        self.transport.post_unit("/network/routes", request).await
    }

    async fn delete_route(&self, route_table_id: &str, destination_cidr: &str) -> Result<()> {
        self.transport
            .post_unit(
                "/network/routes/delete",
                &DeleteRouteBody {
                    route_table_id,
                    destination_cidr,
                },
            )
            .await
    }
}
