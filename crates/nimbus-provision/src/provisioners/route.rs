//! Network route provisioner
//!
//! The control plane does not model routes, so this provisioner talks to
//! the network service directly. A route is identified by its route table,
//! destination block, and single target; the provider cannot mutate a
//! route in place, so Update is a hard error by design.

use crate::provisioner::{ProvisionError, Provisioner, Result};
use async_trait::async_trait;
use nimbus_api::{CreateRouteRequest, HttpNetworkApi, NetworkApi, ProviderConfig};
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult, Operation,
    OperationStatus, ProgressResult, ReadRequest, ReadResult, StatusRequest, StatusResult,
    UpdateRequest, UpdateResult, props,
};
use serde_json::{Map, Value, json};

pub const RESOURCE_TYPE: &str = "Nimbus::Network::Route";

/// The mutually exclusive target properties a route may carry.
const TARGET_KEYS: &[&str] = &[
    "GatewayId",
    "NatGatewayId",
    "NetworkInterfaceId",
    "InstanceId",
    "PeeringConnectionId",
];

pub struct RouteProvisioner {
    cfg: ProviderConfig,
}

impl RouteProvisioner {
    pub fn new(cfg: ProviderConfig) -> Self {
        Self { cfg }
    }

    fn api(&self) -> Result<HttpNetworkApi> {
        Ok(HttpNetworkApi::new(&self.cfg)?)
    }
}

/// Synthesizes the native id from the property document, validating that
/// exactly one target is set. Returns the id and the target key.
pub(crate) fn build_native_id(object: &Map<String, Value>) -> Result<(String, String)> {
    let route_table_id = props::get_string(object, "RouteTableId")?;
    let destination = props::get_string(object, "DestinationCidr")?;

    let mut target: Option<(&str, String)> = None;
    for key in TARGET_KEYS {
        if let Some(value) = props::get_opt_string(object, key) {
            if let Some((existing, _)) = target {
                return Err(ProvisionError::validation(format!(
                    "multiple route targets set: {existing} and {key}"
                )));
            }
            target = Some((key, value));
        }
    }
    let Some((target_key, target_value)) = target else {
        return Err(ProvisionError::validation("no route target set"));
    };

    Ok((
        format!("{route_table_id}|{destination}|{target_key}={target_value}"),
        target_key.to_string(),
    ))
}

pub(crate) fn parse_native_id(native_id: &str) -> Result<(String, String)> {
    let mut parts = native_id.splitn(3, '|');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(route_table_id), Some(destination), Some(_target))
            if !route_table_id.is_empty() && !destination.is_empty() =>
        {
            Ok((route_table_id.to_string(), destination.to_string()))
        }
        _ => Err(ProvisionError::validation(format!(
            "invalid native id format: expected 'routeTableId|destinationCidr|target', got: {native_id}"
        ))),
    }
}

impl RouteProvisioner {
    async fn create_with(
        &self,
        api: &dyn NetworkApi,
        request: &CreateRequest,
    ) -> Result<CreateResult> {
        let object = props::as_object(&request.properties)?;

        // Identity construction doubles as target validation; do it before
        // touching the provider.
        let (native_id, _target_key) = build_native_id(object)?;

        let create = CreateRouteRequest {
            route_table_id: props::get_string(object, "RouteTableId")?,
            destination_cidr: props::get_string(object, "DestinationCidr")?,
            gateway_id: props::get_opt_string(object, "GatewayId"),
            nat_gateway_id: props::get_opt_string(object, "NatGatewayId"),
            network_interface_id: props::get_opt_string(object, "NetworkInterfaceId"),
            instance_id: props::get_opt_string(object, "InstanceId"),
            peering_connection_id: props::get_opt_string(object, "PeeringConnectionId"),
        };
        api.create_route(&create).await?;

        Ok(CreateResult {
            progress: ProgressResult::new(Operation::Create, OperationStatus::Success)
                .with_native_id(native_id),
        })
    }

    async fn delete_with(
        &self,
        api: &dyn NetworkApi,
        request: &DeleteRequest,
    ) -> Result<DeleteResult> {
        let read = self
            .read_with(
                api,
                &ReadRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    native_id: request.native_id.clone(),
                    redact_sensitive: false,
                    target_config: request.target_config.clone(),
                },
            )
            .await?;

        if read.is_not_found() {
            return Ok(DeleteResult {
                progress: ProgressResult::new(Operation::Delete, OperationStatus::Success)
                    .with_native_id(request.native_id.clone()),
            });
        }

        let (route_table_id, destination) = parse_native_id(&request.native_id)?;
        api.delete_route(&route_table_id, &destination).await?;

        Ok(DeleteResult {
            progress: ProgressResult::new(Operation::Delete, OperationStatus::Success)
                .with_native_id(request.native_id.clone()),
        })
    }

    async fn read_with(&self, api: &dyn NetworkApi, request: &ReadRequest) -> Result<ReadResult> {
        let (route_table_id, destination) = parse_native_id(&request.native_id)?;

        let table = match api.describe_route_table(&route_table_id).await {
            Ok(table) => table,
            Err(err) => {
                tracing::debug!(error = %err, route_table_id, "route table lookup failed");
                return Ok(ReadResult::not_found(RESOURCE_TYPE));
            }
        };

        let Some(route) = table
            .routes
            .iter()
            .find(|route| route.destination_cidr == destination)
        else {
            return Ok(ReadResult::not_found(RESOURCE_TYPE));
        };

        let mut object = Map::new();
        object.insert("RouteTableId".to_string(), json!(route_table_id));
        object.insert("DestinationCidr".to_string(), json!(destination));

        let targets = [
            ("GatewayId", &route.gateway_id),
            ("NatGatewayId", &route.nat_gateway_id),
            ("NetworkInterfaceId", &route.network_interface_id),
            ("InstanceId", &route.instance_id),
            ("PeeringConnectionId", &route.peering_connection_id),
        ];
        for (key, value) in targets {
            if let Some(value) = value {
                object.insert(key.to_string(), json!(value));
                break;
            }
        }

        Ok(ReadResult::found(RESOURCE_TYPE, Value::Object(object)))
    }
}

#[async_trait]
impl Provisioner for RouteProvisioner {
    async fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        self.create_with(&self.api()?, request).await
    }

    async fn update(&self, _request: &UpdateRequest) -> Result<UpdateResult> {
        // The provider's route primitive cannot be mutated in place.
        Err(ProvisionError::NotImplemented(
            "update is not supported for Nimbus::Network::Route resources; delete and recreate instead",
        ))
    }

    async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult> {
        self.delete_with(&self.api()?, request).await
    }

    async fn status(&self, _request: &StatusRequest) -> Result<StatusResult> {
        Err(ProvisionError::NotImplemented(
            "status check is not implemented for Nimbus::Network::Route resources",
        ))
    }

    async fn read(&self, request: &ReadRequest) -> Result<ReadResult> {
        self.read_with(&self.api()?, request).await
    }

    async fn list(&self, _request: &ListRequest) -> Result<ListResult> {
        // Route enumeration is not offered yet.
        Ok(ListResult {
            native_ids: Vec::new(),
            next_page_token: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_api::{Route, RouteTable};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeNetwork {
        tables: Mutex<Vec<RouteTable>>,
        delete_calls: AtomicUsize,
    }

    #[async_trait]
    impl NetworkApi for FakeNetwork {
        async fn describe_route_table(
            &self,
            route_table_id: &str,
        ) -> nimbus_api::Result<RouteTable> {
            let tables = self.tables.lock().unwrap();
            tables
                .iter()
                .find(|table| table.route_table_id == route_table_id)
                .cloned()
                .ok_or_else(|| {
                    nimbus_api::ApiError::provider("ResourceNotFound", "no such route table")
                })
        }

        async fn create_route(&self, request: &CreateRouteRequest) -> nimbus_api::Result<()> {
            let mut tables = self.tables.lock().unwrap();
            let route = Route {
                destination_cidr: request.destination_cidr.clone(),
                gateway_id: request.gateway_id.clone(),
                nat_gateway_id: request.nat_gateway_id.clone(),
                network_interface_id: request.network_interface_id.clone(),
                instance_id: request.instance_id.clone(),
                peering_connection_id: request.peering_connection_id.clone(),
            };
            match tables
                .iter_mut()
                .find(|table| table.route_table_id == request.route_table_id)
            {
                Some(table) => table.routes.push(route),
                None => tables.push(RouteTable {
                    route_table_id: request.route_table_id.clone(),
                    routes: vec![route],
                }),
            }
            Ok(())
        }

        async fn delete_route(
            &self,
            route_table_id: &str,
            destination_cidr: &str,
        ) -> nimbus_api::Result<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            let mut tables = self.tables.lock().unwrap();
            if let Some(table) = tables
                .iter_mut()
                .find(|table| table.route_table_id == route_table_id)
            {
                table
                    .routes
                    .retain(|route| route.destination_cidr != destination_cidr);
            }
            Ok(())
        }
    }

    fn provisioner() -> RouteProvisioner {
        RouteProvisioner::new(ProviderConfig::default())
    }

    fn route_properties() -> Value {
        json!({
            "RouteTableId": "rtb-1",
            "DestinationCidr": "10.0.0.0/16",
            "GatewayId": "gw-1"
        })
    }

    #[test]
    fn native_id_requires_exactly_one_target() {
        let object = route_properties();
        let (id, target_key) = build_native_id(object.as_object().unwrap()).unwrap();
        assert_eq!(id, "rtb-1|10.0.0.0/16|GatewayId=gw-1");
        assert_eq!(target_key, "GatewayId");

        let none = json!({"RouteTableId": "rtb-1", "DestinationCidr": "10.0.0.0/16"});
        assert!(build_native_id(none.as_object().unwrap()).is_err());

        let both = json!({
            "RouteTableId": "rtb-1",
            "DestinationCidr": "10.0.0.0/16",
            "GatewayId": "gw-1",
            "NatGatewayId": "nat-1"
        });
        let err = build_native_id(both.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("multiple route targets"));
    }

    #[tokio::test]
    async fn create_then_read_finds_the_route() {
        let fake = FakeNetwork::default();
        let provisioner = provisioner();

        let created = provisioner
            .create_with(
                &fake,
                &CreateRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    properties: route_properties(),
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.progress.status, OperationStatus::Success);

        let read = provisioner
            .read_with(
                &fake,
                &ReadRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    native_id: created.progress.native_id.clone(),
                    redact_sensitive: false,
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap();
        let properties = read.properties.unwrap();
        assert_eq!(properties["GatewayId"], json!("gw-1"));
        assert!(properties.get("NatGatewayId").is_none());
    }

    #[tokio::test]
    async fn delete_of_absent_route_succeeds_without_a_provider_delete() {
        let fake = FakeNetwork::default();

        let result = provisioner()
            .delete_with(
                &fake,
                &DeleteRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    native_id: "rtb-1|10.9.0.0/16|GatewayId=gw-1".to_string(),
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.progress.status, OperationStatus::Success);
        assert_eq!(fake.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_and_status_are_fatal_by_design() {
        let provisioner = provisioner();

        let err = provisioner
            .update(&UpdateRequest {
                resource_type: RESOURCE_TYPE.to_string(),
                native_id: "rtb-1|10.0.0.0/16|GatewayId=gw-1".to_string(),
                patch_document: None,
                desired_properties: Value::Null,
                prior_properties: Value::Null,
                target_config: Value::Null,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("delete and recreate"));

        let err = provisioner
            .status(&StatusRequest {
                resource_type: RESOURCE_TYPE.to_string(),
                request_token: "req-1".to_string(),
                native_id: String::new(),
                target_config: Value::Null,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not implemented"));
    }

    #[tokio::test]
    async fn list_is_an_empty_page() {
        let result = provisioner()
            .list(&ListRequest {
                resource_type: RESOURCE_TYPE.to_string(),
                additional_properties: Default::default(),
                page_size: 10,
                page_token: None,
                target_config: Value::Null,
            })
            .await
            .unwrap();
        assert!(result.native_ids.is_empty());
    }
}
