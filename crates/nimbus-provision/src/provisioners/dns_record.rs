//! DNS record set provisioner
//!
//! The DNS service's only mutation primitive is the change batch: a set of
//! CREATE/DELETE changes against a zone, applied atomically with
//! asynchronous propagation. Updates are therefore expressed as one batch
//! holding the delete of the prior record and the create of the desired
//! one — never two submissions. Record sets have no provider-assigned
//! identifier either; the native id is synthesized from the zone, the
//! fully qualified name, and the record type.

use crate::provisioner::{ProvisionError, Provisioner, Result};
use async_trait::async_trait;
use nimbus_api::{
    AliasTarget, ChangeAction, ChangeStatus, DnsApi, HttpDnsApi, ProviderConfig, RecordChange,
    RecordSet, RecordSetQuery,
};
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult, Operation,
    OperationStatus, ProgressResult, ReadRequest, ReadResult, StatusRequest, StatusResult,
    UpdateRequest, UpdateResult, props,
};
use serde_json::{Map, Value, json};

pub const RESOURCE_TYPE: &str = "Nimbus::DNS::RecordSet";

/// Default TTL in seconds when the caller does not specify one.
const DEFAULT_TTL: i64 = 300;

pub struct RecordSetProvisioner {
    cfg: ProviderConfig,
}

impl RecordSetProvisioner {
    pub fn new(cfg: ProviderConfig) -> Self {
        Self { cfg }
    }

    fn api(&self) -> Result<HttpDnsApi> {
        Ok(HttpDnsApi::new(&self.cfg)?)
    }
}

/// Record names are stored fully qualified; a missing trailing dot would
/// make the same record look like a different identity.
fn canonical_name(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

pub(crate) fn build_native_id(zone_id: &str, name: &str, record_type: &str) -> String {
    format!("{zone_id}|{}|{record_type}", canonical_name(name))
}

pub(crate) fn parse_native_id(native_id: &str) -> Result<(String, String, String)> {
    let mut parts = native_id.splitn(3, '|');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(zone_id), Some(name), Some(record_type))
            if !zone_id.is_empty() && !name.is_empty() && !record_type.is_empty() =>
        {
            Ok((
                zone_id.to_string(),
                canonical_name(name),
                record_type.to_string(),
            ))
        }
        _ => Err(ProvisionError::validation(format!(
            "invalid native id format: expected 'zoneId|name|type', got: {native_id}"
        ))),
    }
}

/// Builds the provider record set from a property document, enforcing the
/// record shape rules: exactly one of an alias target or literal resource
/// records, and at least one non-empty literal value for the latter.
fn record_from_properties(properties: &Value) -> Result<(String, RecordSet)> {
    let object = props::as_object(properties)?;

    let zone_id = props::get_string(object, "ZoneId")?;
    let name = canonical_name(&props::get_string(object, "Name")?);
    let record_type = props::get_string(object, "Type")?;
    let ttl = props::get_i64_or(object, "TTL", DEFAULT_TTL)?;

    let alias_target = match object.get("AliasTarget") {
        Some(Value::Object(alias)) => Some(AliasTarget {
            dns_name: canonical_name(&props::get_string(alias, "DnsName")?),
            zone_id: props::get_string(alias, "ZoneId")?,
            evaluate_target_health: props::get_bool_or(alias, "EvaluateTargetHealth", false),
        }),
        _ => None,
    };

    let resource_records: Vec<String> = match object.get("ResourceRecords") {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    if alias_target.is_some() && !resource_records.is_empty() {
        return Err(ProvisionError::validation(
            "AliasTarget and ResourceRecords are mutually exclusive",
        ));
    }

    let record_set = match alias_target {
        Some(alias_target) => RecordSet {
            name,
            record_type,
            ttl: None,
            resource_records: Vec::new(),
            alias_target: Some(alias_target),
        },
        None => {
            if resource_records.is_empty() {
                return Err(ProvisionError::validation(
                    "at least one valid resource record is required when not using AliasTarget",
                ));
            }
            RecordSet {
                name,
                record_type,
                ttl: Some(ttl),
                resource_records,
                alias_target: None,
            }
        }
    };

    Ok((zone_id, record_set))
}

fn record_to_properties(zone_id: &str, record_set: &RecordSet) -> Value {
    let mut object = Map::new();
    object.insert("ZoneId".to_string(), json!(zone_id));
    object.insert(
        "Name".to_string(),
        json!(record_set.name.trim_end_matches('.')),
    );
    object.insert("Type".to_string(), json!(record_set.record_type));

    match &record_set.alias_target {
        Some(alias) => {
            object.insert(
                "AliasTarget".to_string(),
                json!({
                    "DnsName": alias.dns_name,
                    "ZoneId": alias.zone_id,
                    "EvaluateTargetHealth": alias.evaluate_target_health,
                }),
            );
        }
        None => {
            object.insert(
                "ResourceRecords".to_string(),
                json!(record_set.resource_records),
            );
            if let Some(ttl) = record_set.ttl {
                object.insert("TTL".to_string(), json!(ttl));
            }
        }
    }

    Value::Object(object)
}

impl RecordSetProvisioner {
    async fn create_with(
        &self,
        api: &dyn DnsApi,
        request: &CreateRequest,
    ) -> Result<CreateResult> {
        let (zone_id, record_set) = record_from_properties(&request.properties)?;
        let native_id = build_native_id(&zone_id, &record_set.name, &record_set.record_type);

        let change = RecordChange {
            action: ChangeAction::Create,
            record_set,
        };
        let info = api.change_record_sets(&zone_id, &[change]).await?;

        // Propagation is asynchronous; the identity is computed locally.
        Ok(CreateResult {
            progress: ProgressResult::new(Operation::Create, OperationStatus::InProgress)
                .with_request_token(info.id)
                .with_native_id(native_id),
        })
    }

    async fn update_with(
        &self,
        api: &dyn DnsApi,
        request: &UpdateRequest,
    ) -> Result<UpdateResult> {
        let (prior_zone, prior_record) = record_from_properties(&request.prior_properties)?;
        let (desired_zone, desired_record) = record_from_properties(&request.desired_properties)?;

        if prior_zone != desired_zone {
            return Err(ProvisionError::validation(
                "cannot update record between different hosted zones",
            ));
        }

        let native_id = build_native_id(
            &desired_zone,
            &desired_record.name,
            &desired_record.record_type,
        );

        // One atomic batch: if the provider rejects it, neither side
        // applies; if it accepts, both changes apply together.
        let changes = [
            RecordChange {
                action: ChangeAction::Delete,
                record_set: prior_record,
            },
            RecordChange {
                action: ChangeAction::Create,
                record_set: desired_record,
            },
        ];
        let info = api.change_record_sets(&desired_zone, &changes).await?;

        Ok(UpdateResult {
            progress: ProgressResult::new(Operation::Update, OperationStatus::InProgress)
                .with_request_token(info.id)
                .with_native_id(native_id),
        })
    }

    async fn delete_with(
        &self,
        api: &dyn DnsApi,
        request: &DeleteRequest,
    ) -> Result<DeleteResult> {
        // Deletion must echo the live record exactly, so never trust
        // caller-supplied metadata: re-read first.
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

        let Some(properties) = read.properties else {
            // Already absent: report success without submitting a change.
            return Ok(DeleteResult {
                progress: ProgressResult::new(Operation::Delete, OperationStatus::Success)
                    .with_native_id(request.native_id.clone()),
            });
        };

        let (zone_id, record_set) = record_from_properties(&properties)?;
        let native_id = build_native_id(&zone_id, &record_set.name, &record_set.record_type);

        let change = RecordChange {
            action: ChangeAction::Delete,
            record_set,
        };
        let info = api.change_record_sets(&zone_id, &[change]).await?;

        Ok(DeleteResult {
            progress: ProgressResult::new(Operation::Delete, OperationStatus::InProgress)
                .with_request_token(info.id)
                .with_native_id(native_id),
        })
    }

    async fn status_with(
        &self,
        api: &dyn DnsApi,
        request: &StatusRequest,
    ) -> Result<StatusResult> {
        let info = api.get_change(&request.request_token).await?;

        let mut progress = ProgressResult::new(Operation::CheckStatus, OperationStatus::InProgress)
            .with_request_token(info.id)
            .with_native_id(request.native_id.clone());

        if info.status == ChangeStatus::InSync {
            progress.status = OperationStatus::Success;

            if !request.native_id.is_empty() {
                let read = self
                    .read_with(
                        api,
                        &ReadRequest {
                            resource_type: request.resource_type.clone(),
                            native_id: request.native_id.clone(),
                            redact_sensitive: false,
                            target_config: request.target_config.clone(),
                        },
                    )
                    .await;
                if let Ok(read) = read {
                    progress.resource_properties = read.properties;
                }
            }
        }

        Ok(StatusResult { progress })
    }

    async fn read_with(&self, api: &dyn DnsApi, request: &ReadRequest) -> Result<ReadResult> {
        let (zone_id, name, record_type) = parse_native_id(&request.native_id)?;

        // The listing starts at the cursor and runs forward in
        // lexicographic order; there is no point lookup.
        let query = RecordSetQuery {
            zone_id: zone_id.clone(),
            start_name: Some(name.clone()),
            start_type: Some(record_type.clone()),
            max_items: None,
        };
        let page = match api.list_record_sets(&query).await {
            Ok(page) => page,
            Err(err) => {
                tracing::debug!(error = %err, zone_id, "record lookup failed");
                return Ok(ReadResult::not_found(RESOURCE_TYPE));
            }
        };

        let found = page
            .record_sets
            .into_iter()
            .find(|rs| canonical_name(&rs.name) == name && rs.record_type == record_type);

        match found {
            Some(record_set) => Ok(ReadResult::found(
                RESOURCE_TYPE,
                record_to_properties(&zone_id, &record_set),
            )),
            None => Ok(ReadResult::not_found(RESOURCE_TYPE)),
        }
    }

    async fn list_with(&self, api: &dyn DnsApi, request: &ListRequest) -> Result<ListResult> {
        let zone_id = request
            .additional_properties
            .get("ZoneId")
            .filter(|zone_id| !zone_id.is_empty())
            .ok_or_else(|| {
                ProvisionError::validation(
                    "ZoneId must be provided in additional properties for listing record sets",
                )
            })?;

        let query = RecordSetQuery {
            zone_id: zone_id.clone(),
            start_name: request.page_token.clone(),
            start_type: None,
            max_items: Some(request.page_size),
        };
        let page = api.list_record_sets(&query).await?;

        let native_ids = page
            .record_sets
            .iter()
            .map(|rs| build_native_id(zone_id, &rs.name, &rs.record_type))
            .collect();

        Ok(ListResult {
            native_ids,
            next_page_token: page.next_record_name,
        })
    }
}

#[async_trait]
impl Provisioner for RecordSetProvisioner {
    async fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        self.create_with(&self.api()?, request).await
    }

    async fn update(&self, request: &UpdateRequest) -> Result<UpdateResult> {
        self.update_with(&self.api()?, request).await
    }

    async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult> {
        self.delete_with(&self.api()?, request).await
    }

    async fn status(&self, request: &StatusRequest) -> Result<StatusResult> {
        self.status_with(&self.api()?, request).await
    }

    async fn read(&self, request: &ReadRequest) -> Result<ReadResult> {
        self.read_with(&self.api()?, request).await
    }

    async fn list(&self, request: &ListRequest) -> Result<ListResult> {
        self.list_with(&self.api()?, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_api::{ChangeInfo, RecordSetPage};
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory zone backend. Records are keyed by (name, type) in a
    /// BTreeMap so cursor listing shares the provider's lexicographic
    /// order; change batches validate exact-match deletes and apply
    /// atomically, with propagation tracked per change id.
    #[derive(Default)]
    struct FakeDns {
        records: Mutex<BTreeMap<(String, String), RecordSet>>,
        changes: Mutex<HashMap<String, ChangeStatus>>,
        change_calls: AtomicUsize,
        next_change: AtomicUsize,
    }

    impl FakeDns {
        fn with_records(records: impl IntoIterator<Item = RecordSet>) -> Self {
            let fake = Self::default();
            {
                let mut map = fake.records.lock().unwrap();
                for record in records {
                    map.insert((record.name.clone(), record.record_type.clone()), record);
                }
            }
            fake
        }

        fn sync_all(&self) {
            for status in self.changes.lock().unwrap().values_mut() {
                *status = ChangeStatus::InSync;
            }
        }

        fn record(name: &str, record_type: &str, ttl: i64, values: &[&str]) -> RecordSet {
            RecordSet {
                name: name.to_string(),
                record_type: record_type.to_string(),
                ttl: Some(ttl),
                resource_records: values.iter().map(|v| v.to_string()).collect(),
                alias_target: None,
            }
        }
    }

    #[async_trait]
    impl DnsApi for FakeDns {
        async fn change_record_sets(
            &self,
            _zone_id: &str,
            changes: &[RecordChange],
        ) -> nimbus_api::Result<ChangeInfo> {
            self.change_calls.fetch_add(1, Ordering::SeqCst);

            let mut records = self.records.lock().unwrap();

            // Validate the whole batch before applying any of it.
            for change in changes {
                let key = (
                    change.record_set.name.clone(),
                    change.record_set.record_type.clone(),
                );
                match change.action {
                    ChangeAction::Delete => match records.get(&key) {
                        Some(live) if *live == change.record_set => {}
                        _ => {
                            return Err(nimbus_api::ApiError::provider(
                                "InvalidRequest",
                                "delete does not match the live record",
                            ));
                        }
                    },
                    ChangeAction::Create => {}
                }
            }

            for change in changes {
                let key = (
                    change.record_set.name.clone(),
                    change.record_set.record_type.clone(),
                );
                match change.action {
                    ChangeAction::Create => {
                        records.insert(key, change.record_set.clone());
                    }
                    ChangeAction::Delete => {
                        records.remove(&key);
                    }
                }
            }

            let id = format!("chg-{}", self.next_change.fetch_add(1, Ordering::SeqCst) + 1);
            self.changes
                .lock()
                .unwrap()
                .insert(id.clone(), ChangeStatus::Pending);
            Ok(ChangeInfo {
                id,
                status: ChangeStatus::Pending,
            })
        }

        async fn get_change(&self, change_id: &str) -> nimbus_api::Result<ChangeInfo> {
            let changes = self.changes.lock().unwrap();
            changes
                .get(change_id)
                .map(|status| ChangeInfo {
                    id: change_id.to_string(),
                    status: *status,
                })
                .ok_or_else(|| nimbus_api::ApiError::provider("ResourceNotFound", "no such change"))
        }

        async fn list_record_sets(
            &self,
            query: &RecordSetQuery,
        ) -> nimbus_api::Result<RecordSetPage> {
            let records = self.records.lock().unwrap();
            let start = (
                query.start_name.clone().unwrap_or_default(),
                query.start_type.clone().unwrap_or_default(),
            );

            let mut matched: Vec<RecordSet> = records
                .range(start..)
                .map(|(_, record)| record.clone())
                .collect();

            let mut next_record_name = None;
            if let Some(max_items) = query.max_items {
                if matched.len() > max_items as usize {
                    next_record_name = Some(matched[max_items as usize].name.clone());
                    matched.truncate(max_items as usize);
                }
            }

            Ok(RecordSetPage {
                record_sets: matched,
                next_record_name,
                next_record_type: None,
            })
        }
    }

    fn provisioner() -> RecordSetProvisioner {
        RecordSetProvisioner::new(ProviderConfig::default())
    }

    fn create_request(properties: Value) -> CreateRequest {
        CreateRequest {
            resource_type: RESOURCE_TYPE.to_string(),
            properties,
            target_config: Value::Null,
        }
    }

    fn read_request(native_id: &str) -> ReadRequest {
        ReadRequest {
            resource_type: RESOURCE_TYPE.to_string(),
            native_id: native_id.to_string(),
            redact_sensitive: false,
            target_config: Value::Null,
        }
    }

    fn status_request(token: &str, native_id: &str) -> StatusRequest {
        StatusRequest {
            resource_type: RESOURCE_TYPE.to_string(),
            request_token: token.to_string(),
            native_id: native_id.to_string(),
            target_config: Value::Null,
        }
    }

    #[test]
    fn native_id_round_trips_with_trailing_dot_canonicalization() {
        let id = build_native_id("Z123", "a.example.test", "A");
        assert_eq!(id, "Z123|a.example.test.|A");

        let (zone, name, record_type) = parse_native_id(&id).unwrap();
        assert_eq!(zone, "Z123");
        assert_eq!(name, "a.example.test.");
        assert_eq!(record_type, "A");

        // An undotted id parses to the same identity.
        let (_, undotted, _) = parse_native_id("Z123|a.example.test|A").unwrap();
        assert_eq!(undotted, name);
    }

    #[test]
    fn malformed_native_ids_are_rejected() {
        assert!(parse_native_id("Z123|a.example.test.").is_err());
        assert!(parse_native_id("").is_err());
    }

    #[tokio::test]
    async fn create_validates_record_shape_before_any_provider_call() {
        let fake = FakeDns::default();
        let provisioner = provisioner();

        // Both alias target and literal records.
        let err = provisioner
            .create_with(
                &fake,
                &create_request(json!({
                    "ZoneId": "Z123",
                    "Name": "a.example.test",
                    "Type": "A",
                    "ResourceRecords": ["192.168.1.1"],
                    "AliasTarget": {"DnsName": "lb.example.test", "ZoneId": "Z999"}
                })),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));

        // Neither.
        let err = provisioner
            .create_with(
                &fake,
                &create_request(json!({
                    "ZoneId": "Z123",
                    "Name": "a.example.test",
                    "Type": "A"
                })),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least one"));

        assert_eq!(fake.change_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_across_zones_fails_before_any_provider_call() {
        let fake = FakeDns::default();
        let provisioner = provisioner();

        let err = provisioner
            .update_with(
                &fake,
                &UpdateRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    native_id: "Z1|a.example.test.|A".to_string(),
                    patch_document: None,
                    prior_properties: json!({
                        "ZoneId": "Z1", "Name": "a.example.test", "Type": "A",
                        "ResourceRecords": ["192.168.55.2"]
                    }),
                    desired_properties: json!({
                        "ZoneId": "Z2", "Name": "a.example.test", "Type": "A",
                        "ResourceRecords": ["192.168.55.2"]
                    }),
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("different hosted zones"));
        assert_eq!(fake.change_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn delete_of_absent_record_succeeds_without_a_change_batch() {
        let fake = FakeDns::default();
        let provisioner = provisioner();

        let result = provisioner
            .delete_with(
                &fake,
                &DeleteRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    native_id: "Z123|gone.example.test.|A".to_string(),
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.progress.status, OperationStatus::Success);
        assert_eq!(fake.change_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ttl_accepts_numbers_and_numeric_strings() {
        let fake = FakeDns::default();
        let provisioner = provisioner();

        provisioner
            .create_with(
                &fake,
                &create_request(json!({
                    "ZoneId": "Z123",
                    "Name": "s.example.test",
                    "Type": "A",
                    "TTL": "600",
                    "ResourceRecords": ["10.0.0.1"]
                })),
            )
            .await
            .unwrap();

        let records = fake.records.lock().unwrap();
        let record = &records[&("s.example.test.".to_string(), "A".to_string())];
        assert_eq!(record.ttl, Some(600));
    }

    #[tokio::test]
    async fn record_lifecycle_create_status_read_update_delete() {
        let fake = FakeDns::default();
        let provisioner = provisioner();

        // Create an A record with TTL 300.
        let created = provisioner
            .create_with(
                &fake,
                &create_request(json!({
                    "ZoneId": "Z123",
                    "Name": "a.example.test",
                    "Type": "A",
                    "TTL": 300,
                    "ResourceRecords": ["192.168.1.1"]
                })),
            )
            .await
            .unwrap();
        assert_eq!(created.progress.status, OperationStatus::InProgress);
        assert_eq!(created.progress.native_id, "Z123|a.example.test.|A");
        let token = created.progress.request_token.clone();

        // Still propagating.
        let status = provisioner
            .status_with(&fake, &status_request(&token, &created.progress.native_id))
            .await
            .unwrap();
        assert_eq!(status.progress.status, OperationStatus::InProgress);

        fake.sync_all();

        let status = provisioner
            .status_with(&fake, &status_request(&token, &created.progress.native_id))
            .await
            .unwrap();
        assert_eq!(status.progress.status, OperationStatus::Success);
        let properties = status.progress.resource_properties.clone().unwrap();
        assert_eq!(properties["TTL"], json!(300));
        assert_eq!(properties["ResourceRecords"], json!(["192.168.1.1"]));

        // Read reflects the live record.
        let read = provisioner
            .read_with(&fake, &read_request(&created.progress.native_id))
            .await
            .unwrap();
        assert_eq!(read.properties.unwrap()["TTL"], json!(300));

        // Update TTL and value: exactly one more batch, with both changes.
        let calls_before = fake.change_calls.load(Ordering::SeqCst);
        let updated = provisioner
            .update_with(
                &fake,
                &UpdateRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    native_id: created.progress.native_id.clone(),
                    patch_document: None,
                    prior_properties: json!({
                        "ZoneId": "Z123", "Name": "a.example.test", "Type": "A",
                        "TTL": 300, "ResourceRecords": ["192.168.1.1"]
                    }),
                    desired_properties: json!({
                        "ZoneId": "Z123", "Name": "a.example.test", "Type": "A",
                        "TTL": 600, "ResourceRecords": ["192.168.1.3"]
                    }),
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap();
        assert_eq!(fake.change_calls.load(Ordering::SeqCst), calls_before + 1);

        fake.sync_all();
        let status = provisioner
            .status_with(&fake, &status_request(
                &updated.progress.request_token,
                &updated.progress.native_id,
            ))
            .await
            .unwrap();
        assert_eq!(status.progress.status, OperationStatus::Success);

        let read = provisioner
            .read_with(&fake, &read_request(&updated.progress.native_id))
            .await
            .unwrap();
        let properties = read.properties.unwrap();
        assert_eq!(properties["TTL"], json!(600));
        assert_eq!(properties["ResourceRecords"], json!(["192.168.1.3"]));

        // Delete, then confirm the record is gone.
        let deleted = provisioner
            .delete_with(
                &fake,
                &DeleteRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    native_id: updated.progress.native_id.clone(),
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap();
        assert_eq!(deleted.progress.status, OperationStatus::InProgress);

        fake.sync_all();
        let status = provisioner
            .status_with(&fake, &status_request(
                &deleted.progress.request_token,
                &deleted.progress.native_id,
            ))
            .await
            .unwrap();
        assert_eq!(status.progress.status, OperationStatus::Success);

        let read = provisioner
            .read_with(&fake, &read_request(&updated.progress.native_id))
            .await
            .unwrap();
        assert!(read.is_not_found());
    }

    #[tokio::test]
    async fn alias_records_round_trip_through_read() {
        let fake = FakeDns::default();
        let provisioner = provisioner();

        let created = provisioner
            .create_with(
                &fake,
                &create_request(json!({
                    "ZoneId": "Z123",
                    "Name": "www.example.test",
                    "Type": "A",
                    "AliasTarget": {
                        "DnsName": "lb.example.test",
                        "ZoneId": "Z999",
                        "EvaluateTargetHealth": true
                    }
                })),
            )
            .await
            .unwrap();

        let read = provisioner
            .read_with(&fake, &read_request(&created.progress.native_id))
            .await
            .unwrap();
        let properties = read.properties.unwrap();
        assert_eq!(properties["AliasTarget"]["DnsName"], json!("lb.example.test."));
        assert_eq!(properties["AliasTarget"]["ZoneId"], json!("Z999"));
        assert!(properties.get("TTL").is_none());
    }

    #[tokio::test]
    async fn list_pages_through_a_zone_with_the_start_name_cursor() {
        let fake = FakeDns::with_records([
            FakeDns::record("a.example.test.", "A", 300, &["10.0.0.1"]),
            FakeDns::record("b.example.test.", "A", 300, &["10.0.0.2"]),
            FakeDns::record("c.example.test.", "A", 300, &["10.0.0.3"]),
            FakeDns::record("d.example.test.", "A", 300, &["10.0.0.4"]),
        ]);
        let provisioner = provisioner();

        let list_request = |token: Option<String>| ListRequest {
            resource_type: RESOURCE_TYPE.to_string(),
            additional_properties: HashMap::from([("ZoneId".to_string(), "Z123".to_string())]),
            page_size: 2,
            page_token: token,
            target_config: Value::Null,
        };

        let first = provisioner
            .list_with(&fake, &list_request(None))
            .await
            .unwrap();
        assert_eq!(
            first.native_ids,
            vec!["Z123|a.example.test.|A", "Z123|b.example.test.|A"]
        );
        let token = first.next_page_token.clone();
        assert!(token.is_some());

        let second = provisioner
            .list_with(&fake, &list_request(token))
            .await
            .unwrap();
        assert_eq!(
            second.native_ids,
            vec!["Z123|c.example.test.|A", "Z123|d.example.test.|A"]
        );
        assert!(second.next_page_token.is_none());
    }

    #[tokio::test]
    async fn list_requires_a_zone_id() {
        let fake = FakeDns::default();
        let provisioner = provisioner();

        let err = provisioner
            .list_with(
                &fake,
                &ListRequest {
                    resource_type: RESOURCE_TYPE.to_string(),
                    additional_properties: HashMap::new(),
                    page_size: 2,
                    page_token: None,
                    target_config: Value::Null,
                },
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("ZoneId"));
    }
}
