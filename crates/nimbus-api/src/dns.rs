//! Nimbus DNS API client
//!
//! The DNS service has no "update a record" primitive. Mutations are
//! expressed as a change batch — an ordered set of CREATE/DELETE changes
//! against a zone, applied atomically and propagated asynchronously. The
//! returned change is polled until it reaches `INSYNC`.

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::wire::Transport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Delete,
}

/// One record set, as stored by the provider. Names are fully qualified
/// with a trailing dot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_records: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
}

/// Alias records point at another provider resource instead of carrying
/// literal values; the provider resolves them at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasTarget {
    pub dns_name: String,
    pub zone_id: String,

    #[serde(default)]
    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordChange {
    pub action: ChangeAction,
    pub record_set: RecordSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "INSYNC")]
    InSync,
}

/// Handle on a submitted change batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub id: String,
    pub status: ChangeStatus,
}

/// Listing cursor. The provider returns records in lexicographic name
/// order starting at the cursor; there is no point lookup.
#[derive(Debug, Clone, Default)]
pub struct RecordSetQuery {
    pub zone_id: String,
    pub start_name: Option<String>,
    pub start_type: Option<String>,
    pub max_items: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSetPage {
    pub record_sets: Vec<RecordSet>,

    #[serde(default)]
    pub next_record_name: Option<String>,

    #[serde(default)]
    pub next_record_type: Option<String>,
}

#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Submits a change batch against a zone. All changes in the batch
    /// apply atomically or not at all.
    async fn change_record_sets(
        &self,
        zone_id: &str,
        changes: &[RecordChange],
    ) -> Result<ChangeInfo>;

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo>;

    async fn list_record_sets(&self, query: &RecordSetQuery) -> Result<RecordSetPage>;
}

/// HTTP implementation over the provider endpoint.
pub struct HttpDnsApi {
    transport: Transport,
}

impl HttpDnsApi {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(cfg)?,
        })
    }
}

#[derive(Serialize)]
struct ChangeBatchBody<'a> {
    changes: &'a [RecordChange],
}

#[async_trait]
impl DnsApi for HttpDnsApi {
    async fn change_record_sets(
        &self,
        zone_id: &str,
        changes: &[RecordChange],
    ) -> Result<ChangeInfo> {
        self.transport
            .post_json(
                &format!("/dns/zones/{zone_id}/changes"),
                &ChangeBatchBody { changes },
            )
            .await
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        self.transport
            .get_json(
                "/dns/changes/status",
                &[("change_id", change_id.to_string())],
            )
            .await
    }

    async fn list_record_sets(&self, query: &RecordSetQuery) -> Result<RecordSetPage> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(start_name) = &query.start_name {
            params.push(("start_name", start_name.clone()));
        }
        if let Some(start_type) = &query.start_type {
            params.push(("start_type", start_type.clone()));
        }
        if let Some(max_items) = query.max_items {
            params.push(("max_items", max_items.to_string()));
        }

        self.transport
            .get_json(&format!("/dns/zones/{}/records", query.zone_id), &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn change_actions_serialize_uppercase() {
        assert_eq!(
            serde_json::to_value(ChangeAction::Create).unwrap(),
            json!("CREATE")
        );
        assert_eq!(
            serde_json::to_value(ChangeAction::Delete).unwrap(),
            json!("DELETE")
        );
    }

    #[test]
    fn record_set_omits_absent_fields_on_the_wire() {
        let rs = RecordSet {
            name: "a.example.test.".to_string(),
            record_type: "A".to_string(),
            ttl: None,
            resource_records: Vec::new(),
            alias_target: Some(AliasTarget {
                dns_name: "lb.example.test.".to_string(),
                zone_id: "Z123".to_string(),
                evaluate_target_health: false,
            }),
        };

        let value = serde_json::to_value(&rs).unwrap();
        assert!(value.get("ttl").is_none());
        assert!(value.get("resource_records").is_none());
        assert_eq!(value["alias_target"]["zone_id"], json!("Z123"));
    }

    #[test]
    fn change_status_parses_insync() {
        let info: ChangeInfo =
            serde_json::from_value(json!({"id": "chg-1", "status": "INSYNC"})).unwrap();
        assert_eq!(info.status, ChangeStatus::InSync);
    }
}
