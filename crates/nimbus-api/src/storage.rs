//! Nimbus object storage API client
//!
//! Unlike the control plane, storage operations are synchronous: a put or
//! delete has fully happened by the time the call returns. Deletes of
//! nonexistent keys succeed by provider contract.

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::wire::Transport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// A full object write. `body` is the complete content; the provider
/// needs the length up front, so streaming is not offered here.
#[derive(Debug, Clone, Default)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub storage_class: Option<String>,
    pub metadata: HashMap<String, String>,
    pub tags: Vec<Tag>,
}

/// Object metadata as returned by a head call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectHead {
    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub content_encoding: Option<String>,

    #[serde(default)]
    pub cache_control: Option<String>,

    #[serde(default)]
    pub content_length: Option<i64>,

    #[serde(default)]
    pub etag: Option<String>,

    #[serde(default)]
    pub storage_class: Option<String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ListObjectsRequest {
    pub bucket: String,
    pub max_keys: i32,
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPage {
    pub keys: Vec<String>,

    #[serde(default)]
    pub is_truncated: bool,

    #[serde(default)]
    pub next_continuation_token: Option<String>,
}

#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn put_object(&self, request: &PutObjectRequest) -> Result<()>;

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectHead>;

    /// Succeeds whether or not the key exists.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    async fn list_objects(&self, request: &ListObjectsRequest) -> Result<ObjectPage>;

    async fn get_object_tags(&self, bucket: &str, key: &str) -> Result<Vec<Tag>>;
}

/// HTTP implementation over the provider endpoint.
pub struct HttpStorageApi {
    transport: Transport,
}

impl HttpStorageApi {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(cfg)?,
        })
    }
}

fn map_is_empty(map: &&HashMap<String, String>) -> bool {
    map.is_empty()
}

fn slice_is_empty(tags: &&[Tag]) -> bool {
    tags.is_empty()
}

#[derive(Serialize)]
struct PutObjectBody<'a> {
    bucket: &'a str,
    key: &'a str,
    body_base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_encoding: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_control: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_class: Option<&'a str>,
    #[serde(skip_serializing_if = "map_is_empty")]
    metadata: &'a HashMap<String, String>,
    #[serde(skip_serializing_if = "slice_is_empty")]
    tags: &'a [Tag],
}

#[derive(Serialize)]
struct ObjectRefBody<'a> {
    bucket: &'a str,
    key: &'a str,
}

#[async_trait]
impl StorageApi for HttpStorageApi {
    async fn put_object(&self, request: &PutObjectRequest) -> Result<()> {
        use base64::{Engine as _, engine::general_purpose::STANDARD};

        self.transport
            .post_unit(
                "/storage/objects",
                &PutObjectBody {
                    bucket: &request.bucket,
                    key: &request.key,
                    body_base64: STANDARD.encode(&request.body),
                    content_type: request.content_type.as_deref(),
                    content_encoding: request.content_encoding.as_deref(),
                    cache_control: request.cache_control.as_deref(),
                    storage_class: request.storage_class.as_deref(),
                    metadata: &request.metadata,
                    tags: &request.tags,
                },
            )
            .await
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectHead> {
        self.transport
            .get_json(
                "/storage/objects/head",
                &[("bucket", bucket.to_string()), ("key", key.to_string())],
            )
            .await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.transport
            .post_unit("/storage/objects/delete", &ObjectRefBody { bucket, key })
            .await
    }

    async fn list_objects(&self, request: &ListObjectsRequest) -> Result<ObjectPage> {
        let mut params = vec![
            ("bucket", request.bucket.clone()),
            ("max_keys", request.max_keys.to_string()),
        ];
        if let Some(token) = &request.continuation_token {
            params.push(("continuation_token", token.clone()));
        }

        self.transport.get_json("/storage/objects", &params).await
    }

    async fn get_object_tags(&self, bucket: &str, key: &str) -> Result<Vec<Tag>> {
        self.transport
            .get_json(
                "/storage/objects/tags",
                &[("bucket", bucket.to_string()), ("key", key.to_string())],
            )
            .await
    }
}
