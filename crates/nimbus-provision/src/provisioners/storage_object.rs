//! Storage object provisioner
//!
//! Objects are addressed as bucket + key. Storage calls are synchronous,
//! so unlike the DNS provisioner there is nothing to poll: Status is a
//! stub that always reports success, and Create/Update return terminal
//! results directly. Body content comes from exactly one of an inline
//! string, a base64 payload, or a remote URL fetched up front.

use crate::provisioner::{ProvisionError, Provisioner, Result};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use nimbus_api::{
    HttpStorageApi, ListObjectsRequest, ProviderConfig, PutObjectRequest, StorageApi, Tag,
};
use nimbus_resource::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult, Operation,
    OperationStatus, ProgressResult, ReadRequest, ReadResult, StatusRequest, StatusResult,
    UpdateRequest, UpdateResult, props,
};
use serde_json::{Map, Value, json};

pub const RESOURCE_TYPE: &str = "Nimbus::Storage::Object";

pub struct StorageObjectProvisioner {
    cfg: ProviderConfig,
}

impl StorageObjectProvisioner {
    pub fn new(cfg: ProviderConfig) -> Self {
        Self { cfg }
    }

    fn api(&self) -> Result<HttpStorageApi> {
        Ok(HttpStorageApi::new(&self.cfg)?)
    }
}

pub(crate) fn build_native_id(bucket: &str, key: &str) -> String {
    format!("{bucket}|{key}")
}

/// Splits on the first separator only; keys are allowed to contain `|`.
pub(crate) fn parse_native_id(native_id: &str) -> Result<(String, String)> {
    match native_id.split_once('|') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
            Ok((bucket.to_string(), key.to_string()))
        }
        _ => Err(ProvisionError::validation(format!(
            "invalid native id format: expected 'bucket|key', got: {native_id}"
        ))),
    }
}

/// Resolves the object body from the property document. `Content`,
/// `ContentBase64`, and `SourceUrl` are mutually exclusive; a remote
/// source is fully buffered so the provider can see the content length up
/// front. With none of the three set the body is empty.
async fn resolve_body(object: &Map<String, Value>) -> Result<Vec<u8>> {
    let content = object.get("Content");
    let content_base64 = object.get("ContentBase64");
    let source_url = object.get("SourceUrl");

    let set = [content, content_base64, source_url]
        .iter()
        .filter(|value| value.is_some())
        .count();
    if set > 1 {
        return Err(ProvisionError::validation(
            "Content, ContentBase64, and SourceUrl are mutually exclusive",
        ));
    }

    if content.is_some() {
        return Ok(props::get_string(object, "Content")?.into_bytes());
    }

    if content_base64.is_some() {
        let encoded = props::get_string(object, "ContentBase64")?;
        return STANDARD.decode(encoded.as_bytes()).map_err(|err| {
            ProvisionError::validation(format!("failed to decode ContentBase64: {err}"))
        });
    }

    if source_url.is_some() {
        let url = props::get_string(object, "SourceUrl")?;
        let response = reqwest::get(&url)
            .await
            .map_err(nimbus_api::ApiError::from)?;
        if !response.status().is_success() {
            return Err(ProvisionError::validation(format!(
                "source URL {url} returned status {}",
                response.status().as_u16()
            )));
        }
        let body = response.bytes().await.map_err(nimbus_api::ApiError::from)?;
        return Ok(body.to_vec());
    }

    Ok(Vec::new())
}

/// Builds the put request from a property document; shared by create and
/// update, which are both full writes.
async fn put_request_from_properties(properties: &Value) -> Result<PutObjectRequest> {
    let object = props::as_object(properties)?;

    let bucket = props::get_string(object, "Bucket")?;
    let key = props::get_string(object, "Key")?;
    let body = resolve_body(object).await?;

    let mut request = PutObjectRequest {
        bucket,
        key,
        body,
        content_type: props::get_opt_string(object, "ContentType"),
        content_encoding: props::get_opt_string(object, "ContentEncoding"),
        cache_control: props::get_opt_string(object, "CacheControl"),
        storage_class: props::get_opt_string(object, "StorageClass"),
        ..Default::default()
    };

    if let Some(Value::Object(metadata)) = object.get("Metadata") {
        for (meta_key, meta_value) in metadata {
            if let Some(meta_value) = meta_value.as_str() {
                request
                    .metadata
                    .insert(meta_key.clone(), meta_value.to_string());
            }
        }
    }

    if let Some(Value::Array(tags)) = object.get("Tags") {
        for tag in tags {
            let Some(tag) = tag.as_object() else { continue };
            let key = tag.get("Key").and_then(Value::as_str).unwrap_or_default();
            if key.is_empty() {
                continue;
            }
            request.tags.push(Tag {
                key: key.to_string(),
                value: tag
                    .get("Value")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }

    Ok(request)
}

impl StorageObjectProvisioner {
    async fn create_with(
        &self,
        api: &dyn StorageApi,
        request: &CreateRequest,
    ) -> Result<CreateResult> {
        let put = put_request_from_properties(&request.properties).await?;
        api.put_object(&put).await?;

        Ok(CreateResult {
            progress: ProgressResult::new(Operation::Create, OperationStatus::Success)
                .with_native_id(build_native_id(&put.bucket, &put.key)),
        })
    }

    async fn update_with(
        &self,
        api: &dyn StorageApi,
        request: &UpdateRequest,
    ) -> Result<UpdateResult> {
        let put = put_request_from_properties(&request.desired_properties).await?;
        api.put_object(&put).await?;

        Ok(UpdateResult {
            progress: ProgressResult::new(Operation::Update, OperationStatus::Success)
                .with_native_id(build_native_id(&put.bucket, &put.key)),
        })
    }

    async fn delete_with(
        &self,
        api: &dyn StorageApi,
        request: &DeleteRequest,
    ) -> Result<DeleteResult> {
        let (bucket, key) = parse_native_id(&request.native_id)?;

        // The provider accepts deletes of nonexistent keys.
        api.delete_object(&bucket, &key).await?;

        Ok(DeleteResult {
            progress: ProgressResult::new(Operation::Delete, OperationStatus::Success)
                .with_native_id(request.native_id.clone()),
        })
    }

    async fn read_with(&self, api: &dyn StorageApi, request: &ReadRequest) -> Result<ReadResult> {
        let (bucket, key) = parse_native_id(&request.native_id)?;

        let head = match api.head_object(&bucket, &key).await {
            Ok(head) => head,
            Err(err) if err.is_not_found() => {
                return Ok(ReadResult::not_found(RESOURCE_TYPE));
            }
            Err(err) => return Err(err.into()),
        };

        let mut object = Map::new();
        object.insert("Bucket".to_string(), json!(bucket));
        object.insert("Key".to_string(), json!(key));

        if let Some(content_type) = head.content_type {
            object.insert("ContentType".to_string(), json!(content_type));
        }
        if let Some(content_encoding) = head.content_encoding {
            object.insert("ContentEncoding".to_string(), json!(content_encoding));
        }
        if let Some(cache_control) = head.cache_control {
            object.insert("CacheControl".to_string(), json!(cache_control));
        }
        if let Some(content_length) = head.content_length {
            object.insert("ContentLength".to_string(), json!(content_length));
        }
        if let Some(etag) = head.etag {
            object.insert("ETag".to_string(), json!(etag));
        }
        if let Some(storage_class) = head.storage_class {
            object.insert("StorageClass".to_string(), json!(storage_class));
        }
        if !head.metadata.is_empty() {
            object.insert("Metadata".to_string(), json!(head.metadata));
        }

        // Tagging is a separate call and best-effort.
        if let Ok(tags) = api.get_object_tags(&bucket, &key).await {
            if !tags.is_empty() {
                let tags: Vec<Value> = tags
                    .into_iter()
                    .map(|tag| json!({"Key": tag.key, "Value": tag.value}))
                    .collect();
                object.insert("Tags".to_string(), Value::Array(tags));
            }
        }

        Ok(ReadResult::found(RESOURCE_TYPE, Value::Object(object)))
    }

    async fn list_with(&self, api: &dyn StorageApi, request: &ListRequest) -> Result<ListResult> {
        let bucket = request
            .additional_properties
            .get("BucketName")
            .filter(|bucket| !bucket.is_empty())
            .ok_or_else(|| {
                ProvisionError::validation(
                    "BucketName must be provided in additional properties for listing objects",
                )
            })?;

        let page = api
            .list_objects(&ListObjectsRequest {
                bucket: bucket.clone(),
                max_keys: request.page_size,
                continuation_token: request.page_token.clone(),
            })
            .await?;

        let native_ids = page
            .keys
            .iter()
            .map(|key| build_native_id(bucket, key))
            .collect();

        let next_page_token = if page.is_truncated {
            page.next_continuation_token
        } else {
            None
        };

        Ok(ListResult {
            native_ids,
            next_page_token,
        })
    }
}

#[async_trait]
impl Provisioner for StorageObjectProvisioner {
    async fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        self.create_with(&self.api()?, request).await
    }

    async fn update(&self, request: &UpdateRequest) -> Result<UpdateResult> {
        self.update_with(&self.api()?, request).await
    }

    async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResult> {
        self.delete_with(&self.api()?, request).await
    }

    /// Storage operations are synchronous; there is never anything in
    /// flight to poll.
    async fn status(&self, request: &StatusRequest) -> Result<StatusResult> {
        Ok(StatusResult {
            progress: ProgressResult::new(Operation::CheckStatus, OperationStatus::Success)
                .with_native_id(request.native_id.clone()),
        })
    }

    async fn read(&self, request: &ReadRequest) -> Result<ReadResult> {
        self.read_with(&self.api()?, request).await
    }

    async fn list(&self, request: &ListRequest) -> Result<ListResult> {
        self.list_with(&self.api()?, request).await
    }
}
