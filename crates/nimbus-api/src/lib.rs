//! Nimbus provider API clients
//!
//! Typed HTTP clients for the provider surfaces the plugin depends on: the
//! generic Resource Control API plus the native DNS, object-storage,
//! network, IAM, and secrets service APIs. Every client is fronted by an
//! async trait so the provisioning layer can run against in-memory fakes.
//!
//! All services speak JSON over HTTPS with bearer-token authentication and
//! a common `success`/`result`/`errors` response envelope.

pub mod classify;
pub mod config;
pub mod control;
pub mod dns;
pub mod error;
pub mod iam;
pub mod network;
pub mod retry;
pub mod secrets;
pub mod storage;

mod wire;

// Re-exports
pub use classify::classify_provider_code;
pub use config::{DEFAULT_ENDPOINT, ProviderConfig};
pub use control::{
    ControlApi, HttpControlApi, ListResourcesRequest, ProgressEvent, ResourceDescription,
    ResourceList,
};
pub use dns::{
    AliasTarget, ChangeAction, ChangeInfo, ChangeStatus, DnsApi, HttpDnsApi, RecordChange,
    RecordSet, RecordSetPage, RecordSetQuery,
};
pub use error::{ApiError, Result};
pub use iam::{HttpIamApi, IamApi, RolePolicyPage};
pub use network::{CreateRouteRequest, HttpNetworkApi, NetworkApi, Route, RouteTable};
pub use retry::RetryPolicy;
pub use secrets::{HttpSecretsApi, SecretValue, SecretsApi};
pub use storage::{
    HttpStorageApi, ListObjectsRequest, ObjectHead, ObjectPage, PutObjectRequest, StorageApi, Tag,
};
