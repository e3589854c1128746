//! Nimbus resource contract
//!
//! This crate defines the types exchanged between the orchestrator and the
//! provisioning plugin: the closed set of operations, operation statuses and
//! handler error codes, the six request/result pairs, and fallible accessors
//! over the untyped per-resource property documents.
//!
//! The plugin itself is stateless; everything here is created per call and
//! the provider remains the sole source of truth.

pub mod error;
pub mod operation;
pub mod props;
pub mod request;

// Re-exports
pub use error::ErrorCode;
pub use operation::{Operation, OperationStatus};
pub use props::{PropertyError, TAGS_FIELD};
pub use request::{
    CreateRequest, CreateResult, DeleteRequest, DeleteResult, ListRequest, ListResult,
    ProgressResult, ReadRequest, ReadResult, StatusRequest, StatusResult, UpdateRequest,
    UpdateResult,
};
