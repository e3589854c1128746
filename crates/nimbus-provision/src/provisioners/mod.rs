//! Specialized provisioners
//!
//! One module per resource type whose behavior the generic control plane
//! cannot express. Each module exposes its `RESOURCE_TYPE` constant and a
//! provisioner registered by [`crate::registry::Registry::builtin`].

pub mod dns_record;
pub mod gateway_method;
pub mod role_policy;
pub mod route;
pub mod secret;
pub mod storage_object;
