//! Provisioner registry
//!
//! Maps `(resource type, operation)` pairs to provisioner factories. The
//! registry is built once, explicitly, before any request is served
//! ([`Registry::builtin`] enumerates every specialized provisioner), then
//! treated as read-only — no locking, no registration at runtime.

use crate::provisioner::Provisioner;
use crate::provisioners::{
    dns_record, dns_record::RecordSetProvisioner, gateway_method,
    gateway_method::GatewayMethodProvisioner, role_policy, role_policy::RolePolicyProvisioner,
    route, route::RouteProvisioner, secret, secret::SecretProvisioner, storage_object,
    storage_object::StorageObjectProvisioner,
};
use nimbus_api::ProviderConfig;
use nimbus_resource::Operation;
use std::collections::HashMap;
use std::sync::Arc;

type Factory = Arc<dyn Fn(&ProviderConfig) -> Box<dyn Provisioner> + Send + Sync>;

#[derive(Default, Clone)]
pub struct Registry {
    entries: HashMap<(String, Operation), Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in provisioner, keyed by exactly the
    /// operations each one owns. Everything else falls through to the
    /// generic control-plane client.
    pub fn builtin() -> Self {
        use Operation::*;

        let mut registry = Registry::new();

        registry.register(
            dns_record::RESOURCE_TYPE,
            &[Create, Read, Update, Delete, CheckStatus, List],
            |cfg| Box::new(RecordSetProvisioner::new(cfg.clone())),
        );
        registry.register(
            storage_object::RESOURCE_TYPE,
            &[Create, Read, Update, Delete, CheckStatus, List],
            |cfg| Box::new(StorageObjectProvisioner::new(cfg.clone())),
        );
        registry.register(
            route::RESOURCE_TYPE,
            &[Create, Read, Update, Delete, CheckStatus],
            |cfg| Box::new(RouteProvisioner::new(cfg.clone())),
        );
        registry.register(role_policy::RESOURCE_TYPE, &[List], |cfg| {
            Box::new(RolePolicyProvisioner::new(cfg.clone()))
        });
        registry.register(
            secret::RESOURCE_TYPE,
            &[Create, Read, Update, Delete, CheckStatus],
            |cfg| Box::new(SecretProvisioner::new(cfg.clone())),
        );
        registry.register(
            gateway_method::RESOURCE_TYPE,
            &[Create, Read, Update, Delete],
            |cfg| Box::new(GatewayMethodProvisioner::new(cfg.clone())),
        );

        registry
    }

    /// Records a factory for each listed operation. Re-registering a pair
    /// overwrites the previous factory (last writer wins) — registration
    /// happens once at startup from a fixed set of constructors.
    pub fn register<F>(&mut self, resource_type: &str, operations: &[Operation], factory: F)
    where
        F: Fn(&ProviderConfig) -> Box<dyn Provisioner> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(factory);
        for operation in operations {
            self.entries
                .insert((resource_type.to_string(), *operation), factory.clone());
        }
    }

    /// Pure existence check used to decide between specialized dispatch
    /// and the generic fallback.
    pub fn has_provisioner(&self, resource_type: &str, operation: Operation) -> bool {
        self.entries
            .contains_key(&(resource_type.to_string(), operation))
    }

    /// A provisioner bound to the target configuration, or `None` when no
    /// specialization exists. A miss after a positive `has_provisioner`
    /// check is a programming error; it is logged and surfaces as `None`.
    pub fn get(
        &self,
        resource_type: &str,
        operation: Operation,
        cfg: &ProviderConfig,
    ) -> Option<Box<dyn Provisioner>> {
        match self.entries.get(&(resource_type.to_string(), operation)) {
            Some(factory) => Some(factory(cfg)),
            None => {
                tracing::error!(
                    resource_type,
                    %operation,
                    registered = ?self.resource_types(),
                    "provisioner not found in registry"
                );
                None
            }
        }
    }

    /// Registered resource types, deduplicated and sorted.
    pub fn resource_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.entries.keys().map(|(t, _)| t.clone()).collect();
        types.sort();
        types.dedup();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registers_role_policy_for_list_only() {
        let registry = Registry::builtin();

        assert!(registry.has_provisioner(role_policy::RESOURCE_TYPE, Operation::List));
        for operation in [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
            Operation::CheckStatus,
        ] {
            assert!(
                !registry.has_provisioner(role_policy::RESOURCE_TYPE, operation),
                "{operation} should fall through to the control plane"
            );
        }
    }

    #[test]
    fn builtin_covers_record_sets_for_all_operations() {
        let registry = Registry::builtin();
        for operation in [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
            Operation::CheckStatus,
            Operation::List,
        ] {
            assert!(registry.has_provisioner(dns_record::RESOURCE_TYPE, operation));
        }
    }

    #[test]
    fn unknown_types_have_no_provisioner() {
        let registry = Registry::builtin();
        assert!(!registry.has_provisioner("Nimbus::Compute::Instance", Operation::Create));
        assert!(
            registry
                .get(
                    "Nimbus::Compute::Instance",
                    Operation::Create,
                    &ProviderConfig::default()
                )
                .is_none()
        );
    }

    #[test]
    fn registration_is_last_writer_wins() {
        let mut registry = Registry::builtin();
        // Re-register the route type for List as well; the pair must exist
        // afterwards without disturbing the rest.
        registry.register(route::RESOURCE_TYPE, &[Operation::List], |cfg| {
            Box::new(RouteProvisioner::new(cfg.clone()))
        });

        assert!(registry.has_provisioner(route::RESOURCE_TYPE, Operation::List));
        assert!(registry.has_provisioner(route::RESOURCE_TYPE, Operation::Create));
    }
}
