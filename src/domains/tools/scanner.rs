//! Handler Registry Scanner.
//!
//! Walks a registry snapshot and yields every request-mapped method of every
//! request-handler component, except the gateway's own endpoint.

use tracing::debug;

use super::endpoint::GatewayEndpoint;
use crate::domains::registry::{HandlerMethod, RegistrySnapshot};

/// A request-mapped method found during a scan.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveredHandler<'a> {
    /// Identifier of the owning component.
    pub component_id: &'a str,
    /// The mapped method.
    pub method: &'a HandlerMethod,
}

/// Collect all tool candidates from `snapshot`, in registration order.
pub fn scan(snapshot: &RegistrySnapshot) -> Vec<DiscoveredHandler<'_>> {
    debug!(
        generation = snapshot.generation,
        components = snapshot.components.len(),
        "Scanning handler registry"
    );

    let mut handlers = Vec::new();
    for component in &snapshot.components {
        if !component.is_request_handler() {
            continue;
        }

        // Identity check, so renaming the endpoint cannot leak it.
        if component.is::<GatewayEndpoint>() {
            debug!(component = %component.id(), "Skipping gateway endpoint");
            continue;
        }

        debug!(component = %component.id(), kind = %component.type_name(), "Processing component");
        for method in component.methods() {
            if method.mapping().is_none() {
                continue;
            }
            debug!(component = %component.id(), method = %method.ident(), "Discovered handler method");
            handlers.push(DiscoveredHandler {
                component_id: component.id(),
                method,
            });
        }
    }

    debug!(count = handlers.len(), "Scan completed");
    handlers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::registry::{Component, HandlerRegistry};
    use std::sync::Arc;

    struct OrderController;
    struct AuditService;

    fn registry() -> HandlerRegistry {
        let registry = HandlerRegistry::new();
        registry
            .register(
                Component::rest_controller("orderController", Arc::new(OrderController))
                    .get("listOrders", |m| m)
                    .post("createOrder", |m| m)
                    .method("validate", |m| m)
                    .build(),
            )
            .unwrap();
        registry
            .register(
                Component::service("auditService", Arc::new(AuditService))
                    .get("audit", |m| m)
                    .build(),
            )
            .unwrap();
        registry
    }

    fn idents(snapshot: &RegistrySnapshot) -> Vec<String> {
        scan(snapshot)
            .iter()
            .map(|h| format!("{}.{}", h.component_id, h.method.ident()))
            .collect()
    }

    #[test]
    fn test_only_mapped_methods_of_controllers() {
        let snapshot = registry().snapshot().unwrap();
        assert_eq!(
            idents(&snapshot),
            vec!["orderController.listOrders", "orderController.createOrder"]
        );
    }

    #[test]
    fn test_endpoint_is_excluded_by_type() {
        let registry = registry();
        let endpoint = Arc::new(GatewayEndpoint::new("/mcp"));
        registry.register(endpoint.component()).unwrap();

        // Same endpoint under a different id is still recognized.
        let renamed = Component::rest_controller("renamedEndpoint", Arc::clone(&endpoint))
            .get("listTools", |m| m)
            .build();
        registry.register(renamed).unwrap();

        let found = idents(&registry.snapshot().unwrap());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|id| !id.contains("listTools")));
    }

    #[test]
    fn test_empty_registry() {
        let snapshot = HandlerRegistry::new().snapshot().unwrap();
        assert!(scan(&snapshot).is_empty());
    }
}
