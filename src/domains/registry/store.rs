//! Handler Registry - the host application's live component table.
//!
//! Components are added and removed with explicit registration calls. Every
//! change bumps a generation counter so that readers holding a derived view
//! (the tool catalog) can tell when it went stale.

use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use super::component::Component;
use super::error::RegistryError;

/// Point-in-time view of the registered components.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    /// Generation the snapshot was taken at.
    pub generation: u64,
    /// Components in registration order.
    pub components: Vec<Arc<Component>>,
}

#[derive(Debug, Default)]
struct RegistryState {
    generation: u64,
    components: Vec<Arc<Component>>,
}

/// Concurrency-safe table of registered components.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    state: RwLock<RegistryState>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component.
    ///
    /// A component already registered under the same id is replaced in
    /// place. Returns `true` when a replacement happened.
    pub fn register(&self, component: Component) -> Result<bool, RegistryError> {
        if component.id().trim().is_empty() {
            return Err(RegistryError::invalid_component(
                "component id must not be empty",
            ));
        }

        let mut state = self
            .state
            .write()
            .map_err(|e| RegistryError::unavailable(e.to_string()))?;

        let id = component.id().to_string();
        let component = Arc::new(component);
        let replaced = match state.components.iter().position(|c| c.id() == id) {
            Some(index) => {
                state.components[index] = component;
                true
            }
            None => {
                state.components.push(component);
                false
            }
        };
        state.generation += 1;

        info!(
            component = %id,
            replaced,
            generation = state.generation,
            "Registered component"
        );
        Ok(replaced)
    }

    /// Remove the component registered under `id`.
    ///
    /// Returns `true` when a component was removed.
    pub fn deregister(&self, id: &str) -> Result<bool, RegistryError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| RegistryError::unavailable(e.to_string()))?;

        let before = state.components.len();
        state.components.retain(|c| c.id() != id);
        let removed = state.components.len() != before;
        if removed {
            state.generation += 1;
            info!(component = %id, generation = state.generation, "Deregistered component");
        } else {
            debug!(component = %id, "Deregister requested for unknown component");
        }
        Ok(removed)
    }

    /// Resolve a component by id.
    pub fn component(&self, id: &str) -> Result<Option<Arc<Component>>, RegistryError> {
        let state = self
            .state
            .read()
            .map_err(|e| RegistryError::unavailable(e.to_string()))?;
        Ok(state.components.iter().find(|c| c.id() == id).cloned())
    }

    /// Current generation.
    pub fn generation(&self) -> Result<u64, RegistryError> {
        let state = self
            .state
            .read()
            .map_err(|e| RegistryError::unavailable(e.to_string()))?;
        Ok(state.generation)
    }

    /// Take a consistent snapshot of all components.
    pub fn snapshot(&self) -> Result<RegistrySnapshot, RegistryError> {
        let state = self
            .state
            .read()
            .map_err(|e| RegistryError::unavailable(e.to_string()))?;
        Ok(RegistrySnapshot {
            generation: state.generation,
            components: state.components.clone(),
        })
    }

    /// Number of registered components.
    pub fn len(&self) -> Result<usize, RegistryError> {
        let state = self
            .state
            .read()
            .map_err(|e| RegistryError::unavailable(e.to_string()))?;
        Ok(state.components.len())
    }

    /// Whether no component is registered.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    fn alpha(id: &str) -> Component {
        Component::rest_controller(id, Arc::new(Alpha))
            .get("ping", |m| m)
            .build()
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty().unwrap());

        assert!(!registry.register(alpha("alpha")).unwrap());
        assert_eq!(registry.len().unwrap(), 1);

        let found = registry.component("alpha").unwrap().unwrap();
        assert!(found.is::<Alpha>());
        assert!(registry.component("missing").unwrap().is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let registry = HandlerRegistry::new();
        registry.register(alpha("shared")).unwrap();

        let replacement = Component::rest_controller("shared", Arc::new(Beta)).build();
        assert!(registry.register(replacement).unwrap());

        assert_eq!(registry.len().unwrap(), 1);
        assert!(registry.component("shared").unwrap().unwrap().is::<Beta>());
    }

    #[test]
    fn test_generation_tracks_changes() {
        let registry = HandlerRegistry::new();
        assert_eq!(registry.generation().unwrap(), 0);

        registry.register(alpha("a")).unwrap();
        registry.register(alpha("b")).unwrap();
        assert_eq!(registry.generation().unwrap(), 2);

        assert!(!registry.deregister("unknown").unwrap());
        assert_eq!(registry.generation().unwrap(), 2);

        assert!(registry.deregister("a").unwrap());
        assert_eq!(registry.generation().unwrap(), 3);
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let registry = HandlerRegistry::new();
        for id in ["c", "a", "b"] {
            registry.register(alpha(id)).unwrap();
        }

        let snapshot = registry.snapshot().unwrap();
        let ids: Vec<_> = snapshot.components.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(snapshot.generation, 3);
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let registry = HandlerRegistry::new();
        let result = registry.register(alpha("  "));
        assert!(matches!(result, Err(RegistryError::InvalidComponent(_))));
        assert_eq!(registry.generation().unwrap(), 0);
    }

    #[test]
    fn test_poisoned_registry_is_unavailable() {
        let registry = Arc::new(HandlerRegistry::new());
        let poisoner = Arc::clone(&registry);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.write().unwrap();
            panic!("poison the registry lock");
        })
        .join();

        assert!(matches!(
            registry.snapshot(),
            Err(RegistryError::Unavailable(_))
        ));
        assert!(matches!(registry.len(), Err(RegistryError::Unavailable(_))));
        assert!(registry.is_empty().is_err());
    }
}
