//! Tool Catalog Builder.
//!
//! Turns every discovered handler method into a [`Tool`] and assembles the
//! tools into an immutable [`Catalog`] snapshot.

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use super::model::{DEFAULT_RESPONSE_TYPE, OwnerRef, REQUEST_BODY_KEY, Tool};
use super::scanner::DiscoveredHandler;
use crate::domains::registry::{HandlerMethod, ParamKind, RegistryError, render_fields};

/// Build the tool record for one discovered handler.
///
/// Unreadable body metadata does not fail the build: the tool is emitted
/// with an empty parameter set instead.
pub fn build_tool(handler: &DiscoveredHandler<'_>) -> Tool {
    let method = handler.method;
    let name = method.display_name().unwrap_or(method.ident());

    let parameters = match extract_parameters(method) {
        Ok(parameters) => parameters,
        Err(e) => {
            warn!(
                component = %handler.component_id,
                method = %method.ident(),
                "Publishing tool without parameters: {}",
                e
            );
            BTreeMap::new()
        }
    };

    let returns = method.returns();
    let response_type = if returns.response_body {
        returns.type_name.clone()
    } else {
        DEFAULT_RESPONSE_TYPE.to_string()
    };

    Tool::new(
        name,
        format!("Automatically discovered tool for method: {}", method.ident()),
        parameters,
        response_type,
        OwnerRef {
            component_id: handler.component_id.to_string(),
            method: method.ident().to_string(),
        },
    )
}

fn extract_parameters(method: &HandlerMethod) -> Result<BTreeMap<String, String>, RegistryError> {
    let mut parameters = BTreeMap::new();

    for param in method.params() {
        match &param.kind {
            ParamKind::Query { key } => {
                parameters.insert(key.clone(), param.type_name.clone());
            }
            ParamKind::Path { key } => {
                let key = key.clone().unwrap_or_else(|| param.ident.clone());
                parameters.insert(key, param.type_name.clone());
            }
            ParamKind::Body { fields } => {
                let fields = fields()?;
                parameters.insert(REQUEST_BODY_KEY.to_string(), render_fields(&fields));
            }
            ParamKind::Unannotated => {
                debug!(method = %method.ident(), param = %param.ident, "Ignoring unannotated input");
            }
        }
    }

    Ok(parameters)
}

/// Immutable set of tools built from one registry generation.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    generation: u64,
    tools: Vec<Tool>,
}

impl Catalog {
    /// Build a catalog from scanned handlers.
    ///
    /// Tool names are unique: when two handlers resolve to the same name the
    /// first one discovered is kept.
    pub fn from_handlers(generation: u64, handlers: &[DiscoveredHandler<'_>]) -> Self {
        let mut seen = HashSet::new();
        let mut tools = Vec::with_capacity(handlers.len());

        for handler in handlers {
            let tool = build_tool(handler);
            if !seen.insert(tool.name.clone()) {
                warn!(
                    tool = %tool.name,
                    component = %handler.component_id,
                    "Duplicate tool name, keeping the first registration"
                );
                continue;
            }
            tools.push(tool);
        }

        debug!(generation, count = tools.len(), "Tool catalog built");
        Self { generation, tools }
    }

    /// Registry generation this catalog was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All tools, in discovery order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Find a tool by name.
    pub fn find(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::registry::{Component, HandlerRegistry};
    use crate::domains::tools::scanner::scan;
    use schemars::JsonSchema;
    use std::sync::Arc;

    struct ItemController;
    struct LegacyController;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct NewItem {
        a: i32,
        b: String,
    }

    fn catalog_for(components: Vec<Component>) -> Catalog {
        let registry = HandlerRegistry::new();
        for component in components {
            registry.register(component).unwrap();
        }
        let snapshot = registry.snapshot().unwrap();
        Catalog::from_handlers(snapshot.generation, &scan(&snapshot))
    }

    fn items() -> Component {
        Component::rest_controller("itemController", Arc::new(ItemController))
            .get("getItem", |m| {
                m.path::<u64>("id")
                    .query::<bool>("verbose")
                    .arg::<String>("locale")
                    .response_body::<String>()
            })
            .get("findItems", |m| {
                m.named("searchItems")
                    .path_as::<String>("category", "cat")
                    .query::<i64>("id")
            })
            .post("createItem", |m| m.body::<NewItem>("item").returns::<u64>())
            .put("resizeItem", |m| m.query::<u32>("size").body::<u32>("raw"))
            .build()
    }

    #[test]
    fn test_query_and_path_parameters() {
        let catalog = catalog_for(vec![items()]);

        let get = catalog.find("getItem").unwrap();
        assert_eq!(get.parameters.len(), 2);
        assert_eq!(get.parameters["id"], "u64");
        assert_eq!(get.parameters["verbose"], "bool");
        assert!(!get.parameters.contains_key("locale"));
        assert_eq!(get.response_type, "String");
        assert_eq!(
            get.description,
            "Automatically discovered tool for method: getItem"
        );
    }

    #[test]
    fn test_display_name_and_explicit_path_key() {
        let catalog = catalog_for(vec![items()]);

        assert!(catalog.find("findItems").is_none());
        let search = catalog.find("searchItems").unwrap();
        assert_eq!(search.parameters["cat"], "String");
        assert_eq!(search.parameters["id"], "i64");
        assert_eq!(search.owner().method, "findItems");
        assert_eq!(search.owner().component_id, "itemController");
        assert_eq!(
            search.description,
            "Automatically discovered tool for method: findItems"
        );
    }

    #[test]
    fn test_body_is_flattened() {
        let catalog = catalog_for(vec![items()]);

        let create = catalog.find("createItem").unwrap();
        assert_eq!(create.parameters.len(), 1);
        let body = &create.parameters[REQUEST_BODY_KEY];
        assert_eq!(body, "{a=i32, b=String}");
        assert_eq!(create.response_type, DEFAULT_RESPONSE_TYPE);
    }

    #[test]
    fn test_unreadable_body_degrades_to_empty_parameters() {
        let catalog = catalog_for(vec![items()]);

        let resize = catalog.find("resizeItem").unwrap();
        assert!(resize.parameters.is_empty());
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let legacy = Component::rest_controller("legacyController", Arc::new(LegacyController))
            .get("getItem", |m| m.query::<String>("sku"))
            .build();
        let catalog = catalog_for(vec![items(), legacy]);

        let names: Vec<_> = catalog.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.iter().filter(|n| **n == "getItem").count(), 1);
        assert_eq!(
            catalog.find("getItem").unwrap().owner().component_id,
            "itemController"
        );
    }

    #[test]
    fn test_generation_is_recorded() {
        let catalog = catalog_for(vec![items()]);
        assert_eq!(catalog.generation(), 1);
        assert!(!catalog.is_empty());
        assert!(Catalog::default().is_empty());
    }
}
