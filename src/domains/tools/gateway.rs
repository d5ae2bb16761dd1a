//! Dispatch Gateway - single entry point for listing and executing tools.
//!
//! The catalog is cached per registry generation: every registration or
//! deregistration is visible on the next call, and reads in between share
//! one immutable catalog.

use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, instrument, warn};

use super::catalog::Catalog;
use super::endpoint::GatewayEndpoint;
use super::error::{ExecutionCause, GatewayError};
use super::model::{Tool, ToolRequest};
use super::scanner::scan;
use crate::domains::registry::HandlerRegistry;

/// Resolves tool names to registered handlers and invokes them.
pub struct ToolGateway {
    registry: Arc<HandlerRegistry>,
    endpoint: Arc<GatewayEndpoint>,
    denied_names: [String; 2],
    catalog: RwLock<Option<Arc<Catalog>>>,
}

impl ToolGateway {
    /// Create a gateway over `registry` and register its endpoint there.
    pub fn new(
        registry: Arc<HandlerRegistry>,
        endpoint: GatewayEndpoint,
    ) -> Result<Self, GatewayError> {
        let endpoint = Arc::new(endpoint);
        registry.register(endpoint.component())?;

        info!(
            tools = %endpoint.tools_path(),
            execute = %endpoint.execute_path(),
            "Tool gateway initialized"
        );

        Ok(Self {
            registry,
            denied_names: [
                GatewayEndpoint::type_name(),
                GatewayEndpoint::COMPONENT_ID.to_string(),
            ],
            endpoint,
            catalog: RwLock::new(None),
        })
    }

    /// The gateway's control endpoint.
    pub fn endpoint(&self) -> &GatewayEndpoint {
        &self.endpoint
    }

    /// The handler registry this gateway reads from.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// List every tool currently available.
    #[instrument(skip(self))]
    pub fn list_tools(&self) -> Result<Vec<Tool>, GatewayError> {
        let catalog = self.catalog()?;
        debug!(count = catalog.len(), "Listing tools");
        Ok(catalog.tools().to_vec())
    }

    /// Execute the tool named in `request` with its parameters.
    ///
    /// The handler's value is returned unmodified. Every failure after the
    /// tool was found is reported as [`GatewayError::ToolExecution`].
    #[instrument(skip_all, fields(tool = %request.tool_name))]
    pub async fn execute_tool(&self, request: ToolRequest) -> Result<Value, GatewayError> {
        let ToolRequest {
            tool_name,
            parameters,
        } = request;

        if self.is_self(&tool_name) {
            warn!("Attempt to execute the gateway endpoint is not allowed");
            return Err(GatewayError::self_invocation(tool_name));
        }

        let owner = {
            let catalog = self.catalog()?;
            match catalog.find(&tool_name) {
                Some(tool) => tool.owner().clone(),
                None => {
                    warn!("Unknown tool requested");
                    return Err(GatewayError::not_found(tool_name));
                }
            }
        };

        let component = self
            .registry
            .component(&owner.component_id)?
            .ok_or_else(|| {
                GatewayError::execution(
                    &tool_name,
                    ExecutionCause::ComponentNotRegistered(owner.component_id.clone()),
                )
            })?;

        let not_invocable = || {
            GatewayError::execution(
                &tool_name,
                ExecutionCause::NotInvocable {
                    component: owner.component_id.clone(),
                    method: owner.method.clone(),
                },
            )
        };
        let method = component
            .invocable_method(&owner.method)
            .ok_or_else(not_invocable)?;

        debug!(component = %owner.component_id, method = %owner.method, "Invoking handler");

        let started = std::panic::catch_unwind(AssertUnwindSafe(|| method.invoke(parameters)))
            .map_err(|panic| {
                GatewayError::execution(&tool_name, ExecutionCause::Panicked(panic_message(panic)))
            })?;
        let future = started.ok_or_else(not_invocable)?;

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(value)) => {
                info!("Tool executed");
                Ok(value)
            }
            Ok(Err(e)) => {
                warn!("Tool failed: {:#}", e);
                Err(GatewayError::execution(tool_name, e))
            }
            Err(panic) => {
                let message = panic_message(panic);
                warn!("Tool panicked: {}", message);
                Err(GatewayError::execution(
                    tool_name,
                    ExecutionCause::Panicked(message),
                ))
            }
        }
    }

    /// Whether `name` designates the gateway's own control surface.
    pub fn is_self(&self, name: &str) -> bool {
        self.denied_names.iter().any(|denied| denied == name)
    }

    fn catalog(&self) -> Result<Arc<Catalog>, GatewayError> {
        let generation = self.registry.generation()?;

        {
            let cached = self
                .catalog
                .read()
                .map_err(|e| GatewayError::DiscoveryFailure(e.to_string()))?;
            if let Some(catalog) = cached.as_ref().filter(|c| c.generation() == generation) {
                return Ok(Arc::clone(catalog));
            }
        }

        let snapshot = self.registry.snapshot()?;
        let catalog = Arc::new(Catalog::from_handlers(
            snapshot.generation,
            &scan(&snapshot),
        ));

        let mut cached = self
            .catalog
            .write()
            .map_err(|e| GatewayError::DiscoveryFailure(e.to_string()))?;
        let newer_cached = cached
            .as_ref()
            .is_some_and(|c| c.generation() > catalog.generation());
        if !newer_cached {
            *cached = Some(Arc::clone(&catalog));
        }

        Ok(catalog)
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::registry::{Component, HandlerResult, ToolArguments};
    use futures::future::BoxFuture;
    use serde_json::json;

    struct GreetingController;
    struct FailingController;

    #[derive(Debug, thiserror::Error)]
    #[error("inventory unavailable")]
    struct InventoryDown;

    fn greeting() -> Component {
        Component::rest_controller("greetingController", Arc::new(GreetingController))
            .get("greet", |m| {
                m.query::<String>("name")
                    .response_body::<String>()
                    .invoke(|_this, args| async move {
                        let name = args.get("name").and_then(Value::as_str).unwrap_or("");
                        Ok(json!(format!("hello {}", name)))
                    })
            })
            .get("profile", |m| m.path::<u64>("id"))
            .build()
    }

    fn failing() -> Component {
        Component::rest_controller("failingController", Arc::new(FailingController))
            .post("reserve", |m| {
                m.invoke(|_this, _args| async move { Err(InventoryDown.into()) })
            })
            .post("explodeEarly", |m| {
                m.invoke(|_this, _args| -> BoxFuture<'static, HandlerResult> {
                    panic!("explode before future");
                })
            })
            .post("explode", |m| {
                m.invoke(|_this, _args| async move {
                    if true {
                        panic!("explode handler");
                    }
                    Ok(Value::Null)
                })
            })
            .build()
    }

    fn gateway(components: Vec<Component>) -> ToolGateway {
        let registry = Arc::new(HandlerRegistry::new());
        for component in components {
            registry.register(component).unwrap();
        }
        ToolGateway::new(registry, GatewayEndpoint::new("/mcp")).unwrap()
    }

    fn args(value: Value) -> ToolArguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_gateway_never_lists_itself() {
        let gateway = gateway(vec![greeting()]);
        let tools = gateway.list_tools().unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["greet", "profile"]);
        for denied in ["GatewayEndpoint", "gatewayEndpoint", "listTools", "executeTool"] {
            assert!(!names.contains(&denied));
        }
        assert!(gateway.registry().component("gatewayEndpoint").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_successful_dispatch() {
        let gateway = gateway(vec![greeting()]);
        let result = gateway
            .execute_tool(ToolRequest::new("greet", args(json!({"name": "Ada"}))))
            .await
            .unwrap();
        assert_eq!(result, json!("hello Ada"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_rejected() {
        let gateway = gateway(vec![greeting()]);
        let err = gateway
            .execute_tool(ToolRequest::new("doesNotExist", ToolArguments::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ToolNotFound(ref name) if name == "doesNotExist"));
    }

    #[tokio::test]
    async fn test_self_invocation_is_rejected() {
        let gateway = gateway(vec![greeting()]);
        for name in ["GatewayEndpoint", "gatewayEndpoint"] {
            let err = gateway
                .execute_tool(ToolRequest::new(name, ToolArguments::new()))
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::SelfInvocationDenied(_)));
        }
    }

    #[tokio::test]
    async fn test_handler_error_is_wrapped() {
        let gateway = gateway(vec![failing()]);
        let err = gateway
            .execute_tool(ToolRequest::new("reserve", ToolArguments::new()))
            .await
            .unwrap_err();

        match err {
            GatewayError::ToolExecution {
                tool,
                cause: ExecutionCause::Handler(cause),
            } => {
                assert_eq!(tool, "reserve");
                assert!(cause.downcast_ref::<InventoryDown>().is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_panic_is_wrapped() {
        let gateway = gateway(vec![failing()]);
        let err = gateway
            .execute_tool(ToolRequest::new("explode", ToolArguments::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ToolExecution { cause: ExecutionCause::Panicked(ref msg), .. }
                if msg == "explode handler"
        ));
    }

    #[tokio::test]
    async fn test_handler_panic_before_future_is_wrapped() {
        let gateway = gateway(vec![failing()]);
        let err = gateway
            .execute_tool(ToolRequest::new("explodeEarly", ToolArguments::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ToolExecution { ref tool, cause: ExecutionCause::Panicked(ref msg) }
                if tool == "explodeEarly" && msg == "explode before future"
        ));
    }

    #[tokio::test]
    async fn test_method_without_argument_map_is_not_invocable() {
        let gateway = gateway(vec![greeting()]);
        let err = gateway
            .execute_tool(ToolRequest::new("profile", ToolArguments::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ToolExecution { cause: ExecutionCause::NotInvocable { .. }, .. }
        ));
    }

    #[tokio::test]
    async fn test_registration_changes_are_visible_immediately() {
        let gateway = gateway(vec![]);
        assert!(gateway.list_tools().unwrap().is_empty());

        gateway.registry().register(greeting()).unwrap();
        assert_eq!(gateway.list_tools().unwrap().len(), 2);
        let result = gateway
            .execute_tool(ToolRequest::new("greet", args(json!({"name": "Grace"}))))
            .await
            .unwrap();
        assert_eq!(result, json!("hello Grace"));

        gateway.registry().deregister("greetingController").unwrap();
        let err = gateway
            .execute_tool(ToolRequest::new("greet", ToolArguments::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ToolNotFound(_)));
    }

    #[test]
    fn test_catalog_is_reused_between_changes() {
        let gateway = gateway(vec![greeting()]);
        let first = gateway.catalog().unwrap();
        let second = gateway.catalog().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        gateway.registry().register(failing()).unwrap();
        let third = gateway.catalog().unwrap();
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third.len(), 5);
    }
}
