//! Greeting controller.
//!
//! A minimal controller: one argument-map handler and one echo handler.

use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::required_str;
use crate::domains::registry::{Component, ToolArguments};

/// Greets callers by name.
#[derive(Debug, Clone)]
pub struct GreetingController {
    salutation: String,
}

impl GreetingController {
    /// Component identifier in the registry.
    pub const COMPONENT_ID: &'static str = "greetingController";

    /// Create a controller using `salutation` as greeting word.
    pub fn new(salutation: impl Into<String>) -> Self {
        Self {
            salutation: salutation.into(),
        }
    }

    /// `GET /greet?name=...`
    #[instrument(skip_all)]
    pub fn greet(&self, args: &ToolArguments) -> anyhow::Result<Value> {
        let name = required_str(args, "name")?;
        info!("Greeting {}", name);
        Ok(json!(format!("{} {}", self.salutation, name)))
    }

    /// Registry declaration of this controller.
    pub fn component(self: Arc<Self>) -> Component {
        Component::rest_controller(Self::COMPONENT_ID, self)
            .get("greet", |m| {
                m.query::<String>("name")
                    .response_body::<String>()
                    .invoke(|this, args| async move { this.greet(&args) })
            })
            .post("echo", |m| {
                m.body::<ToolArguments>("payload")
                    .response_body::<ToolArguments>()
                    .invoke(|_this, args| async move { Ok(Value::Object(args)) })
            })
            .build()
    }
}

impl Default for GreetingController {
    fn default() -> Self {
        Self::new("hello")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greet() {
        let controller = GreetingController::default();
        let mut args = ToolArguments::new();
        args.insert("name".to_string(), json!("Ada"));
        assert_eq!(controller.greet(&args).unwrap(), json!("hello Ada"));
    }

    #[test]
    fn test_greet_requires_name() {
        let controller = GreetingController::new("hi");
        let err = controller.greet(&ToolArguments::new()).unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
