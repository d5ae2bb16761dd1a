//! Tool records and tool requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use crate::domains::registry::ToolArguments;

/// Parameter key under which body-shaped inputs are published.
pub const REQUEST_BODY_KEY: &str = "requestBody";

/// Response type published when a method does not write its return value
/// directly as the body.
pub const DEFAULT_RESPONSE_TYPE: &str = "application/json";

/// The component and method a tool was derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OwnerRef {
    /// Registered component identifier.
    pub component_id: String,
    /// Method identifier on that component.
    pub method: String,
}

/// A discovered, invocable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique catalog key.
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// Parameter name -> declared type name.
    pub parameters: BTreeMap<String, String>,

    /// Declared response type, or [`DEFAULT_RESPONSE_TYPE`].
    pub response_type: String,

    #[serde(skip)]
    owner: OwnerRef,
}

impl Tool {
    /// Create a new tool record owned by `owner`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: BTreeMap<String, String>,
        response_type: impl Into<String>,
        owner: OwnerRef,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            response_type: response_type.into(),
            owner,
        }
    }

    /// Where this tool dispatches to.
    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    /// JSON schema object describing the parameters, for MCP listings.
    ///
    /// Only the JSON kind is inferred from the declared type name; the full
    /// type name is kept as the property description.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|(name, type_name)| {
                let mut property = Map::new();
                let kind = if name == REQUEST_BODY_KEY {
                    Some("object")
                } else {
                    json_kind(type_name)
                };
                if let Some(kind) = kind {
                    property.insert("type".to_string(), json!(kind));
                }
                property.insert("description".to_string(), json!(type_name));
                (name.clone(), Value::Object(property))
            })
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema
    }
}

fn json_kind(type_name: &str) -> Option<&'static str> {
    let inner = type_name
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(type_name);

    match inner {
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some("integer"),
        "f32" | "f64" => Some("number"),
        "bool" => Some("boolean"),
        "String" | "str" | "&str" | "char" => Some("string"),
        other if other.starts_with("Vec<") || other.starts_with('[') => Some("array"),
        other if other.starts_with("HashMap<") || other.starts_with("BTreeMap<") => {
            Some("object")
        }
        _ => None,
    }
}

/// Caller input for one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest {
    /// Name of the tool to execute.
    pub tool_name: String,

    /// Arguments passed to the tool.
    #[serde(default)]
    pub parameters: ToolArguments,
}

impl ToolRequest {
    /// Create a request for `tool_name` with the given arguments.
    pub fn new(tool_name: impl Into<String>, parameters: ToolArguments) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters,
        }
    }
}
