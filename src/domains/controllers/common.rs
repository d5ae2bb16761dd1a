//! Argument helpers shared by the demo controllers.

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domains::registry::ToolArguments;
use crate::domains::tools::REQUEST_BODY_KEY;

/// Read a required string argument.
pub fn required_str<'a>(args: &'a ToolArguments, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Missing or invalid '{}' parameter", key))
}

/// Read a required unsigned integer argument, accepting numeric strings.
pub fn required_u64(args: &ToolArguments, key: &str) -> Result<u64> {
    match args.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| anyhow!("Parameter '{}' must be a non-negative integer", key)),
        Some(Value::String(s)) => s
            .parse()
            .with_context(|| format!("Parameter '{}' must be a non-negative integer", key)),
        _ => Err(anyhow!("Missing or invalid '{}' parameter", key)),
    }
}

/// Read an optional boolean argument.
pub fn optional_bool(args: &ToolArguments, key: &str) -> Option<bool> {
    match args.get(key) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

/// Deserialize the request body.
///
/// Callers may nest the body under `requestBody`, as published in the tool
/// listing, or pass its fields at the top level.
pub fn body<T: DeserializeOwned>(args: &ToolArguments) -> Result<T> {
    let value = match args.get(REQUEST_BODY_KEY) {
        Some(body @ Value::Object(_)) => body.clone(),
        _ => Value::Object(args.clone()),
    };
    serde_json::from_value(value).context("Invalid request body")
}
