//! Body field introspection.
//!
//! Body-shaped inputs declare their fields through `schemars::JsonSchema`.
//! Only the top level of the generated schema is read; nested object graphs
//! show up as the referenced type's name.

use schemars::JsonSchema;
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::RegistryError;
use super::type_name::simple_type_name;

/// Field name -> simple type name, ordered by field name.
pub type BodyFields = BTreeMap<String, String>;

/// Resolver stored on a declared body input, run when the catalog is built.
pub type BodyFieldsFn = fn() -> Result<BodyFields, RegistryError>;

/// Read the top-level fields of `B` from its JSON schema.
pub fn body_fields<B: JsonSchema>() -> Result<BodyFields, RegistryError> {
    let schema = schemars::schema_for!(B);
    let value = serde_json::to_value(&schema)
        .map_err(|e| RegistryError::introspection(simple_type_name::<B>(), e.to_string()))?;
    fields_from_schema(&simple_type_name::<B>(), &value)
}

/// Extract the field map from an object schema.
pub fn fields_from_schema(type_name: &str, schema: &Value) -> Result<BodyFields, RegistryError> {
    let properties = match schema.get("properties") {
        Some(Value::Object(properties)) => properties,
        Some(_) => {
            return Err(RegistryError::introspection(
                type_name,
                "schema properties are not an object",
            ));
        }
        None if is_object_schema(schema) => return Ok(BodyFields::new()),
        None => {
            return Err(RegistryError::introspection(
                type_name,
                "body type does not declare named fields",
            ));
        }
    };

    Ok(properties
        .iter()
        .map(|(field, field_schema)| (field.clone(), schema_type_name(field_schema)))
        .collect())
}

/// Render a field map the way it is published under `requestBody`.
pub fn render_fields(fields: &BodyFields) -> String {
    let entries: Vec<String> = fields
        .iter()
        .map(|(name, ty)| format!("{}={}", name, ty))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn is_object_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("object")
}

/// Best-effort simple type name for a single property schema.
fn schema_type_name(schema: &Value) -> String {
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        return reference.rsplit('/').next().unwrap_or(reference).to_string();
    }

    // Option<Struct> is emitted as anyOf [{ $ref }, { type: null }]
    if let Some(Value::Array(variants)) = schema.get("anyOf").or_else(|| schema.get("oneOf")) {
        let non_null: Vec<&Value> = variants
            .iter()
            .filter(|v| v.get("type").and_then(Value::as_str) != Some("null"))
            .collect();
        let inner = match non_null.as_slice() {
            [single] => schema_type_name(single),
            _ => "Value".to_string(),
        };
        return if non_null.len() < variants.len() {
            format!("Option<{}>", inner)
        } else {
            inner
        };
    }

    let (primary, nullable) = match schema.get("type") {
        Some(Value::String(ty)) => (Some(ty.as_str()), false),
        Some(Value::Array(types)) => {
            let primary = types
                .iter()
                .filter_map(Value::as_str)
                .find(|ty| *ty != "null");
            let nullable = types.iter().any(|ty| ty.as_str() == Some("null"));
            (primary, nullable)
        }
        _ => (None, false),
    };

    let base = match (primary, schema.get("format").and_then(Value::as_str)) {
        (Some("integer") | Some("number"), Some(format)) => numeric_format_name(format),
        (Some("integer"), None) => "i64".to_string(),
        (Some("number"), None) => "f64".to_string(),
        (Some("string"), _) => "String".to_string(),
        (Some("boolean"), _) => "bool".to_string(),
        (Some("array"), _) => match schema.get("items") {
            Some(items) => format!("Vec<{}>", schema_type_name(items)),
            None => "Vec<Value>".to_string(),
        },
        (Some("object"), _) => "Map".to_string(),
        (Some("null"), _) => "()".to_string(),
        _ => "Value".to_string(),
    };

    if nullable {
        format!("Option<{}>", base)
    } else {
        base
    }
}

fn numeric_format_name(format: &str) -> String {
    match format {
        "int8" => "i8",
        "int16" => "i16",
        "int32" => "i32",
        "int64" => "i64",
        "int" => "isize",
        "uint8" => "u8",
        "uint16" => "u16",
        "uint32" => "u32",
        "uint64" => "u64",
        "uint" => "usize",
        "float" => "f32",
        "double" => "f64",
        other => other,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Pair {
        a: i32,
        b: String,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Address {
        city: String,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Customer {
        name: String,
        nickname: Option<String>,
        tags: Vec<String>,
        address: Address,
        active: bool,
    }

    #[test]
    fn test_flat_body_fields() {
        let fields = body_fields::<Pair>().unwrap();
        assert_eq!(fields.get("a").map(String::as_str), Some("i32"));
        assert_eq!(fields.get("b").map(String::as_str), Some("String"));
        assert_eq!(render_fields(&fields), "{a=i32, b=String}");
    }

    #[test]
    fn test_nested_body_is_not_expanded() {
        let fields = body_fields::<Customer>().unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields["address"], "Address");
        assert_eq!(fields["nickname"], "Option<String>");
        assert_eq!(fields["tags"], "Vec<String>");
        assert_eq!(fields["active"], "bool");
    }

    #[test]
    fn test_primitive_body_is_rejected() {
        let err = body_fields::<u32>().unwrap_err();
        assert!(err.to_string().contains("u32"));
    }

    #[test]
    fn test_empty_object_schema() {
        let fields = fields_from_schema("Empty", &json!({ "type": "object" })).unwrap();
        assert!(fields.is_empty());
        assert_eq!(render_fields(&fields), "{}");
    }

    #[test]
    fn test_optional_reference() {
        let schema = json!({
            "type": "object",
            "properties": {
                "billing": { "anyOf": [{ "$ref": "#/$defs/Address" }, { "type": "null" }] }
            }
        });
        let fields = fields_from_schema("Order", &schema).unwrap();
        assert_eq!(fields["billing"], "Option<Address>");
    }
}
