//! Translation of MCP tool descriptors into Gemini function declarations.
//!
//! Gemini's `functionDeclarations` accept an OpenAPI-flavoured schema whose
//! `type` values are upper-case (`STRING`, `OBJECT`, ...). MCP servers emit
//! plain JSON Schema with lower-case types, so every schema node reachable
//! through `properties` and `items` has its `type` upper-cased. All other
//! keys are copied through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::tool::ToolDescriptor;

/// Tool declaration in the shape Gemini expects inside `functionDeclarations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Build the model-facing declaration for a descriptor.
///
/// The descriptor is borrowed; its schema is copied, never modified.
pub fn to_function_declaration(tool: &ToolDescriptor) -> FunctionDeclaration {
    FunctionDeclaration {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: normalize_schema(&tool.input_schema),
    }
}

/// Recursively copy a schema, upper-casing `type` on every schema node.
///
/// Non-object values are returned as-is. Applying this twice yields the same
/// result as applying it once.
pub fn normalize_schema(schema: &Value) -> Value {
    let Value::Object(node) = schema else {
        return schema.clone();
    };

    let mut out = Map::with_capacity(node.len());
    for (key, value) in node {
        let converted = match (key.as_str(), value) {
            ("type", Value::String(t)) => Value::String(t.to_uppercase()),
            ("properties", Value::Object(props)) => Value::Object(
                props
                    .iter()
                    .map(|(name, sub)| (name.clone(), normalize_schema(sub)))
                    .collect(),
            ),
            ("items", Value::Object(_)) => normalize_schema(value),
            // Tuple-style `items: [schema, ...]`.
            ("items", Value::Array(list)) => {
                Value::Array(list.iter().map(normalize_schema).collect())
            }
            _ => value.clone(),
        };
        out.insert(key.clone(), converted);
    }
    Value::Object(out)
}

/// Number of schema nodes reached through `properties` and `items`.
///
/// Used to check that translation preserves the tree shape.
pub fn count_nested_nodes(schema: &Value) -> usize {
    let Value::Object(node) = schema else {
        return 0;
    };
    let mut count = 0;
    if let Some(Value::Object(props)) = node.get("properties") {
        for sub in props.values() {
            count += 1 + count_nested_nodes(sub);
        }
    }
    match node.get("items") {
        Some(item @ Value::Object(_)) => count += 1 + count_nested_nodes(item),
        Some(Value::Array(list)) => {
            for item in list {
                count += 1 + count_nested_nodes(item);
            }
        }
        _ => {}
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "size": { "type": "string", "description": "Potato size (S, M or L)" },
                "crates": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "label": { "type": "string" },
                            "weights": { "type": "array", "items": { "type": "number" } }
                        }
                    }
                },
                "pair": { "type": "array", "items": [{ "type": "integer" }, { "type": "boolean" }] }
            },
            "required": ["size"],
            "additionalProperties": false
        })
    }

    #[test]
    fn test_types_are_uppercased_at_every_depth() {
        let out = normalize_schema(&nested_schema());
        assert_eq!(out["type"], "OBJECT");
        assert_eq!(out["properties"]["size"]["type"], "STRING");
        assert_eq!(out["properties"]["crates"]["type"], "ARRAY");
        assert_eq!(out["properties"]["crates"]["items"]["type"], "OBJECT");
        assert_eq!(
            out["properties"]["crates"]["items"]["properties"]["weights"]["items"]["type"],
            "NUMBER"
        );
        assert_eq!(out["properties"]["pair"]["items"][1]["type"], "BOOLEAN");
    }

    #[test]
    fn test_other_keys_are_untouched() {
        let out = normalize_schema(&nested_schema());
        assert_eq!(out["required"], json!(["size"]));
        assert_eq!(out["additionalProperties"], json!(false));
        assert_eq!(
            out["properties"]["size"]["description"],
            "Potato size (S, M or L)"
        );
    }

    #[test]
    fn test_property_named_type_is_not_uppercased() {
        // A parameter literally called "type" is a schema, not a type tag.
        let schema = json!({
            "type": "object",
            "properties": { "type": { "type": "string", "enum": ["red", "green"] } }
        });
        let out = normalize_schema(&schema);
        assert_eq!(out["properties"]["type"]["type"], "STRING");
        assert_eq!(out["properties"]["type"]["enum"], json!(["red", "green"]));
    }

    #[test]
    fn test_translation_is_idempotent() {
        let once = normalize_schema(&nested_schema());
        let twice = normalize_schema(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_translation_preserves_shape() {
        let input = nested_schema();
        let out = normalize_schema(&input);
        assert_eq!(count_nested_nodes(&input), count_nested_nodes(&out));
        assert_eq!(count_nested_nodes(&input), 9);
    }

    #[test]
    fn test_source_descriptor_is_not_mutated() {
        let tool = ToolDescriptor::new("get_potatoes", "Get potatoes", nested_schema());
        let before = tool.clone();
        let decl = to_function_declaration(&tool);
        assert_eq!(tool, before);
        assert_eq!(decl.name, "get_potatoes");
        assert_eq!(decl.parameters["type"], "OBJECT");
    }

    #[test]
    fn test_non_object_values_pass_through() {
        assert_eq!(normalize_schema(&json!(true)), json!(true));
        assert_eq!(normalize_schema(&Value::Null), Value::Null);
        // Non-string type (union) is copied as-is.
        let union = json!({ "type": ["string", "null"] });
        assert_eq!(normalize_schema(&union), union);
    }
}
