//! Tool descriptors, catalogs, calls and results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::Error;
use crate::error_code::ErrorKind;

/// Named tool arguments as produced by the model.
pub type Arguments = Map<String, Value>;

/// Tool descriptor as advertised by a backend (`tools/list` entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema", default = "empty_object_schema")]
    pub input_schema: Value,
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object" })
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Names listed in the schema's top-level `required` array.
    pub fn required_params(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Ordered set of tools advertised to the model for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    /// Build a catalog, rejecting duplicate tool names.
    pub fn new(tools: Vec<ToolDescriptor>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.name.as_str()) {
                return Err(Error::Internal(format!(
                    "duplicate tool name in catalog: {}",
                    tool.name
                )));
            }
        }
        Ok(Self { tools })
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ToolDescriptor> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<'a> IntoIterator for &'a ToolCatalog {
    type Item = &'a ToolDescriptor;
    type IntoIter = std::slice::Iter<'a, ToolDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.iter()
    }
}

/// Tool call (invocation requested by the model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Local correlation id, only used for logging.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
        }
    }
}

/// Outcome of a single tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { value: Value },
    Failure { kind: ErrorKind, message: String },
}

/// Tool result (response to a tool call), fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_name: String,
    pub outcome: ToolOutcome,
}

impl ToolCallResult {
    pub fn success(tool_name: impl Into<String>, value: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Success { value },
        }
    }

    pub fn failure(tool_name: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Failure {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success { .. })
    }

    /// Failure kind, if this result is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor::new(
            name,
            "test tool",
            json!({
                "type": "object",
                "properties": { "size": { "type": "string" } },
                "required": ["size"]
            }),
        )
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let err = ToolCatalog::new(vec![descriptor("a"), descriptor("a")]).unwrap_err();
        assert!(err.to_string().contains("duplicate tool name"));
    }

    #[test]
    fn test_catalog_preserves_order_and_lookup() {
        let catalog = ToolCatalog::new(vec![descriptor("b"), descriptor("a")]).unwrap();
        assert_eq!(catalog.names(), vec!["b", "a"]);
        assert!(catalog.contains("a"));
        assert!(!catalog.contains("c"));
        assert_eq!(catalog.get("b").unwrap().required_params(), vec!["size"]);
    }

    #[test]
    fn test_descriptor_uses_mcp_field_names() {
        let v = serde_json::to_value(descriptor("get_potatoes")).unwrap();
        assert!(v.get("inputSchema").is_some());

        let parsed: ToolDescriptor =
            serde_json::from_value(json!({ "name": "bare" })).unwrap();
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.input_schema, json!({ "type": "object" }));
    }

    #[test]
    fn test_result_helpers() {
        let ok = ToolCallResult::success("t", json!({ "quantity": 10 }));
        assert!(ok.is_success());
        assert_eq!(ok.error_kind(), None);

        let bad = ToolCallResult::failure("t", ErrorKind::InvalidArguments, "missing size");
        assert!(!bad.is_success());
        assert_eq!(bad.error_kind(), Some(ErrorKind::InvalidArguments));
    }

    #[test]
    fn test_call_ids_are_unique() {
        let a = ToolCallRequest::new("t", Arguments::new());
        let b = ToolCallRequest::new("t", Arguments::new());
        assert_ne!(a.id, b.id);
    }
}
