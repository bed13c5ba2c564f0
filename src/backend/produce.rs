//! The produce backend: quantity lookups for potatoes and tomatoes.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::validation::ArgumentValidator;
use super::ToolBackend;
use crate::error_code::ErrorKind;
use crate::types::tool::{Arguments, ToolCallResult, ToolCatalog, ToolDescriptor};
use crate::Result;

pub const GET_POTATOES: &str = "get_potatoes";
pub const GET_TOMATOES: &str = "get_tomatoes";

const POTATO_QUANTITY: u64 = 10;
const TOMATO_QUANTITY: u64 = 15;

static PRODUCE_TOOLS: Lazy<Vec<ToolDescriptor>> = Lazy::new(|| {
    vec![
        ToolDescriptor::new(
            GET_POTATOES,
            "Get amount of potatoes by size",
            json!({
                "type": "object",
                "properties": {
                    "size": {
                        "type": "string",
                        "description": "Potato size (S, M or L)"
                    }
                },
                "required": ["size"]
            }),
        ),
        ToolDescriptor::new(
            GET_TOMATOES,
            "Get amount of tomatoes by color or size",
            json!({
                "type": "object",
                "properties": {
                    "size": {
                        "type": "string",
                        "description": "Size (S, M or L)"
                    },
                    "color": {
                        "type": "string",
                        "description": "Color (Red or Green)"
                    }
                },
                "required": ["size"]
            }),
        ),
    ]
});

/// In-process backend with two fixed tools.
#[derive(Debug)]
pub struct ProduceBackend {
    catalog: ToolCatalog,
    validator: ArgumentValidator,
}

impl ProduceBackend {
    pub fn new() -> Result<Self> {
        let catalog = ToolCatalog::new(PRODUCE_TOOLS.clone())?;
        let validator = ArgumentValidator::for_catalog(&catalog)?;
        Ok(Self { catalog, validator })
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Synchronous dispatch; never panics on malformed input.
    pub fn execute(&self, name: &str, arguments: &Arguments) -> ToolCallResult {
        if !self.catalog.contains(name) {
            return ToolCallResult::failure(
                name,
                ErrorKind::UnknownTool,
                format!("Unknown tool: {}", name),
            );
        }

        if let Err(message) = self.validator.validate(&self.catalog, name, arguments) {
            tracing::debug!(tool = name, %message, "rejecting tool arguments");
            return ToolCallResult::failure(name, ErrorKind::InvalidArguments, message);
        }

        let size = arguments.get("size").and_then(Value::as_str).unwrap_or_default();
        match name {
            GET_POTATOES => {
                tracing::debug!("Fetching potatoes for size: {}", size);
                ToolCallResult::success(name, json!({ "size": size, "quantity": POTATO_QUANTITY }))
            }
            GET_TOMATOES => {
                let color = arguments.get("color").and_then(Value::as_str);
                tracing::debug!(
                    "Fetching tomatoes for size: {} and color: {}",
                    size,
                    color.unwrap_or("any")
                );
                ToolCallResult::success(name, json!({ "size": size, "quantity": TOMATO_QUANTITY }))
            }
            other => ToolCallResult::failure(
                other,
                ErrorKind::InternalError,
                format!("No handler registered for tool: {}", other),
            ),
        }
    }
}

#[async_trait]
impl ToolBackend for ProduceBackend {
    async fn list_tools(&self) -> Result<ToolCatalog> {
        Ok(self.catalog.clone())
    }

    async fn call_tool(&self, name: &str, arguments: &Arguments) -> Result<ToolCallResult> {
        Ok(self.execute(name, arguments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tool::ToolOutcome;

    fn args(v: Value) -> Arguments {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_catalog_is_stable() {
        let backend = ProduceBackend::new().unwrap();
        let first = tokio_test::block_on(backend.list_tools()).unwrap();
        let second = tokio_test::block_on(backend.list_tools()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.names(), vec![GET_POTATOES, GET_TOMATOES]);
    }

    #[test]
    fn test_get_potatoes_returns_quantity() {
        let backend = ProduceBackend::new().unwrap();
        let result = backend.execute(GET_POTATOES, &args(json!({ "size": "L" })));
        assert_eq!(
            result.outcome,
            ToolOutcome::Success {
                value: json!({ "size": "L", "quantity": 10 })
            }
        );
    }

    #[test]
    fn test_get_tomatoes_with_color() {
        let backend = ProduceBackend::new().unwrap();
        let result = backend.execute(GET_TOMATOES, &args(json!({ "size": "S", "color": "Green" })));
        assert_eq!(
            result.outcome,
            ToolOutcome::Success {
                value: json!({ "size": "S", "quantity": 15 })
            }
        );
    }

    #[test]
    fn test_success_values_round_trip_through_serialization() {
        let backend = ProduceBackend::new().unwrap();
        for (name, size) in [(GET_POTATOES, "S"), (GET_POTATOES, "M"), (GET_TOMATOES, "L")] {
            let result = backend.execute(name, &args(json!({ "size": size })));
            let ToolOutcome::Success { value } = &result.outcome else {
                panic!("expected success for {name}");
            };
            let text = serde_json::to_string_pretty(value).unwrap();
            let back: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(&back, value);
        }
    }

    #[test]
    fn test_unknown_tool_is_a_failure_not_a_panic() {
        let backend = ProduceBackend::new().unwrap();
        for name in ["get_onions", "", "GET_POTATOES"] {
            let result = backend.execute(name, &Arguments::new());
            assert_eq!(result.error_kind(), Some(ErrorKind::UnknownTool));
        }
    }

    #[test]
    fn test_missing_size_is_invalid_arguments() {
        let backend = ProduceBackend::new().unwrap();
        let result = backend.execute(GET_TOMATOES, &args(json!({ "color": "Red" })));
        assert_eq!(
            result.outcome,
            ToolOutcome::Failure {
                kind: ErrorKind::InvalidArguments,
                message: "Missing required parameter: size".into()
            }
        );
    }

    #[test]
    fn test_non_string_size_is_invalid_arguments() {
        let backend = ProduceBackend::new().unwrap();
        let result = backend.execute(GET_POTATOES, &args(json!({ "size": 3 })));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
    }
}
