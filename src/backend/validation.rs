//! Argument validation against each tool's input schema.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Error;
use crate::types::tool::{Arguments, ToolCatalog};

/// Compiled input schemas for every tool in a catalog.
pub struct ArgumentValidator {
    schemas: HashMap<String, JSONSchema>,
}

impl ArgumentValidator {
    /// Compile the input schema of every tool in `catalog`.
    pub fn for_catalog(catalog: &ToolCatalog) -> Result<Self, Error> {
        let mut schemas = HashMap::with_capacity(catalog.len());
        for tool in catalog {
            let compiled = JSONSchema::options()
                .with_draft(Draft::Draft7)
                .compile(&tool.input_schema)
                .map_err(|e| {
                    Error::Internal(format!("Invalid input schema for '{}': {}", tool.name, e))
                })?;
            schemas.insert(tool.name.clone(), compiled);
        }
        Ok(Self { schemas })
    }

    /// Check `arguments` for `tool`.
    ///
    /// Required parameters that are absent, null or empty strings are
    /// reported as missing; everything else goes through the schema.
    pub fn validate(&self, catalog: &ToolCatalog, tool: &str, arguments: &Arguments) -> Result<(), String> {
        let descriptor = catalog
            .get(tool)
            .ok_or_else(|| format!("Unknown tool: {}", tool))?;

        for param in descriptor.required_params() {
            let missing = match arguments.get(param) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                return Err(format!("Missing required parameter: {}", param));
            }
        }

        let Some(schema) = self.schemas.get(tool) else {
            return Ok(());
        };
        let instance = Value::Object(arguments.clone());
        let result = schema.validate(&instance);
        if let Err(errors) = result {
            let messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(format!("Invalid arguments: {}", messages.join("; ")));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ArgumentValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentValidator")
            .field("tools", &self.schemas.keys().collect::<Vec<_>>())
            .finish()
    }
}
