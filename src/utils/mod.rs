//! Small helpers that do not belong to a single component.

pub mod schema;

pub use schema::{normalize_schema, to_function_declaration, FunctionDeclaration};
