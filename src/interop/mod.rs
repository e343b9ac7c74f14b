//! Interoperability with standard JSON Schema tooling.
//!
//! Translated schemas are plain JSON Schema documents; this module hands them
//! to a JSON Schema engine and maps its findings back onto [`SchemaErrors`](crate::SchemaErrors).

pub mod json_schema;

pub use json_schema::{CompiledSchema, DraftEngine, DraftSchema, JsonSchemaEngine};
pub use jsonschema::Draft;
