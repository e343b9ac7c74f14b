//! # bsonschema
//!
//! Translates MongoDB `$jsonSchema` validators into standard JSON Schema and
//! validates documents against them.
//!
//! ## Overview
//!
//! MongoDB's dialect of JSON Schema adds a `bsonType` keyword that names BSON
//! types, several of which (ObjectId, Date, Long, Timestamp, Regex) have no
//! single JSON equivalent. [`rewrite`] replaces every `bsonType` with the
//! standard construct that accepts both the simplified value and its Extended
//! JSON wire form. [`Validator`] runs the whole pipeline: fetch a collection's
//! schema, serialize the document to canonical Extended JSON, rewrite the
//! schema and check the document, reporting every violation at once.
//!
//! ## Core Types
//!
//! - [`rewrite`]: The pure schema translation
//! - [`Validator`]: Fetch, serialize, rewrite, validate
//! - [`SchemaFetcher`]: Where schemas come from ([`SchemaRegistry`], [`SpecificationFetcher`], closures)
//! - [`SchemaErrors`]: A non-empty list of violations, each with its [`JsonPath`]
//!
//! ## Example
//!
//! ```rust
//! use bsonschema::rewrite;
//! use serde_json::json;
//!
//! let schema = rewrite(&json!({ "bsonType": ["bool", "double", "decimal"] }));
//! assert_eq!(schema, json!({ "type": ["boolean", "number", "number"] }));
//! ```

pub mod error;
pub mod fetch;
pub mod interop;
pub mod path;
pub mod registry;
pub mod rewrite;
pub mod serialize;
pub mod validator;

#[cfg(feature = "effect")]
pub mod effect;

pub use error::{
    FetchError, SchemaCompileError, SchemaError, SchemaErrors, SerializationError, ValidateError,
};
pub use fetch::{CollectionSpecification, SchemaFetcher, SpecificationFetcher};
pub use interop::{CompiledSchema, Draft, DraftEngine, DraftSchema, JsonSchemaEngine};
pub use path::{JsonPath, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use rewrite::{rewrite, rewrite_str, BsonType};
pub use serialize::{CanonicalExtJson, DocumentSerializer};
pub use validator::Validator;

/// Type alias for validation results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
