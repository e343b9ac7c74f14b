//! In-memory store of collection schemas.
//!
//! This module provides [`SchemaRegistry`], a [`SchemaFetcher`] that serves
//! `$jsonSchema` documents registered by the application (or loaded from disk
//! with the `effect` feature) instead of asking a live database.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::error::FetchError;
use crate::fetch::SchemaFetcher;
use crate::rewrite::rewrite;

/// The `$schema` URI attached to exported schemas.
pub const DRAFT7_URI: &str = "http://json-schema.org/draft-07/schema#";

/// Collection name to `$jsonSchema`; `None` marks a collection without one.
type SchemaMap = Arc<RwLock<IndexMap<String, Option<Value>>>>;

/// A thread-safe registry of collection schemas.
///
/// Schemas are stored as written for MongoDB (with `bsonType`) and translated
/// on export or validation. Collections keep their registration order.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`; clones share the same storage:
/// - Multiple threads can fetch concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// # Example
///
/// ```rust
/// use bsonschema::{SchemaFetcher, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry.register("users", json!({
///     "bsonType": "object",
///     "properties": { "_id": { "bsonType": "objectId" } }
/// })).unwrap();
/// registry.register_unvalidated("logs").unwrap();
///
/// assert!(registry.fetch("users").is_ok());
/// assert!(registry.fetch("logs").unwrap_err().is_no_schema_available());
/// assert_eq!(registry.collection_names(), vec!["users", "logs"]);
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
}

impl SchemaRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Registers the `$jsonSchema` of a collection.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the collection is already registered.
    pub fn register(&self, collection: impl Into<String>, schema: Value) -> Result<(), RegistryError> {
        self.insert(collection.into(), Some(schema))
    }

    /// Registers a collection that exists but has no `$jsonSchema`.
    ///
    /// Fetching its schema yields [`FetchError::NoSchemaAvailable`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the collection is already registered.
    pub fn register_unvalidated(&self, collection: impl Into<String>) -> Result<(), RegistryError> {
        self.insert(collection.into(), None)
    }

    fn insert(&self, collection: String, schema: Option<Value>) -> Result<(), RegistryError> {
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&collection) {
            return Err(RegistryError::DuplicateName(collection));
        }

        debug!(collection = %collection, has_schema = schema.is_some(), "registering collection");
        schemas.insert(collection, schema);
        Ok(())
    }

    /// Returns the untranslated `$jsonSchema` of a collection.
    ///
    /// Returns `None` both for unknown collections and for collections
    /// registered without a schema; use [`contains`](Self::contains) to tell
    /// them apart.
    pub fn get(&self, collection: &str) -> Option<Value> {
        self.schemas.read().get(collection).cloned().flatten()
    }

    /// Returns true if the collection is registered, with or without a schema.
    pub fn contains(&self, collection: &str) -> bool {
        self.schemas.read().contains_key(collection)
    }

    /// Returns the registered collection names in registration order.
    pub fn collection_names(&self) -> Vec<String> {
        self.schemas.read().keys().cloned().collect()
    }

    /// Returns the number of registered collections.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true if no collection is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Exports a collection's schema as a standalone draft-07 JSON Schema.
    ///
    /// Returns `None` if the collection is unknown or has no schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bsonschema::SchemaRegistry;
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("flags", json!({ "bsonType": "bool" })).unwrap();
    ///
    /// assert_eq!(
    ///     registry.export_schema("flags").unwrap(),
    ///     json!({
    ///         "$schema": "http://json-schema.org/draft-07/schema#",
    ///         "type": "boolean"
    ///     })
    /// );
    /// ```
    pub fn export_schema(&self, collection: &str) -> Option<Value> {
        let schema = rewrite(&self.get(collection)?);

        let mut document = serde_json::Map::new();
        document.insert("$schema".to_string(), json!(DRAFT7_URI));
        if let Value::Object(fields) = schema {
            document.extend(fields);
        }

        Some(Value::Object(document))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
        }
    }
}

impl SchemaFetcher for SchemaRegistry {
    fn fetch(&self, collection: &str) -> Result<String, FetchError> {
        let schemas = self.schemas.read();

        match schemas.get(collection) {
            Some(Some(schema)) => Ok(schema.to_string()),
            Some(None) => Err(FetchError::NoSchemaAvailable),
            None => Err(FetchError::CollectionNotFound(collection.to_string())),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a collection that is already registered.
    #[error("collection '{0}' already registered")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = SchemaRegistry::new();
        registry.register("users", json!({})).unwrap();

        let error = registry.register_unvalidated("users").unwrap_err();
        assert_eq!(error.to_string(), "collection 'users' already registered");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_distinguishes_nothing_from_contains() {
        let registry = SchemaRegistry::new();
        registry.register_unvalidated("logs").unwrap();

        assert!(registry.get("logs").is_none());
        assert!(registry.contains("logs"));
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_fetch_returns_untranslated_text() {
        let registry = SchemaRegistry::new();
        registry
            .register("users", json!({ "bsonType": "object", "required": ["_id"] }))
            .unwrap();

        assert_eq!(
            registry.fetch("users").unwrap(),
            r#"{"bsonType":"object","required":["_id"]}"#
        );
    }

    #[test]
    fn test_fetch_unknown_collection() {
        let registry = SchemaRegistry::new();
        assert!(matches!(
            registry.fetch("orders"),
            Err(FetchError::CollectionNotFound(name)) if name == "orders"
        ));
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = SchemaRegistry::new();
        let clone = registry.clone();
        clone.register("users", json!({})).unwrap();

        assert!(registry.contains("users"));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_export_unvalidated_is_none() {
        let registry = SchemaRegistry::default();
        registry.register_unvalidated("logs").unwrap();
        assert!(registry.export_schema("logs").is_none());
        assert!(registry.export_schema("missing").is_none());
    }
}
