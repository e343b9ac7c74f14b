//! Validation of documents against their collection's `$jsonSchema`.
//!
//! [`Validator`] chains the pieces of this crate: it fetches the collection's
//! schema, serializes the document to canonical Extended JSON, translates the
//! schema with [`rewrite`] and hands both to a JSON Schema engine. Every step
//! runs in order and the first failure ends the call.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ValidateError;
use crate::fetch::SchemaFetcher;
use crate::interop::{CompiledSchema, DraftEngine, JsonSchemaEngine};
use crate::rewrite::rewrite;
use crate::serialize::{CanonicalExtJson, DocumentSerializer};

/// Validates documents against the `$jsonSchema` of their collection.
///
/// # Example
///
/// ```rust
/// use bson::{doc, oid::ObjectId, DateTime};
/// use bsonschema::{SchemaRegistry, Validator};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry.register("users", json!({
///     "bsonType": "object",
///     "required": ["_id", "firstName", "createdAt"],
///     "properties": {
///         "_id": { "bsonType": "objectId" },
///         "firstName": { "bsonType": "string" },
///         "createdAt": { "bsonType": "date" }
///     }
/// })).unwrap();
///
/// let validator = Validator::new(registry);
///
/// let user = doc! { "_id": ObjectId::new(), "firstName": "John", "createdAt": DateTime::now() };
/// assert!(validator.validate("users", &user).is_ok());
///
/// let error = validator.validate("users", &doc! { "_id": ObjectId::new() }).unwrap_err();
/// assert_eq!(error.violations().unwrap().len(), 2);
/// ```
pub struct Validator<F, S = CanonicalExtJson, E = DraftEngine> {
    fetcher: F,
    serializer: S,
    engine: E,
}

impl<F: SchemaFetcher> Validator<F> {
    /// Creates a validator using canonical Extended JSON and a draft 7 engine.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            serializer: CanonicalExtJson,
            engine: DraftEngine::new(),
        }
    }
}

impl<F, S, E> Validator<F, S, E>
where
    F: SchemaFetcher,
    S: DocumentSerializer,
    E: JsonSchemaEngine,
{
    /// Replaces the document serializer.
    pub fn with_serializer<S2: DocumentSerializer>(self, serializer: S2) -> Validator<F, S2, E> {
        Validator {
            fetcher: self.fetcher,
            serializer,
            engine: self.engine,
        }
    }

    /// Replaces the JSON Schema engine.
    pub fn with_engine<E2: JsonSchemaEngine>(self, engine: E2) -> Validator<F, S, E2> {
        Validator {
            fetcher: self.fetcher,
            serializer: self.serializer,
            engine,
        }
    }

    /// Returns the fetcher schemas are pulled from.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches a collection's schema and returns its standard JSON Schema form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::Fetch`] if the schema cannot be fetched (including
    /// the "no schema available" condition) and [`ValidateError::MalformedSchema`]
    /// if the fetched text is not JSON.
    pub fn json_schema(&self, collection: &str) -> Result<Value, ValidateError> {
        let text = self.fetcher.fetch(collection)?;
        let schema = parse_schema(collection, &text)?;

        Ok(rewrite(&schema))
    }

    /// Validates `document` against the schema of `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::Validation`] with every reported violation when
    /// the document does not satisfy the schema. Fetch, serialization and
    /// schema compilation failures are returned as their own variants; use
    /// [`ValidateError::is_no_schema_available`] to detect collections without
    /// a `$jsonSchema`.
    pub fn validate<T>(&self, collection: &str, document: &T) -> Result<(), ValidateError>
    where
        T: Serialize + ?Sized,
    {
        let text = self.fetcher.fetch(collection)?;
        let instance = self.serializer.serialize(document)?;
        let schema = rewrite(&parse_schema(collection, &text)?);

        let compiled = self.engine.compile(&schema)?;
        let result = compiled.check(&instance).into_result();

        match &result {
            Ok(()) => debug!(collection, "document is valid"),
            Err(errors) => debug!(collection, violations = errors.len(), "document is invalid"),
        }

        result.map_err(ValidateError::Validation)
    }

    /// Validates many documents against one fetch of the collection's schema.
    ///
    /// The schema is fetched, translated and compiled once; documents are then
    /// checked in parallel. The returned results follow the order of
    /// `documents`.
    ///
    /// # Errors
    ///
    /// The outer error reports a schema that could not be fetched, parsed or
    /// compiled. Per-document serialization and validation failures are
    /// returned in the inner results.
    pub fn validate_batch<T>(
        &self,
        collection: &str,
        documents: &[T],
    ) -> Result<Vec<Result<(), ValidateError>>, ValidateError>
    where
        T: Serialize + Sync,
    {
        let schema = self.json_schema(collection)?;
        let compiled = self.engine.compile(&schema)?;
        debug!(collection, documents = documents.len(), "validating batch");

        Ok(documents
            .par_iter()
            .map(|document| {
                let instance = self.serializer.serialize(document)?;
                compiled
                    .check(&instance)
                    .into_result()
                    .map_err(ValidateError::Validation)
            })
            .collect())
    }
}

fn parse_schema(collection: &str, text: &str) -> Result<Value, ValidateError> {
    serde_json::from_str(text).map_err(|source| ValidateError::MalformedSchema {
        collection: collection.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, SerializationError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixed(schema: &'static str) -> impl Fn(&str) -> Result<String, FetchError> + Send + Sync {
        move |_: &str| Ok(schema.to_string())
    }

    #[test]
    fn test_malformed_schema_text() {
        let validator = Validator::new(fixed("{not json"));
        let error = validator.validate("users", &serde_json::json!({})).unwrap_err();

        assert!(matches!(
            error,
            ValidateError::MalformedSchema { ref collection, .. } if collection == "users"
        ));
    }

    #[test]
    fn test_fetch_error_short_circuits() {
        let validator = Validator::new(|_: &str| -> Result<String, FetchError> {
            Err(FetchError::other("connection refused"))
        });
        let error = validator.validate("users", &serde_json::json!({})).unwrap_err();

        assert_eq!(error.to_string(), "failed to fetch schema: connection refused");
    }

    #[test]
    fn test_invalid_translated_schema() {
        let validator = Validator::new(fixed(r#"{"bsonType":"int"}"#));
        let error = validator.validate("counters", &serde_json::json!(1)).unwrap_err();

        assert!(matches!(error, ValidateError::InvalidSchema(_)));
    }

    struct FailingSerializer;

    impl DocumentSerializer for FailingSerializer {
        fn serialize<T>(&self, _: &T) -> Result<Value, SerializationError>
        where
            T: Serialize + ?Sized,
        {
            Err(SerializationError("unsupported document".into()))
        }
    }

    #[test]
    fn test_serialization_error() {
        let validator = Validator::new(fixed(r#"{"bsonType":"object"}"#))
            .with_serializer(FailingSerializer);
        let error = validator.validate("users", &serde_json::json!({})).unwrap_err();

        assert!(matches!(error, ValidateError::Serialization(_)));
        assert_eq!(
            error.to_string(),
            "failed to serialize document: unsupported document"
        );
    }

    #[test]
    fn test_batch_fetches_once() {
        let calls = AtomicUsize::new(0);
        let validator = Validator::new(|_: &str| -> Result<String, FetchError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(r#"{"bsonType":"object","required":["name"]}"#.to_string())
        });

        let documents = vec![
            serde_json::json!({ "name": "a" }),
            serde_json::json!({}),
            serde_json::json!({ "name": "c" }),
        ];
        let results = validator.validate_batch("users", &documents).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().violations().is_some());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_batch_no_schema() {
        let validator = Validator::new(|_: &str| -> Result<String, FetchError> {
            Err(FetchError::NoSchemaAvailable)
        });
        let error = validator
            .validate_batch("logs", &[serde_json::json!({})])
            .unwrap_err();

        assert!(error.is_no_schema_available());
    }
}
