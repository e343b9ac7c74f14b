//! Error types for schema retrieval and document validation.
//!
//! [`SchemaError`] and [`SchemaErrors`] describe how a document broke its
//! schema. The remaining types describe why a validation could not be carried
//! out at all.

mod schema_error;

pub use schema_error::{SchemaError, SchemaErrors};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while locating a collection's `$jsonSchema`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The collection exists but carries no `$jsonSchema` validator.
    ///
    /// Callers usually treat this as "nothing to validate" rather than as a
    /// failure; see [`FetchError::is_no_schema_available`].
    #[error("schema is not available")]
    NoSchemaAvailable,

    /// No collection with this name exists.
    #[error("collection not found: {0:?}")]
    CollectionNotFound(String),

    /// The underlying source failed (driver, I/O, ...).
    #[error("failed to fetch schema: {0}")]
    Source(#[source] BoxError),
}

impl FetchError {
    /// Wraps an arbitrary source error.
    pub fn other(error: impl Into<BoxError>) -> Self {
        FetchError::Source(error.into())
    }

    /// Tells whether this is the "no schema available" condition.
    pub fn is_no_schema_available(&self) -> bool {
        matches!(self, FetchError::NoSchemaAvailable)
    }
}

/// A document could not be converted to its Extended JSON form.
#[derive(Debug, thiserror::Error)]
#[error("failed to serialize document: {0}")]
pub struct SerializationError(#[source] pub BoxError);

/// The translated schema was rejected by the JSON Schema engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid JSON schema: {message}")]
pub struct SchemaCompileError {
    /// The engine's description of the problem.
    pub message: String,
}

impl SchemaCompileError {
    /// Creates a compile error from the engine's description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything that can go wrong in [`Validator::validate`](crate::Validator::validate).
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// Schema retrieval failed, including the "no schema available" condition.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched schema text is not valid JSON.
    #[error("malformed schema for collection {collection:?}: {source}")]
    MalformedSchema {
        /// The collection whose schema was fetched.
        collection: String,
        /// The parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The translated schema is not a valid JSON Schema.
    #[error(transparent)]
    InvalidSchema(#[from] SchemaCompileError),

    /// The document could not be serialized.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The document does not satisfy the schema.
    #[error("{0}")]
    Validation(SchemaErrors),
}

impl ValidateError {
    /// Tells whether the collection has no `$jsonSchema` to validate against.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bsonschema::{FetchError, ValidateError};
    ///
    /// let error = ValidateError::from(FetchError::NoSchemaAvailable);
    /// assert!(error.is_no_schema_available());
    ///
    /// let error = ValidateError::from(FetchError::CollectionNotFound("users".into()));
    /// assert!(!error.is_no_schema_available());
    /// ```
    pub fn is_no_schema_available(&self) -> bool {
        matches!(self, ValidateError::Fetch(e) if e.is_no_schema_available())
    }

    /// Returns the violations if the document failed validation.
    pub fn violations(&self) -> Option<&SchemaErrors> {
        match self {
            ValidateError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<SchemaErrors> for ValidateError {
    fn from(errors: SchemaErrors) -> Self {
        ValidateError::Validation(errors)
    }
}
