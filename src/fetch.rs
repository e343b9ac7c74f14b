//! Retrieval of a collection's `$jsonSchema`.
//!
//! [`SchemaFetcher`] is the seam the [`Validator`](crate::Validator) pulls
//! schemas through. Any `Fn(&str) -> Result<String, FetchError>` closure is a
//! fetcher; [`SpecificationFetcher`] adapts a `listCollections`-style listing,
//! and [`SchemaRegistry`](crate::SchemaRegistry) serves schemas from memory.

use bson::{Bson, Document};
use tracing::trace;

use crate::error::FetchError;

/// Fetches the `$jsonSchema` of a collection as JSON text.
pub trait SchemaFetcher: Send + Sync {
    /// Returns the collection's `$jsonSchema` document as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoSchemaAvailable`] when the collection has no
    /// `$jsonSchema` validator, and any other variant when the schema could not
    /// be located or read.
    fn fetch(&self, collection: &str) -> Result<String, FetchError>;
}

impl<F> SchemaFetcher for F
where
    F: Fn(&str) -> Result<String, FetchError> + Send + Sync,
{
    fn fetch(&self, collection: &str) -> Result<String, FetchError> {
        self(collection)
    }
}

/// One entry of a collection listing: the name and its creation options.
///
/// `options` holds what MongoDB reports under `listCollections` (for example
/// `{"validator": {"$jsonSchema": {...}}, "validationLevel": "strict"}`).
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSpecification {
    /// The collection name.
    pub name: String,
    /// The collection options document.
    pub options: Document,
}

impl CollectionSpecification {
    /// Creates a specification from a name and its options.
    pub fn new(name: impl Into<String>, options: Document) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Returns the `$jsonSchema` inside the collection's validator, if any.
    pub fn json_schema(&self) -> Option<&Document> {
        match self.options.get("validator") {
            Some(Bson::Document(validator)) => match validator.get("$jsonSchema") {
                Some(Bson::Document(schema)) => Some(schema),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Fetches schemas from a collection listing.
///
/// The listing closure is invoked on every fetch, so schema changes are picked
/// up without rebuilding the fetcher.
///
/// # Example
///
/// ```rust
/// use bson::doc;
/// use bsonschema::{CollectionSpecification, FetchError, SchemaFetcher, SpecificationFetcher};
///
/// let fetcher = SpecificationFetcher::new(|| {
///     Ok::<_, FetchError>(vec![
///         CollectionSpecification::new("users", doc! {
///             "validator": { "$jsonSchema": { "bsonType": "object" } }
///         }),
///         CollectionSpecification::new("logs", doc! {}),
///     ])
/// });
///
/// assert_eq!(fetcher.fetch("users").unwrap(), r#"{"bsonType":"object"}"#);
/// assert!(fetcher.fetch("logs").unwrap_err().is_no_schema_available());
/// ```
pub struct SpecificationFetcher<P> {
    pull_specifications: P,
}

impl<P, E> SpecificationFetcher<P>
where
    P: Fn() -> Result<Vec<CollectionSpecification>, E> + Send + Sync,
    E: Into<FetchError>,
{
    /// Creates a fetcher around a closure listing all collections.
    pub fn new(pull_specifications: P) -> Self {
        Self {
            pull_specifications,
        }
    }
}

impl<P, E> SchemaFetcher for SpecificationFetcher<P>
where
    P: Fn() -> Result<Vec<CollectionSpecification>, E> + Send + Sync,
    E: Into<FetchError>,
{
    fn fetch(&self, collection: &str) -> Result<String, FetchError> {
        let specifications = (self.pull_specifications)().map_err(Into::<FetchError>::into)?;
        trace!(collection, listed = specifications.len(), "looking up collection");

        let specification = specifications
            .iter()
            .find(|specification| specification.name == collection)
            .ok_or_else(|| FetchError::CollectionNotFound(collection.to_string()))?;

        let schema = specification
            .json_schema()
            .ok_or(FetchError::NoSchemaAvailable)?;

        Ok(Bson::Document(schema.clone())
            .into_relaxed_extjson()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_json_schema_lookup() {
        let specification = CollectionSpecification::new(
            "users",
            doc! { "validator": { "$jsonSchema": { "required": ["_id"] } } },
        );
        assert_eq!(specification.json_schema(), Some(&doc! { "required": ["_id"] }));
    }

    #[test]
    fn test_query_validator_has_no_json_schema() {
        let specification = CollectionSpecification::new(
            "users",
            doc! { "validator": { "age": { "$gte": 0 } } },
        );
        assert!(specification.json_schema().is_none());
    }

    #[test]
    fn test_non_document_validator() {
        let specification = CollectionSpecification::new("users", doc! { "validator": 1 });
        assert!(specification.json_schema().is_none());
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |collection: &str| -> Result<String, FetchError> {
            match collection {
                "users" => Ok(r#"{"bsonType":"object"}"#.to_string()),
                other => Err(FetchError::CollectionNotFound(other.to_string())),
            }
        };

        assert!(fetcher.fetch("users").is_ok());
        assert!(matches!(
            fetcher.fetch("orders"),
            Err(FetchError::CollectionNotFound(_))
        ));
    }
}
