//! Conversion of documents into their Extended JSON wire form.
//!
//! The translated schemas describe documents the way MongoDB Extended JSON
//! writes them (`{"$oid": ...}`, `{"$date": {"$numberLong": ...}}`), so the
//! default serializer produces canonical, non-relaxed Extended JSON.

use serde::Serialize;
use serde_json::Value;

use crate::error::SerializationError;

/// Converts a document into the JSON value handed to the schema engine.
pub trait DocumentSerializer: Send + Sync {
    /// Serializes `document` into its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the document cannot be represented.
    fn serialize<T>(&self, document: &T) -> Result<Value, SerializationError>
    where
        T: Serialize + ?Sized;
}

/// Serializes through BSON into canonical Extended JSON.
///
/// # Example
///
/// ```rust
/// use bson::{doc, oid::ObjectId};
/// use bsonschema::{CanonicalExtJson, DocumentSerializer};
/// use serde_json::json;
///
/// let id = ObjectId::parse_str("5f1d7ab3c2a4e2b1c8d9e0f1").unwrap();
/// let value = CanonicalExtJson.serialize(&doc! { "_id": id, "name": "John" }).unwrap();
///
/// assert_eq!(value, json!({
///     "_id": { "$oid": "5f1d7ab3c2a4e2b1c8d9e0f1" },
///     "name": "John"
/// }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalExtJson;

impl DocumentSerializer for CanonicalExtJson {
    fn serialize<T>(&self, document: &T) -> Result<Value, SerializationError>
    where
        T: Serialize + ?Sized,
    {
        let bson = bson::to_bson(document).map_err(|e| SerializationError(Box::new(e)))?;
        Ok(bson.into_canonical_extjson())
    }
}
