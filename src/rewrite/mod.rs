//! Translation of MongoDB `$jsonSchema` documents into standard JSON Schema.
//!
//! MongoDB extends JSON Schema with a `bsonType` keyword that accepts BSON type
//! names. [`rewrite`] walks a schema and replaces every `bsonType` with the
//! standard construct carrying the same intent, so the result can be handed to
//! any JSON Schema validator together with the Extended JSON form of a document.
//!
//! # Example
//!
//! ```rust
//! use bsonschema::rewrite;
//! use serde_json::json;
//!
//! let schema = rewrite(&json!({
//!     "bsonType": "object",
//!     "required": ["name", "active"],
//!     "properties": {
//!         "name": { "bsonType": "string" },
//!         "active": { "bsonType": "bool" }
//!     }
//! }));
//!
//! assert_eq!(schema, json!({
//!     "type": "object",
//!     "required": ["name", "active"],
//!     "properties": {
//!         "name": { "type": "string" },
//!         "active": { "type": "boolean" }
//!     }
//! }));
//! ```

mod bson_type;

pub use bson_type::BsonType;

use serde_json::{Map, Value};

/// The keyword MongoDB adds on top of JSON Schema.
pub const BSON_TYPE_KEY: &str = "bsonType";

/// Rewrites a MongoDB schema into a standard JSON Schema.
///
/// Every key other than `bsonType` is copied through; object values are
/// rewritten recursively. Values inside arrays (for example the members of an
/// `anyOf` list, or a tuple-form `items`) are copied verbatim and their
/// `bsonType` keys are left in place.
///
/// The input is never modified. Non-object input is returned as a clone.
///
/// # Example
///
/// ```rust
/// use bsonschema::rewrite;
/// use serde_json::json;
///
/// let schema = rewrite(&json!({ "bsonType": ["objectId", "null"] }));
/// let alternatives = schema["oneOf"].as_array().unwrap();
///
/// // objectId's two alternatives are flattened next to {"type": "null"}
/// assert_eq!(alternatives.len(), 3);
/// assert_eq!(alternatives[2], json!({ "type": "null" }));
/// ```
pub fn rewrite(schema: &Value) -> Value {
    match schema {
        Value::Object(node) => Value::Object(rewrite_node(node)),
        other => other.clone(),
    }
}

/// Rewrites a schema given as JSON text and returns the translated text.
///
/// # Errors
///
/// Returns the parse error if `schema` is not valid JSON.
///
/// # Panics
///
/// Panics if the translated schema cannot be encoded again. This cannot happen
/// for a value produced by [`rewrite`] and indicates a defect.
pub fn rewrite_str(schema: &str) -> Result<String, serde_json::Error> {
    let parsed: Value = serde_json::from_str(schema)?;
    let rewritten = rewrite(&parsed);

    Ok(serde_json::to_string(&rewritten).expect("rewritten schema must encode as JSON"))
}

fn rewrite_node(node: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(node.len());

    for (key, value) in node {
        if key == BSON_TYPE_KEY {
            if let Some((keyword, replacement)) = translate_bson_type(value) {
                out.insert(keyword.to_string(), replacement);
            }
            continue;
        }

        let value = match value {
            Value::Object(child) => Value::Object(rewrite_node(child)),
            other => other.clone(),
        };
        out.insert(key.clone(), value);
    }

    out
}

/// Produces the keyword and value that replace a `bsonType` entry.
///
/// Tags that are neither a type name nor a list of names are dropped.
fn translate_bson_type(tag: &Value) -> Option<(&'static str, Value)> {
    match tag {
        Value::String(name) => Some(translate_single(BsonType::parse(name))),
        Value::Array(names) => Some(translate_list(names)),
        _ => None,
    }
}

fn translate_single(bson_type: BsonType<'_>) -> (&'static str, Value) {
    match bson_type.expansion() {
        Some(alternatives) => ("oneOf", Value::Array(alternatives.to_vec())),
        None => ("type", Value::String(bson_type.json_type().to_string())),
    }
}

fn translate_list(names: &[Value]) -> (&'static str, Value) {
    let mut simple = Vec::new();
    let mut complex = Vec::new();

    // Non-string members are skipped.
    for bson_type in names.iter().filter_map(Value::as_str).map(BsonType::parse) {
        match bson_type.expansion() {
            Some(alternatives) => complex.extend_from_slice(alternatives),
            None => simple.push(bson_type.json_type().to_string()),
        }
    }

    if complex.is_empty() {
        return ("type", Value::Array(simple.into_iter().map(Value::String).collect()));
    }

    complex.extend(simple.into_iter().map(|name| {
        let mut alternative = Map::new();
        alternative.insert("type".to_string(), Value::String(name));
        Value::Object(alternative)
    }));

    ("oneOf", Value::Array(complex))
}
