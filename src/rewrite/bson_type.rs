//! BSON type names and their standard JSON Schema equivalents.
//!
//! MongoDB's `bsonType` keyword accepts every BSON type name. Most of them map
//! onto a JSON Schema `type` directly (sometimes under a different name), but a
//! handful have no single JSON equivalent and expand into a list of
//! alternatives covering both the simplified form and the Extended JSON wire
//! form of the value.

use std::sync::LazyLock;

use serde_json::{json, Value};

/// A single type name found under a `bsonType` key.
///
/// # Example
///
/// ```rust
/// use bsonschema::BsonType;
///
/// assert_eq!(BsonType::parse("bool").json_type(), "boolean");
/// assert_eq!(BsonType::parse("int").json_type(), "int");
/// assert_eq!(BsonType::parse("objectId").expansion().map(|alts| alts.len()), Some(2));
/// assert!(BsonType::parse("regex").is_composite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsonType<'a> {
    /// `objectId`, a 12-byte identifier carried as `{"$oid": "..."}`.
    ObjectId,
    /// `date`, carried as `{"$date": {"$numberLong": "..."}}`.
    Date,
    /// `long`, a 64-bit integer carried as `{"$numberLong": "..."}`.
    Long,
    /// `timestamp`, carried as `{"$timestamp": {"t": .., "i": ..}}`.
    Timestamp,
    /// `regex`, carried as `{"$regex": "...", "$options": "..."}`.
    Regex,
    /// `bool`, renamed to `boolean`.
    Bool,
    /// `double`, renamed to `number`.
    Double,
    /// `decimal`, renamed to `number`.
    Decimal,
    /// Any other name. Passed through as the `type` value unchanged.
    Other(&'a str),
}

impl<'a> BsonType<'a> {
    /// Classifies a type name. Never fails; unknown names become [`BsonType::Other`].
    pub fn parse(name: &'a str) -> Self {
        match name {
            "objectId" => BsonType::ObjectId,
            "date" => BsonType::Date,
            "long" => BsonType::Long,
            "timestamp" => BsonType::Timestamp,
            "regex" => BsonType::Regex,
            "bool" => BsonType::Bool,
            "double" => BsonType::Double,
            "decimal" => BsonType::Decimal,
            other => BsonType::Other(other),
        }
    }

    /// Returns true for types that expand into a `oneOf` alternation.
    pub fn is_composite(&self) -> bool {
        self.expansion().is_some()
    }

    /// The JSON Schema `type` name for this BSON type.
    ///
    /// Composite types have no single equivalent; for them the BSON name is
    /// returned unchanged, which callers should not rely on.
    pub fn json_type(&self) -> &'a str {
        match *self {
            BsonType::Bool => "boolean",
            BsonType::Double | BsonType::Decimal => "number",
            BsonType::ObjectId => "objectId",
            BsonType::Date => "date",
            BsonType::Long => "long",
            BsonType::Timestamp => "timestamp",
            BsonType::Regex => "regex",
            BsonType::Other(name) => name,
        }
    }

    /// The alternatives a composite type expands into, or `None` for simple types.
    ///
    /// `objectId`, `date` and `long` contribute two alternatives (the simplified
    /// form first, the wire form second). `timestamp` and `regex` contribute only
    /// their wire form.
    pub fn expansion(&self) -> Option<&'static [Value]> {
        match self {
            BsonType::ObjectId => Some(OBJECT_ID.as_slice()),
            BsonType::Date => Some(DATE.as_slice()),
            BsonType::Long => Some(LONG.as_slice()),
            BsonType::Timestamp => Some(TIMESTAMP.as_slice()),
            BsonType::Regex => Some(REGEX.as_slice()),
            _ => None,
        }
    }
}

fn number_long() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["$numberLong"],
        "properties": {
            "$numberLong": { "type": ["string", "number"] }
        }
    })
}

static OBJECT_ID: LazyLock<Vec<Value>> = LazyLock::new(|| {
    vec![
        json!({ "type": "string" }),
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["$oid"],
            "properties": {
                "$oid": { "type": "string" }
            }
        }),
    ]
});

static DATE: LazyLock<Vec<Value>> = LazyLock::new(|| {
    vec![
        json!({ "type": "string", "format": "datetime" }),
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["$date"],
            "properties": {
                "$date": number_long()
            }
        }),
    ]
});

static LONG: LazyLock<Vec<Value>> =
    LazyLock::new(|| vec![json!({ "type": "number" }), number_long()]);

static TIMESTAMP: LazyLock<Vec<Value>> = LazyLock::new(|| {
    vec![json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["$timestamp"],
        "properties": {
            "$timestamp": {
                "type": "object",
                "additionalProperties": false,
                "required": ["t", "i"],
                "properties": {
                    "t": { "type": "number" },
                    "i": { "type": "number" }
                }
            }
        }
    })]
});

static REGEX: LazyLock<Vec<Value>> = LazyLock::new(|| {
    vec![json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["$regex", "$options"],
        "properties": {
            "$regex": { "type": "string" },
            "$options": { "type": "string" }
        }
    })]
});
