use bson::{doc, oid::ObjectId, Bson, DateTime, Document, Timestamp};
use bsonschema::{
    CollectionSpecification, DocumentSerializer, DraftEngine, FetchError, JsonPath,
    SchemaRegistry, SerializationError, SpecificationFetcher, ValidateError, Validator,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Hands documents to the engine as plain JSON, without Extended JSON wrappers.
struct PlainJson;

impl DocumentSerializer for PlainJson {
    fn serialize<T>(&self, document: &T) -> Result<Value, SerializationError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(document).map_err(|e| SerializationError(Box::new(e)))
    }
}

fn users_schema() -> Value {
    json!({
        "bsonType": "object",
        "required": ["_id", "firstName", "lastName", "createdAt", "updatedAt"],
        "additionalProperties": false,
        "properties": {
            "_id": { "bsonType": "objectId" },
            "firstName": { "bsonType": "string" },
            "lastName": { "bsonType": "string" },
            "createdAt": { "bsonType": "date" },
            "updatedAt": { "bsonType": ["date", "null"] }
        }
    })
}

fn users_validator() -> Validator<SchemaRegistry> {
    let registry = SchemaRegistry::new();
    registry.register("users", users_schema()).unwrap();
    Validator::new(registry)
}

fn john() -> Document {
    doc! {
        "_id": ObjectId::new(),
        "firstName": "John",
        "lastName": "Connor",
        "createdAt": DateTime::now(),
        "updatedAt": Bson::Null,
    }
}

#[test]
fn test_validate_simple_schema() {
    assert!(users_validator().validate("users", &john()).is_ok());
}

#[test]
fn test_nullable_date_accepts_date() {
    let mut user = john();
    user.insert("updatedAt", DateTime::from_millis(1_700_000_000_000));

    assert!(users_validator().validate("users", &user).is_ok());
}

#[test]
fn test_fails_schema_validation_null_first_name() {
    let mut user = john();
    user.insert("firstName", Bson::Null);

    let error = users_validator().validate("users", &user).unwrap_err();
    let violations = error.violations().unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations.first().path, JsonPath::from_field("firstName"));
    assert_eq!(violations.first().code, "type");
}

#[test]
fn test_missing_required_field_is_named() {
    let mut user = john();
    user.remove("firstName");

    let error = users_validator().validate("users", &user).unwrap_err();
    let violations = error.violations().unwrap();

    assert_eq!(violations.with_code("required").len(), 1);
    assert!(violations.first().message.contains("firstName"));
    assert!(error.to_string().contains("firstName"));
}

#[test]
fn test_all_violations_are_collected() {
    let user = doc! {
        "_id": 7,
        "firstName": "John",
        "createdAt": "yesterday",
        "updatedAt": Bson::Null,
        "nickname": "JC",
    };

    let error = users_validator().validate("users", &user).unwrap_err();
    let violations = error.violations().unwrap();

    assert_eq!(violations.with_code("required").len(), 1);
    assert_eq!(violations.with_code("additional_properties").len(), 1);
    assert_eq!(violations.at_path(&JsonPath::from_field("_id")).len(), 1);
    assert_eq!(violations.at_path(&JsonPath::from_field("createdAt")).len(), 0);
    assert_eq!(violations.len(), 3);
}

#[test]
fn test_long_and_timestamp_wire_forms() {
    let registry = SchemaRegistry::new();
    registry
        .register(
            "events",
            json!({
                "bsonType": "object",
                "required": ["sequence", "at"],
                "properties": {
                    "sequence": { "bsonType": "long" },
                    "at": { "bsonType": "timestamp" }
                }
            }),
        )
        .unwrap();
    let validator = Validator::new(registry);

    let at = Timestamp {
        time: 1_700_000_000,
        increment: 3,
    };
    let event = doc! { "sequence": 9_007_199_254_740_993_i64, "at": at };
    assert!(validator.validate("events", &event).is_ok());

    let event = doc! { "sequence": "nine", "at": at };
    let error = validator.validate("events", &event).unwrap_err();
    assert_eq!(
        error.violations().unwrap().first().path,
        JsonPath::from_field("sequence")
    );
}

#[test]
fn test_regex_wire_form_from_json_document() {
    let registry = SchemaRegistry::new();
    registry
        .register("filters", json!({ "bsonType": "object", "properties": { "match": { "bsonType": "regex" } } }))
        .unwrap();
    let validator = Validator::new(registry).with_serializer(PlainJson);

    let filter = json!({ "match": { "$regex": "^a", "$options": "i" } });
    assert!(validator.validate("filters", &filter).is_ok());

    let filter = json!({ "match": { "$regex": "^a" } });
    assert!(validator.validate("filters", &filter).is_err());
}

#[test]
fn test_serde_structs_are_validated() {
    #[derive(Serialize)]
    struct User {
        #[serde(rename = "_id")]
        id: ObjectId,
        #[serde(rename = "firstName")]
        first_name: String,
        #[serde(rename = "lastName")]
        last_name: String,
        #[serde(rename = "createdAt")]
        created_at: DateTime,
        #[serde(rename = "updatedAt")]
        updated_at: Option<DateTime>,
    }

    let user = User {
        id: ObjectId::new(),
        first_name: "Sarah".to_string(),
        last_name: "Connor".to_string(),
        created_at: DateTime::now(),
        updated_at: None,
    };

    assert!(users_validator().validate("users", &user).is_ok());
}

#[test]
fn test_no_schema_available_is_distinguishable() {
    let registry = SchemaRegistry::new();
    registry.register_unvalidated("logs").unwrap();
    let validator = Validator::new(registry);

    let error = validator.validate("logs", &doc! { "line": "x" }).unwrap_err();
    assert!(error.is_no_schema_available());
    assert!(matches!(error, ValidateError::Fetch(FetchError::NoSchemaAvailable)));
}

#[test]
fn test_unknown_collection() {
    let error = users_validator()
        .validate("orders", &doc! {})
        .unwrap_err();

    assert!(!error.is_no_schema_available());
    assert_eq!(error.to_string(), "collection not found: \"orders\"");
}

#[test]
fn test_specification_fetcher_end_to_end() {
    let fetcher = SpecificationFetcher::new(|| {
        Ok::<_, FetchError>(vec![CollectionSpecification::new(
            "products",
            doc! {
                "validator": {
                    "$jsonSchema": {
                        "bsonType": "object",
                        "required": ["sku", "price"],
                        "properties": {
                            "sku": { "bsonType": "string", "minLength": 3 },
                            "price": { "bsonType": "double" }
                        }
                    }
                },
                "validationLevel": "strict",
            },
        )])
    });
    let validator = Validator::new(fetcher).with_serializer(PlainJson);

    assert!(validator.validate("products", &json!({ "sku": "A-1", "price": 9.5 })).is_ok());

    let error = validator
        .validate("products", &json!({ "sku": "A" }))
        .unwrap_err();
    assert_eq!(error.violations().unwrap().len(), 2);
}

#[test]
fn test_json_schema_returns_translation() {
    let schema = users_validator().json_schema("users").unwrap();

    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["firstName"], json!({ "type": "string" }));
    assert_eq!(schema["properties"]["updatedAt"]["oneOf"].as_array().unwrap().len(), 3);
}

#[test]
fn test_custom_engine_configuration() {
    let registry = SchemaRegistry::new();
    registry
        .register("contacts", json!({ "properties": { "email": { "bsonType": "string", "format": "email" } } }))
        .unwrap();

    let strict = Validator::new(registry.clone());
    assert!(strict.validate("contacts", &json!({ "email": "nope" })).is_err());

    let lenient = Validator::new(registry).with_engine(DraftEngine::new().with_format_validation(false));
    assert!(lenient.validate("contacts", &json!({ "email": "nope" })).is_ok());
}

#[test]
fn test_batch_validation_keeps_order() {
    let validator = users_validator();
    let mut broken = john();
    broken.remove("lastName");

    let documents = vec![john(), broken, john()];
    let results = validator.validate_batch("users", &documents).unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
}
