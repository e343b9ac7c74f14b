//! Standard JSON Schema validation of translated schemas.
//!
//! [`JsonSchemaEngine`] compiles a schema produced by [`rewrite`](crate::rewrite)
//! and [`CompiledSchema`] checks documents against it, reporting every violation
//! as a [`SchemaError`]. [`DraftEngine`] is the default implementation, backed
//! by the `jsonschema` crate.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, ValidationError};
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaCompileError, SchemaError, SchemaErrors};
use crate::path::JsonPath;
use crate::ValidationResult;

/// Compiles JSON Schema documents.
pub trait JsonSchemaEngine: Send + Sync {
    /// The compiled form of a schema.
    type Compiled: CompiledSchema;

    /// Compiles a standard JSON Schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaCompileError`] if `schema` is not a valid JSON Schema,
    /// for example when it still names a BSON-only type such as `int`.
    fn compile(&self, schema: &Value) -> Result<Self::Compiled, SchemaCompileError>;
}

/// A schema ready to check documents.
pub trait CompiledSchema: Send + Sync {
    /// Checks a document, accumulating every violation in reported order.
    fn check(&self, document: &Value) -> ValidationResult<()>;
}

/// JSON Schema engine for a fixed draft.
///
/// Defaults to draft 7 with format validation enabled. Formats the engine does
/// not know (such as the `datetime` format emitted for BSON dates) are ignored.
///
/// # Example
///
/// ```rust
/// use bsonschema::{CompiledSchema, DraftEngine, JsonSchemaEngine};
/// use serde_json::json;
///
/// let engine = DraftEngine::new();
/// let schema = engine.compile(&json!({ "type": "object", "required": ["name"] })).unwrap();
///
/// assert!(schema.check(&json!({ "name": "Ada" })).is_success());
/// assert!(schema.check(&json!({})).is_failure());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DraftEngine {
    draft: Draft,
    validate_formats: bool,
}

impl DraftEngine {
    /// Creates a draft 7 engine with format validation enabled.
    pub fn new() -> Self {
        Self {
            draft: Draft::Draft7,
            validate_formats: true,
        }
    }

    /// Selects the JSON Schema draft.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = draft;
        self
    }

    /// Enables or disables `format` assertions.
    pub fn with_format_validation(mut self, enabled: bool) -> Self {
        self.validate_formats = enabled;
        self
    }

    /// Returns the configured draft.
    pub fn draft(&self) -> Draft {
        self.draft
    }
}

impl Default for DraftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSchemaEngine for DraftEngine {
    type Compiled = DraftSchema;

    fn compile(&self, schema: &Value) -> Result<Self::Compiled, SchemaCompileError> {
        let validator = jsonschema::options()
            .with_draft(self.draft)
            .should_validate_formats(self.validate_formats)
            .build(schema)
            .map_err(|e| SchemaCompileError::new(e.to_string()))?;

        Ok(DraftSchema { validator })
    }
}

/// A schema compiled by [`DraftEngine`].
pub struct DraftSchema {
    validator: jsonschema::Validator,
}

impl CompiledSchema for DraftSchema {
    fn check(&self, document: &Value) -> ValidationResult<()> {
        let errors: Vec<SchemaError> = self
            .validator
            .iter_errors(document)
            .map(|error| to_schema_error(&error, document))
            .collect();

        match SchemaErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        }
    }
}

fn to_schema_error(error: &ValidationError<'_>, document: &Value) -> SchemaError {
    let path = JsonPath::from_pointer(&error.instance_path.to_string(), document);

    SchemaError::new(path, error.to_string())
        .with_code(error_code(&error.kind))
        .with_got(error.instance.to_string())
}

/// Maps the engine's error kind onto a stable rule code.
fn error_code(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::OneOfNotValid { .. } => "one_of_not_valid",
        ValidationErrorKind::OneOfMultipleValid { .. } => "one_of_multiple_valid",
        ValidationErrorKind::AdditionalProperties { .. } => "additional_properties",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::Pattern { .. } => "pattern",
        _ => "validation_error",
    }
}
