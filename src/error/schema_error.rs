//! Schema violation types.
//!
//! This module provides [`SchemaError`] for a single rule a document broke and
//! [`SchemaErrors`] for the full, non-empty list reported by one validation.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::JsonPath;

/// A single schema violation with its location in the document.
///
/// - **path**: Where in the Extended JSON document the violation occurred
/// - **message**: The validator's human-readable description
/// - **got**: The offending value, rendered as JSON (optional)
/// - **code**: Machine-readable name of the broken rule (e.g., `required`)
///
/// # Example
///
/// ```rust
/// use bsonschema::{JsonPath, SchemaError};
///
/// let error = SchemaError::new(JsonPath::root(), "\"firstName\" is a required property")
///     .with_code("required");
///
/// assert_eq!(error.code, "required");
/// assert_eq!(error.to_string(), "(root): \"firstName\" is a required property");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// The path to the value that failed validation.
    pub path: JsonPath,
    /// Human-readable description of the violation.
    pub message: String,
    /// The actual value that was received (formatted as JSON).
    pub got: Option<String>,
    /// Machine-readable rule name.
    pub code: String,
}

impl SchemaError {
    /// Creates a new violation with the given path and message.
    ///
    /// The code defaults to "validation_error".
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            code: "validation_error".to_string(),
        }
    }

    /// Sets the rule code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the offending value and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for SchemaError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
};

/// All violations reported for one document, in the validator's order.
///
/// Wraps a `NonEmptyVec<SchemaError>`: a failed validation always carries at
/// least one violation. Lists can be merged through `Semigroup`:
///
/// ```rust
/// use bsonschema::{JsonPath, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let missing = SchemaErrors::single(
///     SchemaError::new(JsonPath::root(), "\"_id\" is a required property")
/// );
/// let wrong_type = SchemaErrors::single(
///     SchemaError::new(JsonPath::from_field("firstName"), "null is not of type \"string\"")
/// );
///
/// let combined = missing.combine(wrong_type);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Creates a `SchemaErrors` containing a single violation.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `SchemaErrors` from a `NonEmptyVec` of violations.
    pub fn from_non_empty(errors: NonEmptyVec<SchemaError>) -> Self {
        Self(errors)
    }

    /// Collects violations, returning `None` when there are none.
    pub fn from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let first = Self::single(errors.next()?);
        Some(errors.fold(first, |acc, error| acc.combine(Self::single(error))))
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the violations.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns all violations at the specified path.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all violations with the specified rule code.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the human-readable descriptions in reported order.
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// Returns the first violation.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<SchemaError>`.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "document failed schema validation with {} violation(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaErrors>();
    assert_sync::<SchemaErrors>();
};
