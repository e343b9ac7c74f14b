//! Locations of violations inside a validated document.
//!
//! JSON Schema validators report locations as JSON pointers (`/tags/0/name`).
//! A pointer alone cannot tell an array index from an object key that happens
//! to be numeric, so [`JsonPath::from_pointer`] resolves it against the
//! document it points into.

use std::fmt::{self, Display};

use serde_json::Value;

/// A segment of a document path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field of an object (e.g., `createdAt`, `$date`)
    Field(String),
    /// An element of an array (e.g., `[0]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A path to a value in a document, rendered like `tags[0].name`.
///
/// # Example
///
/// ```rust
/// use bsonschema::JsonPath;
/// use serde_json::json;
///
/// let document = json!({ "tags": [{ "name": 1 }] });
/// let path = JsonPath::from_pointer("/tags/0/name", &document);
///
/// assert_eq!(path.to_string(), "tags[0].name");
/// assert_eq!(path, JsonPath::root().push_field("tags").push_index(0).push_field("name"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Resolves an RFC 6901 JSON pointer against `document`.
    ///
    /// A token becomes an [`PathSegment::Index`] only when the value it is
    /// applied to is an array and the token is a valid index. Once the pointer
    /// leaves the document every remaining token is treated as a field.
    pub fn from_pointer(pointer: &str, document: &Value) -> Self {
        let mut segments = Vec::new();
        let mut current = Some(document);

        for raw in pointer.split('/').skip(1) {
            let token = raw.replace("~1", "/").replace("~0", "~");

            match (current, token.parse::<usize>()) {
                (Some(Value::Array(items)), Ok(index)) => {
                    current = items.get(index);
                    segments.push(PathSegment::Index(index));
                }
                (node, _) => {
                    current = node.and_then(|node| node.get(token.as_str()));
                    segments.push(PathSegment::Field(token));
                }
            }
        }

        Self { segments }
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Renders the path back into a JSON pointer.
    pub fn to_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => format!("/{}", name.replace('~', "~0").replace('/', "~1")),
                PathSegment::Index(idx) => format!("/{}", idx),
            })
            .collect()
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
