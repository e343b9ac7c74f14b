//! Loading collection validators from the filesystem.
//!
//! Each `<collection>.json` file in a directory describes one collection. The
//! file holds either a MongoDB validator document (`{"$jsonSchema": {...}}`,
//! possibly next to query operators) or a bare `$jsonSchema` document. A
//! validator without `$jsonSchema` registers the collection as unvalidated.
//!
//! Filesystem access goes through [`FileSystem`] so loading can be tested
//! against an in-memory tree.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::registry::{RegistryError, SchemaRegistry};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Supplies the filesystem that validator files are read from.
pub trait SchemaEnv: Send + Sync {
    type Fs: FileSystem;

    fn filesystem(&self) -> &Self::Fs;
}

/// Read-only view of a directory tree.
pub trait FileSystem: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String, Self::Error>;

    /// Returns the paths directly inside `dir`.
    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, Self::Error>;
}

/// The operating system's filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    type Error = std::io::Error;

    fn read_to_string(&self, path: &Path) -> Result<String, Self::Error> {
        std::fs::read_to_string(path)
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, Self::Error> {
        std::fs::read_dir(dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect()
    }
}

impl SchemaEnv for OsFileSystem {
    type Fs = OsFileSystem;

    fn filesystem(&self) -> &Self::Fs {
        self
    }
}

/// Why a validator directory could not be loaded completely.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but does not describe a validator.
    #[error("{} is not a validator: {reason}", path.display())]
    NotAValidator { path: PathBuf, reason: &'static str },

    /// The file stem is not a usable collection name.
    #[error("no collection name in {}", .0.display())]
    CollectionName(PathBuf),

    #[error("cannot register {}: {source}", path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },

    /// Every failure from one directory load, in listing order.
    #[error("{} validator file(s) failed to load", .0.len())]
    Multiple(Vec<SchemaLoadError>),
}

impl SchemaRegistry {
    /// Registers every `<collection>.json` file found in a directory.
    ///
    /// Files that fail to load are reported together in
    /// [`SchemaLoadError::Multiple`]; the others are still registered. Entries
    /// without a `.json` extension are skipped.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bsonschema::effect::OsFileSystem;
    /// use bsonschema::SchemaRegistry;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.load_dir_with_env("./validators", &OsFileSystem).unwrap();
    /// ```
    pub fn load_dir_with_env<E: SchemaEnv>(
        &self,
        dir: impl AsRef<Path>,
        env: &E,
    ) -> Result<(), SchemaLoadError> {
        let dir = dir.as_ref();
        let fs = env.filesystem();
        let entries = fs.list_dir(dir).map_err(|e| SchemaLoadError::Read {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;

        let failures: Vec<SchemaLoadError> = entries
            .iter()
            .filter(|entry| entry.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|file| {
                let failure = self.load_validator_file(file, fs).err()?;
                warn!(file = %file.display(), error = %failure, "skipping validator file");
                Some(failure)
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SchemaLoadError::Multiple(failures))
        }
    }

    fn load_validator_file<Fs: FileSystem>(&self, file: &Path, fs: &Fs) -> Result<(), SchemaLoadError> {
        let collection = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| SchemaLoadError::CollectionName(file.to_path_buf()))?;

        let text = fs.read_to_string(file).map_err(|e| SchemaLoadError::Read {
            path: file.to_path_buf(),
            source: Box::new(e),
        })?;
        let validator: Value = serde_json::from_str(&text).map_err(|source| SchemaLoadError::Parse {
            path: file.to_path_buf(),
            source,
        })?;
        let schema = extract_json_schema(validator).map_err(|reason| SchemaLoadError::NotAValidator {
            path: file.to_path_buf(),
            reason,
        })?;

        debug!(collection, file = %file.display(), validated = schema.is_some(), "loaded validator");

        let registered = match schema {
            Some(schema) => self.register(collection, schema),
            None => self.register_unvalidated(collection),
        };
        registered.map_err(|source| SchemaLoadError::Registry {
            path: file.to_path_buf(),
            source,
        })
    }
}

/// Pulls the `$jsonSchema` out of a validator file.
///
/// Objects without a top-level `$jsonSchema` key and without any `$`-prefixed
/// operator are bare schemas. Objects with operators but no `$jsonSchema` are
/// query validators and carry no schema.
fn extract_json_schema(validator: Value) -> Result<Option<Value>, &'static str> {
    let Value::Object(mut validator) = validator else {
        return Err("expected a JSON object");
    };

    match validator.remove("$jsonSchema") {
        Some(schema @ Value::Object(_)) => Ok(Some(schema)),
        Some(_) => Err("$jsonSchema must be an object"),
        None if validator.keys().any(|key| key.starts_with('$')) => Ok(None),
        None => Ok(Some(Value::Object(validator))),
    }
}
