//! Environment-backed loading of collection validators.
//!
//! This module lets a [`SchemaRegistry`](crate::SchemaRegistry) be filled from a
//! directory of validator files instead of a live database. Filesystem access
//! is injected through [`SchemaEnv`] and [`FileSystem`].
//!
//! # Feature Flag
//!
//! This module is only available when the `effect` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use bsonschema::effect::OsFileSystem;
//! use bsonschema::{SchemaRegistry, Validator};
//!
//! let registry = SchemaRegistry::new();
//! registry.load_dir_with_env("./validators", &OsFileSystem)?;
//!
//! let validator = Validator::new(registry);
//! ```

pub mod loading;

pub use loading::{FileSystem, OsFileSystem, SchemaEnv, SchemaLoadError};
