//! Error types for schema loading and declaration generation.

use std::path::PathBuf;

use thiserror::Error;

use crate::generator::Context;

/// A single declaration could not be produced.
///
/// Raised by a generator and contained by the dispatcher, which turns it into an error
/// diagnostic for that node only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The variant has no form for this context
    #[error("'{variant}' cannot be generated in {context} context")]
    InvalidContext {
        /// Descriptor variant
        variant: &'static str,
        /// Requested context
        context: Context,
    },

    /// A standalone declaration needs a name
    #[error("'{variant}' declaration in {context} context has neither id nor name")]
    MissingIdentifier {
        /// Descriptor variant
        variant: &'static str,
        /// Requested context
        context: Context,
    },

    /// A named union needs an id
    #[error("union in {context} context has no id")]
    UnionWithoutId {
        /// Requested context
        context: Context,
    },

    /// Only string, number and boolean literals are representable
    #[error("invalid static value '{value}'")]
    InvalidStaticValue {
        /// The value as written in the schema
        value: String,
    },

    /// No variant matched
    #[error("unable to classify descriptor {label}")]
    Unclassifiable {
        /// Identifier or abbreviated JSON of the node
        label: String,
    },

    /// Every choice of a union failed
    #[error("union '{label}' has no representable choices")]
    EmptyUnion {
        /// Identifier or abbreviated JSON of the union
        label: String,
    },

    /// An event that needs both extra listener parameters and shifted callback signatures
    #[error(
        "event '{name}' declares extra listener parameters and optional leading callback parameters"
    )]
    ConflictingEventShapes {
        /// Event name
        name: String,
    },
}

/// The schema directory could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path is not a directory
    #[error("schema directory '{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),

    /// Listing the directory failed
    #[error("failed to list schema directory '{}': {source}", path.display())]
    ReadDirectory {
        /// Directory being listed
        path: PathBuf,
        /// Underlying walk error
        #[source]
        source: walkdir::Error,
    },

    /// A schema file could not be read
    #[error("failed to read schema file '{}': {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
