//! Error and warning types for reading schemas.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that make a schema document unusable.
///
/// `path` is the JSON pointer of the offending subschema within the
/// document, rendered after a `#`.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is not valid JSON.
    #[error("invalid JSON at {line}:{column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    /// A subschema is neither an object nor a boolean.
    #[error("#{path}: a schema must be an object or a boolean")]
    NotASchema { path: String },

    /// A keyword value has the wrong shape.
    #[error("#{path}: invalid value for '{keyword}': {message}")]
    InvalidKeyword {
        path: String,
        keyword: String,
        message: String,
    },

    /// A `pattern` or `patternProperties` key is not a valid regex.
    #[error("#{path}: invalid regular expression '{pattern}': {message}")]
    InvalidRegex {
        path: String,
        pattern: String,
        message: String,
    },

    /// An unknown keyword, rejected in strict mode.
    #[error("#{path}: unknown keyword '{name}'{}", format_suggestions(suggestions))]
    UnknownKeyword {
        path: String,
        name: String,
        suggestions: Vec<&'static str>,
    },
}

/// Errors that occur while loading a schema from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading the schema file.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but does not hold a usable schema.
    #[error("{}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

/// Non-fatal findings reported while reading a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadWarning {
    /// A keyword the reader does not know, ignored outside strict mode.
    #[error("#{path}: unknown keyword '{name}'{}", format_suggestions(suggestions))]
    UnknownKeyword {
        path: String,
        name: String,
        suggestions: Vec<&'static str>,
    },
}

fn format_suggestions(suggestions: &[&str]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}
