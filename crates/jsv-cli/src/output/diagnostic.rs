//! Miette diagnostic wrapper for JSON syntax errors.

use std::path::Path;

use jsv::{ParseError, SchemaError};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic for malformed JSON input.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(jsv::syntax))]
pub struct JsvDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl JsvDiagnostic {
    /// Create a diagnostic from an instance document's parse error.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        Self::at_offset(path, content, err.location().offset, err.detail())
    }

    /// Create a diagnostic for a schema file that is not valid JSON.
    ///
    /// Returns `None` for schema errors that have no position in the text.
    pub fn from_schema_error(path: &Path, content: &str, err: &SchemaError) -> Option<Self> {
        let SchemaError::InvalidJson {
            line,
            column,
            message,
        } = err
        else {
            return None;
        };
        let offset = line_column_offset(content, *line, *column);
        let mut diagnostic = Self::at_offset(path, content, offset, message.clone());
        diagnostic.help = Some("schema files must hold a single JSON object or boolean".into());
        Some(diagnostic)
    }

    fn at_offset(path: &Path, content: &str, offset: usize, message: String) -> Self {
        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = offset.min(content.len());

        JsvDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message,
            help: None,
        }
    }
}

/// Convert a 1-based line and column to a byte offset.
fn line_column_offset(content: &str, line: usize, column: usize) -> usize {
    content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>()
        + column.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_column_map_to_offsets() {
        let content = "{\n  \"a\": x\n}";
        assert_eq!(line_column_offset(content, 1, 1), 0);
        assert_eq!(line_column_offset(content, 2, 8), 9);
    }

    #[test]
    fn crlf_line_endings_count_both_bytes() {
        let content = "{\r\n  \"a\": 1,\r\n  \"b\": x\r\n}";
        assert_eq!(line_column_offset(content, 3, 8), 21);
        assert_eq!(&content[21..22], "x");
    }

    #[test]
    fn only_json_errors_have_a_position() {
        let err = SchemaError::NotASchema {
            path: String::new(),
        };
        assert!(JsvDiagnostic::from_schema_error(Path::new("s.json"), "[]", &err).is_none());
    }
}
