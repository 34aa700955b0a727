//! Parse error types for the JSON event source.

use thiserror::Error;

use crate::types::Location;

/// An error that stops the event source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {location}: {message}")]
    Syntax { location: Location, message: String },

    /// Unexpected end of input.
    #[error("unexpected end of input at {location}")]
    UnexpectedEof { location: Location },
}

impl ParseError {
    /// Where the error was detected.
    pub fn location(&self) -> Location {
        match self {
            ParseError::Syntax { location, .. } | ParseError::UnexpectedEof { location } => {
                *location
            }
        }
    }

    /// The error description without its location.
    pub fn detail(&self) -> String {
        match self {
            ParseError::Syntax { message, .. } => message.clone(),
            ParseError::UnexpectedEof { .. } => "unexpected end of input".to_string(),
        }
    }
}
