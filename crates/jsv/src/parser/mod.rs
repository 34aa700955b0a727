//! Streaming JSON event source.
//!
//! This module turns JSON text into the [`Event`](crate::Event) sequence the
//! evaluation engine consumes, one event per call, without building a
//! document tree. Token recognition uses winnow; the structural state
//! machine lives in [`JsonParser`].

pub mod error;
mod json;

pub use error::ParseError;
pub use json::{JsonParser, parse_events};
