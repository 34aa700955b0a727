//! Compiled schemas and the reader that builds them.
//!
//! A [`Schema`] is an immutable tree of keywords shared through `Arc`. It
//! is read from JSON with [`SchemaReader`] or assembled in code with
//! [`SchemaBuilder`], and creates a fresh evaluator tree for each
//! validation run.

mod builder;
pub mod error;
mod kind;
pub(crate) mod keyword;
mod node;
mod reader;

pub use builder::SchemaBuilder;
pub use error::{LoadError, ReadWarning, SchemaError};
pub use kind::{KeywordCategory, KeywordKind, compute_suggestions};
pub use node::{Schema, SchemaNode};
pub use reader::{ReaderOptions, SchemaReader};
