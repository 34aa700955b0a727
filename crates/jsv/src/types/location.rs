use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// A position in the source text of an instance document.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
/// `offset` is the 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.line, self.column)
    }
}
