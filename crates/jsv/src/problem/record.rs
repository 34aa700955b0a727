use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;
use serde::Serialize;

use super::{MessageKey, ParamValue, Params};
use crate::types::Location;

/// One validation failure.
///
/// A problem is write-once: evaluators build it, dispatch it, and never
/// touch it again. Problems reported by a failed `anyOf`/`oneOf` carry the
/// problems of each failed alternative as `branches`.
///
/// # Example
///
/// ```
/// use jsv::{Location, MessageKey, ParamValue, Problem, params};
///
/// let problem = Problem::builder()
///     .key(MessageKey::RedundantProperty)
///     .params(params! { "name" => "b", "schema" => "false" })
///     .location(Location::new(1, 10, 9))
///     .pointer("/b")
///     .build();
///
/// assert_eq!(problem.key(), MessageKey::RedundantProperty);
/// assert_eq!(problem.param("name").and_then(ParamValue::as_string), Some("b"));
/// assert_eq!(
///     problem.to_string(),
///     "[1:10] /b: instance.problem.redundant.property (name=b, schema=false)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize)]
#[builder(on(String, into))]
pub struct Problem {
    /// Message catalog key.
    key: MessageKey,

    /// Named message parameters.
    #[builder(default)]
    params: Params,

    /// Where in the instance text the problem was detected.
    location: Location,

    /// JSON pointer of the offending value; empty for the document root.
    #[builder(default)]
    pointer: String,

    /// Problems of each failed alternative, for `anyOf`/`oneOf` failures.
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    branches: Vec<Vec<Problem>>,
}

impl Problem {
    pub fn key(&self) -> MessageKey {
        self.key
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Get one named parameter.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn branches(&self) -> &[Vec<Problem>] {
        &self.branches
    }

    /// Whether this problem reports alternatives that all failed.
    pub fn has_branches(&self) -> bool {
        !self.branches.is_empty()
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let pointer = if self.pointer.is_empty() {
            "(root)"
        } else {
            &self.pointer
        };
        write!(f, "[{}] {}: {}", self.location, pointer, self.key)?;
        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, (name, value)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{name}={value}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
