use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// The JSON Schema type of an instance value.
///
/// `Integer` is a refinement of `Number`: a number literal whose value has
/// no fractional part is reported as `Integer`, and it satisfies both
/// `"type": "integer"` and `"type": "number"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    Integer,
    String,
}

impl InstanceType {
    /// Resolve a type name as written in a schema.
    pub fn from_name(name: &str) -> Option<InstanceType> {
        match name {
            "null" => Some(InstanceType::Null),
            "boolean" => Some(InstanceType::Boolean),
            "object" => Some(InstanceType::Object),
            "array" => Some(InstanceType::Array),
            "number" => Some(InstanceType::Number),
            "integer" => Some(InstanceType::Integer),
            "string" => Some(InstanceType::String),
            _ => None,
        }
    }

    /// The name of this type as written in a schema.
    pub fn name(self) -> &'static str {
        match self {
            InstanceType::Null => "null",
            InstanceType::Boolean => "boolean",
            InstanceType::Object => "object",
            InstanceType::Array => "array",
            InstanceType::Number => "number",
            InstanceType::Integer => "integer",
            InstanceType::String => "string",
        }
    }

    /// Classify a number literal.
    pub fn of_number(literal: &str) -> InstanceType {
        match literal.parse::<f64>() {
            Ok(value) if value.is_finite() && value.fract() == 0.0 => InstanceType::Integer,
            _ => InstanceType::Number,
        }
    }

    /// Whether a value of this type satisfies a schema declaring `declared`.
    pub fn satisfies(self, declared: InstanceType) -> bool {
        self == declared || (self == InstanceType::Integer && declared == InstanceType::Number)
    }

    /// Whether this is a numeric type.
    pub fn is_numeric(self) -> bool {
        matches!(self, InstanceType::Number | InstanceType::Integer)
    }
}

impl Display for InstanceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}
