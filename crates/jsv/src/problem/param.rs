use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use serde_json::Value as Json;

use crate::types::InstanceType;

/// Named parameters attached to a problem, ordered by name.
pub type Params = BTreeMap<String, ParamValue>;

/// A parameter value attached to a problem.
///
/// Parameters feed message templates, so they stay close to what a catalog
/// can interpolate: numbers, strings, booleans, and lists of those.
///
/// # Example
///
/// ```
/// use jsv::ParamValue;
///
/// let limit: ParamValue = 3.into();
/// let names: ParamValue = vec!["a", "b"].into();
/// assert_eq!(limit.as_integer(), Some(3));
/// assert_eq!(names.to_string(), "[a, b]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// A numeric parameter, integral when the value has no fractional part.
    pub fn number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            ParamValue::Integer(value as i64)
        } else {
            ParamValue::Float(value)
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is numeric.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ParamValue::Integer(n) => write!(f, "{n}"),
            ParamValue::Float(n) => write!(f, "{n}"),
            ParamValue::String(s) => write!(f, "{s}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Integer(n as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        ParamValue::Integer(n as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(n: usize) -> Self {
        ParamValue::Integer(n as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Float(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<InstanceType> for ParamValue {
    fn from(t: InstanceType) -> Self {
        ParamValue::String(t.name().to_string())
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

// Numbers keep their integer form when they have one; objects are carried
// as their JSON text.
impl From<&Json> for ParamValue {
    fn from(value: &Json) -> Self {
        match value {
            Json::Null => ParamValue::String("null".to_string()),
            Json::Bool(b) => ParamValue::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Integer(i),
                None => ParamValue::number(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => ParamValue::String(s.clone()),
            Json::Array(items) => ParamValue::List(items.iter().map(ParamValue::from).collect()),
            Json::Object(_) => ParamValue::String(value.to_string()),
        }
    }
}
