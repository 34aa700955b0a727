use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::InstanceType;

/// A single parsing event consumed by evaluators.
///
/// Events are produced by an event source in document order. String data is
/// borrowed from the source text whenever it contains no escape sequences;
/// number literals are always borrowed verbatim.
///
/// # Example
///
/// ```
/// use jsv::{Event, InstanceType};
///
/// let event = Event::Number("42");
/// assert_eq!(event.instance_type(), Some(InstanceType::Integer));
/// assert_eq!(event.as_f64(), Some(42.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// An object member name.
    Key(Cow<'a, str>),
    /// A string value.
    String(Cow<'a, str>),
    /// A number value, as written in the source.
    Number(&'a str),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

impl Event<'_> {
    /// Whether this event opens a container.
    pub fn is_start(&self) -> bool {
        matches!(self, Event::StartObject | Event::StartArray)
    }

    /// Whether this event closes a container.
    pub fn is_end(&self) -> bool {
        matches!(self, Event::EndObject | Event::EndArray)
    }

    /// Whether this event is a scalar value.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Event::String(_) | Event::Number(_) | Event::Bool(_) | Event::Null
        )
    }

    /// Whether this event begins a value: a scalar or a container opening.
    pub fn is_value(&self) -> bool {
        self.is_start() || self.is_scalar()
    }

    /// The instance type of the value this event begins.
    ///
    /// Returns `None` for closing events and member names.
    pub fn instance_type(&self) -> Option<InstanceType> {
        match self {
            Event::StartObject => Some(InstanceType::Object),
            Event::StartArray => Some(InstanceType::Array),
            Event::String(_) => Some(InstanceType::String),
            Event::Bool(_) => Some(InstanceType::Boolean),
            Event::Null => Some(InstanceType::Null),
            Event::Number(literal) => Some(InstanceType::of_number(literal)),
            Event::EndObject | Event::EndArray | Event::Key(_) => None,
        }
    }

    /// The text carried by a `Key` or `String` event.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Event::Key(s) | Event::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// The numeric value carried by a `Number` event.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Event::Number(literal) => literal.parse().ok(),
            _ => None,
        }
    }
}

impl Display for Event<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Event::StartObject => write!(f, "{{"),
            Event::EndObject => write!(f, "}}"),
            Event::StartArray => write!(f, "["),
            Event::EndArray => write!(f, "]"),
            Event::Key(name) => write!(f, "key {name:?}"),
            Event::String(s) => write!(f, "{s:?}"),
            Event::Number(literal) => write!(f, "{literal}"),
            Event::Bool(b) => write!(f, "{b}"),
            Event::Null => write!(f, "null"),
        }
    }
}
