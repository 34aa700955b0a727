//! Rebuilding values from events, for keywords that compare whole values.

use serde_json::{Map, Number, Value as Json};

use crate::types::Event;

enum Partial {
    Object(Map<String, Json>, Option<String>),
    Array(Vec<Json>),
}

/// Builds a JSON value from the events of one instance value.
#[derive(Default)]
pub(crate) struct ValueCollector {
    stack: Vec<Partial>,
}

impl ValueCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Consume one event; returns the value once its last event was seen.
    pub(crate) fn push(&mut self, event: &Event<'_>) -> Option<Json> {
        let value = match event {
            Event::StartObject => {
                self.stack.push(Partial::Object(Map::new(), None));
                return None;
            }
            Event::StartArray => {
                self.stack.push(Partial::Array(Vec::new()));
                return None;
            }
            Event::Key(name) => {
                if let Some(Partial::Object(_, key)) = self.stack.last_mut() {
                    *key = Some(name.to_string());
                }
                return None;
            }
            Event::EndObject | Event::EndArray => match self.stack.pop() {
                Some(Partial::Object(map, _)) => Json::Object(map),
                Some(Partial::Array(items)) => Json::Array(items),
                None => return None,
            },
            Event::String(s) => Json::String(s.to_string()),
            Event::Number(literal) => number_value(literal),
            Event::Bool(b) => Json::Bool(*b),
            Event::Null => Json::Null,
        };
        match self.stack.last_mut() {
            None => Some(value),
            Some(Partial::Array(items)) => {
                items.push(value);
                None
            }
            Some(Partial::Object(map, key)) => {
                if let Some(key) = key.take() {
                    map.insert(key, value);
                }
                None
            }
        }
    }
}

fn number_value(literal: &str) -> Json {
    literal.parse::<Number>().map_or_else(
        |_| Json::from(literal.parse::<f64>().unwrap_or(f64::NAN)),
        Json::Number,
    )
}

/// JSON equality, comparing numbers by value (`1` equals `1.0`).
pub(crate) fn json_eq(a: &Json, b: &Json) -> bool {
    match (a, b) {
        (Json::Number(x), Json::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Json::Array(x), Json::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_eq(x, y))
        }
        (Json::Object(x), Json::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}
