use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde_json::{Map, Value as Json};

use super::KeywordKind;
use super::keyword::Keyword;
use crate::evaluator::{AlwaysFalse, AlwaysTrue, BoxedEvaluator, LogicKind, LogicalBuilder};
use crate::params;
use crate::problem::MessageKey;
use crate::types::InstanceType;

/// A compiled JSON Schema.
///
/// Schemas are immutable once built and are shared through [`Arc`] by any
/// number of concurrent validation runs. Each run builds its own evaluator
/// tree with [`Schema::create_evaluator`] or
/// [`Schema::create_negated_evaluator`].
///
/// # Example
///
/// ```
/// use jsv::Schema;
///
/// assert!(Schema::True.is_always_true());
/// assert!(Schema::Empty.is_always_true());
/// assert!(Schema::False.is_always_false());
/// assert_eq!(Schema::Empty.to_string(), "{}");
/// ```
#[derive(Debug)]
pub enum Schema {
    /// The `true` schema, accepting every instance.
    True,
    /// The `false` schema, rejecting every instance.
    False,
    /// The `{}` schema, accepting every instance.
    Empty,
    /// Keywords without subschemas.
    Simple(SchemaNode),
    /// Keywords, at least one of which holds subschemas.
    Complex(SchemaNode),
}

/// The keywords of a non-trivial schema.
#[derive(Debug)]
pub struct SchemaNode {
    pub(crate) keywords: Vec<Keyword>,
    pub(crate) declared: Vec<KeywordKind>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) default: Option<Json>,
    pub(crate) json: Json,
}

impl Schema {
    /// A shared `true` schema.
    pub fn always_true() -> Arc<Schema> {
        Arc::new(Schema::True)
    }

    /// A shared `false` schema.
    pub fn always_false() -> Arc<Schema> {
        Arc::new(Schema::False)
    }

    /// Whether every instance is valid against this schema without looking
    /// at it.
    pub fn is_always_true(&self) -> bool {
        matches!(self, Schema::True | Schema::Empty)
    }

    /// Whether no instance is valid against this schema.
    pub fn is_always_false(&self) -> bool {
        matches!(self, Schema::False)
    }

    fn node(&self) -> Option<&SchemaNode> {
        match self {
            Schema::Simple(node) | Schema::Complex(node) => Some(node),
            Schema::True | Schema::False | Schema::Empty => None,
        }
    }

    /// Whether the schema declares keyword `name`.
    pub fn contains_keyword(&self, name: &str) -> bool {
        let Some(kind) = KeywordKind::from_name(name) else {
            return false;
        };
        self.node().is_some_and(|node| node.declared.contains(&kind))
    }

    pub fn title(&self) -> Option<&str> {
        self.node().and_then(|node| node.title.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        self.node().and_then(|node| node.description.as_deref())
    }

    pub fn default_value(&self) -> Option<&Json> {
        self.node().and_then(|node| node.default.as_ref())
    }

    /// The schema as a JSON document.
    pub fn to_json(&self) -> Json {
        match self {
            Schema::True => Json::Bool(true),
            Schema::False => Json::Bool(false),
            Schema::Empty => Json::Object(Map::new()),
            Schema::Simple(node) | Schema::Complex(node) => node.json.clone(),
        }
    }

    /// Create the evaluator validating a value of type `ty` against this
    /// schema.
    pub fn create_evaluator(&self, ty: InstanceType) -> BoxedEvaluator<'_> {
        match self {
            Schema::True | Schema::Empty => Box::new(AlwaysTrue),
            Schema::False => Box::new(AlwaysFalse::new(MessageKey::False, params! {})),
            Schema::Simple(node) | Schema::Complex(node) => {
                let mut builder = LogicalBuilder::new(LogicKind::Conjunction, ty);
                builder.extend(
                    node.keywords
                        .iter()
                        .filter_map(|keyword| keyword.create_evaluator(ty)),
                );
                builder.build()
            }
        }
    }

    /// Create the evaluator validating that a value of type `ty` does not
    /// match this schema.
    pub fn create_negated_evaluator(&self, ty: InstanceType) -> BoxedEvaluator<'_> {
        match self {
            Schema::True | Schema::Empty => Box::new(self.not_problem()),
            Schema::False => Box::new(AlwaysTrue),
            Schema::Simple(node) | Schema::Complex(node) => {
                let mut builder = LogicalBuilder::new(LogicKind::Disjunction, ty);
                builder.extend(
                    node.keywords
                        .iter()
                        .filter_map(|keyword| keyword.create_negated_evaluator(ty)),
                );
                if builder.is_empty() {
                    return Box::new(self.not_problem());
                }
                builder.build()
            }
        }
    }

    fn not_problem(&self) -> AlwaysFalse {
        AlwaysFalse::new(MessageKey::Not, params! { "schema" => self.to_string() })
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Schema::True => f.write_str("true"),
            Schema::False => f.write_str("false"),
            Schema::Empty => f.write_str("{}"),
            Schema::Simple(node) | Schema::Complex(node) => write!(f, "{}", node.json),
        }
    }
}
