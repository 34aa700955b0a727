//! Stubs standing in for members whose subschema is decided statically.

use super::{Evaluator, EventContext, problem};
use crate::params;
use crate::problem::{MessageKey, ProblemDispatcher};
use crate::schema::Schema;
use crate::types::{Event, Outcome};

/// Rejects the value of an object member whose subschema can never pass:
/// `false` in positive mode, `true` or `{}` in negated mode.
pub(crate) struct RedundantProperty<'s> {
    name: String,
    schema: &'s Schema,
}

impl<'s> RedundantProperty<'s> {
    pub(crate) fn new(name: impl Into<String>, schema: &'s Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

impl Evaluator for RedundantProperty<'_> {
    fn evaluate(
        &mut self,
        _event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        dispatcher.dispatch_problem(problem(
            ctx,
            MessageKey::RedundantProperty,
            params! { "name" => self.name.as_str(), "schema" => self.schema.to_string() },
        ));
        Outcome::False
    }
}

/// The array element counterpart of [`RedundantProperty`].
pub(crate) struct RedundantItem<'s> {
    index: usize,
    schema: &'s Schema,
}

impl<'s> RedundantItem<'s> {
    pub(crate) fn new(index: usize, schema: &'s Schema) -> Self {
        Self { index, schema }
    }
}

impl Evaluator for RedundantItem<'_> {
    fn evaluate(
        &mut self,
        _event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        dispatcher.dispatch_problem(problem(
            ctx,
            MessageKey::RedundantItem,
            params! { "index" => self.index, "schema" => self.schema.to_string() },
        ));
        Outcome::False
    }
}
