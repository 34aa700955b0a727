//! The evaluation protocol.
//!
//! An [`Evaluator`] consumes parsing events one at a time and answers with an
//! [`Outcome`]. Evaluators are built per run from an immutable
//! [`Schema`](crate::Schema) and hold all the mutable state of that run;
//! composites own their children and fold their outcomes.
//!
//! Depth is relative to the evaluator's own value: the event opening an
//! object or array and the event closing it are delivered at depth 0, member
//! names and direct member values at depth 1.

pub(crate) mod assertion;
pub(crate) mod collect;
mod context;
pub(crate) mod items;
mod logical;
pub(crate) mod properties;
pub(crate) mod redundant;

pub use context::{EventContext, PathTracker};
pub use logical::{LogicKind, LogicalBuilder, LogicalEvaluator};

use crate::problem::{MessageKey, Params, Problem, ProblemDispatcher};
use crate::types::{Event, InstanceType, Outcome};

/// A stateful, single-run consumer of parsing events.
pub trait Evaluator {
    /// Consume one event.
    ///
    /// Returns `Outcome::Pending` while undecided. Must not return `Pending`
    /// for the last event of the value this evaluator was created for.
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome;
}

/// An owned evaluator borrowing from a schema that outlives the run.
pub type BoxedEvaluator<'s> = Box<dyn Evaluator + 's>;

/// Evaluator that accepts any value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrue;

impl Evaluator for AlwaysTrue {
    fn evaluate(
        &mut self,
        _event: &Event<'_>,
        _ctx: &dyn EventContext,
        _depth: usize,
        _dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        Outcome::True
    }
}

/// Evaluator that rejects any value, optionally reporting one problem.
#[derive(Debug, Clone, Default)]
pub struct AlwaysFalse {
    problem: Option<(MessageKey, Params)>,
}

impl AlwaysFalse {
    pub fn new(key: MessageKey, params: Params) -> Self {
        Self {
            problem: Some((key, params)),
        }
    }

    /// Rejects without reporting anything.
    pub fn silent() -> Self {
        Self::default()
    }
}

impl Evaluator for AlwaysFalse {
    fn evaluate(
        &mut self,
        _event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        if let Some((key, params)) = self.problem.take() {
            dispatcher.dispatch_problem(problem(ctx, key, params));
        }
        Outcome::False
    }
}

/// Build a problem located at the current event.
pub(crate) fn problem(ctx: &dyn EventContext, key: MessageKey, params: Params) -> Problem {
    Problem::builder()
        .key(key)
        .params(params)
        .location(ctx.location())
        .pointer(ctx.pointer())
        .build()
}

/// The extent of the value an evaluator was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Scalar,
    Object,
    Array,
}

impl Scope {
    pub(crate) fn of(ty: InstanceType) -> Scope {
        match ty {
            InstanceType::Object => Scope::Object,
            InstanceType::Array => Scope::Array,
            InstanceType::Null
            | InstanceType::Boolean
            | InstanceType::Number
            | InstanceType::Integer
            | InstanceType::String => Scope::Scalar,
        }
    }

    /// Whether `event` at `depth` is the last event of the value.
    pub(crate) fn is_closed_by(self, event: &Event<'_>, depth: usize) -> bool {
        if depth != 0 {
            return false;
        }
        match self {
            Scope::Scalar => true,
            Scope::Object => matches!(event, Event::EndObject),
            Scope::Array => matches!(event, Event::EndArray),
        }
    }
}
