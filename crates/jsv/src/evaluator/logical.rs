//! Logical combinators over child evaluators.

use tracing::trace;

use super::{AlwaysFalse, AlwaysTrue, BoxedEvaluator, Evaluator, EventContext, Scope, problem};
use crate::params;
use crate::problem::{MessageKey, Problem, ProblemDispatcher, ProblemList};
use crate::types::{Event, InstanceType, Outcome};

/// The boolean rule a [`LogicalEvaluator`] folds its children with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicKind {
    /// True iff every child is true (`allOf`, a schema's keyword set).
    Conjunction,
    /// True iff at least one child is true (`anyOf`).
    Disjunction,
    /// True iff exactly one child is true (`oneOf`).
    ExclusiveDisjunction,
    /// True iff the number of true children is not exactly one.
    NegatedExclusiveDisjunction,
}

impl LogicKind {
    /// Whether children report straight to the caller instead of into a
    /// per-branch buffer.
    fn dispatches_directly(self) -> bool {
        self == LogicKind::Conjunction
    }
}

struct Branch<'s> {
    evaluator: BoxedEvaluator<'s>,
    outcome: Outcome,
    problems: ProblemList,
}

/// A composite evaluator folding the outcomes of its children.
///
/// Every undecided child receives every event. The combinator decides as
/// soon as its rule is settled, or at the last event of its value:
///
/// - a conjunction gathers every child's problems and finalizes at the
///   closing event;
/// - a disjunction is true at the first true child, dropping the problems
///   its other branches buffered;
/// - an exclusive disjunction fails at the second true child with a
///   `oneOf.over` problem carrying the count.
///
/// A failed disjunction reports its branches: nothing when no branch has
/// problems, the problems themselves when exactly one has, otherwise a
/// single problem carrying every non-empty branch.
pub struct LogicalEvaluator<'s> {
    kind: LogicKind,
    scope: Scope,
    branches: Vec<Branch<'s>>,
    true_count: usize,
    false_count: usize,
}

impl<'s> LogicalEvaluator<'s> {
    /// Create a combinator with no children for a value of type `ty`.
    pub fn new(kind: LogicKind, ty: InstanceType) -> Self {
        Self {
            kind,
            scope: Scope::of(ty),
            branches: Vec::new(),
            true_count: 0,
            false_count: 0,
        }
    }

    pub fn kind(&self) -> LogicKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Add a child. It receives only the events fed after this call.
    pub fn append(&mut self, evaluator: BoxedEvaluator<'s>) {
        self.branches.push(Branch {
            evaluator,
            outcome: Outcome::Pending,
            problems: ProblemList::new(),
        });
    }

    /// Feed one event to every undecided child.
    ///
    /// Returns the combinator's outcome if its rule was settled early.
    pub fn feed(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Option<Outcome> {
        let direct = self.kind.dispatches_directly();
        for index in 0..self.branches.len() {
            let branch = &mut self.branches[index];
            if branch.outcome.is_decided() {
                continue;
            }
            let outcome = if direct {
                branch.evaluator.evaluate(event, ctx, depth, dispatcher)
            } else {
                branch
                    .evaluator
                    .evaluate(event, ctx, depth, &mut branch.problems)
            };
            branch.outcome = outcome;
            match outcome {
                Outcome::True => self.true_count += 1,
                Outcome::False => self.false_count += 1,
                Outcome::Pending => {}
            }
            if let Some(decided) = self.decide_early(ctx, dispatcher) {
                trace!(kind = ?self.kind, branch = index, ?decided, "combinator decided early");
                return Some(decided);
            }
        }
        None
    }

    fn decide_early(
        &mut self,
        ctx: &dyn EventContext,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Option<Outcome> {
        match self.kind {
            LogicKind::Conjunction => None,
            LogicKind::Disjunction => (self.true_count > 0).then_some(Outcome::True),
            LogicKind::ExclusiveDisjunction if self.true_count > 1 => {
                dispatcher.dispatch_problem(problem(
                    ctx,
                    MessageKey::OneOfOver,
                    params! { "valid" => self.true_count },
                ));
                Some(Outcome::False)
            }
            LogicKind::ExclusiveDisjunction => None,
            LogicKind::NegatedExclusiveDisjunction => {
                (self.true_count > 1).then_some(Outcome::True)
            }
        }
    }

    /// Finalize at the last event of the value.
    pub fn finish(
        &mut self,
        ctx: &dyn EventContext,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        match self.kind {
            LogicKind::Conjunction => Outcome::from(self.false_count == 0),
            LogicKind::Disjunction if self.true_count > 0 => Outcome::True,
            LogicKind::Disjunction => {
                self.report_branches(MessageKey::AnyOf, ctx, dispatcher);
                Outcome::False
            }
            LogicKind::ExclusiveDisjunction if self.true_count == 1 => Outcome::True,
            LogicKind::ExclusiveDisjunction => {
                self.report_branches(MessageKey::OneOf, ctx, dispatcher);
                Outcome::False
            }
            LogicKind::NegatedExclusiveDisjunction if self.true_count == 1 => {
                dispatcher.dispatch_problem(problem(ctx, MessageKey::NotOneOf, params! {}));
                Outcome::False
            }
            LogicKind::NegatedExclusiveDisjunction => Outcome::True,
        }
    }

    fn report_branches(
        &mut self,
        key: MessageKey,
        ctx: &dyn EventContext,
        dispatcher: &mut dyn ProblemDispatcher,
    ) {
        let mut branches: Vec<Vec<Problem>> = self
            .branches
            .iter_mut()
            .map(|branch| branch.problems.take())
            .filter(|problems| !problems.is_empty())
            .collect();
        if branches.len() > 1 {
            let problem = Problem::builder()
                .key(key)
                .location(ctx.location())
                .pointer(ctx.pointer())
                .branches(branches)
                .build();
            dispatcher.dispatch_problem(problem);
        } else if let Some(problems) = branches.pop() {
            for problem in problems {
                dispatcher.dispatch_problem(problem);
            }
        }
    }
}

impl Evaluator for LogicalEvaluator<'_> {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        if let Some(outcome) = self.feed(event, ctx, depth, dispatcher) {
            return outcome;
        }
        if self.scope.is_closed_by(event, depth) {
            self.finish(ctx, dispatcher)
        } else {
            Outcome::Pending
        }
    }
}

/// Collects children and builds the cheapest equivalent evaluator.
///
/// An empty conjunction is always true and an empty disjunction always false,
/// without reporting anything. A single child of a conjunction, disjunction,
/// or exclusive disjunction is returned as is.
///
/// # Example
///
/// ```
/// use jsv::evaluator::{Evaluator, LogicKind, LogicalBuilder, PathTracker};
/// use jsv::{Event, InstanceType, Outcome, ProblemList};
///
/// let mut evaluator = LogicalBuilder::new(LogicKind::Disjunction, InstanceType::Null).build();
/// let mut problems = ProblemList::new();
/// let outcome = evaluator.evaluate(&Event::Null, &PathTracker::new(), 0, &mut problems);
/// assert_eq!(outcome, Outcome::False);
/// assert!(problems.is_empty());
/// ```
pub struct LogicalBuilder<'s> {
    kind: LogicKind,
    ty: InstanceType,
    children: Vec<BoxedEvaluator<'s>>,
}

impl<'s> LogicalBuilder<'s> {
    pub fn new(kind: LogicKind, ty: InstanceType) -> Self {
        Self {
            kind,
            ty,
            children: Vec::new(),
        }
    }

    pub fn append(&mut self, evaluator: BoxedEvaluator<'s>) {
        self.children.push(evaluator);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn build(mut self) -> BoxedEvaluator<'s> {
        if self.children.is_empty() {
            return match self.kind {
                LogicKind::Conjunction | LogicKind::NegatedExclusiveDisjunction => {
                    Box::new(AlwaysTrue)
                }
                LogicKind::Disjunction | LogicKind::ExclusiveDisjunction => {
                    Box::new(AlwaysFalse::silent())
                }
            };
        }
        if self.children.len() == 1
            && self.kind != LogicKind::NegatedExclusiveDisjunction
            && let Some(child) = self.children.pop()
        {
            return child;
        }
        let mut combinator = LogicalEvaluator::new(self.kind, self.ty);
        for child in self.children {
            combinator.append(child);
        }
        Box::new(combinator)
    }
}

impl<'s> Extend<BoxedEvaluator<'s>> for LogicalBuilder<'s> {
    fn extend<I: IntoIterator<Item = BoxedEvaluator<'s>>>(&mut self, iter: I) {
        self.children.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::PathTracker;
    use crate::problem::ParamValue;

    /// Decides `outcome` on the `at`-th event it receives.
    struct Fixed {
        outcome: Outcome,
        at: usize,
        seen: usize,
    }

    fn fixed(outcome: Outcome, at: usize) -> BoxedEvaluator<'static> {
        Box::new(Fixed {
            outcome,
            at,
            seen: 0,
        })
    }

    impl Evaluator for Fixed {
        fn evaluate(
            &mut self,
            _event: &Event<'_>,
            ctx: &dyn EventContext,
            _depth: usize,
            dispatcher: &mut dyn ProblemDispatcher,
        ) -> Outcome {
            self.seen += 1;
            if self.seen < self.at {
                return Outcome::Pending;
            }
            if self.outcome == Outcome::False {
                dispatcher.dispatch_problem(problem(ctx, MessageKey::False, params! {}));
            }
            self.outcome
        }
    }

    fn run(evaluator: &mut BoxedEvaluator<'_>, events: &[Event<'_>]) -> (Outcome, ProblemList) {
        let ctx = PathTracker::new();
        let mut problems = ProblemList::new();
        let mut depth = 0;
        for event in events {
            if event.is_end() {
                depth -= 1;
            }
            let outcome = evaluator.evaluate(event, &ctx, depth, &mut problems);
            if outcome.is_decided() {
                return (outcome, problems);
            }
            if event.is_start() {
                depth += 1;
            }
        }
        (Outcome::Pending, problems)
    }

    const ARRAY: [Event<'static>; 4] = [
        Event::StartArray,
        Event::Null,
        Event::Null,
        Event::EndArray,
    ];

    #[test]
    fn empty_conjunction_is_true() {
        let mut evaluator =
            LogicalBuilder::new(LogicKind::Conjunction, InstanceType::Array).build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::True);
        assert!(problems.is_empty());
    }

    #[test]
    fn empty_disjunction_is_false_and_silent() {
        let mut evaluator =
            LogicalBuilder::new(LogicKind::Disjunction, InstanceType::Array).build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::False);
        assert!(problems.is_empty());
    }

    #[test]
    fn conjunction_gathers_every_problem() {
        let mut builder = LogicalBuilder::new(LogicKind::Conjunction, InstanceType::Array);
        builder.append(fixed(Outcome::False, 1));
        builder.append(fixed(Outcome::True, 2));
        builder.append(fixed(Outcome::False, 3));
        let mut evaluator = builder.build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::False);
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn disjunction_drops_buffered_problems_on_success() {
        let mut builder = LogicalBuilder::new(LogicKind::Disjunction, InstanceType::Array);
        builder.append(fixed(Outcome::False, 1));
        builder.append(fixed(Outcome::True, 2));
        let mut evaluator = builder.build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::True);
        assert!(problems.is_empty());
    }

    #[test]
    fn failed_disjunction_reports_branches() {
        let mut builder = LogicalBuilder::new(LogicKind::Disjunction, InstanceType::Array);
        builder.append(fixed(Outcome::False, 1));
        builder.append(fixed(Outcome::False, 4));
        let mut evaluator = builder.build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::False);
        assert_eq!(problems.len(), 1);
        let report = &problems.as_slice()[0];
        assert_eq!(report.key(), MessageKey::AnyOf);
        assert_eq!(report.branches().len(), 2);
    }

    #[test]
    fn single_failed_branch_is_reported_as_is() {
        let mut builder = LogicalBuilder::new(LogicKind::Disjunction, InstanceType::Array);
        builder.append(fixed(Outcome::False, 1));
        builder.append(Box::new(AlwaysFalse::silent()));
        let mut evaluator = builder.build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::False);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems.as_slice()[0].key(), MessageKey::False);
    }

    #[test]
    fn exclusive_disjunction_fails_on_second_match() {
        let mut builder = LogicalBuilder::new(LogicKind::ExclusiveDisjunction, InstanceType::Array);
        builder.append(fixed(Outcome::True, 1));
        builder.append(fixed(Outcome::False, 2));
        builder.append(fixed(Outcome::True, 3));
        let mut evaluator = builder.build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::False);
        assert_eq!(problems.len(), 1);
        let over = &problems.as_slice()[0];
        assert_eq!(over.key(), MessageKey::OneOfOver);
        assert_eq!(over.param("valid").and_then(ParamValue::as_integer), Some(2));
    }

    #[test]
    fn negated_exclusive_disjunction_rejects_exactly_one() {
        let mut builder =
            LogicalBuilder::new(LogicKind::NegatedExclusiveDisjunction, InstanceType::Array);
        builder.append(fixed(Outcome::True, 1));
        builder.append(fixed(Outcome::False, 2));
        let mut evaluator = builder.build();
        let (outcome, problems) = run(&mut evaluator, &ARRAY);
        assert_eq!(outcome, Outcome::False);
        assert_eq!(problems.as_slice()[0].key(), MessageKey::NotOneOf);
    }

    #[test]
    fn single_child_is_returned_unwrapped() {
        let mut builder = LogicalBuilder::new(LogicKind::ExclusiveDisjunction, InstanceType::Null);
        builder.append(fixed(Outcome::True, 1));
        let mut evaluator = builder.build();
        let (outcome, _) = run(&mut evaluator, &[Event::Null]);
        assert_eq!(outcome, Outcome::True);
    }
}
