//! Dispatching object members to their subschemas.

use tracing::trace;

use super::redundant::RedundantProperty;
use super::{Evaluator, EventContext, LogicKind, LogicalEvaluator, problem};
use crate::params;
use crate::problem::{MessageKey, ProblemDispatcher};
use crate::schema::Schema;
use crate::schema::keyword::PropertyMap;
use crate::types::{Event, InstanceType, Outcome};

/// Evaluates `properties`, `patternProperties`, and `additionalProperties`
/// together.
///
/// Each member name resolves to its candidate subschemas; the following
/// value gets one child evaluator per candidate. In positive mode the
/// children form a conjunction, and a `false` candidate replaces all others
/// with a redundant-property stub. In negated mode the children are negated
/// evaluators forming a disjunction, and a `true` or `{}` candidate is the
/// one replaced by a stub.
pub(crate) struct PropertiesEvaluator<'s> {
    map: &'s PropertyMap,
    negated: bool,
    children: LogicalEvaluator<'s>,
    candidates: Vec<&'s Schema>,
}

impl<'s> PropertiesEvaluator<'s> {
    pub(crate) fn new(map: &'s PropertyMap, negated: bool) -> Self {
        let kind = if negated {
            LogicKind::Disjunction
        } else {
            LogicKind::Conjunction
        };
        Self {
            map,
            negated,
            children: LogicalEvaluator::new(kind, InstanceType::Object),
            candidates: Vec::new(),
        }
    }

    fn resolve(&mut self, name: &str) {
        assert!(
            self.candidates.is_empty(),
            "member name {name:?} received while the previous member has no value"
        );
        let candidates = self.map.candidates(name);
        let redundant = candidates.iter().copied().find(|schema| {
            if self.negated {
                schema.is_always_true()
            } else {
                schema.is_always_false()
            }
        });
        match redundant {
            Some(schema) => {
                trace!(name, %schema, "redundant property");
                self.children
                    .append(Box::new(RedundantProperty::new(name, schema)));
            }
            None => self.candidates = candidates,
        }
    }

    fn instantiate(&mut self, ty: InstanceType) {
        for schema in self.candidates.drain(..) {
            let child = if self.negated {
                schema.create_negated_evaluator(ty)
            } else {
                schema.create_evaluator(ty)
            };
            self.children.append(child);
        }
    }

    fn finish(
        &mut self,
        ctx: &dyn EventContext,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        if self.negated && self.children.is_empty() {
            dispatcher.dispatch_problem(problem(
                ctx,
                MessageKey::Not,
                params! { "keyword" => "properties" },
            ));
            return Outcome::False;
        }
        self.children.finish(ctx, dispatcher)
    }
}

impl Evaluator for PropertiesEvaluator<'_> {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        if depth == 0 {
            return match event {
                Event::EndObject => self.finish(ctx, dispatcher),
                _ => Outcome::Pending,
            };
        }
        if depth == 1 {
            if let Event::Key(name) = event {
                self.resolve(name);
                return Outcome::Pending;
            }
            if let Some(ty) = event.instance_type() {
                self.instantiate(ty);
            }
        }
        self.children
            .feed(event, ctx, depth - 1, dispatcher)
            .unwrap_or(Outcome::Pending)
    }
}
