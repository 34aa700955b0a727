//! Dispatching array elements to their subschemas.

use super::redundant::RedundantItem;
use super::{BoxedEvaluator, Evaluator, EventContext, LogicKind, LogicalEvaluator, problem};
use crate::params;
use crate::problem::{MessageKey, ProblemDispatcher};
use crate::schema::keyword::ItemsMap;
use crate::types::{Event, InstanceType, Outcome};

/// Evaluates `items` and `additionalItems` together, the way
/// [`PropertiesEvaluator`](super::properties::PropertiesEvaluator) handles
/// object members: one child per element, with a redundant-item stub when
/// the element's subschema decides the element statically.
pub(crate) struct ItemsEvaluator<'s> {
    map: &'s ItemsMap,
    negated: bool,
    children: LogicalEvaluator<'s>,
    index: usize,
}

impl<'s> ItemsEvaluator<'s> {
    pub(crate) fn new(map: &'s ItemsMap, negated: bool) -> Self {
        let kind = if negated {
            LogicKind::Disjunction
        } else {
            LogicKind::Conjunction
        };
        Self {
            map,
            negated,
            children: LogicalEvaluator::new(kind, InstanceType::Array),
            index: 0,
        }
    }

    fn instantiate(&mut self, ty: InstanceType) {
        let schema = self.map.schema_at(self.index);
        let redundant = if self.negated {
            schema.is_always_true()
        } else {
            schema.is_always_false()
        };
        let child: BoxedEvaluator<'s> = if redundant {
            Box::new(RedundantItem::new(self.index, schema))
        } else if self.negated {
            schema.create_negated_evaluator(ty)
        } else {
            schema.create_evaluator(ty)
        };
        self.children.append(child);
        self.index += 1;
    }
}

impl Evaluator for ItemsEvaluator<'_> {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        if depth == 0 {
            if !matches!(event, Event::EndArray) {
                return Outcome::Pending;
            }
            if self.negated && self.children.is_empty() {
                dispatcher.dispatch_problem(problem(
                    ctx,
                    MessageKey::Not,
                    params! { "keyword" => "items" },
                ));
                return Outcome::False;
            }
            return self.children.finish(ctx, dispatcher);
        }
        if depth == 1
            && let Some(ty) = event.instance_type()
        {
            self.instantiate(ty);
        }
        self.children
            .feed(event, ctx, depth - 1, dispatcher)
            .unwrap_or(Outcome::Pending)
    }
}
