//! Leaf evaluators, one per assertion keyword.
//!
//! Each evaluator is created for one instance value and one mode. Negated
//! variants are separate evaluators (or the same evaluator with its dual
//! bound) so that the problem they report names what actually went wrong.

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value as Json;

use super::collect::{ValueCollector, json_eq};
use super::{Evaluator, EventContext, problem};
use crate::params;
use crate::problem::{MessageKey, ParamValue, ProblemDispatcher};
use crate::types::{Event, InstanceType, Outcome};

const MULTIPLE_TOLERANCE: f64 = 1.0e-9;

pub(crate) struct TypeAssertion<'s> {
    expected: &'s [InstanceType],
    actual: InstanceType,
    negated: bool,
}

impl<'s> TypeAssertion<'s> {
    pub(crate) fn new(expected: &'s [InstanceType], actual: InstanceType, negated: bool) -> Self {
        Self {
            expected,
            actual,
            negated,
        }
    }
}

impl Evaluator for TypeAssertion<'_> {
    fn evaluate(
        &mut self,
        _event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        let matched = self.expected.iter().any(|t| self.actual.satisfies(*t));
        if matched != self.negated {
            return Outcome::True;
        }
        let key = if self.negated {
            MessageKey::NotType
        } else {
            MessageKey::Type
        };
        let expected: Vec<ParamValue> =
            self.expected.iter().map(|t| ParamValue::from(*t)).collect();
        dispatcher.dispatch_problem(problem(
            ctx,
            key,
            params! { "actual" => self.actual, "expected" => expected },
        ));
        Outcome::False
    }
}

/// A numeric bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
}

impl Bound {
    fn holds(self, value: f64, limit: f64) -> bool {
        match self {
            Bound::Minimum => value >= limit,
            Bound::Maximum => value <= limit,
            Bound::ExclusiveMinimum => value > limit,
            Bound::ExclusiveMaximum => value < limit,
        }
    }

    /// The bound satisfied exactly when this one is not.
    pub(crate) fn dual(self) -> Bound {
        match self {
            Bound::Minimum => Bound::ExclusiveMaximum,
            Bound::Maximum => Bound::ExclusiveMinimum,
            Bound::ExclusiveMinimum => Bound::Maximum,
            Bound::ExclusiveMaximum => Bound::Minimum,
        }
    }

    fn key(self) -> MessageKey {
        match self {
            Bound::Minimum => MessageKey::Minimum,
            Bound::Maximum => MessageKey::Maximum,
            Bound::ExclusiveMinimum => MessageKey::ExclusiveMinimum,
            Bound::ExclusiveMaximum => MessageKey::ExclusiveMaximum,
        }
    }
}

pub(crate) struct NumberAssertion {
    bound: Bound,
    limit: f64,
}

impl NumberAssertion {
    pub(crate) fn new(bound: Bound, limit: f64) -> Self {
        Self { bound, limit }
    }
}

impl Evaluator for NumberAssertion {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        let Some(value) = event.as_f64() else {
            return Outcome::True;
        };
        if self.bound.holds(value, self.limit) {
            return Outcome::True;
        }
        dispatcher.dispatch_problem(problem(
            ctx,
            self.bound.key(),
            params! {
                "actual" => ParamValue::number(value),
                "limit" => ParamValue::number(self.limit),
            },
        ));
        Outcome::False
    }
}

/// Parse a JSON number literal exactly, or `None` when it does not fit a
/// [`Decimal`] without losing its value.
fn exact_decimal(literal: &str) -> Option<Decimal> {
    let decimal = match literal.parse::<Decimal>() {
        Ok(decimal) => decimal,
        Err(_) => Decimal::from_scientific(&literal.to_ascii_lowercase()).ok()?,
    };
    let rounded_away = decimal.is_zero() && literal.parse::<f64>().is_ok_and(|v| v != 0.0);
    (!rounded_away).then_some(decimal)
}

pub(crate) struct MultipleOfAssertion {
    factor: f64,
    exact_factor: Option<Decimal>,
    negated: bool,
}

impl MultipleOfAssertion {
    pub(crate) fn new(factor: f64, negated: bool) -> Self {
        Self {
            factor,
            exact_factor: exact_decimal(&factor.to_string()),
            negated,
        }
    }

    /// Exact remainder test, falling back to floating point for values a
    /// `Decimal` cannot hold.
    fn is_multiple(&self, literal: &str, value: f64) -> bool {
        let remainder = self
            .exact_factor
            .zip(exact_decimal(literal))
            .and_then(|(factor, value)| value.checked_rem(factor));
        match remainder {
            Some(remainder) => remainder.is_zero(),
            None => {
                let quotient = value / self.factor;
                if value != 0.0 && quotient.round() == 0.0 {
                    return false;
                }
                quotient.is_finite() && (quotient - quotient.round()).abs() <= MULTIPLE_TOLERANCE
            }
        }
    }
}

impl Evaluator for MultipleOfAssertion {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        let (Event::Number(literal), Some(value)) = (event, event.as_f64()) else {
            return Outcome::True;
        };
        if self.is_multiple(literal, value) != self.negated {
            return Outcome::True;
        }
        let key = if self.negated {
            MessageKey::NotMultipleOf
        } else {
            MessageKey::MultipleOf
        };
        dispatcher.dispatch_problem(problem(
            ctx,
            key,
            params! {
                "actual" => ParamValue::number(value),
                "factor" => ParamValue::number(self.factor),
            },
        ));
        Outcome::False
    }
}

/// What a [`SizeAssertion`] counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Measure {
    /// Characters of a string.
    Length,
    /// Members of an object.
    Properties,
    /// Elements of an array.
    Items,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Limit {
    Min,
    Max,
}

/// `minLength`, `maxLength`, `minProperties`, `maxProperties`, `minItems`,
/// and `maxItems`.
pub(crate) struct SizeAssertion {
    measure: Measure,
    limit: Limit,
    bound: u64,
    count: u64,
}

impl SizeAssertion {
    pub(crate) fn new(measure: Measure, limit: Limit, bound: u64) -> Self {
        Self {
            measure,
            limit,
            bound,
            count: 0,
        }
    }

    /// The assertion that holds exactly when `(limit, bound)` does not.
    ///
    /// Returns `None` when that assertion can never hold (`min 0`).
    pub(crate) fn negation(measure: Measure, limit: Limit, bound: u64) -> Option<Self> {
        match limit {
            Limit::Min => bound
                .checked_sub(1)
                .map(|max| Self::new(measure, Limit::Max, max)),
            Limit::Max => Some(Self::new(measure, Limit::Min, bound.saturating_add(1))),
        }
    }

    fn key(&self) -> MessageKey {
        match (self.measure, self.limit) {
            (Measure::Length, Limit::Min) => MessageKey::MinLength,
            (Measure::Length, Limit::Max) => MessageKey::MaxLength,
            (Measure::Properties, Limit::Min) => MessageKey::MinProperties,
            (Measure::Properties, Limit::Max) => MessageKey::MaxProperties,
            (Measure::Items, Limit::Min) => MessageKey::MinItems,
            (Measure::Items, Limit::Max) => MessageKey::MaxItems,
        }
    }

    fn decide(&self, ctx: &dyn EventContext, dispatcher: &mut dyn ProblemDispatcher) -> Outcome {
        let holds = match self.limit {
            Limit::Min => self.count >= self.bound,
            Limit::Max => self.count <= self.bound,
        };
        if holds {
            return Outcome::True;
        }
        dispatcher.dispatch_problem(problem(
            ctx,
            self.key(),
            params! { "actual" => self.count, "limit" => self.bound },
        ));
        Outcome::False
    }
}

impl Evaluator for SizeAssertion {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        match self.measure {
            Measure::Length => {
                self.count = event.as_str().map_or(0, |s| s.chars().count() as u64);
                return self.decide(ctx, dispatcher);
            }
            Measure::Properties if depth == 1 && matches!(event, Event::Key(_)) => {
                self.count += 1;
            }
            Measure::Items if depth == 1 && event.is_value() => self.count += 1,
            Measure::Properties | Measure::Items => {}
        }
        if depth == 0 && event.is_end() {
            self.decide(ctx, dispatcher)
        } else {
            Outcome::Pending
        }
    }
}

pub(crate) struct PatternAssertion<'s> {
    regex: &'s Regex,
    negated: bool,
}

impl<'s> PatternAssertion<'s> {
    pub(crate) fn new(regex: &'s Regex, negated: bool) -> Self {
        Self { regex, negated }
    }
}

impl Evaluator for PatternAssertion<'_> {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        let Some(text) = event.as_str() else {
            return Outcome::True;
        };
        if self.regex.is_match(text) != self.negated {
            return Outcome::True;
        }
        let key = if self.negated {
            MessageKey::NotPattern
        } else {
            MessageKey::Pattern
        };
        dispatcher.dispatch_problem(problem(
            ctx,
            key,
            params! { "pattern" => self.regex.as_str() },
        ));
        Outcome::False
    }
}

pub(crate) struct RequiredAssertion<'s> {
    names: &'s [String],
    found: Vec<bool>,
    negated: bool,
}

impl<'s> RequiredAssertion<'s> {
    pub(crate) fn new(names: &'s [String], negated: bool) -> Self {
        Self {
            names,
            found: vec![false; names.len()],
            negated,
        }
    }
}

impl Evaluator for RequiredAssertion<'_> {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        if depth == 1 {
            if let Event::Key(key) = event {
                for (name, found) in self.names.iter().zip(self.found.iter_mut()) {
                    if name == key {
                        *found = true;
                    }
                }
            }
            return Outcome::Pending;
        }
        if depth != 0 || !event.is_end() {
            return Outcome::Pending;
        }
        if self.negated {
            if self.found.iter().all(|found| *found) {
                let names: Vec<&str> = self.names.iter().map(String::as_str).collect();
                dispatcher.dispatch_problem(problem(
                    ctx,
                    MessageKey::NotRequired,
                    params! { "required" => names },
                ));
                return Outcome::False;
            }
            return Outcome::True;
        }
        let mut outcome = Outcome::True;
        for (name, found) in self.names.iter().zip(&self.found) {
            if !found {
                dispatcher.dispatch_problem(problem(
                    ctx,
                    MessageKey::Required,
                    params! { "required" => name.as_str() },
                ));
                outcome = Outcome::False;
            }
        }
        outcome
    }
}

pub(crate) struct ConstAssertion<'s> {
    expected: &'s Json,
    negated: bool,
    collector: ValueCollector,
}

impl<'s> ConstAssertion<'s> {
    pub(crate) fn new(expected: &'s Json, negated: bool) -> Self {
        Self {
            expected,
            negated,
            collector: ValueCollector::new(),
        }
    }
}

impl Evaluator for ConstAssertion<'_> {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        let Some(actual) = self.collector.push(event) else {
            return Outcome::Pending;
        };
        if json_eq(&actual, self.expected) != self.negated {
            return Outcome::True;
        }
        let key = if self.negated {
            MessageKey::NotConst
        } else {
            MessageKey::Const
        };
        dispatcher.dispatch_problem(problem(
            ctx,
            key,
            params! { "expected" => ParamValue::from(self.expected) },
        ));
        Outcome::False
    }
}

pub(crate) struct EnumAssertion<'s> {
    values: &'s [Json],
    negated: bool,
    collector: ValueCollector,
}

impl<'s> EnumAssertion<'s> {
    pub(crate) fn new(values: &'s [Json], negated: bool) -> Self {
        Self {
            values,
            negated,
            collector: ValueCollector::new(),
        }
    }
}

impl Evaluator for EnumAssertion<'_> {
    fn evaluate(
        &mut self,
        event: &Event<'_>,
        ctx: &dyn EventContext,
        _depth: usize,
        dispatcher: &mut dyn ProblemDispatcher,
    ) -> Outcome {
        let Some(actual) = self.collector.push(event) else {
            return Outcome::Pending;
        };
        let found = self.values.iter().any(|value| json_eq(&actual, value));
        if found != self.negated {
            return Outcome::True;
        }
        let key = if self.negated {
            MessageKey::NotEnum
        } else {
            MessageKey::Enum
        };
        let expected: Vec<ParamValue> = self.values.iter().map(ParamValue::from).collect();
        dispatcher.dispatch_problem(problem(ctx, key, params! { "expected" => expected }));
        Outcome::False
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_duals_are_complementary() {
        for bound in [
            Bound::Minimum,
            Bound::Maximum,
            Bound::ExclusiveMinimum,
            Bound::ExclusiveMaximum,
        ] {
            for value in [1.0, 2.0, 3.0] {
                assert_ne!(bound.holds(value, 2.0), bound.dual().holds(value, 2.0));
            }
        }
    }

    #[test]
    fn multiple_of_is_exact() {
        let three = MultipleOfAssertion::new(3.0, false);
        assert!(!three.is_multiple("100000000000000000001", 1.0e20));
        assert!(three.is_multiple("100000000000000000002", 1.0e20));
        let hundredth = MultipleOfAssertion::new(0.01, false);
        assert!(hundredth.is_multiple("19.99", 19.99));
        assert!(hundredth.is_multiple("1.5e1", 15.0));
        assert!(!hundredth.is_multiple("0.005", 0.005));
        let one = MultipleOfAssertion::new(1.0, false);
        assert!(!one.is_multiple("0.0000000001", 1.0e-10));
        assert!(!one.is_multiple("1e-40", 1.0e-40));
    }

    #[test]
    fn min_zero_has_no_negation() {
        assert!(SizeAssertion::negation(Measure::Items, Limit::Min, 0).is_none());
        let negated = SizeAssertion::negation(Measure::Items, Limit::Max, 2).unwrap();
        assert_eq!((negated.limit, negated.bound), (Limit::Min, 3));
    }
}
