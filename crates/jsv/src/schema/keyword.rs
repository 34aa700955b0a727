//! Compiled keywords and their evaluator factories.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value as Json;

use super::{KeywordKind, Schema};
use crate::evaluator::assertion::{
    Bound, ConstAssertion, EnumAssertion, Limit, Measure, MultipleOfAssertion, NumberAssertion,
    PatternAssertion, RequiredAssertion, SizeAssertion, TypeAssertion,
};
use crate::evaluator::items::ItemsEvaluator;
use crate::evaluator::properties::PropertiesEvaluator;
use crate::evaluator::{BoxedEvaluator, LogicKind, LogicalBuilder};
use crate::types::InstanceType;

/// Subschemas applied to object members, resolved by the link pass.
#[derive(Debug)]
pub(crate) struct PropertyMap {
    pub(crate) exact: HashMap<String, Arc<Schema>>,
    pub(crate) patterns: Vec<(Regex, Arc<Schema>)>,
    /// Applies to members matched by neither map.
    pub(crate) default: Arc<Schema>,
}

impl PropertyMap {
    /// Subschemas for member `name`, exact match first, then patterns in
    /// declaration order, then the default.
    pub(crate) fn candidates(&self, name: &str) -> Vec<&Schema> {
        let mut candidates: Vec<&Schema> = Vec::new();
        if let Some(schema) = self.exact.get(name) {
            candidates.push(schema);
        }
        for (regex, schema) in &self.patterns {
            if regex.is_match(name) {
                candidates.push(schema);
            }
        }
        if candidates.is_empty() {
            candidates.push(&self.default);
        }
        candidates
    }
}

/// Subschemas applied to array elements, resolved by the link pass.
#[derive(Debug)]
pub(crate) enum ItemsMap {
    /// Every element against one schema.
    Single(Arc<Schema>),
    /// Positional schemas, then `additional` for the rest.
    Tuple {
        items: Vec<Arc<Schema>>,
        additional: Arc<Schema>,
    },
}

impl ItemsMap {
    pub(crate) fn schema_at(&self, index: usize) -> &Schema {
        match self {
            ItemsMap::Single(schema) => schema.as_ref(),
            ItemsMap::Tuple { items, additional } => {
                items.get(index).unwrap_or(additional).as_ref()
            }
        }
    }
}

/// A keyword of a frozen schema node.
#[derive(Debug)]
pub(crate) enum Keyword {
    Type(Vec<InstanceType>),
    Const(Json),
    Enum(Vec<Json>),
    Bound(Bound, f64),
    MultipleOf(f64),
    Size(Measure, Limit, u64),
    Pattern(Regex),
    Required(Vec<String>),
    Properties(PropertyMap),
    Items(ItemsMap),
    AllOf(Vec<Arc<Schema>>),
    AnyOf(Vec<Arc<Schema>>),
    OneOf(Vec<Arc<Schema>>),
    Not(Arc<Schema>),
}

impl Keyword {
    pub(crate) fn kind(&self) -> KeywordKind {
        match self {
            Keyword::Type(_) => KeywordKind::Type,
            Keyword::Const(_) => KeywordKind::Const,
            Keyword::Enum(_) => KeywordKind::Enum,
            Keyword::Bound(Bound::Minimum, _) => KeywordKind::Minimum,
            Keyword::Bound(Bound::Maximum, _) => KeywordKind::Maximum,
            Keyword::Bound(Bound::ExclusiveMinimum, _) => KeywordKind::ExclusiveMinimum,
            Keyword::Bound(Bound::ExclusiveMaximum, _) => KeywordKind::ExclusiveMaximum,
            Keyword::MultipleOf(_) => KeywordKind::MultipleOf,
            Keyword::Size(Measure::Length, Limit::Min, _) => KeywordKind::MinLength,
            Keyword::Size(Measure::Length, Limit::Max, _) => KeywordKind::MaxLength,
            Keyword::Size(Measure::Properties, Limit::Min, _) => KeywordKind::MinProperties,
            Keyword::Size(Measure::Properties, Limit::Max, _) => KeywordKind::MaxProperties,
            Keyword::Size(Measure::Items, Limit::Min, _) => KeywordKind::MinItems,
            Keyword::Size(Measure::Items, Limit::Max, _) => KeywordKind::MaxItems,
            Keyword::Pattern(_) => KeywordKind::Pattern,
            Keyword::Required(_) => KeywordKind::Required,
            Keyword::Properties(_) => KeywordKind::Properties,
            Keyword::Items(_) => KeywordKind::Items,
            Keyword::AllOf(_) => KeywordKind::AllOf,
            Keyword::AnyOf(_) => KeywordKind::AnyOf,
            Keyword::OneOf(_) => KeywordKind::OneOf,
            Keyword::Not(_) => KeywordKind::Not,
        }
    }

    /// Whether this keyword holds subschemas.
    pub(crate) fn has_subschemas(&self) -> bool {
        matches!(
            self,
            Keyword::Properties(_)
                | Keyword::Items(_)
                | Keyword::AllOf(_)
                | Keyword::AnyOf(_)
                | Keyword::OneOf(_)
                | Keyword::Not(_)
        )
    }

    fn applies_to(&self, ty: InstanceType) -> bool {
        let types = self.kind().applies_to();
        types.is_empty() || types.contains(&ty)
    }

    /// Positive evaluator for a value of type `ty`, or `None` when this
    /// keyword cannot fail for it.
    pub(crate) fn create_evaluator(&self, ty: InstanceType) -> Option<BoxedEvaluator<'_>> {
        if !self.applies_to(ty) {
            return None;
        }
        let evaluator: BoxedEvaluator<'_> = match self {
            Keyword::Type(types) => Box::new(TypeAssertion::new(types, ty, false)),
            Keyword::Const(value) => Box::new(ConstAssertion::new(value, false)),
            Keyword::Enum(values) => Box::new(EnumAssertion::new(values, false)),
            Keyword::Bound(bound, limit) => Box::new(NumberAssertion::new(*bound, *limit)),
            Keyword::MultipleOf(factor) => Box::new(MultipleOfAssertion::new(*factor, false)),
            Keyword::Size(_, Limit::Min, 0) => return None,
            Keyword::Size(measure, limit, bound) => {
                Box::new(SizeAssertion::new(*measure, *limit, *bound))
            }
            Keyword::Pattern(regex) => Box::new(PatternAssertion::new(regex, false)),
            Keyword::Required(names) if names.is_empty() => return None,
            Keyword::Required(names) => Box::new(RequiredAssertion::new(names, false)),
            Keyword::Properties(map) => Box::new(PropertiesEvaluator::new(map, false)),
            Keyword::Items(map) => Box::new(ItemsEvaluator::new(map, false)),
            Keyword::AllOf(schemas) => {
                combine(LogicKind::Conjunction, ty, schemas, Schema::create_evaluator)
            }
            Keyword::AnyOf(schemas) => {
                combine(LogicKind::Disjunction, ty, schemas, Schema::create_evaluator)
            }
            Keyword::OneOf(schemas) => combine(
                LogicKind::ExclusiveDisjunction,
                ty,
                schemas,
                Schema::create_evaluator,
            ),
            Keyword::Not(schema) => schema.create_negated_evaluator(ty),
        };
        Some(evaluator)
    }

    /// Evaluator that holds exactly when the positive one fails, or `None`
    /// when the positive one cannot fail.
    pub(crate) fn create_negated_evaluator(&self, ty: InstanceType) -> Option<BoxedEvaluator<'_>> {
        if !self.applies_to(ty) {
            return None;
        }
        let evaluator: BoxedEvaluator<'_> = match self {
            Keyword::Type(types) => Box::new(TypeAssertion::new(types, ty, true)),
            Keyword::Const(value) => Box::new(ConstAssertion::new(value, true)),
            Keyword::Enum(values) => Box::new(EnumAssertion::new(values, true)),
            Keyword::Bound(bound, limit) => Box::new(NumberAssertion::new(bound.dual(), *limit)),
            Keyword::MultipleOf(factor) => Box::new(MultipleOfAssertion::new(*factor, true)),
            Keyword::Size(measure, limit, bound) => {
                Box::new(SizeAssertion::negation(*measure, *limit, *bound)?)
            }
            Keyword::Pattern(regex) => Box::new(PatternAssertion::new(regex, true)),
            Keyword::Required(names) if names.is_empty() => return None,
            Keyword::Required(names) => Box::new(RequiredAssertion::new(names, true)),
            Keyword::Properties(map) => Box::new(PropertiesEvaluator::new(map, true)),
            Keyword::Items(map) => Box::new(ItemsEvaluator::new(map, true)),
            Keyword::AllOf(schemas) => combine(
                LogicKind::Disjunction,
                ty,
                schemas,
                Schema::create_negated_evaluator,
            ),
            Keyword::AnyOf(schemas) => combine(
                LogicKind::Conjunction,
                ty,
                schemas,
                Schema::create_negated_evaluator,
            ),
            Keyword::OneOf(schemas) => combine(
                LogicKind::NegatedExclusiveDisjunction,
                ty,
                schemas,
                Schema::create_evaluator,
            ),
            Keyword::Not(schema) => schema.create_evaluator(ty),
        };
        Some(evaluator)
    }
}

fn combine<'s>(
    kind: LogicKind,
    ty: InstanceType,
    schemas: &'s [Arc<Schema>],
    factory: fn(&'s Schema, InstanceType) -> BoxedEvaluator<'s>,
) -> BoxedEvaluator<'s> {
    let mut builder = LogicalBuilder::new(kind, ty);
    builder.extend(schemas.iter().map(|schema| factory(schema, ty)));
    builder.build()
}
