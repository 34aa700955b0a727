//! The static table of supported keywords.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use strsim::levenshtein;

use crate::types::InstanceType;

/// A keyword the schema reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeywordKind {
    Type,
    Const,
    Enum,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    MinLength,
    MaxLength,
    Pattern,
    Required,
    MinProperties,
    MaxProperties,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Items,
    AdditionalItems,
    MinItems,
    MaxItems,
    AllOf,
    AnyOf,
    OneOf,
    Not,
    Title,
    Description,
    Default,
    Format,
    Examples,
    Schema,
    Id,
    Comment,
}

/// How a keyword takes part in evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCategory {
    /// Tests the instance directly.
    Assertion,
    /// Applies subschemas to the instance or its members.
    Applicator,
    /// Carries information only.
    Annotation,
}

impl Display for KeywordCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            KeywordCategory::Assertion => "assertion",
            KeywordCategory::Applicator => "applicator",
            KeywordCategory::Annotation => "annotation",
        };
        f.write_str(name)
    }
}

const KEYWORDS: &[(&str, KeywordKind)] = &[
    ("type", KeywordKind::Type),
    ("const", KeywordKind::Const),
    ("enum", KeywordKind::Enum),
    ("minimum", KeywordKind::Minimum),
    ("maximum", KeywordKind::Maximum),
    ("exclusiveMinimum", KeywordKind::ExclusiveMinimum),
    ("exclusiveMaximum", KeywordKind::ExclusiveMaximum),
    ("multipleOf", KeywordKind::MultipleOf),
    ("minLength", KeywordKind::MinLength),
    ("maxLength", KeywordKind::MaxLength),
    ("pattern", KeywordKind::Pattern),
    ("required", KeywordKind::Required),
    ("minProperties", KeywordKind::MinProperties),
    ("maxProperties", KeywordKind::MaxProperties),
    ("properties", KeywordKind::Properties),
    ("patternProperties", KeywordKind::PatternProperties),
    ("additionalProperties", KeywordKind::AdditionalProperties),
    ("items", KeywordKind::Items),
    ("additionalItems", KeywordKind::AdditionalItems),
    ("minItems", KeywordKind::MinItems),
    ("maxItems", KeywordKind::MaxItems),
    ("allOf", KeywordKind::AllOf),
    ("anyOf", KeywordKind::AnyOf),
    ("oneOf", KeywordKind::OneOf),
    ("not", KeywordKind::Not),
    ("title", KeywordKind::Title),
    ("description", KeywordKind::Description),
    ("default", KeywordKind::Default),
    ("format", KeywordKind::Format),
    ("examples", KeywordKind::Examples),
    ("$schema", KeywordKind::Schema),
    ("$id", KeywordKind::Id),
    ("$comment", KeywordKind::Comment),
];

impl KeywordKind {
    /// Resolve a keyword name as written in a schema.
    pub fn from_name(name: &str) -> Option<KeywordKind> {
        KEYWORDS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
    }

    pub fn name(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("", |(name, _)| name)
    }

    /// Every supported keyword, in table order.
    pub fn all() -> impl Iterator<Item = KeywordKind> {
        KEYWORDS.iter().map(|(_, kind)| *kind)
    }

    pub fn category(self) -> KeywordCategory {
        match self {
            KeywordKind::Properties
            | KeywordKind::PatternProperties
            | KeywordKind::AdditionalProperties
            | KeywordKind::Items
            | KeywordKind::AdditionalItems
            | KeywordKind::AllOf
            | KeywordKind::AnyOf
            | KeywordKind::OneOf
            | KeywordKind::Not => KeywordCategory::Applicator,
            KeywordKind::Title
            | KeywordKind::Description
            | KeywordKind::Default
            | KeywordKind::Format
            | KeywordKind::Examples
            | KeywordKind::Schema
            | KeywordKind::Id
            | KeywordKind::Comment => KeywordCategory::Annotation,
            KeywordKind::Type
            | KeywordKind::Const
            | KeywordKind::Enum
            | KeywordKind::Minimum
            | KeywordKind::Maximum
            | KeywordKind::ExclusiveMinimum
            | KeywordKind::ExclusiveMaximum
            | KeywordKind::MultipleOf
            | KeywordKind::MinLength
            | KeywordKind::MaxLength
            | KeywordKind::Pattern
            | KeywordKind::Required
            | KeywordKind::MinProperties
            | KeywordKind::MaxProperties
            | KeywordKind::MinItems
            | KeywordKind::MaxItems => KeywordCategory::Assertion,
        }
    }

    /// The instance types this keyword constrains; empty means all of them.
    pub fn applies_to(self) -> &'static [InstanceType] {
        match self {
            KeywordKind::Minimum
            | KeywordKind::Maximum
            | KeywordKind::ExclusiveMinimum
            | KeywordKind::ExclusiveMaximum
            | KeywordKind::MultipleOf => &[InstanceType::Number, InstanceType::Integer],
            KeywordKind::MinLength | KeywordKind::MaxLength | KeywordKind::Pattern => {
                &[InstanceType::String]
            }
            KeywordKind::Required
            | KeywordKind::MinProperties
            | KeywordKind::MaxProperties
            | KeywordKind::Properties
            | KeywordKind::PatternProperties
            | KeywordKind::AdditionalProperties => &[InstanceType::Object],
            KeywordKind::Items
            | KeywordKind::AdditionalItems
            | KeywordKind::MinItems
            | KeywordKind::MaxItems => &[InstanceType::Array],
            KeywordKind::Type
            | KeywordKind::Const
            | KeywordKind::Enum
            | KeywordKind::AllOf
            | KeywordKind::AnyOf
            | KeywordKind::OneOf
            | KeywordKind::Not
            | KeywordKind::Title
            | KeywordKind::Description
            | KeywordKind::Default
            | KeywordKind::Format
            | KeywordKind::Examples
            | KeywordKind::Schema
            | KeywordKind::Id
            | KeywordKind::Comment => &[],
        }
    }
}

impl Display for KeywordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// Suggest known keywords close to an unknown `name`.
///
/// Uses Levenshtein distance: at most 1 for names of three characters or
/// fewer, at most 2 otherwise. Returns up to three suggestions, closest
/// first.
///
/// # Example
///
/// ```
/// use jsv::compute_suggestions;
///
/// assert_eq!(compute_suggestions("minLenght"), vec!["minLength"]);
/// assert!(compute_suggestions("zzzzzz").is_empty());
/// ```
pub fn compute_suggestions(name: &str) -> Vec<&'static str> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, &'static str)> = KEYWORDS
        .iter()
        .filter_map(|(candidate, _)| {
            let dist = levenshtein(name, candidate);
            (dist <= max_distance && dist > 0).then_some((dist, *candidate))
        })
        .collect();

    suggestions.sort_by_key(|(dist, _)| *dist);
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_the_table() {
        for kind in KeywordKind::all() {
            assert_eq!(KeywordKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(KeywordKind::from_name("$ref"), None);
    }

    #[test]
    fn short_names_allow_one_edit() {
        assert_eq!(compute_suggestions("nto"), Vec::<&str>::new());
        assert_eq!(compute_suggestions("nott"), vec!["not"]);
    }
}
