//! Programmatic construction of schemas.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value as Json};
use tracing::debug;

use super::keyword::{ItemsMap, Keyword, PropertyMap};
use super::{KeywordKind, Schema, SchemaNode};
use crate::evaluator::assertion::{Bound, Limit, Measure};
use crate::types::InstanceType;

/// A keyword as declared, before cross-keyword references are resolved.
enum Part {
    Keyword(Keyword),
    Property(String, Arc<Schema>),
    PatternProperty(Regex, Arc<Schema>),
    AdditionalProperties(Arc<Schema>),
    Items(Arc<Schema>),
    TupleItems(Vec<Arc<Schema>>),
    AdditionalItems(Arc<Schema>),
}

/// Builds a [`Schema`] keyword by keyword.
///
/// Keywords are collected independently; [`SchemaBuilder::build`] then runs
/// a link pass that merges `properties`, `patternProperties`, and
/// `additionalProperties` into one member dispatcher (and `items` with
/// `additionalItems` into one element dispatcher) before freezing the node.
///
/// # Example
///
/// ```
/// use jsv::{Schema, SchemaBuilder};
///
/// let schema = SchemaBuilder::new()
///     .with_property("a", Schema::always_true())
///     .with_additional_properties(Schema::always_false())
///     .build();
///
/// assert!(schema.contains_keyword("properties"));
/// assert!(schema.contains_keyword("additionalProperties"));
/// assert_eq!(
///     schema.to_string(),
///     r#"{"properties":{"a":true},"additionalProperties":false}"#
/// );
/// ```
#[derive(Default)]
pub struct SchemaBuilder {
    parts: Vec<Part>,
    declared: Vec<KeywordKind>,
    title: Option<String>,
    description: Option<String>,
    default: Option<Json>,
    json: Map<String, Json>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(&mut self, kind: KeywordKind, value: Json) {
        if !self.declared.contains(&kind) {
            self.declared.push(kind);
        }
        self.json.insert(kind.name().to_string(), value);
    }

    fn keyword(mut self, kind: KeywordKind, value: Json, keyword: Keyword) -> Self {
        self.declare(kind, value);
        self.parts.push(Part::Keyword(keyword));
        self
    }

    /// Insert `value` under `name` in the JSON object of keyword `kind`.
    fn declare_member(&mut self, kind: KeywordKind, name: &str, value: Json) {
        if !self.declared.contains(&kind) {
            self.declared.push(kind);
        }
        let entry = self
            .json
            .entry(kind.name())
            .or_insert_with(|| Json::Object(Map::new()));
        if let Json::Object(members) = entry {
            members.insert(name.to_string(), value);
        }
    }

    pub fn with_type(self, types: impl IntoIterator<Item = InstanceType>) -> Self {
        let types: Vec<InstanceType> = types.into_iter().collect();
        let value = match types.as_slice() {
            [single] => Json::from(single.name()),
            _ => types.iter().map(|t| Json::from(t.name())).collect(),
        };
        self.keyword(KeywordKind::Type, value, Keyword::Type(types))
    }

    pub fn with_const(self, value: Json) -> Self {
        self.keyword(KeywordKind::Const, value.clone(), Keyword::Const(value))
    }

    pub fn with_enum(self, values: Vec<Json>) -> Self {
        self.keyword(
            KeywordKind::Enum,
            Json::Array(values.clone()),
            Keyword::Enum(values),
        )
    }

    pub fn with_minimum(self, limit: f64) -> Self {
        self.bound(KeywordKind::Minimum, Bound::Minimum, limit)
    }

    pub fn with_maximum(self, limit: f64) -> Self {
        self.bound(KeywordKind::Maximum, Bound::Maximum, limit)
    }

    pub fn with_exclusive_minimum(self, limit: f64) -> Self {
        self.bound(KeywordKind::ExclusiveMinimum, Bound::ExclusiveMinimum, limit)
    }

    pub fn with_exclusive_maximum(self, limit: f64) -> Self {
        self.bound(KeywordKind::ExclusiveMaximum, Bound::ExclusiveMaximum, limit)
    }

    fn bound(self, kind: KeywordKind, bound: Bound, limit: f64) -> Self {
        self.keyword(kind, Json::from(limit), Keyword::Bound(bound, limit))
    }

    pub fn with_multiple_of(self, factor: f64) -> Self {
        self.keyword(
            KeywordKind::MultipleOf,
            Json::from(factor),
            Keyword::MultipleOf(factor),
        )
    }

    pub fn with_min_length(self, limit: u64) -> Self {
        self.size(KeywordKind::MinLength, Measure::Length, Limit::Min, limit)
    }

    pub fn with_max_length(self, limit: u64) -> Self {
        self.size(KeywordKind::MaxLength, Measure::Length, Limit::Max, limit)
    }

    pub fn with_min_properties(self, limit: u64) -> Self {
        self.size(KeywordKind::MinProperties, Measure::Properties, Limit::Min, limit)
    }

    pub fn with_max_properties(self, limit: u64) -> Self {
        self.size(KeywordKind::MaxProperties, Measure::Properties, Limit::Max, limit)
    }

    pub fn with_min_items(self, limit: u64) -> Self {
        self.size(KeywordKind::MinItems, Measure::Items, Limit::Min, limit)
    }

    pub fn with_max_items(self, limit: u64) -> Self {
        self.size(KeywordKind::MaxItems, Measure::Items, Limit::Max, limit)
    }

    fn size(self, kind: KeywordKind, measure: Measure, limit: Limit, bound: u64) -> Self {
        self.keyword(kind, Json::from(bound), Keyword::Size(measure, limit, bound))
    }

    pub fn with_pattern(self, regex: Regex) -> Self {
        self.keyword(
            KeywordKind::Pattern,
            Json::from(regex.as_str()),
            Keyword::Pattern(regex),
        )
    }

    pub fn with_required<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let value = names.iter().map(|name| Json::from(name.as_str())).collect();
        self.keyword(KeywordKind::Required, value, Keyword::Required(names))
    }

    pub fn with_property(mut self, name: impl Into<String>, schema: Arc<Schema>) -> Self {
        let name = name.into();
        self.declare_member(KeywordKind::Properties, &name, schema.to_json());
        self.parts.push(Part::Property(name, schema));
        self
    }

    pub fn with_pattern_property(mut self, regex: Regex, schema: Arc<Schema>) -> Self {
        self.declare_member(
            KeywordKind::PatternProperties,
            regex.as_str(),
            schema.to_json(),
        );
        self.parts.push(Part::PatternProperty(regex, schema));
        self
    }

    /// Set the subschema for members matched by neither `properties` nor
    /// `patternProperties`.
    pub fn with_additional_properties(mut self, schema: Arc<Schema>) -> Self {
        self.declare(KeywordKind::AdditionalProperties, schema.to_json());
        self.parts.push(Part::AdditionalProperties(schema));
        self
    }

    /// Validate every array element against `schema`.
    pub fn with_items(mut self, schema: Arc<Schema>) -> Self {
        self.declare(KeywordKind::Items, schema.to_json());
        self.parts.push(Part::Items(schema));
        self
    }

    /// Validate array elements positionally.
    pub fn with_tuple_items(mut self, schemas: Vec<Arc<Schema>>) -> Self {
        let value = schemas.iter().map(|schema| schema.to_json()).collect();
        self.declare(KeywordKind::Items, value);
        self.parts.push(Part::TupleItems(schemas));
        self
    }

    /// Set the subschema for elements past the positional `items`.
    pub fn with_additional_items(mut self, schema: Arc<Schema>) -> Self {
        self.declare(KeywordKind::AdditionalItems, schema.to_json());
        self.parts.push(Part::AdditionalItems(schema));
        self
    }

    pub fn with_all_of(self, schemas: Vec<Arc<Schema>>) -> Self {
        let value = to_json_array(&schemas);
        self.keyword(KeywordKind::AllOf, value, Keyword::AllOf(schemas))
    }

    pub fn with_any_of(self, schemas: Vec<Arc<Schema>>) -> Self {
        let value = to_json_array(&schemas);
        self.keyword(KeywordKind::AnyOf, value, Keyword::AnyOf(schemas))
    }

    pub fn with_one_of(self, schemas: Vec<Arc<Schema>>) -> Self {
        let value = to_json_array(&schemas);
        self.keyword(KeywordKind::OneOf, value, Keyword::OneOf(schemas))
    }

    pub fn with_not(self, schema: Arc<Schema>) -> Self {
        let value = schema.to_json();
        self.keyword(KeywordKind::Not, value, Keyword::Not(schema))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.declare(KeywordKind::Title, Json::from(title.as_str()));
        self.title = Some(title);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.declare(KeywordKind::Description, Json::from(description.as_str()));
        self.description = Some(description);
        self
    }

    pub fn with_default(mut self, value: Json) -> Self {
        self.declare(KeywordKind::Default, value.clone());
        self.default = Some(value);
        self
    }

    /// Record an annotation keyword such as `format` or `$comment`.
    pub fn with_annotation(mut self, kind: KeywordKind, value: Json) -> Self {
        self.declare(kind, value);
        self
    }

    /// Replace the JSON rendering with the document the schema was read from.
    pub(crate) fn with_source(mut self, json: Map<String, Json>) -> Self {
        self.json = json;
        self
    }

    /// Link the collected keywords and freeze the schema.
    pub fn build(self) -> Schema {
        if self.declared.is_empty() {
            return Schema::Empty;
        }
        let keywords = link(self.parts);
        let complex = keywords.iter().any(Keyword::has_subschemas);
        debug!(
            keywords = keywords.len(),
            declared = self.declared.len(),
            complex,
            "linked schema"
        );
        let node = SchemaNode {
            keywords,
            declared: self.declared,
            title: self.title,
            description: self.description,
            default: self.default,
            json: Json::Object(self.json),
        };
        if complex {
            Schema::Complex(node)
        } else {
            Schema::Simple(node)
        }
    }
}

fn to_json_array(schemas: &[Arc<Schema>]) -> Json {
    schemas.iter().map(|schema| schema.to_json()).collect()
}

/// Resolve cross-keyword references.
///
/// The merged member and element dispatchers take the position of the first
/// part that contributed to them.
fn link(parts: Vec<Part>) -> Vec<Keyword> {
    let mut keywords = Vec::new();
    let mut exact = HashMap::new();
    let mut patterns = Vec::new();
    let mut additional_properties = None;
    let mut properties_at = None;
    let mut items = None;
    let mut additional_items = None;
    let mut items_at = None;

    for part in parts {
        match part {
            Part::Keyword(keyword) => keywords.push(keyword),
            Part::Property(name, schema) => {
                properties_at.get_or_insert(keywords.len());
                exact.insert(name, schema);
            }
            Part::PatternProperty(regex, schema) => {
                properties_at.get_or_insert(keywords.len());
                patterns.push((regex, schema));
            }
            Part::AdditionalProperties(schema) => {
                properties_at.get_or_insert(keywords.len());
                additional_properties = Some(schema);
            }
            Part::Items(schema) => {
                items_at.get_or_insert(keywords.len());
                items = Some(ItemsMap::Single(schema));
            }
            Part::TupleItems(schemas) => {
                items_at.get_or_insert(keywords.len());
                items = Some(ItemsMap::Tuple {
                    items: schemas,
                    additional: Schema::always_true(),
                });
            }
            Part::AdditionalItems(schema) => additional_items = Some(schema),
        }
    }

    let mut merged = Vec::new();
    if let Some(at) = properties_at {
        let map = PropertyMap {
            exact,
            patterns,
            default: additional_properties.unwrap_or_else(Schema::always_true),
        };
        merged.push((at, Keyword::Properties(map)));
    }
    // additionalItems only applies after a positional items array.
    if let (Some(at), Some(mut map)) = (items_at, items) {
        if let (ItemsMap::Tuple { additional, .. }, Some(schema)) = (&mut map, additional_items) {
            *additional = schema;
        }
        merged.push((at, Keyword::Items(map)));
    }
    for (at, keyword) in merged.into_iter().rev() {
        keywords.insert(at, keyword);
    }
    keywords
}
