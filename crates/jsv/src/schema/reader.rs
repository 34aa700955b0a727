//! Reading schemas from JSON documents.

use std::fs;
use std::mem;
use std::path::Path;
use std::sync::Arc;

use bon::Builder;
use regex::Regex;
use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use super::error::{LoadError, ReadWarning, SchemaError};
use super::{KeywordKind, Schema, SchemaBuilder, compute_suggestions};
use crate::types::InstanceType;

/// Options for [`SchemaReader`].
#[derive(Debug, Clone, Default, Builder)]
pub struct ReaderOptions {
    /// Reject unknown keywords instead of warning about them.
    #[builder(default)]
    pub strict: bool,
}

/// Compiles schema documents into shared [`Schema`] trees.
///
/// # Example
///
/// ```
/// use jsv::SchemaReader;
///
/// let mut reader = SchemaReader::new();
/// let schema = reader
///     .read_str(r#"{"type": "object", "propertes": {}}"#)
///     .unwrap();
///
/// assert!(schema.contains_keyword("type"));
/// assert_eq!(reader.warnings().len(), 1);
/// assert_eq!(
///     reader.warnings()[0].to_string(),
///     "#: unknown keyword 'propertes', did you mean: properties?"
/// );
/// ```
#[derive(Debug, Default)]
pub struct SchemaReader {
    options: ReaderOptions,
    warnings: Vec<ReadWarning>,
}

impl SchemaReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReaderOptions) -> Self {
        Self {
            options,
            warnings: Vec::new(),
        }
    }

    /// Warnings collected by every read so far.
    pub fn warnings(&self) -> &[ReadWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ReadWarning> {
        mem::take(&mut self.warnings)
    }

    /// Read a schema file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read and
    /// [`LoadError::Schema`] if it does not hold a valid schema.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<Schema>, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_str(&text).map_err(|source| LoadError::Schema {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a schema from JSON text.
    pub fn read_str(&mut self, text: &str) -> Result<Arc<Schema>, SchemaError> {
        let value: Json = serde_json::from_str(text).map_err(|e| SchemaError::InvalidJson {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })?;
        self.read_value(&value)
    }

    /// Read a schema from a parsed JSON value.
    pub fn read_value(&mut self, value: &Json) -> Result<Arc<Schema>, SchemaError> {
        let warnings_before = self.warnings.len();
        let schema = self.read_schema(value, "")?;
        debug!(
            %schema,
            warnings = self.warnings.len() - warnings_before,
            "read schema"
        );
        Ok(schema)
    }

    fn read_schema(&mut self, value: &Json, path: &str) -> Result<Arc<Schema>, SchemaError> {
        match value {
            Json::Bool(true) => Ok(Schema::always_true()),
            Json::Bool(false) => Ok(Schema::always_false()),
            Json::Object(map) if map.is_empty() => Ok(Arc::new(Schema::Empty)),
            Json::Object(map) => self.read_object(map, path).map(Arc::new),
            Json::Null | Json::Number(_) | Json::String(_) | Json::Array(_) => {
                Err(SchemaError::NotASchema {
                    path: path.to_string(),
                })
            }
        }
    }

    fn read_object(&mut self, map: &Map<String, Json>, path: &str) -> Result<Schema, SchemaError> {
        let mut builder = SchemaBuilder::new();
        for (name, value) in map {
            let Some(kind) = KeywordKind::from_name(name) else {
                let suggestions = compute_suggestions(name);
                if self.options.strict {
                    return Err(SchemaError::UnknownKeyword {
                        path: path.to_string(),
                        name: name.clone(),
                        suggestions,
                    });
                }
                let warning = ReadWarning::UnknownKeyword {
                    path: path.to_string(),
                    name: name.clone(),
                    suggestions,
                };
                warn!(%warning, "ignoring keyword");
                self.warnings.push(warning);
                continue;
            };
            let keyword = Keyword { kind, path };
            builder = self.read_keyword(builder, &keyword, value)?;
        }
        Ok(builder.with_source(map.clone()).build())
    }

    fn read_keyword(
        &mut self,
        builder: SchemaBuilder,
        keyword: &Keyword<'_>,
        value: &Json,
    ) -> Result<SchemaBuilder, SchemaError> {
        let builder = match keyword.kind {
            KeywordKind::Type => builder.with_type(read_types(keyword, value)?),
            KeywordKind::Const => builder.with_const(value.clone()),
            KeywordKind::Enum => match value {
                Json::Array(values) => builder.with_enum(values.clone()),
                _ => return Err(keyword.invalid("expected an array")),
            },
            KeywordKind::Minimum => builder.with_minimum(read_number(keyword, value)?),
            KeywordKind::Maximum => builder.with_maximum(read_number(keyword, value)?),
            KeywordKind::ExclusiveMinimum => {
                builder.with_exclusive_minimum(read_number(keyword, value)?)
            }
            KeywordKind::ExclusiveMaximum => {
                builder.with_exclusive_maximum(read_number(keyword, value)?)
            }
            KeywordKind::MultipleOf => {
                let factor = read_number(keyword, value)?;
                if factor <= 0.0 {
                    return Err(keyword.invalid("expected a number greater than 0"));
                }
                builder.with_multiple_of(factor)
            }
            KeywordKind::MinLength => builder.with_min_length(read_count(keyword, value)?),
            KeywordKind::MaxLength => builder.with_max_length(read_count(keyword, value)?),
            KeywordKind::MinProperties => builder.with_min_properties(read_count(keyword, value)?),
            KeywordKind::MaxProperties => builder.with_max_properties(read_count(keyword, value)?),
            KeywordKind::MinItems => builder.with_min_items(read_count(keyword, value)?),
            KeywordKind::MaxItems => builder.with_max_items(read_count(keyword, value)?),
            KeywordKind::Pattern => {
                let Json::String(pattern) = value else {
                    return Err(keyword.invalid("expected a string"));
                };
                builder.with_pattern(compile(keyword.path, pattern)?)
            }
            KeywordKind::Required => builder.with_required(read_names(keyword, value)?),
            KeywordKind::Properties => {
                let Json::Object(members) = value else {
                    return Err(keyword.invalid("expected an object"));
                };
                let mut builder = builder;
                for (name, member) in members {
                    let schema = self.read_schema(member, &keyword.child(name))?;
                    builder = builder.with_property(name.as_str(), schema);
                }
                builder
            }
            KeywordKind::PatternProperties => {
                let Json::Object(members) = value else {
                    return Err(keyword.invalid("expected an object"));
                };
                let mut builder = builder;
                for (pattern, member) in members {
                    let path = keyword.child(pattern);
                    let regex = compile(&path, pattern)?;
                    let schema = self.read_schema(member, &path)?;
                    builder = builder.with_pattern_property(regex, schema);
                }
                builder
            }
            KeywordKind::AdditionalProperties => {
                builder.with_additional_properties(self.read_schema(value, &keyword.here())?)
            }
            KeywordKind::Items => match value {
                Json::Array(items) => {
                    builder.with_tuple_items(self.read_schemas(keyword, items)?)
                }
                _ => builder.with_items(self.read_schema(value, &keyword.here())?),
            },
            KeywordKind::AdditionalItems => {
                builder.with_additional_items(self.read_schema(value, &keyword.here())?)
            }
            KeywordKind::AllOf => builder.with_all_of(self.read_schema_list(keyword, value)?),
            KeywordKind::AnyOf => builder.with_any_of(self.read_schema_list(keyword, value)?),
            KeywordKind::OneOf => builder.with_one_of(self.read_schema_list(keyword, value)?),
            KeywordKind::Not => builder.with_not(self.read_schema(value, &keyword.here())?),
            KeywordKind::Title => match value {
                Json::String(title) => builder.with_title(title.as_str()),
                _ => return Err(keyword.invalid("expected a string")),
            },
            KeywordKind::Description => match value {
                Json::String(description) => builder.with_description(description.as_str()),
                _ => return Err(keyword.invalid("expected a string")),
            },
            KeywordKind::Default => builder.with_default(value.clone()),
            KeywordKind::Format
            | KeywordKind::Examples
            | KeywordKind::Schema
            | KeywordKind::Id
            | KeywordKind::Comment => builder.with_annotation(keyword.kind, value.clone()),
        };
        Ok(builder)
    }

    fn read_schema_list(
        &mut self,
        keyword: &Keyword<'_>,
        value: &Json,
    ) -> Result<Vec<Arc<Schema>>, SchemaError> {
        match value {
            Json::Array(items) if !items.is_empty() => self.read_schemas(keyword, items),
            _ => Err(keyword.invalid("expected a non-empty array of schemas")),
        }
    }

    fn read_schemas(
        &mut self,
        keyword: &Keyword<'_>,
        items: &[Json],
    ) -> Result<Vec<Arc<Schema>>, SchemaError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.read_schema(item, &keyword.child(&index.to_string())))
            .collect()
    }
}

/// The keyword being read and the pointer of the schema declaring it.
struct Keyword<'a> {
    kind: KeywordKind,
    path: &'a str,
}

impl Keyword<'_> {
    /// Pointer of the keyword's own value.
    fn here(&self) -> String {
        format!("{}/{}", self.path, self.kind.name())
    }

    /// Pointer of a member of the keyword's value.
    fn child(&self, name: &str) -> String {
        format!("{}/{}", self.here(), escape_pointer(name))
    }

    fn invalid(&self, message: &str) -> SchemaError {
        SchemaError::InvalidKeyword {
            path: self.path.to_string(),
            keyword: self.kind.name().to_string(),
            message: message.to_string(),
        }
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn compile(path: &str, pattern: &str) -> Result<Regex, SchemaError> {
    Regex::new(pattern).map_err(|e| SchemaError::InvalidRegex {
        path: path.to_string(),
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn read_number(keyword: &Keyword<'_>, value: &Json) -> Result<f64, SchemaError> {
    value
        .as_f64()
        .ok_or_else(|| keyword.invalid("expected a number"))
}

fn read_count(keyword: &Keyword<'_>, value: &Json) -> Result<u64, SchemaError> {
    if let Some(count) = value.as_u64() {
        return Ok(count);
    }
    match value.as_f64() {
        Some(count) if count >= 0.0 && count.fract() == 0.0 => Ok(count as u64),
        _ => Err(keyword.invalid("expected a non-negative integer")),
    }
}

fn read_types(keyword: &Keyword<'_>, value: &Json) -> Result<Vec<InstanceType>, SchemaError> {
    let names = match value {
        Json::String(name) => vec![name.as_str()],
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| keyword.invalid("expected type names"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(keyword.invalid("expected a type name or an array of type names")),
    };
    names
        .into_iter()
        .map(|name| {
            InstanceType::from_name(name)
                .ok_or_else(|| keyword.invalid(&format!("unknown type '{name}'")))
        })
        .collect()
}

fn read_names(keyword: &Keyword<'_>, value: &Json) -> Result<Vec<String>, SchemaError> {
    let Json::Array(items) = value else {
        return Err(keyword.invalid("expected an array of strings"));
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(ToString::to_string)
                .ok_or_else(|| keyword.invalid("expected an array of strings"))
        })
        .collect()
}
