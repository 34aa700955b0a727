use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Serialize, Serializer};

/// Identifier of a problem message in a message catalog.
///
/// Keys are stable strings of the form `instance.problem.<name>`; the
/// parameters a message expects are listed on each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// `actual`, `expected`
    Type,
    /// `actual`, `expected`
    NotType,
    /// `expected`
    Const,
    /// `expected`
    NotConst,
    /// `expected`
    Enum,
    /// `expected`
    NotEnum,
    /// `actual`, `limit`
    Minimum,
    /// `actual`, `limit`
    Maximum,
    /// `actual`, `limit`
    ExclusiveMinimum,
    /// `actual`, `limit`
    ExclusiveMaximum,
    /// `actual`, `factor`
    MultipleOf,
    /// `actual`, `factor`
    NotMultipleOf,
    /// `actual`, `limit`
    MinLength,
    /// `actual`, `limit`
    MaxLength,
    /// `pattern`
    Pattern,
    /// `pattern`
    NotPattern,
    /// `required`
    Required,
    /// `required`
    NotRequired,
    /// `actual`, `limit`
    MinProperties,
    /// `actual`, `limit`
    MaxProperties,
    /// `actual`, `limit`
    MinItems,
    /// `actual`, `limit`
    MaxItems,
    /// Carries branches.
    AnyOf,
    /// Carries branches.
    OneOf,
    /// `valid`
    OneOfOver,
    /// no parameters
    NotOneOf,
    /// `schema` or `keyword`
    Not,
    /// no parameters
    False,
    /// `name`, `schema`
    RedundantProperty,
    /// `index`, `schema`
    RedundantItem,
    /// `message`, `schema`
    Syntax,
}

impl MessageKey {
    /// The catalog key string.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::Type => "instance.problem.type",
            MessageKey::NotType => "instance.problem.not.type",
            MessageKey::Const => "instance.problem.const",
            MessageKey::NotConst => "instance.problem.not.const",
            MessageKey::Enum => "instance.problem.enum",
            MessageKey::NotEnum => "instance.problem.not.enum",
            MessageKey::Minimum => "instance.problem.minimum",
            MessageKey::Maximum => "instance.problem.maximum",
            MessageKey::ExclusiveMinimum => "instance.problem.exclusiveMinimum",
            MessageKey::ExclusiveMaximum => "instance.problem.exclusiveMaximum",
            MessageKey::MultipleOf => "instance.problem.multipleOf",
            MessageKey::NotMultipleOf => "instance.problem.not.multipleOf",
            MessageKey::MinLength => "instance.problem.minLength",
            MessageKey::MaxLength => "instance.problem.maxLength",
            MessageKey::Pattern => "instance.problem.pattern",
            MessageKey::NotPattern => "instance.problem.not.pattern",
            MessageKey::Required => "instance.problem.required",
            MessageKey::NotRequired => "instance.problem.not.required",
            MessageKey::MinProperties => "instance.problem.minProperties",
            MessageKey::MaxProperties => "instance.problem.maxProperties",
            MessageKey::MinItems => "instance.problem.minItems",
            MessageKey::MaxItems => "instance.problem.maxItems",
            MessageKey::AnyOf => "instance.problem.anyOf",
            MessageKey::OneOf => "instance.problem.oneOf",
            MessageKey::OneOfOver => "instance.problem.oneOf.over",
            MessageKey::NotOneOf => "instance.problem.not.oneOf",
            MessageKey::Not => "instance.problem.not",
            MessageKey::False => "instance.problem.false",
            MessageKey::RedundantProperty => "instance.problem.redundant.property",
            MessageKey::RedundantItem => "instance.problem.redundant.item",
            MessageKey::Syntax => "instance.problem.syntax",
        }
    }
}

impl Display for MessageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
