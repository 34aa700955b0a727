pub mod evaluator;
pub mod parser;
pub mod problem;
pub mod schema;
pub mod types;
pub mod validator;

pub use evaluator::{
    BoxedEvaluator, Evaluator, EventContext, LogicKind, LogicalBuilder, PathTracker,
};
pub use parser::{JsonParser, ParseError};
pub use problem::{MessageKey, ParamValue, Params, Problem, ProblemDispatcher, ProblemList};
pub use schema::{
    KeywordCategory, KeywordKind, LoadError, ReadWarning, ReaderOptions, Schema, SchemaBuilder,
    SchemaError, SchemaReader, compute_suggestions,
};
pub use types::{Event, InstanceType, Location, Outcome};
pub use validator::{ValidationReport, Validator, ValidatorOptions};

/// Creates a [`Params`] map from key-value pairs.
///
/// Values are converted via `Into<ParamValue>`, so integers, floats,
/// strings, booleans, and instance types can be passed directly.
///
/// # Example
///
/// ```
/// use jsv::{params, ParamValue};
///
/// let p = params! { "limit" => 3, "name" => "b" };
/// assert_eq!(p.len(), 2);
/// assert_eq!(p["limit"].as_integer(), Some(3));
/// assert_eq!(p["name"].as_string(), Some("b"));
/// ```
#[macro_export]
macro_rules! params {
    {} => {
        ::std::collections::BTreeMap::<String, $crate::ParamValue>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::BTreeMap::<String, $crate::ParamValue>::new();
            $(
                map.insert(
                    $key.to_string(),
                    ::std::convert::Into::<$crate::ParamValue>::into($value),
                );
            )+
            map
        }
    };
}
