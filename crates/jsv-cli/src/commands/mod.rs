//! CLI command implementations.

mod check;
mod keywords;
mod validate;

pub use check::{run_check, CheckArgs};
pub use keywords::{run_keywords, KeywordsArgs};
pub use validate::{run_validate, ValidateArgs};
