//! Implementation of the `jsv keywords` command.

use clap::Args;
use jsv::{KeywordCategory, KeywordKind};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::output::table::format_keyword_table;

/// Arguments for the keywords command.
#[derive(Debug, Args)]
pub struct KeywordsArgs {
    /// Only list keywords of this category
    #[arg(long)]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one keyword.
#[derive(Debug, Serialize)]
struct KeywordInfo {
    name: &'static str,
    category: KeywordCategory,
    applies_to: Vec<&'static str>,
}

/// Run the keywords command.
pub fn run_keywords(args: KeywordsArgs) -> Result<i32> {
    let keywords: Vec<KeywordKind> = KeywordKind::all()
        .filter(|kind| {
            args.category
                .as_deref()
                .is_none_or(|category| kind.category().to_string() == category)
        })
        .collect();

    if keywords.is_empty() {
        eprintln!("No keywords match the given category");
        return Ok(exitcode::USAGE);
    }

    if args.json {
        let info: Vec<KeywordInfo> = keywords
            .iter()
            .map(|kind| KeywordInfo {
                name: kind.name(),
                category: kind.category(),
                applies_to: kind.applies_to().iter().map(|t| t.name()).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&info).into_diagnostic()?);
    } else {
        println!("{}", format_keyword_table(&keywords));
    }

    Ok(exitcode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_is_a_usage_error() {
        let args = KeywordsArgs {
            category: Some("validation".to_string()),
            json: false,
        };
        assert_eq!(run_keywords(args).unwrap(), exitcode::USAGE);
    }

    #[test]
    fn annotations_can_be_listed_alone() {
        let args = KeywordsArgs {
            category: Some("annotation".to_string()),
            json: true,
        };
        assert_eq!(run_keywords(args).unwrap(), exitcode::OK);
    }
}
