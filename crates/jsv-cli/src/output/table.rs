//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use jsv::{KeywordKind, Problem};

/// Format the supported keywords as an ASCII table.
pub fn format_keyword_table(keywords: &[KeywordKind]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Keyword", "Category", "Applies to"]);

    for kind in keywords {
        let applies_to = kind.applies_to();
        let types = if applies_to.is_empty() {
            "any".to_string()
        } else {
            applies_to
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![kind.name().to_string(), kind.category().to_string(), types]);
    }

    table
}

/// Format problems as an ASCII table, one row per problem.
pub fn format_problem_table(problems: &[Problem]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Location", "Pointer", "Problem", "Parameters"]);

    for problem in problems {
        let pointer = if problem.pointer().is_empty() {
            "(root)"
        } else {
            problem.pointer()
        };
        let params = problem
            .params()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            problem.location().to_string(),
            pointer.to_string(),
            problem.key().to_string(),
            params,
        ]);
    }

    table
}
