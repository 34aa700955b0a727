//! Implementation of the `jsv validate` command.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use jsv::{
    LoadError, MessageKey, ParamValue, ParseError, Problem, ReaderOptions, Schema, SchemaReader,
    ValidationReport, Validator, ValidatorOptions,
};
use miette::{miette, IntoDiagnostic, Report, Result};
use owo_colors::Style;
use serde::Serialize;
use tracing::{debug, warn};

use crate::output::table::format_problem_table;
use crate::output::{paint, JsvDiagnostic};

/// Arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Schema file (.json)
    #[arg(long, short)]
    pub schema: PathBuf,

    /// Documents to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Reject unknown schema keywords instead of ignoring them
    #[arg(long)]
    pub strict: bool,

    /// Stop collecting problems after this many per document
    #[arg(long, env = "JSV_MAX_PROBLEMS")]
    pub max_problems: Option<usize>,

    /// Print problems as a table
    #[arg(long, conflicts_with = "json")]
    pub table: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one validated document.
#[derive(Debug, Serialize)]
struct DocumentReport<'a> {
    file: String,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

/// Run the validate command.
pub fn run_validate(args: ValidateArgs) -> Result<i32> {
    let schema = load_schema(&args.schema, args.strict)?;
    let options = ValidatorOptions::builder()
        .maybe_max_problems(args.max_problems)
        .build();

    let mut reports = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let content = read_to_string(file)
            .into_diagnostic()
            .map_err(|e| miette!("Failed to read document {}: {}", file.display(), e))?;
        let report = Validator::with_options(&schema, options.clone()).run(&content);
        debug!(file = %file.display(), outcome = ?report.outcome, "validated");
        if !args.json {
            print_report(file, &content, &report, args.table);
        }
        reports.push(report);
    }

    if args.json {
        let output: Vec<DocumentReport<'_>> = args
            .files
            .iter()
            .zip(&reports)
            .map(|(file, report)| DocumentReport {
                file: file.display().to_string(),
                report,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    }

    Ok(exit_code(&reports))
}

fn load_schema(path: &Path, strict: bool) -> Result<Arc<Schema>> {
    let mut reader = SchemaReader::with_options(ReaderOptions::builder().strict(strict).build());
    let schema = match reader.read_file(path) {
        Ok(schema) => schema,
        Err(LoadError::Schema { source, .. }) => {
            let content = read_to_string(path).unwrap_or_default();
            return Err(match JsvDiagnostic::from_schema_error(path, &content, &source) {
                Some(diagnostic) => diagnostic.into(),
                None => miette!("{}: {}", path.display(), source),
            });
        }
        Err(e) => return Err(miette!("{}", e)),
    };
    for warning in reader.warnings() {
        warn!(schema = %path.display(), "{warning}");
    }
    Ok(schema)
}

fn print_report(file: &Path, content: &str, report: &ValidationReport, table: bool) {
    match report.outcome {
        Some(true) => println!(
            "{} {}",
            paint("✓", Style::new().green()),
            file.display()
        ),
        Some(false) => {
            println!(
                "{} {}: {} problem(s)",
                paint("✗", Style::new().red()),
                file.display(),
                report.problems.len() + report.dropped
            );
            if table {
                println!("{}", format_problem_table(&report.problems));
            } else {
                for problem in &report.problems {
                    print_problem(problem, 1);
                }
            }
            if report.dropped > 0 {
                println!("  ... and {} more", report.dropped);
            }
        }
        None => {
            println!(
                "{} {}: not a complete JSON document",
                paint("✗", Style::new().red()),
                file.display()
            );
            if let Some(problem) = report.problems.first() {
                eprintln!("{:?}", syntax_report(file, content, problem));
            }
        }
    }
}

/// Print a problem and, indented below it, the problems of each failed
/// alternative.
fn print_problem(problem: &Problem, indent: usize) {
    println!("{:width$}{}", "", problem, width = indent * 2);
    for (i, branch) in problem.branches().iter().enumerate() {
        println!(
            "{:width$}{}",
            "",
            paint(&format!("alternative {}:", i + 1), Style::new().dimmed()),
            width = (indent + 1) * 2
        );
        for nested in branch {
            print_problem(nested, indent + 2);
        }
    }
}

fn syntax_report(file: &Path, content: &str, problem: &Problem) -> Report {
    if problem.key() != MessageKey::Syntax {
        return miette!("{}", problem);
    }
    let message = problem
        .param("message")
        .and_then(ParamValue::as_string)
        .unwrap_or("malformed JSON")
        .to_string();
    let error = ParseError::Syntax {
        location: problem.location(),
        message,
    };
    JsvDiagnostic::from_parse_error(file, content, &error).into()
}

fn exit_code(reports: &[ValidationReport]) -> i32 {
    if reports.iter().all(ValidationReport::is_valid) {
        exitcode::OK
    } else {
        exitcode::DATAERR
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn args(dir: &TempDir, schema: &str, documents: &[&str]) -> ValidateArgs {
        let schema_path = dir.path().join("schema.json");
        fs::write(&schema_path, schema).unwrap();
        let files = documents
            .iter()
            .enumerate()
            .map(|(i, document)| {
                let path = dir.path().join(format!("doc{i}.json"));
                fs::write(&path, document).unwrap();
                path
            })
            .collect();
        ValidateArgs {
            schema: schema_path,
            files,
            strict: false,
            max_problems: None,
            table: false,
            json: true,
        }
    }

    #[test]
    fn valid_documents_exit_ok() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, r#"{"type": "array"}"#, &["[]", "[1]"]);
        assert_eq!(run_validate(args).unwrap(), exitcode::OK);
    }

    #[test]
    fn invalid_documents_exit_with_data_error() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, r#"{"type": "array"}"#, &["[]", "{}"]);
        assert_eq!(run_validate(args).unwrap(), exitcode::DATAERR);
    }

    #[test]
    fn malformed_documents_exit_with_data_error() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, "true", &["[1,"]);
        assert_eq!(run_validate(args).unwrap(), exitcode::DATAERR);
    }

    #[test]
    fn unreadable_schema_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, "true", &["1"]);
        args.schema = dir.path().join("missing.json");
        assert!(run_validate(args).is_err());
    }
}
