//! Implementation of the `jsv check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use clap::Args;
use jsv::{LoadError, ReadWarning, ReaderOptions, SchemaReader};
use miette::{miette, IntoDiagnostic, Report, Result};
use owo_colors::Style;
use serde::Serialize;

use crate::output::{paint, JsvDiagnostic};

/// Arguments for the check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schema files to check (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat unknown keywords as errors
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked schema.
#[derive(Debug, Serialize)]
struct CheckResult {
    file: String,
    error: Option<String>,
    warnings: Vec<String>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let options = ReaderOptions::builder().strict(args.strict).build();
    let mut results = Vec::with_capacity(args.files.len());

    for file in &args.files {
        let mut reader = SchemaReader::with_options(options.clone());
        let outcome = reader.read_file(file);
        let warnings = reader.take_warnings();

        if !args.json {
            match &outcome {
                Ok(_) => println!("{} {}", paint("✓", Style::new().green()), file.display()),
                Err(e) => {
                    println!("{} {}", paint("✗", Style::new().red()), file.display());
                    eprintln!("{:?}", error_report(e));
                }
            }
            print_warnings(&warnings);
        }

        results.push(CheckResult {
            file: file.display().to_string(),
            error: outcome.err().map(|e| e.to_string()),
            warnings: warnings.iter().map(ToString::to_string).collect(),
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results).into_diagnostic()?);
    }

    if results.iter().any(|r| r.error.is_some()) {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

fn error_report(error: &LoadError) -> Report {
    if let LoadError::Schema { path, source } = error {
        let content = read_to_string(path).unwrap_or_default();
        if let Some(diagnostic) = JsvDiagnostic::from_schema_error(path, &content, source) {
            return diagnostic.into();
        }
    }
    miette!("{}", error)
}

fn print_warnings(warnings: &[ReadWarning]) {
    for warning in warnings {
        println!("  {} {}", paint("warning:", Style::new().yellow()), warning);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn check(files: &[(&str, &str)], strict: bool) -> i32 {
        let dir = TempDir::new().unwrap();
        let files = files
            .iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                fs::write(&path, content).unwrap();
                path
            })
            .collect();
        run_check(CheckArgs {
            files,
            strict,
            json: true,
        })
        .unwrap()
    }

    #[test]
    fn warnings_do_not_fail_the_check() {
        assert_eq!(check(&[("a.json", r#"{"tpye": "string"}"#)], false), exitcode::OK);
    }

    #[test]
    fn strict_check_fails_on_unknown_keywords() {
        assert_eq!(
            check(&[("a.json", r#"{"tpye": "string"}"#)], true),
            exitcode::DATAERR
        );
    }

    #[test]
    fn any_broken_schema_fails_the_check() {
        let files = [("good.json", "true"), ("bad.json", r#"{"minimum": "x"}"#)];
        assert_eq!(check(&files, false), exitcode::DATAERR);
    }
}
