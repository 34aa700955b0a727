//! Output formatting for CLI commands.

pub mod diagnostic;
pub mod table;

use owo_colors::{OwoColorize, Stream, Style};

pub use diagnostic::JsvDiagnostic;

/// Style `text` for stdout, honoring `--color` and the terminal's support.
pub fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}
