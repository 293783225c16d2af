//! Output formatting for one-shot completion results
//!
//! Renders a suggestion list as a table (tabled), as JSON (serde_json) or as
//! plain lines suitable for shell completion scripts.

use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Rows, width::Width},
};

use crate::error::Result;
use crate::repl::completion::Suggestion;

/// Maximum width for the description column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 60;

/// Output format of the `complete` subcommand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Bordered table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// One suggestion text per line
    Plain,
}

#[derive(Serialize)]
struct Report<'a> {
    line: &'a str,
    start: usize,
    suggestions: &'a [Suggestion],
}

/// Formatter for completion results
pub struct SuggestionFormatter {
    format: OutputFormat,
    use_colors: bool,
    max_column_width: usize,
}

impl SuggestionFormatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format` - Output format
    /// * `use_colors` - Color the table header
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self {
            format,
            use_colors,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }

    /// Render suggestions computed for `line`, replacing from byte `start`
    pub fn format(&self, line: &str, start: usize, suggestions: &[Suggestion]) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_table(suggestions)),
            OutputFormat::Json => {
                let report = Report {
                    line,
                    start,
                    suggestions,
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
            OutputFormat::Plain => Ok(suggestions
                .iter()
                .filter(|s| !s.is_message())
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_table(&self, suggestions: &[Suggestion]) -> String {
        if suggestions.is_empty() {
            return "(no suggestions)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["suggestion", "description"]);
        for s in suggestions {
            let text = if s.is_message() { "" } else { s.text.as_str() };
            builder.push_record([text, s.description.as_str()]);
        }

        let mut table: Table = builder.build();
        table.with(Style::modern());
        table.with(Modify::new(Rows::new(1..)).with(Width::wrap(self.max_column_width)));
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Suggestion> {
        vec![
            Suggestion::new("lkc-12345", "orders"),
            Suggestion::new("lkc-67890", "analytics"),
        ]
    }

    #[test]
    fn test_plain_skips_messages() {
        let formatter = SuggestionFormatter::new(OutputFormat::Plain, false);
        let mut suggestions = sample();
        suggestions.push(Suggestion::message("2 clusters"));
        let out = formatter.format("kafka cluster use ", 18, &suggestions).unwrap();
        assert_eq!(out, "lkc-12345\nlkc-67890");
    }

    #[test]
    fn test_json_report() {
        let formatter = SuggestionFormatter::new(OutputFormat::Json, false);
        let out = formatter.format("kafka cluster use ", 18, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["start"], 18);
        assert_eq!(value["suggestions"][1]["text"], "lkc-67890");
        assert_eq!(value["suggestions"][1]["description"], "analytics");
    }

    #[test]
    fn test_table_contains_rows() {
        let formatter = SuggestionFormatter::new(OutputFormat::Table, false);
        let out = formatter.format("kafka cluster use ", 18, &sample()).unwrap();
        assert!(out.contains("suggestion"));
        assert!(out.contains("lkc-12345"));
        assert!(out.contains("analytics"));
    }

    #[test]
    fn test_empty_table() {
        let formatter = SuggestionFormatter::new(OutputFormat::Table, true);
        assert_eq!(formatter.format("", 0, &[]).unwrap(), "(no suggestions)");
    }
}
