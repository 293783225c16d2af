//! Completer for reedline - provides completion suggestions

use nu_ansi_term::{Color, Style};
use reedline::{Completer, Span, Suggestion};

use super::completion::ShellCompleter;

/// Adapts [`ShellCompleter`] to reedline
pub struct PromptCompleter {
    completer: ShellCompleter,
}

impl PromptCompleter {
    pub fn new(completer: ShellCompleter) -> Self {
        Self { completer }
    }
}

impl Completer for PromptCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let (start, suggestions) = self.completer.complete(line, pos);

        suggestions
            .into_iter()
            .map(|s| {
                let message = s.is_message();
                Suggestion {
                    value: s.text,
                    description: (!s.description.is_empty()).then_some(s.description),
                    style: message.then(|| Style::new().italic().fg(Color::DarkGray)),
                    span: Span::new(start, pos),
                    append_whitespace: !message,
                    ..Default::default()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompletionConfig;
    use crate::repl::completion::CompletionEngine;
    use crate::tree::CommandTree;
    use clap::Command;
    use std::sync::Arc;

    fn create_test_completer(runtime: &tokio::runtime::Runtime) -> PromptCompleter {
        let tree = CommandTree::from_clap(
            &Command::new("cloud").subcommand(
                Command::new("kafka")
                    .subcommand(Command::new("cluster").about("Manage Kafka clusters"))
                    .subcommand(Command::new("topic").about("Manage Kafka topics")),
            ),
        );
        let engine = CompletionEngine::new(
            Arc::new(tree),
            runtime.handle().clone(),
            &CompletionConfig::default(),
        );
        PromptCompleter::new(ShellCompleter::new(Arc::new(engine)))
    }

    #[test]
    fn test_complete_subcommands() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut completer = create_test_completer(&runtime);
        let suggestions = completer.complete("kafka ", 6);

        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["cluster", "topic"]);
        assert_eq!(suggestions[0].description.as_deref(), Some("Manage Kafka clusters"));
        assert!(suggestions[0].append_whitespace);
    }

    #[test]
    fn test_span_position() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut completer = create_test_completer(&runtime);
        let suggestions = completer.complete("kafka cl", 8);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].span.start, 6);
        assert_eq!(suggestions[0].span.end, 8);
    }
}
