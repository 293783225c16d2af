//! Hinter for reedline - shows history hints and feeds every keystroke to the completion engine

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

use super::completion::ShellCompleter;

/// Hinter that treats each edit of the line as a completion request.
///
/// reedline only asks the completer for suggestions when the menu opens, but
/// the hinter runs after every keystroke. Passing each new line through the
/// engine here is what starts background loading as the user enters commands.
pub struct CompletionHinter {
    completer: ShellCompleter,
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
    /// Line and cursor of the last completion request
    last_request: Option<(String, usize)>,
}

impl CompletionHinter {
    pub fn new(completer: ShellCompleter) -> Self {
        Self {
            completer,
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
            last_request: None,
        }
    }

    /// Forward an edit to the engine; repaints of an unchanged line are skipped
    fn request(&mut self, line: &str, pos: usize) {
        let previous = match &self.last_request {
            Some((prev, prev_pos)) if prev == line && *prev_pos == pos => return,
            Some((prev, _)) => prev.as_str(),
            None => "",
        };

        // A line that did not grow or shrink one keystroke at a time skipped its parents
        if !is_single_edit(previous, line) {
            self.completer.replay_prefixes(line, pos);
        }
        self.completer.complete(line, pos);
        self.last_request = Some((line.to_string(), pos));
    }
}

fn is_single_edit(previous: &str, line: &str) -> bool {
    if let Some(added) = line.strip_prefix(previous) {
        return added.chars().count() <= 1;
    }
    previous.starts_with(line)
}

impl Hinter for CompletionHinter {
    /// Provide a hint for the current line
    ///
    /// # Arguments
    /// * `line` - The current input line
    /// * `pos` - Cursor position
    /// * `history` - Command history
    /// * `use_ansi_coloring` - Whether to use ANSI colors
    /// * `_cwd` - Current working directory (unused)
    fn handle(&mut self, line: &str, pos: usize, history: &dyn History, use_ansi_coloring: bool, _cwd: &str) -> String {
        self.current_hint.clear();
        self.request(line, pos);

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let found = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()
            .and_then(|results| results.into_iter().next());
        let Some(item) = found else {
            return String::new();
        };

        match item.command_line.strip_prefix(line) {
            Some(hint) if !hint.is_empty() => {
                self.current_hint = hint.to_string();
                if use_ansi_coloring {
                    self.style.paint(hint).to_string()
                } else {
                    hint.to_string()
                }
            }
            _ => String::new(),
        }
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }

    fn next_hint_token(&self) -> String {
        self.current_hint
            .split_inclusive(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .to_string()
    }
}
