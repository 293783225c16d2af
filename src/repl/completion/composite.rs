//! Composite completer - static tree completion plus dynamic provider results

use std::sync::Arc;

use super::engine::CompletionEngine;
use super::line::Line;
use super::root::RootCompleter;
use super::suggestion::Suggestion;

/// The single completion entry point handed to the line editor
#[derive(Clone)]
pub struct ShellCompleter {
    root: RootCompleter,
    engine: Arc<CompletionEngine>,
}

impl ShellCompleter {
    pub fn new(engine: Arc<CompletionEngine>) -> Self {
        Self {
            root: RootCompleter::new(Arc::clone(engine.tree())),
            engine,
        }
    }

    pub fn engine(&self) -> &Arc<CompletionEngine> {
        &self.engine
    }

    /// Complete the input at the given cursor position
    ///
    /// # Returns
    /// * `(usize, Vec<Suggestion>)` - Byte offset of the word being replaced and the suggestions
    pub fn complete(&self, text: &str, cursor: usize) -> (usize, Vec<Suggestion>) {
        let line = Line::new(text, cursor);
        let mut suggestions = self.root.complete(&line);
        suggestions.extend(self.engine.complete(&line));
        (line.completion_start(), suggestions)
    }

    /// Run the engine over each committed prefix before the cursor, the way
    /// typing the line one word at a time would.
    ///
    /// Lines that appear whole (pasted, recalled from history, passed on the
    /// command line) never pass through their parents, so nothing would have
    /// started loading for them.
    pub fn replay_prefixes(&self, text: &str, cursor: usize) {
        let line = Line::new(text, cursor);
        let tokens = line.committed_tokens();
        for end in 0..tokens.len() {
            let Ok(joined) = shlex::try_join(tokens[..end].iter().map(String::as_str)) else {
                continue;
            };
            let prefix = format!("{} ", joined);
            self.engine.complete(&Line::new(&prefix, prefix.len()));
        }
    }
}
