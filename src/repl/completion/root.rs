//! Static completion from the command tree
//!
//! Suggests the subcommands and flags visible on the matched command. This is
//! plain tree introspection, so it runs on every request without caching.

use std::sync::Arc;

use super::line::Line;
use super::suggestion::Suggestion;
use crate::tree::{CommandNode, CommandTree, FlagProbe};

/// Subcommand and flag completer
#[derive(Debug, Clone)]
pub struct RootCompleter {
    tree: Arc<CommandTree>,
}

impl RootCompleter {
    pub fn new(tree: Arc<CommandTree>) -> Self {
        Self { tree }
    }

    pub fn complete(&self, line: &Line) -> Vec<Suggestion> {
        // The word under the cursor is quoted text, not a command or flag
        if line.has_open_quote() {
            return Vec::new();
        }

        let walk = self.tree.walk(line.committed_tokens());

        // A flag value is being typed; subcommands and flags make no sense here
        if walk.pending_flag.is_some() {
            return Vec::new();
        }

        // The walker descends into any child it can, so a residual naming a
        // child or flag only happens after `--`: that name is an argument.
        if let Some(first) = walk.residual.first() {
            if Self::names_candidate(walk.node(), first) {
                return Vec::new();
            }
        }

        let word = line.word_before_cursor();
        Self::candidates(walk.node(), &walk.probe, word, walk.residual.is_empty())
            .into_iter()
            .filter(|c| c.text.starts_with(word))
            .collect()
    }

    /// Whether `token` is the name of a visible subcommand or flag of `node`
    fn names_candidate(node: &CommandNode, token: &str) -> bool {
        let is_child = node.children().iter().any(|c| !c.is_hidden() && c.name() == token);
        let is_flag = node.flags().filter(|f| !f.hidden).any(|f| {
            token.strip_prefix("--") == Some(f.name.as_str())
                || f.short.is_some_and(|short| token.strip_prefix('-') == Some(short.to_string().as_str()))
        });
        is_child || is_flag
    }

    fn candidates(node: &CommandNode, probe: &FlagProbe, word: &str, with_commands: bool) -> Vec<Suggestion> {
        let mut out = Vec::new();

        if !word.starts_with('-') {
            if with_commands {
                out.extend(
                    node.children()
                        .iter()
                        .filter(|c| !c.is_hidden())
                        .map(|c| Suggestion::new(c.name(), c.about())),
                );
            }
            return out;
        }

        let long_only = word.starts_with("--");
        for flag in node.flags() {
            if flag.hidden || (probe.is_set(&flag.name) && !flag.kind.is_repeatable()) {
                continue;
            }
            let text = match flag.short {
                Some(short) if !long_only => format!("-{}", short),
                _ => format!("--{}", flag.name),
            };
            out.push(Suggestion::new(text, flag.help.clone()));
        }
        out
    }
}
