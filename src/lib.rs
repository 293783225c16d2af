//! Interactive completion for tree-structured CLIs
//!
//! `cliprompt` wraps a clap command hierarchy in a REPL whose Tab completion
//! mixes static data (subcommands and flags) with dynamic resource names.
//! Dynamic lists are fetched in the background when a command is entered and
//! served from a cache afterwards.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `commands`: The `cloud` command tree and its resource providers
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Rendering of one-shot completion results
//! - `repl`: Interactive shell and the completion engine
//! - `tree`: Immutable snapshot of a clap command hierarchy
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cliprompt::commands::{self, InMemoryCatalog};
//! use cliprompt::config::CompletionConfig;
//! use cliprompt::{CommandTree, CompletionEngine, ShellCompleter};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let tree = Arc::new(CommandTree::from_clap(&commands::command()));
//! let engine = CompletionEngine::new(tree, runtime.handle().clone(), &CompletionConfig::default());
//! commands::register(&engine, Arc::new(InMemoryCatalog::sample(Default::default()))).unwrap();
//!
//! let completer = ShellCompleter::new(Arc::new(engine));
//! let (_start, suggestions) = completer.complete("kafka ", 6);
//! assert!(suggestions.iter().any(|s| s.text == "cluster"));
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod repl;
pub mod tree;

// Re-export commonly used types
pub use config::Config;
pub use error::{PromptError, Result};
pub use repl::ReplEngine;
pub use repl::completion::{CompletionEngine, ShellCompleter};
pub use tree::CommandTree;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
