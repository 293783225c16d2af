//! Completion system for the interactive shell
//!
//! Computes suggestions for a partially typed command line against a
//! tree-structured CLI. Static suggestions (subcommands, flags) come straight
//! from the command tree; dynamic ones (resource names, flag values) come from
//! providers registered against command paths and are loaded in the
//! background so a keystroke never waits on the network.
//!
//! # Architecture
//!
//! - **Line**: Input line with cursor awareness and shell-style tokens
//! - **Registry**: Command path (and command path + flag) to provider
//! - **Cache**: Suggestion lists written by background population units
//! - **StaticTable**: Fixed flag values for selected command paths
//! - **FSM**: Classifies a request as suppressed, cache priming, flag value or argument
//! - **Filter**: Drops suggestions already present on the line
//! - **Root**: Subcommand and flag completion from the tree
//! - **Composite**: Root results followed by engine results
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use cliprompt::config::CompletionConfig;
//! use cliprompt::repl::completion::{CompletionEngine, ShellCompleter};
//! use cliprompt::tree::CommandTree;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let tree = Arc::new(CommandTree::from_clap(&cliprompt::commands::command()));
//! let engine = Arc::new(CompletionEngine::new(
//!     tree,
//!     runtime.handle().clone(),
//!     &CompletionConfig::default(),
//! ));
//! let completer = ShellCompleter::new(engine);
//!
//! // Complete "kafka cl" with cursor at position 8
//! let (start, suggestions) = completer.complete("kafka cl", 8);
//! // Returns "cluster" starting at byte 6
//! ```

mod cache;
mod composite;
mod engine;
mod filter;
mod fsm;
mod line;
mod provider;
mod registry;
mod root;
mod static_table;
mod suggestion;


pub use cache::SuggestionCache;
pub use composite::ShellCompleter;
pub use engine::CompletionEngine;
pub use filter::{MESSAGE_PLACEHOLDER, filter_typed};
pub use fsm::CompletionState;
pub use line::Line;
pub use provider::{
    AllowAll, CommandProvider, Completable, CompletionGate, FixedProvider, FlagAwareProvider, FlagProvider,
};
pub use registry::{CompletionRegistry, RegistryKey};
pub use root::RootCompleter;
pub use static_table::StaticSuggestionTable;
pub use suggestion::Suggestion;
