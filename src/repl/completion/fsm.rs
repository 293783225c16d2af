//! Completion state detection
//!
//! Every request is classified from scratch; nothing carries over between
//! keystrokes. The checks run in a fixed order and the first match wins:
//!
//! 1. [`CompletionState::Suppressed`] when the cursor is inside a token
//! 2. [`CompletionState::FlagValue`] when the line ends with a value-taking
//!    flag whose values are registered on the matched command itself
//! 3. [`CompletionState::CachePriming`] when the matched command has its own provider
//! 4. [`CompletionState::FlagValue`] when the line ends with any other value-taking flag
//! 5. [`CompletionState::CommandArgument`] otherwise
//!
//! The engine still refreshes the command's own provider in case 2.

use super::line::Line;
use super::provider::Completable;
use super::registry::{CompletionRegistry, RegistryKey};
use super::static_table::StaticSuggestionTable;
use crate::tree::{FlagSpec, Walk};

/// Classification of one completion request
#[derive(Debug, Clone)]
pub enum CompletionState {
    /// Mid-token; no suggestions
    Suppressed,
    /// The matched command's own provider should start loading
    CachePriming(Completable),
    /// Completing the value of this flag
    FlagValue(FlagSpec),
    /// Completing the next positional argument of the matched command
    CommandArgument,
}

impl CompletionState {
    /// Classify a request
    ///
    /// # Arguments
    /// * `line` - The line model
    /// * `walk` - The committed tokens resolved against the command tree
    /// * `registry` - Registered providers
    /// * `statics` - Static flag value tables
    pub fn detect(line: &Line, walk: &Walk, registry: &CompletionRegistry, statics: &StaticSuggestionTable) -> Self {
        if !line.is_between_tokens() {
            return CompletionState::Suppressed;
        }

        if let Some(flag) = &walk.pending_flag {
            let node = walk.node();
            let on_node = registry.lookup_flag(node, &flag.name).is_some()
                || statics.lookup(&flag.name, &RegistryKey::for_node(node)).is_some();
            if on_node {
                return CompletionState::FlagValue(flag.clone());
            }
        }

        if let Some(completable) = registry.lookup(walk.node()) {
            return CompletionState::CachePriming(completable);
        }

        // The walker only leaves a flag pending when it takes a value, so
        // switches and counters fall through to the argument case.
        if let Some(flag) = &walk.pending_flag {
            return CompletionState::FlagValue(flag.clone());
        }

        CompletionState::CommandArgument
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompletionState::Suppressed => "suppressed",
            CompletionState::CachePriming(_) => "cache-priming",
            CompletionState::FlagValue(_) => "flag-value",
            CompletionState::CommandArgument => "command-argument",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repl::completion::Suggestion;
    use crate::repl::completion::provider::FixedProvider;
    use crate::tree::CommandTree;
    use clap::{Arg, ArgAction, Command};

    fn tree() -> CommandTree {
        CommandTree::from_clap(
            &Command::new("cloud")
                .arg(Arg::new("verbose").short('v').action(ArgAction::Count).global(true))
                .subcommand(
                    Command::new("kafka").subcommand(
                        Command::new("cluster")
                            .subcommand(
                                Command::new("list")
                                    .arg(Arg::new("environment").long("environment"))
                                    .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
                            )
                            .subcommand(Command::new("describe").arg(Arg::new("id"))),
                    ),
                ),
        )
    }

    fn detect(tree: &CommandTree, registry: &CompletionRegistry, text: &str) -> CompletionState {
        detect_with(tree, registry, &StaticSuggestionTable::new(), text)
    }

    fn detect_with(
        tree: &CommandTree,
        registry: &CompletionRegistry,
        statics: &StaticSuggestionTable,
        text: &str,
    ) -> CompletionState {
        let line = Line::new(text, text.len());
        let walk = tree.walk(line.committed_tokens());
        CompletionState::detect(&line, &walk, registry, statics)
    }

    fn registry(tree: &CommandTree) -> CompletionRegistry {
        let registry = CompletionRegistry::new();
        let cluster = tree.find_path("kafka cluster").unwrap();
        registry.register(&cluster, Completable::plain(FixedProvider::new(["describe"], vec![])));
        registry
    }

    #[test]
    fn test_mid_token_is_suppressed() {
        let tree = tree();
        let registry = registry(&tree);
        assert!(matches!(detect(&tree, &registry, "kafka clus"), CompletionState::Suppressed));
        assert!(matches!(detect(&tree, &registry, "kafka cluster"), CompletionState::Suppressed));
        assert!(matches!(detect(&tree, &registry, ""), CompletionState::Suppressed));
    }

    #[test]
    fn test_own_provider_primes() {
        let tree = tree();
        let registry = registry(&tree);
        let state = detect(&tree, &registry, "kafka cluster ");
        assert_eq!(state.name(), "cache-priming");
    }

    #[test]
    fn test_value_flag_detected() {
        let tree = tree();
        let registry = registry(&tree);
        match detect(&tree, &registry, "kafka cluster list --environment ") {
            CompletionState::FlagValue(flag) => assert_eq!(flag.name, "environment"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_switch_and_counter_never_flag_value() {
        let tree = tree();
        let registry = registry(&tree);
        assert!(matches!(
            detect(&tree, &registry, "kafka cluster list --all "),
            CompletionState::CommandArgument
        ));
        assert!(matches!(
            detect(&tree, &registry, "kafka cluster list -v "),
            CompletionState::CommandArgument
        ));
    }

    #[test]
    fn test_default_is_command_argument() {
        let tree = tree();
        let registry = registry(&tree);
        assert!(matches!(
            detect(&tree, &registry, "kafka cluster describe "),
            CompletionState::CommandArgument
        ));
    }

    #[test]
    fn test_switch_on_provider_node_still_primes() {
        let tree = tree();
        let registry = registry(&tree);
        assert_eq!(detect(&tree, &registry, "kafka cluster -v ").name(), "cache-priming");
    }

    #[test]
    fn test_direct_flag_provider_beats_priming() {
        let tree = CommandTree::from_clap(
            &Command::new("cloud").subcommand(
                Command::new("environment")
                    .arg(Arg::new("region").long("region"))
                    .subcommand(Command::new("use")),
            ),
        );
        let registry = CompletionRegistry::new();
        let environment = tree.find_path("environment").unwrap();
        registry.register(&environment, Completable::plain(FixedProvider::new(["use"], vec![])));
        registry.register_flag(&environment, "region", Arc::new(FixedProvider::new(Vec::<String>::new(), vec![])));

        assert_eq!(detect(&tree, &registry, "environment ").name(), "cache-priming");
        match detect(&tree, &registry, "environment --region ") {
            CompletionState::FlagValue(flag) => assert_eq!(flag.name, "region"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_static_flag_beats_priming() {
        let tree = CommandTree::from_clap(
            &Command::new("cloud").subcommand(Command::new("environment").arg(Arg::new("output").long("output"))),
        );
        let registry = CompletionRegistry::new();
        let environment = tree.find_path("environment").unwrap();
        registry.register(&environment, Completable::plain(FixedProvider::new(Vec::<String>::new(), vec![])));
        let statics = StaticSuggestionTable::new();
        statics.register("output", vec![Suggestion::new("json", "")], ["environment"]);

        assert!(matches!(
            detect_with(&tree, &registry, &statics, "environment --output "),
            CompletionState::FlagValue(_)
        ));
        assert_eq!(
            detect_with(&tree, &registry, &StaticSuggestionTable::new(), "environment --output ").name(),
            "cache-priming"
        );
    }
}
