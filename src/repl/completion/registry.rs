//! Completion registry
//!
//! Maps normalized command paths (and command path + flag name) to the
//! providers registered during startup wiring. Lookups are plain reads;
//! an absent entry simply means "not completable".

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::provider::{Completable, FlagProvider};
use crate::tree::CommandNode;

/// Normalized key identifying a node, or a node and one of its flags.
///
/// The root program name is stripped, so the root itself maps to `""` and
/// `cloud kafka cluster` maps to `kafka cluster`. Flag keys append
/// ` --<flag>` to the node key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryKey(String);

impl RegistryKey {
    pub fn for_node(node: &CommandNode) -> Self {
        Self(node.command_path())
    }

    pub fn for_flag(node: &CommandNode, flag: &str) -> Self {
        Self::for_node(node).with_flag(flag)
    }

    /// Flag key derived from a node key
    pub fn with_flag(&self, flag: &str) -> Self {
        Self(format!("{} --{}", self.0, flag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegistryKey {
    /// Build a node key from a space separated command path
    fn from(path: &str) -> Self {
        Self(path.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Registered providers, populated once at startup
#[derive(Default)]
pub struct CompletionRegistry {
    commands: RwLock<HashMap<RegistryKey, Completable>>,
    flags: RwLock<HashMap<RegistryKey, HashMap<String, Arc<dyn FlagProvider>>>>,
}

impl CompletionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command provider; replaces any earlier registration
    pub fn register(&self, node: &CommandNode, completable: Completable) {
        let key = RegistryKey::for_node(node);
        tracing::debug!(key = %key, provider = ?completable, "registered command provider");
        self.commands
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, completable);
    }

    /// Register a provider for one flag of a node; replaces any earlier registration
    pub fn register_flag(&self, node: &CommandNode, flag: &str, provider: Arc<dyn FlagProvider>) {
        let key = RegistryKey::for_node(node);
        tracing::debug!(key = %key, flag, "registered flag provider");
        self.flags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .insert(flag.to_string(), provider);
    }

    pub fn lookup(&self, node: &CommandNode) -> Option<Completable> {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&RegistryKey::for_node(node))
            .cloned()
    }

    pub fn lookup_flag(&self, node: &CommandNode, flag: &str) -> Option<Arc<dyn FlagProvider>> {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&RegistryKey::for_node(node))
            .and_then(|flags| flags.get(flag).cloned())
    }

    /// Flag providers registered directly on a node
    pub fn flags_of(&self, node: &CommandNode) -> Vec<(String, Arc<dyn FlagProvider>)> {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&RegistryKey::for_node(node))
            .map(|flags| {
                let mut flags: Vec<_> = flags
                    .iter()
                    .map(|(name, provider)| (name.clone(), Arc::clone(provider)))
                    .collect();
                flags.sort_by(|a, b| a.0.cmp(&b.0));
                flags
            })
            .unwrap_or_default()
    }

    /// Number of registered command providers
    pub fn len(&self) -> usize {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::completion::provider::FixedProvider;
    use crate::repl::completion::Suggestion;
    use crate::tree::CommandTree;
    use clap::Command;

    fn tree() -> CommandTree {
        CommandTree::from_clap(
            &Command::new("cloud").subcommand(
                Command::new("kafka")
                    .subcommand(Command::new("cluster").subcommand(Command::new("describe"))),
            ),
        )
    }

    #[test]
    fn test_keys_strip_root() {
        let tree = tree();
        assert_eq!(RegistryKey::for_node(tree.root()).as_str(), "");
        let cluster = tree.find_path("kafka cluster").unwrap();
        assert_eq!(RegistryKey::for_node(&cluster).as_str(), "kafka cluster");
        assert_eq!(
            RegistryKey::for_flag(&cluster, "environment").as_str(),
            "kafka cluster --environment"
        );
        assert_eq!(RegistryKey::from("  kafka   cluster "), RegistryKey::for_node(&cluster));
    }

    #[test]
    fn test_register_and_lookup() {
        let tree = tree();
        let registry = CompletionRegistry::new();
        let cluster = tree.find_path("kafka cluster").unwrap();
        let describe = tree.find_path("kafka cluster describe").unwrap();

        assert!(registry.lookup(&cluster).is_none());
        registry.register(&cluster, Completable::plain(FixedProvider::new(["describe"], vec![])));
        assert!(registry.lookup(&cluster).is_some());
        assert!(registry.lookup(&describe).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregistration_replaces() {
        let tree = tree();
        let registry = CompletionRegistry::new();
        let cluster = tree.find_path("kafka cluster").unwrap();

        registry.register(&cluster, Completable::plain(FixedProvider::new(["describe"], vec![])));
        registry.register(&cluster, Completable::plain(FixedProvider::new(["use"], vec![])));

        let found = registry.lookup(&cluster).unwrap();
        assert!(found.completes_child("use"));
        assert!(!found.completes_child("describe"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_flag_lookup() {
        let tree = tree();
        let registry = CompletionRegistry::new();
        let describe = tree.find_path("kafka cluster describe").unwrap();
        let provider = Arc::new(FixedProvider::new(
            Vec::<String>::new(),
            vec![Suggestion::new("env-1", "")],
        ));

        registry.register_flag(&describe, "environment", provider);
        assert!(registry.lookup_flag(&describe, "environment").is_some());
        assert!(registry.lookup_flag(&describe, "cluster").is_none());
        assert_eq!(registry.flags_of(&describe).len(), 1);
        assert!(registry.flags_of(tree.root()).is_empty());
    }
}
