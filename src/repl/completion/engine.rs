//! Completion engine - dynamic, registry backed completion
//!
//! Ties the registry, the suggestion cache and the static tables together.
//! One engine is built during CLI wiring and shared with the line editor;
//! tests build their own isolated instances.

use std::sync::Arc;

use tokio::runtime::Handle;

use super::cache::{Fetch, Job, SuggestionCache};
use super::filter::filter_typed;
use super::fsm::CompletionState;
use super::line::Line;
use super::provider::{AllowAll, Completable, CompletionGate, FlagProvider};
use super::registry::{CompletionRegistry, RegistryKey};
use super::static_table::StaticSuggestionTable;
use super::suggestion::Suggestion;
use crate::config::CompletionConfig;
use crate::error::{PromptError, Result};
use crate::tree::{CommandNode, CommandTree, FlagSpec, Walk};

/// Registry backed completer
pub struct CompletionEngine {
    tree: Arc<CommandTree>,
    registry: CompletionRegistry,
    cache: SuggestionCache,
    statics: StaticSuggestionTable,
    gate: Arc<dyn CompletionGate>,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `tree` - Command tree to complete against
    /// * `runtime` - Runtime that runs background population
    /// * `config` - Timeout and cache lifetime settings
    pub fn new(tree: Arc<CommandTree>, runtime: Handle, config: &CompletionConfig) -> Self {
        Self {
            tree,
            registry: CompletionRegistry::new(),
            cache: SuggestionCache::new(runtime, config.provider_timeout(), config.cache_ttl()),
            statics: StaticSuggestionTable::new(),
            gate: Arc::new(AllowAll),
        }
    }

    /// Replace the gate deciding whether a command may complete
    pub fn with_gate(mut self, gate: Arc<dyn CompletionGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn tree(&self) -> &Arc<CommandTree> {
        &self.tree
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    pub fn registry(&self) -> &CompletionRegistry {
        &self.registry
    }

    /// Register a command provider on `node`
    pub fn register_command(&self, node: &CommandNode, completable: Completable) {
        self.registry.register(node, completable);
    }

    /// Register a flag value provider on (`node`, `flag`)
    pub fn register_flag(&self, node: &CommandNode, flag: &str, provider: Arc<dyn FlagProvider>) {
        self.registry.register_flag(node, flag, provider);
    }

    /// Register fixed values for `flag` on the listed command paths
    pub fn register_static_flag<I, S>(&self, flag: &str, suggestions: Vec<Suggestion>, eligible_paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.statics.register(flag, suggestions, eligible_paths);
    }

    /// [`register_command`](Self::register_command) by command path
    pub fn register_command_at(&self, path: &str, completable: Completable) -> Result<()> {
        let node = self.node_at(path)?;
        self.register_command(&node, completable);
        Ok(())
    }

    /// [`register_flag`](Self::register_flag) by command path
    pub fn register_flag_at(&self, path: &str, flag: &str, provider: Arc<dyn FlagProvider>) -> Result<()> {
        let node = self.node_at(path)?;
        if node.flag(flag).is_none() {
            return Err(PromptError::Generic(format!(
                "Command '{}' has no flag --{}",
                path, flag
            )));
        }
        self.register_flag(&node, flag, provider);
        Ok(())
    }

    fn node_at(&self, path: &str) -> Result<Arc<CommandNode>> {
        self.tree
            .find_path(path)
            .ok_or_else(|| PromptError::Generic(format!("Unknown command path '{}'", path)))
    }

    /// Compute dynamic suggestions for the line.
    ///
    /// Never blocks on a provider except for the flag value fallback on a
    /// cache miss, which is bounded by the provider timeout.
    pub fn complete(&self, line: &Line) -> Vec<Suggestion> {
        let walk = self.tree.walk(line.committed_tokens());
        let state = CompletionState::detect(line, &walk, &self.registry, &self.statics);

        tracing::debug!(
            state = state.name(),
            node = %walk.node().command_path(),
            residual = walk.residual.len(),
            "completion state"
        );

        match state {
            CompletionState::Suppressed => Vec::new(),
            CompletionState::CachePriming(completable) => {
                self.populate(walk.node(), &completable);
                Vec::new()
            }
            CompletionState::FlagValue(flag) => {
                // Entering a command through one of its own flags still counts as entering it
                if let Some(completable) = self.registry.lookup(walk.node()) {
                    self.populate(walk.node(), &completable);
                }
                self.flag_value(line, &walk, &flag)
            }
            CompletionState::CommandArgument => {
                filter_typed(line.current_line(), self.command_argument(&walk))
            }
        }
    }

    /// Dispatch background population for a node and its flags
    fn populate(&self, node: &CommandNode, completable: &Completable) {
        let key = RegistryKey::for_node(node);
        let mut jobs: Vec<Job> = vec![(key.clone(), Fetch::Command(completable.clone()))];
        jobs.extend(
            completable
                .flag_providers()
                .into_iter()
                .chain(self.registry.flags_of(node))
                .map(|(flag, provider)| (key.with_flag(&flag), Fetch::Flag(provider))),
        );

        let allowed = self.gate.can_complete(node);
        if allowed {
            tracing::debug!(key = %key, units = jobs.len(), "dispatching population");
        } else {
            tracing::debug!(key = %key, "completion not allowed, clearing cached suggestions");
        }
        self.cache.populate(jobs, allowed);
    }

    fn flag_value(&self, line: &Line, walk: &Walk, flag: &FlagSpec) -> Vec<Suggestion> {
        let node = walk.node();
        let node_key = RegistryKey::for_node(node);

        if let Some(values) = self.statics.lookup(&flag.name, &node_key) {
            return values;
        }

        if let Some(provider) = self.registry.lookup_flag(node, &flag.name) {
            let values = self.cached_or_fetch(node, node_key.with_flag(&flag.name), Fetch::Flag(provider));
            return filter_typed(line.current_line(), values);
        }

        let Some(parent) = walk.parent() else {
            return Vec::new();
        };
        let Some(completable) = self.registry.lookup(parent) else {
            return Vec::new();
        };
        if !completable.completes_flag_for(&flag.name, node.name()) {
            tracing::debug!(flag = %flag.name, node = %node.command_path(), "flag not completable here");
            return Vec::new();
        }
        let Some(provider) = completable.flag_provider(&flag.name) else {
            return Vec::new();
        };

        let key = RegistryKey::for_flag(parent, &flag.name);
        let values = self.cached_or_fetch(parent, key, Fetch::Flag(provider));
        filter_typed(line.current_line(), values)
    }

    /// Cached flag values, or a bounded synchronous fetch on a miss
    fn cached_or_fetch(&self, owner: &CommandNode, key: RegistryKey, fetch: Fetch) -> Vec<Suggestion> {
        if let Some(values) = self.cache.get(&key) {
            return values;
        }
        if !self.gate.can_complete(owner) {
            return Vec::new();
        }

        tracing::debug!(key = %key, "flag values not cached, fetching synchronously");
        let values = self.cache.fetch_now(&key, fetch);
        self.cache.store(key, values.clone());
        values
    }

    fn command_argument(&self, walk: &Walk) -> Vec<Suggestion> {
        let node = walk.node();
        let Some(parent) = walk.parent() else {
            return Vec::new();
        };
        let Some(completable) = self.registry.lookup(parent) else {
            return Vec::new();
        };
        if !completable.completes_child(node.name()) {
            return Vec::new();
        }
        // Argument slot already filled
        if walk.residual.len() > 1 && !node.arity().is_variadic() {
            return Vec::new();
        }

        self.cache
            .get(&RegistryKey::for_node(parent))
            .unwrap_or_default()
    }

    /// Resolves once all dispatched population has finished
    pub async fn settled(&self) {
        self.cache.settled().await;
    }

    /// Block until all dispatched population has finished; call from outside the runtime
    pub fn wait_for_population(&self) {
        self.cache.wait_for_population();
    }
}
