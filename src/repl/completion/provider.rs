//! Completion providers
//!
//! Providers are the capabilities registered against command nodes that know
//! how to produce suggestions, usually through a network call. There are two
//! shapes of command provider, plain and flag-aware, modelled by
//! [`Completable`], plus stand-alone [`FlagProvider`]s keyed by node and flag.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::suggestion::Suggestion;
use crate::error::Result;
use crate::tree::CommandNode;

/// Supplies suggestions for the next positional argument of some children
/// of the node it is registered on.
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Names of the child commands these suggestions are valid for
    fn completable_children(&self) -> Vec<String>;

    /// Fetch suggestions
    async fn suggestions(&self) -> Result<Vec<Suggestion>>;
}

/// A command provider that also completes flag values for some children.
pub trait FlagAwareProvider: CommandProvider {
    /// Flag name to the child commands its suggestions are valid for
    fn flag_children(&self) -> Vec<(String, Vec<String>)>;

    /// Flag name to the provider producing its values
    fn flag_providers(&self) -> Vec<(String, Arc<dyn FlagProvider>)>;
}

/// Supplies suggestions for one flag's value.
#[async_trait]
pub trait FlagProvider: Send + Sync {
    async fn suggestions(&self) -> Result<Vec<Suggestion>>;
}

/// Registered command capability
#[derive(Clone)]
pub enum Completable {
    Plain(Arc<dyn CommandProvider>),
    FlagAware(Arc<dyn FlagAwareProvider>),
}

impl Completable {
    pub fn plain(provider: impl CommandProvider + 'static) -> Self {
        Completable::Plain(Arc::new(provider))
    }

    pub fn flag_aware(provider: impl FlagAwareProvider + 'static) -> Self {
        Completable::FlagAware(Arc::new(provider))
    }

    /// Whether `child` is one of the children this provider completes
    pub fn completes_child(&self, child: &str) -> bool {
        let children = match self {
            Completable::Plain(p) => p.completable_children(),
            Completable::FlagAware(p) => p.completable_children(),
        };
        children.iter().any(|c| c == child)
    }

    /// Whether the provider completes `flag` when used on `child`
    pub fn completes_flag_for(&self, flag: &str, child: &str) -> bool {
        match self {
            Completable::Plain(_) => false,
            Completable::FlagAware(p) => p
                .flag_children()
                .iter()
                .any(|(name, children)| name == flag && children.iter().any(|c| c == child)),
        }
    }

    /// Provider for one of the declared flags
    pub fn flag_provider(&self, flag: &str) -> Option<Arc<dyn FlagProvider>> {
        self.flag_providers()
            .into_iter()
            .find(|(name, _)| name == flag)
            .map(|(_, provider)| provider)
    }

    /// All declared flag providers; empty for plain providers
    pub fn flag_providers(&self) -> Vec<(String, Arc<dyn FlagProvider>)> {
        match self {
            Completable::Plain(_) => Vec::new(),
            Completable::FlagAware(p) => p.flag_providers(),
        }
    }

    pub async fn suggestions(&self) -> Result<Vec<Suggestion>> {
        match self {
            Completable::Plain(p) => p.suggestions().await,
            Completable::FlagAware(p) => p.suggestions().await,
        }
    }
}

impl fmt::Debug for Completable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completable::Plain(_) => f.write_str("Completable::Plain"),
            Completable::FlagAware(_) => f.write_str("Completable::FlagAware"),
        }
    }
}

/// Decides whether the current session may complete a node,
/// e.g. whether the user is logged in.
pub trait CompletionGate: Send + Sync {
    fn can_complete(&self, node: &CommandNode) -> bool;
}

/// Gate that never blocks completion
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl CompletionGate for AllowAll {
    fn can_complete(&self, _node: &CommandNode) -> bool {
        true
    }
}

/// Provider returning a fixed list, handy for wiring and tests
#[derive(Debug, Clone)]
pub struct FixedProvider {
    children: Vec<String>,
    suggestions: Vec<Suggestion>,
}

impl FixedProvider {
    pub fn new<I, S>(children: I, suggestions: Vec<Suggestion>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            children: children.into_iter().map(Into::into).collect(),
            suggestions,
        }
    }
}

#[async_trait]
impl CommandProvider for FixedProvider {
    fn completable_children(&self) -> Vec<String> {
        self.children.clone()
    }

    async fn suggestions(&self) -> Result<Vec<Suggestion>> {
        Ok(self.suggestions.clone())
    }
}

#[async_trait]
impl FlagProvider for FixedProvider {
    async fn suggestions(&self) -> Result<Vec<Suggestion>> {
        Ok(self.suggestions.clone())
    }
}
