//! Fixed flag value tables
//!
//! Values that never change between invocations (output formats and the like)
//! are served straight from here without touching the cache.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use super::registry::RegistryKey;
use super::suggestion::Suggestion;

#[derive(Debug, Clone)]
struct StaticEntry {
    suggestions: Vec<Suggestion>,
    eligible: HashSet<RegistryKey>,
}

/// Flag name to fixed suggestions, restricted to eligible command paths
#[derive(Debug, Default)]
pub struct StaticSuggestionTable {
    entries: RwLock<HashMap<String, StaticEntry>>,
}

impl StaticSuggestionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register fixed values for `flag` on the given command paths.
    ///
    /// Paths are written without the program name (`"kafka cluster list"`).
    /// Registering the same flag again replaces both the values and the paths.
    pub fn register<I, S>(&self, flag: &str, suggestions: Vec<Suggestion>, eligible_paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let eligible: HashSet<RegistryKey> = eligible_paths
            .into_iter()
            .map(|p| RegistryKey::from(p.as_ref()))
            .collect();
        tracing::debug!(flag, paths = eligible.len(), "registered static flag values");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(flag.to_string(), StaticEntry { suggestions, eligible });
    }

    /// Values for `flag` when used on the command at `key`
    pub fn lookup(&self, flag: &str, key: &RegistryKey) -> Option<Vec<Suggestion>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(flag)
            .filter(|entry| entry.eligible.contains(key))
            .map(|entry| entry.suggestions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<Suggestion> {
        vec![
            Suggestion::new("human", "Human readable output"),
            Suggestion::new("json", "JSON output"),
            Suggestion::new("yaml", "YAML output"),
        ]
    }

    #[test]
    fn test_eligible_path_only() {
        let table = StaticSuggestionTable::new();
        table.register("output", formats(), ["kafka cluster list"]);

        let hit = table.lookup("output", &RegistryKey::from("kafka cluster list"));
        assert_eq!(hit, Some(formats()));
        assert!(table.lookup("output", &RegistryKey::from("kafka cluster describe")).is_none());
        assert!(table.lookup("cluster", &RegistryKey::from("kafka cluster list")).is_none());
    }

    #[test]
    fn test_reregister_replaces_paths() {
        let table = StaticSuggestionTable::new();
        table.register("output", formats(), ["environment list"]);
        table.register("output", formats(), ["api-key list"]);

        assert!(table.lookup("output", &RegistryKey::from("environment list")).is_none());
        assert!(table.lookup("output", &RegistryKey::from("api-key list")).is_some());
    }
}
