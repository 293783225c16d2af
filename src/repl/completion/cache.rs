//! Suggestion cache with background population
//!
//! The request path only ever reads this cache. Provider calls run as tracked
//! tasks on the tokio runtime and write their result back when they finish;
//! whichever write lands last wins.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use super::provider::{Completable, FlagProvider};
use super::registry::RegistryKey;
use super::suggestion::Suggestion;
use crate::error::{PromptError, ProviderError, Result};

#[derive(Debug, Clone)]
struct Entry {
    suggestions: Vec<Suggestion>,
    fetched_at: Instant,
}

/// One provider call
#[derive(Clone)]
pub(crate) enum Fetch {
    Command(Completable),
    Flag(Arc<dyn FlagProvider>),
}

impl Fetch {
    async fn run(&self) -> Result<Vec<Suggestion>> {
        match self {
            Fetch::Command(completable) => completable.suggestions().await,
            Fetch::Flag(provider) => provider.suggestions().await,
        }
    }
}

/// Run a provider call, turning every failure into an empty list.
///
/// Errors and timeouts are logged as warnings, panics as errors.
pub(crate) async fn fetch_guarded(key: &RegistryKey, fetch: Fetch, timeout: Duration) -> Vec<Suggestion> {
    let call = AssertUnwindSafe(async move { fetch.run().await }).catch_unwind();

    let failure = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(Ok(suggestions))) => return suggestions,
        Ok(Ok(Err(e))) => e,
        Ok(Err(payload)) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let e = PromptError::from(ProviderError::Panicked(message));
            tracing::error!(key = %key, "{}", e);
            return Vec::new();
        }
        Err(_) => PromptError::from(ProviderError::Timeout),
    };

    tracing::warn!(key = %key, timeout_ms = timeout.as_millis() as u64, "{}", failure);
    Vec::new()
}

/// A population unit: the key to write and the call producing its value
pub(crate) type Job = (RegistryKey, Fetch);

/// Concurrent key to suggestion list map
pub struct SuggestionCache {
    entries: Arc<RwLock<HashMap<RegistryKey, Entry>>>,
    ttl: Option<Duration>,
    timeout: Duration,
    tracker: TaskTracker,
    runtime: Handle,
}

impl SuggestionCache {
    /// Create an empty cache
    ///
    /// # Arguments
    /// * `runtime` - Runtime the population tasks are spawned on
    /// * `timeout` - Upper bound for a single provider call
    /// * `ttl` - Age after which entries read as absent; `None` keeps them forever
    pub fn new(runtime: Handle, timeout: Duration, ttl: Option<Duration>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            timeout,
            tracker: TaskTracker::new(),
            runtime,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Non-blocking read; expired entries read as absent
    pub fn get(&self, key: &RegistryKey) -> Option<Vec<Suggestion>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if self.is_expired(entry) {
            return None;
        }
        Some(entry.suggestions.clone())
    }

    /// Overwrite the entry for `key`
    pub fn store(&self, key: RegistryKey, suggestions: Vec<Suggestion>) {
        Self::write(&self.entries, key, suggestions);
    }

    fn write(entries: &RwLock<HashMap<RegistryKey, Entry>>, key: RegistryKey, suggestions: Vec<Suggestion>) {
        tracing::trace!(key = %key, count = suggestions.len(), "cache write");
        entries.write().unwrap_or_else(PoisonError::into_inner).insert(
            key,
            Entry {
                suggestions,
                fetched_at: Instant::now(),
            },
        );
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl.is_some_and(|ttl| entry.fetched_at.elapsed() >= ttl)
    }

    /// Drop entries older than the ttl
    pub fn purge_expired(&self) {
        let Some(ttl) = self.ttl else {
            return;
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "purged expired suggestions");
        }
    }

    /// Dispatch one background unit that runs `jobs` in order.
    ///
    /// When `allowed` is false no provider is called; every key is
    /// overwritten with an empty list so stale values disappear.
    pub(crate) fn populate(&self, jobs: Vec<Job>, allowed: bool) {
        self.purge_expired();
        if jobs.is_empty() {
            return;
        }

        let entries = Arc::clone(&self.entries);
        let timeout = self.timeout;
        self.tracker.spawn_on(
            async move {
                for (key, fetch) in jobs {
                    let suggestions = if allowed {
                        fetch_guarded(&key, fetch, timeout).await
                    } else {
                        Vec::new()
                    };
                    Self::write(&entries, key, suggestions);
                }
            },
            &self.runtime,
        );
    }

    /// Call a provider on the request path, bounded by the provider timeout.
    ///
    /// On a multi-thread runtime the worker is parked with `block_in_place`;
    /// from a current-thread runtime blocking is impossible and nothing is
    /// returned.
    pub(crate) fn fetch_now(&self, key: &RegistryKey, fetch: Fetch) -> Vec<Suggestion> {
        let timeout = self.timeout;
        let fut = fetch_guarded(key, fetch, timeout);
        match Handle::try_current() {
            Ok(current) => match current.runtime_flavor() {
                tokio::runtime::RuntimeFlavor::MultiThread => {
                    tokio::task::block_in_place(|| current.block_on(fut))
                }
                _ => {
                    tracing::warn!(key = %key, "cannot block on a current-thread runtime, skipping fetch");
                    Vec::new()
                }
            },
            Err(_) => self.runtime.block_on(fut),
        }
    }

    /// Resolves once every dispatched population unit has finished
    pub async fn settled(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Blocking variant of [`settled`](Self::settled); call from outside the runtime
    pub fn wait_for_population(&self) {
        self.runtime.block_on(self.settled());
    }

    /// Number of population units still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::completion::provider::FixedProvider;
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl FlagProvider for Failing {
        async fn suggestions(&self) -> Result<Vec<Suggestion>> {
            Err(ProviderError::Unauthorized.into())
        }
    }

    struct Panicking;

    #[async_trait]
    impl FlagProvider for Panicking {
        async fn suggestions(&self) -> Result<Vec<Suggestion>> {
            panic!("provider blew up")
        }
    }

    struct Slow;

    #[async_trait]
    impl FlagProvider for Slow {
        async fn suggestions(&self) -> Result<Vec<Suggestion>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![Suggestion::new("late", "")])
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    fn fixed(values: &[&str]) -> Fetch {
        let suggestions = values.iter().map(|v| Suggestion::new(*v, "")).collect();
        Fetch::Flag(Arc::new(FixedProvider::new(Vec::<String>::new(), suggestions)))
    }

    #[test]
    fn test_populate_then_read() {
        let rt = runtime();
        let cache = SuggestionCache::new(rt.handle().clone(), Duration::from_secs(1), None);
        let key = RegistryKey::from("kafka cluster");

        assert!(cache.get(&key).is_none());
        cache.populate(vec![(key.clone(), fixed(&["lkc-1", "lkc-2"]))], true);
        cache.wait_for_population();

        let values = cache.get(&key).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(cache.in_flight(), 0);
    }

    #[test]
    fn test_disallowed_population_clears() {
        let rt = runtime();
        let cache = SuggestionCache::new(rt.handle().clone(), Duration::from_secs(1), None);
        let key = RegistryKey::from("environment");
        cache.store(key.clone(), vec![Suggestion::new("env-1", "")]);

        cache.populate(vec![(key.clone(), fixed(&["env-2"]))], false);
        cache.wait_for_population();

        assert_eq!(cache.get(&key), Some(vec![]));
    }

    #[test]
    fn test_failures_store_empty() {
        let rt = runtime();
        let cache = SuggestionCache::new(rt.handle().clone(), Duration::from_millis(50), None);
        let failing = RegistryKey::from("a");
        let panicking = RegistryKey::from("b");
        let slow = RegistryKey::from("c");

        cache.populate(
            vec![
                (failing.clone(), Fetch::Flag(Arc::new(Failing))),
                (panicking.clone(), Fetch::Flag(Arc::new(Panicking))),
                (slow.clone(), Fetch::Flag(Arc::new(Slow))),
            ],
            true,
        );
        cache.wait_for_population();

        assert_eq!(cache.get(&failing), Some(vec![]));
        assert_eq!(cache.get(&panicking), Some(vec![]));
        assert_eq!(cache.get(&slow), Some(vec![]));
    }

    #[test]
    fn test_ttl_expiry() {
        let rt = runtime();
        let cache = SuggestionCache::new(rt.handle().clone(), Duration::from_secs(1), Some(Duration::from_millis(20)));
        let key = RegistryKey::from("kafka topic");
        cache.store(key.clone(), vec![Suggestion::new("orders", "")]);
        assert!(cache.get(&key).is_some());

        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get(&key).is_none());
        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fetch_now_outside_runtime() {
        let rt = runtime();
        let cache = SuggestionCache::new(rt.handle().clone(), Duration::from_secs(1), None);
        let values = cache.fetch_now(&RegistryKey::from("x"), fixed(&["one"]));
        assert_eq!(values, vec![Suggestion::new("one", "")]);
    }
}
