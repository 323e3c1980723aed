//! Time-bounded response cache.

use std::fmt;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use moctale_core::config::CacheConfig;
use moctale_core::types::Envelope;

/// Cache partition. Lifetimes differ per category because staleness
/// tolerance differs: session state is cheap to recheck and volatile, item
/// details are expensive and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    SessionStatus,
    SearchResults,
    ItemDetails,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStatus => "session-status",
            Self::SearchResults => "search-results",
            Self::ItemDetails => "item-details",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category lifetimes. Categories without an explicit value fall back
/// to the default.
#[derive(Debug, Clone)]
pub struct CacheTtls {
    pub session_status: Option<Duration>,
    pub search_results: Option<Duration>,
    pub item_details: Option<Duration>,
    pub default: Duration,
}

impl CacheTtls {
    pub fn ttl(&self, category: Category) -> Duration {
        match category {
            Category::SessionStatus => self.session_status,
            Category::SearchResults => self.search_results,
            Category::ItemDetails => self.item_details,
        }
        .unwrap_or(self.default)
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            session_status: Some(Duration::from_secs(60)),
            search_results: Some(Duration::from_secs(300)),
            item_details: Some(Duration::from_secs(900)),
            default: Duration::from_secs(300),
        }
    }
}

impl From<&CacheConfig> for CacheTtls {
    fn from(cfg: &CacheConfig) -> Self {
        Self {
            session_status: cfg.session_status_ttl_secs.map(Duration::from_secs),
            search_results: cfg.search_results_ttl_secs.map(Duration::from_secs),
            item_details: cfg.item_details_ttl_secs.map(Duration::from_secs),
            default: Duration::from_secs(cfg.default_ttl_secs),
        }
    }
}

/// Entry with its absolute expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Envelope,
    expires_at: Instant,
}

/// In-memory TTL cache keyed by category plus identifying arguments.
///
/// All operations are total: the cache never fails and has no side effects
/// beyond its own map. State is volatile; the coordinator treats it as empty
/// after any restart. Explicitly constructed and injected into the router,
/// never ambient.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttls: CacheTtls,
}

impl ResponseCache {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            entries: DashMap::new(),
            ttls,
        }
    }

    /// Deterministic key from category plus identifying arguments. Argument
    /// normalization (trim, lowercase) is the caller's job so semantically
    /// identical requests collide here.
    fn compose_key(category: Category, args: &[&str]) -> String {
        let mut key = category.as_str().to_string();
        for arg in args {
            key.push_str("::");
            key.push_str(arg);
        }
        key
    }

    /// Look up an entry. An entry past its expiry is treated as absent and
    /// purged as a side effect; the purge is idempotent.
    pub fn get(&self, category: Category, args: &[&str]) -> Option<Envelope> {
        let key = Self::compose_key(category, args);

        let expired = match self.entries.get(&key) {
            Some(entry) if Instant::now() <= entry.expires_at => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // The get guard is dropped above; safe to take the write lock.
            self.entries.remove(&key);
            tracing::trace!(key = %key, "evicted expired cache entry");
        }
        None
    }

    /// Insert or overwrite an entry, stamped `now + ttl(category)`.
    pub fn put(&self, category: Category, args: &[&str], value: Envelope) {
        let key = Self::compose_key(category, args);
        let expires_at = Instant::now() + self.ttls.ttl(category);
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Remove every entry. Used on coordinator startup.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove only the entries belonging to one category.
    pub fn clear_category(&self, category: Category) {
        let prefix = format!("{}::", category.as_str());
        self.entries
            .retain(|key, _| key.as_str() != category.as_str() && !key.starts_with(&prefix));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moctale_core::types::{Payload, SessionStatus};

    fn short_ttls() -> CacheTtls {
        CacheTtls {
            session_status: Some(Duration::from_millis(50)),
            search_results: Some(Duration::from_millis(200)),
            item_details: None,
            default: Duration::from_millis(100),
        }
    }

    fn session_envelope() -> Envelope {
        Envelope::ok(Payload::Session(SessionStatus::logged_in(Some(
            "alice".into(),
        ))))
    }

    #[tokio::test(start_paused = true)]
    async fn put_then_get_returns_value() {
        let cache = ResponseCache::new(short_ttls());
        cache.put(Category::SessionStatus, &["status"], session_envelope());
        assert_eq!(
            cache.get(Category::SessionStatus, &["status"]),
            Some(session_envelope())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_absent_and_purged_once() {
        let cache = ResponseCache::new(short_ttls());
        cache.put(Category::SessionStatus, &["status"], session_envelope());

        tokio::time::sleep(Duration::from_millis(51)).await;

        assert_eq!(cache.get(Category::SessionStatus, &["status"]), None);
        assert!(cache.is_empty());
        // Idempotent: a second read stays absent.
        assert_eq!(cache.get(Category::SessionStatus, &["status"]), None);
    }

    #[tokio::test(start_paused = true)]
    async fn unset_category_falls_back_to_default_ttl() {
        let cache = ResponseCache::new(short_ttls());
        cache.put(Category::ItemDetails, &["dune-2021"], session_envelope());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get(Category::ItemDetails, &["dune-2021"]).is_some());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get(Category::ItemDetails, &["dune-2021"]).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_args_use_distinct_slots() {
        let cache = ResponseCache::new(short_ttls());
        cache.put(Category::SearchResults, &["dune"], session_envelope());
        assert!(cache.get(Category::SearchResults, &["tenet"]).is_none());
        assert!(cache.get(Category::SearchResults, &["dune"]).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_category_leaves_other_categories() {
        let cache = ResponseCache::new(short_ttls());
        cache.put(Category::SearchResults, &["dune"], session_envelope());
        cache.put(Category::SessionStatus, &["status"], session_envelope());

        cache.clear_category(Category::SearchResults);

        assert!(cache.get(Category::SearchResults, &["dune"]).is_none());
        assert!(cache.get(Category::SessionStatus, &["status"]).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_removes_everything() {
        let cache = ResponseCache::new(short_ttls());
        cache.put(Category::SearchResults, &["dune"], session_envelope());
        cache.put(Category::SessionStatus, &["status"], session_envelope());
        cache.clear();
        assert!(cache.is_empty());
    }
}
