//! In-memory response cache with a fixed TTL.
//!
//! Keys are the exact original target URL strings, case-sensitive, with no
//! normalization: `http://x.com` and `http://x.com/` are distinct entries.
//! A stale entry is treated as absent on lookup but is never removed; the
//! next put for the same key overwrites it wholesale. There is no size or
//! entry-count bound — the cache grows for the lifetime of the process,
//! which is an accepted property of this design.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use dashmap::DashMap;

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

/// A cached rewritten response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone)]
struct Entry {
    bytes: Bytes,
    content_type: String,
    created: Instant,
}

/// Concurrent TTL cache mapping target URLs to rewritten responses.
///
/// Entries are immutable once written and overwritten wholesale, so no
/// locking beyond the map's own sharding is needed.
pub struct ResponseCache {
    entries: DashMap<String, Entry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache with the given TTL, using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { entries: DashMap::new(), ttl, clock }
    }

    /// Look up a fresh entry by exact key.
    ///
    /// Returns `None` for missing entries and for entries older than the
    /// TTL; stale entries stay in the map until the next put overwrites
    /// them.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        let entry = self.entries.get(key)?;
        if self.clock.now().duration_since(entry.created) >= self.ttl {
            tracing::debug!(key, "cache entry stale");
            return None;
        }
        Some(CachedResponse { bytes: entry.bytes.clone(), content_type: entry.content_type.clone() })
    }

    /// Store a rewritten response under the exact key, stamping it with the
    /// current time. Overwrites any previous entry for the key.
    pub fn put(&self, key: &str, bytes: Bytes, content_type: String) {
        let entry = Entry { bytes, content_type, created: self.clock.now() };
        self.entries.insert(key.to_string(), entry);
    }

    /// Number of entries held, fresh or stale.
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

    const TTL: Duration = Duration::from_secs(300);

    fn cache_with_manual_clock() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::with_clock(TTL, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_hit_within_ttl() {
        let (cache, clock) = cache_with_manual_clock();
        cache.put("https://example.com", Bytes::from_static(b"body"), "text/html".into());

        clock.advance(TTL - Duration::from_secs(1));
        let hit = cache.get("https://example.com").expect("should be fresh");
        assert_eq!(hit.bytes, Bytes::from_static(b"body"));
        assert_eq!(hit.content_type, "text/html");
    }

    #[test]
    fn test_absent_at_exactly_ttl() {
        let (cache, clock) = cache_with_manual_clock();
        cache.put("https://example.com", Bytes::from_static(b"body"), "text/html".into());

        clock.advance(TTL);
        assert!(cache.get("https://example.com").is_none());
    }

    #[test]
    fn test_stale_entry_not_removed_until_overwritten() {
        let (cache, clock) = cache_with_manual_clock();
        cache.put("https://example.com", Bytes::from_static(b"old"), "text/html".into());

        clock.advance(TTL + Duration::from_secs(1));
        assert!(cache.get("https://example.com").is_none());
        assert_eq!(cache.len(), 1);

        cache.put("https://example.com", Bytes::from_static(b"new"), "text/html".into());
        assert_eq!(cache.len(), 1);
        let hit = cache.get("https://example.com").expect("fresh after overwrite");
        assert_eq!(hit.bytes, Bytes::from_static(b"new"));
    }

    #[test]
    fn test_keys_are_exact_strings() {
        let (cache, _clock) = cache_with_manual_clock();
        cache.put("http://x.com", Bytes::from_static(b"a"), "text/html".into());

        // No normalization: trailing slash is a different key.
        assert!(cache.get("http://x.com/").is_none());
        assert!(cache.get("http://X.com").is_none());
        assert!(cache.get("http://x.com").is_some());
    }

    #[test]
    fn test_missing_key() {
        let (cache, _clock) = cache_with_manual_clock();
        assert!(cache.get("https://nowhere.invalid").is_none());
    }

    // The cache is unbounded by design: entries accumulate until process
    // exit. This pins the accepted behavior rather than masking it.
    #[test]
    fn test_entry_count_grows_without_eviction() {
        let (cache, clock) = cache_with_manual_clock();
        for i in 0..100 {
            cache.put(&format!("https://example.com/{i}"), Bytes::from_static(b"x"), "text/css".into());
        }
        clock.advance(TTL + Duration::from_secs(1));
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cache = Arc::new(ResponseCache::new(TTL));
        let mut handles = Vec::new();
        for t in 0..4 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("https://example.com/{}", i % 10);
                    cache.put(&key, Bytes::from(format!("{t}-{i}")), "text/html".into());
                    let _ = cache.get(&key);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert_eq!(cache.len(), 10);
    }
}
