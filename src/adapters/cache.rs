//! TTL Cache - Explicit Read Cache with Injected Clock
//!
//! Single-value cache cell used in front of the ledger listing. An entry
//! expires `ttl` after it was set; expired entries read as misses. The
//! clock is injected so expiry is testable without sleeping.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::clock::Clock;

struct Entry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

/// Explicit get/set/invalidate cache cell with time-to-live expiry.
pub struct TtlCache<T> {
    slot: RwLock<Option<Entry<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone + Send + Sync> TtlCache<T> {
    /// Create an empty cache with the given TTL in seconds.
    pub fn new(ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl: Duration::seconds(ttl_seconds as i64),
            clock,
        }
    }

    /// Return the cached value if one is set and still fresh.
    pub async fn get(&self) -> Option<T> {
        let guard = self.slot.read().await;
        let entry = guard.as_ref()?;
        if self.clock.now() < entry.expires_at {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Store a value, stamping its expiry from the injected clock.
    pub async fn set(&self, value: T) {
        let mut guard = self.slot.write().await;
        *guard = Some(Entry {
            value,
            expires_at: self.clock.now() + self.ttl,
        });
    }

    /// Drop the cached value. Called after every ledger mutation.
    pub async fn invalidate(&self) {
        let mut guard = self.slot.write().await;
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;

    fn manual_clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc::now()))
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache: TtlCache<u32> = TtlCache::new(60, manual_clock());
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_fresh_entry_hits() {
        let cache = TtlCache::new(60, manual_clock());
        cache.set(7u32).await;
        assert_eq!(cache.get().await, Some(7));
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let clock = manual_clock();
        let cache = TtlCache::new(60, Arc::clone(&clock) as Arc<dyn Clock>);
        cache.set(7u32).await;

        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get().await, Some(7));

        clock.advance(Duration::seconds(2));
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_invalidate_clears_entry() {
        let cache = TtlCache::new(60, manual_clock());
        cache.set(7u32).await;
        cache.invalidate().await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_set_refreshes_expiry() {
        let clock = manual_clock();
        let cache = TtlCache::new(60, Arc::clone(&clock) as Arc<dyn Clock>);
        cache.set(1u32).await;
        clock.advance(Duration::seconds(50));
        cache.set(2u32).await;
        clock.advance(Duration::seconds(50));
        // 100s after the first set, but only 50s after the refresh.
        assert_eq!(cache.get().await, Some(2));
    }
}
