//! In-process TTL cache.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::cache::StatisticsCache;
use crate::error::TrendsError;
use crate::stats::StatisticsResponse;

/// Default time-to-live of a cached response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// A [`StatisticsCache`] that keeps responses in memory until they expire.
///
/// Expired entries are skipped on read and swept on every write.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use riot_trends::cache::MemoryCache;
///
/// let cache = MemoryCache::new(Duration::from_secs(60));
/// assert_eq!(cache.ttl(), Duration::from_secs(60));
/// ```
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (StatisticsResponse, Instant)>>,
    ttl: Duration,
}

impl MemoryCache {
    /// Create a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The time-to-live for entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries that have not expired.
    pub async fn active_count(&self) -> usize {
        let ttl = self.ttl;
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, stored)| stored.elapsed() < ttl)
            .count()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl StatisticsCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<StatisticsResponse>, TrendsError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).and_then(|(response, stored)| {
            (stored.elapsed() < self.ttl).then(|| response.clone())
        }))
    }

    async fn put(&self, key: &str, response: &StatisticsResponse) -> Result<(), TrendsError> {
        let ttl = self.ttl;
        let mut entries = self.entries.lock().await;
        entries.retain(|_, (_, stored)| stored.elapsed() < ttl);
        entries.insert(key.to_string(), (response.clone(), Instant::now()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Gameplay, Role, RoleAggregate};

    fn response() -> StatisticsResponse {
        StatisticsResponse {
            statistics: Vec::new(),
            champions: Vec::new(),
            gameplay: Gameplay {
                chart_statistics: RoleAggregate {
                    role: Role::Adc,
                    metrics: Vec::new(),
                },
                role_distribution: Vec::new(),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_and_get() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.put("statistics:na1:abc", &response()).await.unwrap();

        assert_eq!(
            cache.get("statistics:na1:abc").await.unwrap(),
            Some(response())
        );
        assert_eq!(cache.get("statistics:na1:other").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.put("k", &response()).await.unwrap();
        assert_eq!(cache.active_count().await, 1);

        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_sweeps_expired_entries() {
        let cache = MemoryCache::new(Duration::from_secs(10));
        cache.put("old", &response()).await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        cache.put("new", &response()).await.unwrap();

        assert_eq!(cache.entries.lock().await.len(), 1);
        cache.clear().await;
        assert_eq!(cache.active_count().await, 0);
    }
}
