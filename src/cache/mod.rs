//! Response cache seam.
//!
//! The pipeline reads a cached [`StatisticsResponse`] before touching the
//! upstream and stores every freshly assembled one. The store itself is a
//! collaborator: implement [`StatisticsCache`] over whatever backend the
//! deployment uses, or use [`MemoryCache`] in-process.

mod memory;

use std::future::Future;
use std::sync::Arc;

use crate::error::TrendsError;
use crate::stats::StatisticsResponse;

pub use memory::{DEFAULT_TTL, MemoryCache};

/// Key under which a player's statistics are cached.
pub fn statistics_key(platform: &str, puuid: &str) -> String {
    format!("statistics:{platform}:{puuid}")
}

/// Storage for assembled responses.
pub trait StatisticsCache: Send + Sync {
    /// Look up a response; `Ok(None)` on a miss.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<StatisticsResponse>, TrendsError>> + Send;

    /// Store a response.
    fn put(
        &self,
        key: &str,
        response: &StatisticsResponse,
    ) -> impl Future<Output = Result<(), TrendsError>> + Send;
}

impl<C: StatisticsCache> StatisticsCache for Arc<C> {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<StatisticsResponse>, TrendsError>> + Send {
        (**self).get(key)
    }

    fn put(
        &self,
        key: &str,
        response: &StatisticsResponse,
    ) -> impl Future<Output = Result<(), TrendsError>> + Send {
        (**self).put(key, response)
    }
}

/// A cache that never hits and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl StatisticsCache for NoCache {
    async fn get(&self, _key: &str) -> Result<Option<StatisticsResponse>, TrendsError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _response: &StatisticsResponse) -> Result<(), TrendsError> {
        Ok(())
    }
}
