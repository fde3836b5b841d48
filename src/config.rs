//! Pipeline configuration.

use time::OffsetDateTime;

use crate::fetch::DegradePolicy;
use crate::riot::MatchIdQuery;
use crate::riot::endpoints::RANKED_SOLO_QUEUE;

/// Settings for [`StatisticsPipeline`](crate::pipeline::StatisticsPipeline).
///
/// # Example
///
/// ```rust
/// use riot_trends::config::PipelineConfig;
///
/// let config = PipelineConfig::default().concurrency(8).max_ids(60);
/// assert_eq!(config.concurrency, 8);
/// assert_eq!(config.min_sample, 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Concurrent match fetches in the first pass
    pub concurrency: usize,
    /// Upper bound on listed match ids
    pub max_ids: usize,
    /// Ids per listing page
    pub page_size: u32,
    /// Queue filter; `None` lists every queue
    pub queue: Option<u16>,
    /// Fewest resolved matches that still produce a response
    pub min_sample: usize,
    /// When and how far to reduce concurrency after heavy drops
    pub degrade: DegradePolicy,
    /// Start of the listing window; defaults to the UTC start of the
    /// current year
    pub season_start: Option<OffsetDateTime>,
}

impl PipelineConfig {
    /// Set first-pass concurrency (at least 1).
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the cap on listed ids.
    pub fn max_ids(mut self, max_ids: usize) -> Self {
        self.max_ids = max_ids;
        self
    }

    /// Set the listing page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set or clear the queue filter.
    pub fn queue(mut self, queue: Option<u16>) -> Self {
        self.queue = queue;
        self
    }

    /// Set the minimum number of resolved matches.
    pub fn min_sample(mut self, min_sample: usize) -> Self {
        self.min_sample = min_sample;
        self
    }

    /// Set the degradation policy.
    pub fn degrade(mut self, policy: DegradePolicy) -> Self {
        self.degrade = policy;
        self
    }

    /// Start listing from `start` instead of the current year.
    pub fn season_start(mut self, start: OffsetDateTime) -> Self {
        self.season_start = Some(start);
        self
    }

    /// The id listing query for a request made at `now`.
    pub fn match_id_query(&self, now: OffsetDateTime) -> MatchIdQuery {
        let mut query = MatchIdQuery::season_to_date(now);
        if let Some(start) = self.season_start {
            query.start_time = Some(start.unix_timestamp());
        }
        query.queue = self.queue;
        query.page_size = self.page_size;
        query.max_ids = self.max_ids;
        query
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 12,
            max_ids: 120,
            page_size: 100,
            queue: Some(RANKED_SOLO_QUEUE),
            min_sample: 5,
            degrade: DegradePolicy::default(),
            season_start: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_default_query() {
        let now = datetime!(2025-09-01 00:00 UTC);
        let query = PipelineConfig::default().match_id_query(now);
        assert_eq!(query, MatchIdQuery::season_to_date(now));
    }

    #[test]
    fn test_overrides_flow_into_query() {
        let start = datetime!(2024-06-01 00:00 UTC);
        let config = PipelineConfig::default()
            .season_start(start)
            .queue(None)
            .page_size(20)
            .max_ids(40);
        let query = config.match_id_query(datetime!(2025-09-01 00:00 UTC));

        assert_eq!(query.start_time, Some(start.unix_timestamp()));
        assert_eq!(query.queue, None);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.max_ids, 40);
    }

    #[test]
    fn test_concurrency_is_at_least_one() {
        assert_eq!(PipelineConfig::default().concurrency(0).concurrency, 1);
    }
}
