//! End-to-end statistics pipeline.
//!
//! List match ids → fetch matches concurrently → enforce the minimum sample
//! → aggregate → assemble. Responses are served from and written to a
//! [`StatisticsCache`].

use std::collections::BTreeMap;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::cache::{NoCache, StatisticsCache, statistics_key};
use crate::config::PipelineConfig;
use crate::error::TrendsError;
use crate::fetch::{BatchFetcher, BatchOutcome};
use crate::riot::{MatchSource, ParticipantDto};
use crate::stats::{ChampionTally, RoleAggregator, StatisticsAssembler, StatisticsResponse};

/// Builds a [`StatisticsResponse`] for a player from a [`MatchSource`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use riot_trends::auth::EnvCredentials;
/// use riot_trends::cache::MemoryCache;
/// use riot_trends::pipeline::StatisticsPipeline;
/// use riot_trends::riot::RiotClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RiotClient::builder()
///         .platform("euw1")
///         .credentials(Arc::new(EnvCredentials::from_env()?))
///         .build()?;
///
///     let pipeline = StatisticsPipeline::new(Arc::new(client), "euw1")
///         .with_cache(MemoryCache::default());
///
///     let response = pipeline.statistics("some-puuid").await?;
///     println!("{}", serde_json::to_string_pretty(&response)?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct StatisticsPipeline<S, C = NoCache> {
    source: Arc<S>,
    cache: C,
    config: PipelineConfig,
    platform: String,
}

impl<S> StatisticsPipeline<S, NoCache>
where
    S: MatchSource + 'static,
{
    /// Create a pipeline without a cache. `platform` only namespaces cache keys.
    pub fn new(source: Arc<S>, platform: impl Into<String>) -> Self {
        Self {
            source,
            cache: NoCache,
            config: PipelineConfig::default(),
            platform: platform.into(),
        }
    }
}

impl<S, C> StatisticsPipeline<S, C>
where
    S: MatchSource + 'static,
    C: StatisticsCache,
{
    /// Use a response cache.
    pub fn with_cache<C2: StatisticsCache>(self, cache: C2) -> StatisticsPipeline<S, C2> {
        StatisticsPipeline {
            source: self.source,
            cache,
            config: self.config,
            platform: self.platform,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Statistics for `puuid` over the season to date.
    pub async fn statistics(&self, puuid: &str) -> Result<StatisticsResponse, TrendsError> {
        self.statistics_at(puuid, OffsetDateTime::now_utc()).await
    }

    /// Statistics for `puuid` as of `now`.
    ///
    /// Fails with [`TrendsError::InsufficientSample`] when fewer than
    /// `min_sample` fetched matches contain the player.
    #[instrument(skip(self, now), fields(platform = %self.platform))]
    pub async fn statistics_at(
        &self,
        puuid: &str,
        now: OffsetDateTime,
    ) -> Result<StatisticsResponse, TrendsError> {
        let key = statistics_key(&self.platform, puuid);
        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!(%key, "serving cached statistics");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(error) => warn!(%key, error = %error, "cache read failed, computing fresh"),
        }

        let query = self.config.match_id_query(now);
        let ids = self.source.match_ids(puuid, &query).await?;
        info!(
            ids = ids.len(),
            start_time = ?query.start_time,
            end_time = ?query.end_time,
            "listed match ids"
        );

        let fetcher = BatchFetcher::with_policy(self.source.clone(), self.config.degrade);
        let outcome = fetcher.fetch_all(&ids, self.config.concurrency).await;
        log_fetched(&ids, &outcome);

        let players: Vec<&ParticipantDto> = outcome
            .matches
            .iter()
            .filter_map(|m| m.detail.participant(puuid))
            .collect();

        if players.len() < self.config.min_sample {
            warn!(
                resolved = players.len(),
                required = self.config.min_sample,
                "not enough matches for statistics"
            );
            return Err(TrendsError::InsufficientSample {
                resolved: players.len(),
                required: self.config.min_sample,
            });
        }

        let masteries = match self.source.champion_masteries(puuid).await {
            Ok(masteries) => masteries,
            Err(error) => {
                warn!(error = %error, "champion mastery fetch failed");
                Vec::new()
            }
        };

        let champions = ChampionTally::from_players(players.iter().copied()).top(&masteries);
        let chart = RoleAggregator::aggregate(&outcome.matches, puuid);
        let response = StatisticsAssembler::assemble(&players, champions, chart);

        if let Err(error) = self.cache.put(&key, &response).await {
            warn!(%key, error = %error, "cache write failed");
        }

        Ok(response)
    }
}

fn log_fetched(ids: &[String], outcome: &BatchOutcome) {
    let matches = &outcome.matches;
    let first = matches.iter().map(|m| m.detail.info.game_creation).min();
    let last = matches.iter().map(|m| m.detail.info.game_creation).max();
    debug!(?first, ?last, "first/last game");

    let mut by_queue: BTreeMap<u16, usize> = BTreeMap::new();
    for m in matches {
        *by_queue.entry(m.detail.info.queue_id).or_default() += 1;
    }
    debug!(?by_queue, "matches by queue");

    info!(
        ids = ids.len(),
        fetched = matches.len(),
        dropped = ids.len().saturating_sub(matches.len()),
        timelines_missing = outcome.timeline_failures.len(),
        "fetched matches"
    );
    for failure in &outcome.timeline_failures {
        debug!(error = %failure, "objective control counts zero for this match");
    }
}
