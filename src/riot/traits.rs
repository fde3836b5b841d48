//! Trait abstracting the upstream match API.
//!
//! The batch fetcher and the pipeline are generic over [`MatchSource`], so
//! they can be driven by [`RiotClient`](crate::riot::RiotClient) in
//! production and by in-memory fakes in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use riot_trends::riot::{MatchSource, RiotClient};
//!
//! async fn latest<S: MatchSource>(source: &S, puuid: &str) -> riot_trends::Result<()> {
//!     let ids = source.match_ids(puuid, &Default::default()).await?;
//!     if let Some(id) = ids.first() {
//!         let detail = source.match_detail(id).await?;
//!         println!("{} lasted {}s", detail.id(), detail.info.game_duration);
//!     }
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::error::TrendsError;
use crate::riot::types::{ChampionMasteryDto, MatchDto, MatchIdQuery, TimelineDto};

/// Upstream operations used by the statistics pipeline.
pub trait MatchSource: Send + Sync {
    /// List match ids for a player, following pagination up to `query.max_ids`.
    fn match_ids(
        &self,
        puuid: &str,
        query: &MatchIdQuery,
    ) -> impl Future<Output = Result<Vec<String>, TrendsError>> + Send;

    /// Fetch a match's detail.
    fn match_detail(
        &self,
        match_id: &str,
    ) -> impl Future<Output = Result<MatchDto, TrendsError>> + Send;

    /// Fetch a match's timeline.
    fn match_timeline(
        &self,
        match_id: &str,
    ) -> impl Future<Output = Result<TimelineDto, TrendsError>> + Send;

    /// Fetch all champion masteries for a player.
    fn champion_masteries(
        &self,
        puuid: &str,
    ) -> impl Future<Output = Result<Vec<ChampionMasteryDto>, TrendsError>> + Send;
}

impl<S: MatchSource> MatchSource for Arc<S> {
    fn match_ids(
        &self,
        puuid: &str,
        query: &MatchIdQuery,
    ) -> impl Future<Output = Result<Vec<String>, TrendsError>> + Send {
        (**self).match_ids(puuid, query)
    }

    fn match_detail(
        &self,
        match_id: &str,
    ) -> impl Future<Output = Result<MatchDto, TrendsError>> + Send {
        (**self).match_detail(match_id)
    }

    fn match_timeline(
        &self,
        match_id: &str,
    ) -> impl Future<Output = Result<TimelineDto, TrendsError>> + Send {
        (**self).match_timeline(match_id)
    }

    fn champion_masteries(
        &self,
        puuid: &str,
    ) -> impl Future<Output = Result<Vec<ChampionMasteryDto>, TrendsError>> + Send {
        (**self).champion_masteries(puuid)
    }
}
