//! Riot match API client.
//!
//! Covers the handful of endpoints the statistics pipeline needs: match id
//! listing, match detail, match timeline and champion mastery.
//!
//! # Trait-based API
//!
//! The [`MatchSource`] trait abstracts these operations, enabling:
//! - In-memory fakes for testing the fetcher and pipeline
//! - Alternative implementations (e.g. a replay from disk)
//!
//! ```rust,ignore
//! use riot_trends::riot::{MatchSource, RiotClient};
//!
//! async fn count<S: MatchSource>(source: &S, puuid: &str) -> riot_trends::Result<usize> {
//!     Ok(source.match_ids(puuid, &Default::default()).await?.len())
//! }
//! ```

mod client;
pub mod endpoints;
mod traits;
mod transport;
pub mod types;

pub use client::{RiotClient, RiotClientBuilder};
pub use endpoints::RoutingRegion;
pub use traits::MatchSource;
pub use transport::{HttpTransport, RequestSpec, Requester, Transport, UpstreamResponse};
pub use types::{
    ChampionMasteryDto, MatchDto, MatchIdQuery, ObjectiveTakedowns, ParticipantDto,
    ResolvedMatch, TimelineDto,
};
