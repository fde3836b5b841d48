//! # Riot Trends
//!
//! Async acquisition of a player's ranked match history from the Riot match
//! API, folded into role-specific monthly performance trends.
//!
//! ## Features
//!
//! - Header-driven, multi-window rate limiting shared by every request
//! - Bounded retries with exponential backoff that honor `Retry-After`
//! - Concurrent match fetching that backs off when too many matches drop
//! - Twelve-month metric series for the player's most played role
//! - Pluggable response cache
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use riot_trends::auth::StaticCredentials;
//! use riot_trends::pipeline::StatisticsPipeline;
//! use riot_trends::riot::RiotClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RiotClient::builder()
//!         .platform("na1")
//!         .credentials(Arc::new(StaticCredentials::new("RGAPI-...")))
//!         .build()?;
//!
//!     let pipeline = StatisticsPipeline::new(Arc::new(client), "na1");
//!     let stats = pipeline.statistics("player-puuid").await?;
//!     println!("most played: {}", stats.gameplay.chart_statistics.role);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod rate_limit;
pub mod riot;
pub mod stats;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at crate root
pub use error::TrendsError;
pub use pipeline::StatisticsPipeline;
pub use stats::{Role, StatisticsResponse};

/// Result type alias using TrendsError
pub type Result<T> = std::result::Result<T, TrendsError>;
