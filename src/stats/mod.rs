//! Turning resolved matches into role-specific trends.
//!
//! - [`Role::classify`] normalizes lane positions
//! - [`RoleAggregator`] buckets matches per (role, UTC month) and charts the
//!   most played role over twelve months
//! - [`ChampionTally`] ranks champions and joins mastery
//! - [`StatisticsAssembler`] packages the final [`StatisticsResponse`]
//!
//! Everything here is pure and synchronous.

pub mod aggregate;
pub mod assemble;
pub mod champion;
pub mod metrics;
mod role;

pub use aggregate::{
    MONTHS, MetricSeries, MonthlyMetric, RoleAggregate, RoleAggregator, RoleBucket,
};
pub use assemble::{
    Gameplay, RoleShare, StatisticItem, StatisticsAssembler, StatisticsResponse,
};
pub use champion::{ChampionStats, ChampionTally, Mastery};
pub use metrics::MetricKind;
pub use role::Role;
