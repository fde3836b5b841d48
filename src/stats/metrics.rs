//! Metric formulas and the per-role metric table.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::stats::aggregate::RoleBucket;
use crate::stats::role::Role;

/// `(k + a) / d`, or `k + a` when there are no deaths.
pub fn kda(kills: f64, deaths: f64, assists: f64) -> f64 {
    if deaths > 0.0 {
        (kills + assists) / deaths
    } else {
        kills + assists
    }
}

/// Rate per minute of play; zero when no time was played.
pub fn per_minute(total: f64, seconds_played: f64) -> f64 {
    if seconds_played > 0.0 {
        total / (seconds_played / 60.0)
    } else {
        0.0
    }
}

/// Mean over `games`; zero for no games.
pub fn average(total: f64, games: f64) -> f64 {
    if games > 0.0 { total / games } else { 0.0 }
}

/// Percentage of team kills the player took part in, capped at 100.
pub fn kill_participation(involved: f64, team_kills: f64) -> f64 {
    average(involved, team_kills).min(1.0) * 100.0
}

/// Round to two decimal places, midpoint away from zero. Non-finite → 0.
pub fn round2(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// A derived metric reported in a role's chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Kills plus assists over deaths
    Kda,
    /// Lane minions and jungle monsters per minute
    CsPerMin,
    /// Damage to champions per game
    DamageToChampions,
    /// Share of team kills, as a percentage
    KillParticipation,
    /// Dragon, baron and herald takedowns per game
    ObjectiveControl,
    /// Damage taken per minute
    DamageTakenPerMin,
    /// Solo kills per game
    SoloKills,
    /// Vision score per minute
    VisionScorePerMin,
    /// Assists per game
    Assists,
}

const ADC_METRICS: &[MetricKind] = &[
    MetricKind::Kda,
    MetricKind::CsPerMin,
    MetricKind::DamageToChampions,
];
const MID_METRICS: &[MetricKind] = &[
    MetricKind::Kda,
    MetricKind::DamageToChampions,
    MetricKind::KillParticipation,
];
const JUNGLE_METRICS: &[MetricKind] = &[
    MetricKind::KillParticipation,
    MetricKind::ObjectiveControl,
    MetricKind::Kda,
];
const TOP_METRICS: &[MetricKind] = &[
    MetricKind::DamageTakenPerMin,
    MetricKind::CsPerMin,
    MetricKind::SoloKills,
];
const SUPPORT_METRICS: &[MetricKind] = &[
    MetricKind::VisionScorePerMin,
    MetricKind::KillParticipation,
    MetricKind::Assists,
];

impl MetricKind {
    /// Ordered metrics charted for a role.
    pub fn for_role(role: Role) -> &'static [MetricKind] {
        match role {
            Role::Adc => ADC_METRICS,
            Role::Mid => MID_METRICS,
            Role::Jungle => JUNGLE_METRICS,
            Role::Top => TOP_METRICS,
            Role::Support => SUPPORT_METRICS,
        }
    }

    /// Key used in the serialized metrics map.
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Kda => "kda",
            MetricKind::CsPerMin => "csPerMin",
            MetricKind::DamageToChampions => "damageToChampions",
            MetricKind::KillParticipation => "killParticipation",
            MetricKind::ObjectiveControl => "objectiveControl",
            MetricKind::DamageTakenPerMin => "damageTakenPerMin",
            MetricKind::SoloKills => "soloKills",
            MetricKind::VisionScorePerMin => "visionScorePerMin",
            MetricKind::Assists => "assists",
        }
    }

    /// Unrounded value for one bucket.
    pub fn compute(&self, b: &RoleBucket) -> f64 {
        let games = b.games as f64;
        let seconds = b.time_played as f64;
        match self {
            MetricKind::Kda => kda(b.kills as f64, b.deaths as f64, b.assists as f64),
            MetricKind::CsPerMin => per_minute(b.creep_score as f64, seconds),
            MetricKind::DamageToChampions => average(b.damage_to_champions as f64, games),
            MetricKind::KillParticipation => {
                kill_participation(b.kill_involvement as f64, b.team_kills as f64)
            }
            MetricKind::ObjectiveControl => average(b.objective_takedowns() as f64, games),
            MetricKind::DamageTakenPerMin => per_minute(b.damage_taken as f64, seconds),
            MetricKind::SoloKills => average(b.solo_kills, games),
            MetricKind::VisionScorePerMin => per_minute(b.vision_score, seconds),
            MetricKind::Assists => average(b.assists as f64, games),
        }
    }
}
