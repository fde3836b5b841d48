//! Monthly, role-specific aggregation of a player's matches.

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use time::UtcOffset;

use crate::riot::{ParticipantDto, ResolvedMatch};
use crate::stats::metrics::{MetricKind, round2};
use crate::stats::role::Role;

/// Month names in series order.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Running sums for one (role, month) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoleBucket {
    /// Matches folded in
    pub games: u32,
    /// Player kills
    pub kills: u64,
    /// Player deaths
    pub deaths: u64,
    /// Player assists
    pub assists: u64,
    /// Seconds
    pub time_played: u64,
    /// Lane minions plus jungle monsters
    pub creep_score: u64,
    /// Damage dealt to champions
    pub damage_to_champions: u64,
    /// Damage taken from all sources
    pub damage_taken: u64,
    /// Vision score
    pub vision_score: f64,
    /// Solo kills
    pub solo_kills: f64,
    /// Player kills plus assists, the kill participation numerator
    pub kill_involvement: u64,
    /// Kills of the player's whole team
    pub team_kills: u64,
    /// Dragon takedowns from timelines
    pub dragons: u64,
    /// Baron takedowns from timelines
    pub barons: u64,
    /// Rift Herald takedowns from timelines
    pub heralds: u64,
}

impl RoleBucket {
    /// Fold one match into the bucket.
    pub fn add(&mut self, resolved: &ResolvedMatch, player: &ParticipantDto) {
        let detail = &resolved.detail;
        let objectives = resolved.objective_takedowns(player.participant_id);

        self.games += 1;
        self.kills += u64::from(player.kills);
        self.deaths += u64::from(player.deaths);
        self.assists += u64::from(player.assists);
        self.time_played += player.time_played.unwrap_or(detail.info.game_duration);
        self.creep_score += u64::from(player.creep_score());
        self.damage_to_champions += player.total_damage_dealt_to_champions;
        self.damage_taken += player.total_damage_taken;
        self.vision_score += player.vision();
        self.solo_kills += player.solo_kills();
        self.kill_involvement += u64::from(player.kills + player.assists);
        self.team_kills += u64::from(detail.team_kills(player.team_id));
        self.dragons += u64::from(objectives.dragons);
        self.barons += u64::from(objectives.barons);
        self.heralds += u64::from(objectives.heralds);
    }

    /// Dragon, baron and herald takedowns combined.
    pub fn objective_takedowns(&self) -> u64 {
        self.dragons + self.barons + self.heralds
    }
}

/// One month's value of a metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMetric {
    /// English month name
    pub month: &'static str,
    /// Rounded to two decimals; zero for months without games
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// Twelve monthly points of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    /// Metric the points measure
    pub metric: MetricKind,
    /// January through December
    pub points: Vec<MonthlyMetric>,
}

/// Chart data for the player's most played role.
///
/// Serializes as `{"role": ..., "metrics": {name: [points]}}` with the
/// metrics in the role's fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleAggregate {
    /// Most played role
    pub role: Role,
    /// Series in the role's metric order
    #[serde(serialize_with = "serialize_series")]
    pub metrics: Vec<MetricSeries>,
}

impl RoleAggregate {
    /// Series for a metric, if the role charts it.
    pub fn series(&self, metric: MetricKind) -> Option<&MetricSeries> {
        self.metrics.iter().find(|s| s.metric == metric)
    }
}

fn serialize_series<S: Serializer>(
    series: &[MetricSeries],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(series.len()))?;
    for s in series {
        map.serialize_entry(s.metric.name(), &s.points)?;
    }
    map.end()
}

/// Accumulates role buckets for one player across matches.
#[derive(Debug, Clone, Default)]
pub struct RoleAggregator {
    buckets: [[RoleBucket; 12]; 5],
}

impl RoleAggregator {
    /// An aggregator with every bucket empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate `matches` for the player with `puuid`.
    pub fn aggregate(matches: &[ResolvedMatch], puuid: &str) -> RoleAggregate {
        let mut aggregator = Self::new();
        for m in matches {
            aggregator.add(m, puuid);
        }
        aggregator.finish()
    }

    /// Fold a match in. Returns the player's role, or `None` if the player
    /// is not a participant (the match is skipped).
    pub fn add(&mut self, resolved: &ResolvedMatch, puuid: &str) -> Option<Role> {
        let player = resolved.detail.participant(puuid)?;
        let role = Role::classify(
            Some(player.team_position.as_str()),
            Some(player.individual_position.as_str()),
        );
        let month = resolved
            .detail
            .info
            .game_creation
            .to_offset(UtcOffset::UTC)
            .month();
        let month_index = usize::from(u8::from(month) - 1);

        self.buckets[role.index()][month_index].add(resolved, player);
        Some(role)
    }

    /// Games played in a role across all months.
    pub fn games(&self, role: Role) -> u32 {
        self.buckets[role.index()].iter().map(|b| b.games).sum()
    }

    /// The role with the most games; ties go to the earlier entry of
    /// [`Role::ALL`]. With no games at all this is ADC.
    pub fn most_played(&self) -> Role {
        let mut best = Role::ALL[0];
        for role in Role::ALL {
            if self.games(role) > self.games(best) {
                best = role;
            }
        }
        best
    }

    /// Build the twelve-month series for the most played role.
    pub fn finish(&self) -> RoleAggregate {
        let role = self.most_played();
        let months = &self.buckets[role.index()];

        let metrics = MetricKind::for_role(role)
            .iter()
            .map(|&metric| MetricSeries {
                metric,
                points: MONTHS
                    .iter()
                    .zip(months)
                    .map(|(&month, bucket)| MonthlyMetric {
                        month,
                        value: if bucket.games == 0 {
                            Decimal::ZERO
                        } else {
                            round2(metric.compute(bucket))
                        },
                    })
                    .collect(),
            })
            .collect();

        RoleAggregate { role, metrics }
    }
}
