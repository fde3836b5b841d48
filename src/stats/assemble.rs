//! Final response assembly.

use serde::Serialize;

use crate::riot::ParticipantDto;
use crate::stats::aggregate::RoleAggregate;
use crate::stats::champion::ChampionStats;
use crate::stats::role::Role;

/// Assumed length of one game when estimating hours played.
///
/// Actual durations are not summed; the estimate is a flat 30 minutes per
/// game.
pub const ASSUMED_MINUTES_PER_GAME: u32 = 30;

/// A headline figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticItem {
    /// Card heading, e.g. "Win Rate"
    pub title: String,
    /// Formatted headline value
    pub value: String,
    /// Supporting line under the value
    pub subtitle: String,
}

impl StatisticItem {
    fn new(title: &str, value: impl ToString, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            subtitle: subtitle.into(),
        }
    }
}

/// Games played in one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleShare {
    /// Lane role
    pub role: Role,
    /// Games played in the role
    pub value: u32,
}

/// Chart data plus the role distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gameplay {
    /// Monthly series for the most played role
    pub chart_statistics: RoleAggregate,
    /// Games per role, most played first
    pub role_distribution: Vec<RoleShare>,
}

/// Everything the pipeline reports for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    /// Summary cards
    pub statistics: Vec<StatisticItem>,
    /// Most played champions
    pub champions: Vec<ChampionStats>,
    /// Role chart and distribution
    pub gameplay: Gameplay,
}

/// Combines per-player records, champion stats and the role chart.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsAssembler;

impl StatisticsAssembler {
    /// Build the response. `players` holds the player's own participant
    /// record from every resolved match.
    pub fn assemble(
        players: &[&ParticipantDto],
        champions: Vec<ChampionStats>,
        chart: RoleAggregate,
    ) -> StatisticsResponse {
        StatisticsResponse {
            statistics: summary(players),
            champions,
            gameplay: Gameplay {
                chart_statistics: chart,
                role_distribution: role_distribution(players),
            },
        }
    }
}

/// The five headline figures.
pub fn summary(players: &[&ParticipantDto]) -> Vec<StatisticItem> {
    let games = players.len() as u32;
    let wins = players.iter().filter(|p| p.win).count() as u32;
    let kills: u64 = players.iter().map(|p| u64::from(p.kills)).sum();
    let pentakills: u64 = players.iter().map(|p| u64::from(p.penta_kills)).sum();

    let (win_rate, kills_per_game) = if games > 0 {
        (
            f64::from(wins) / f64::from(games) * 100.0,
            kills as f64 / f64::from(games),
        )
    } else {
        (0.0, 0.0)
    };

    let hours = (f64::from(games * ASSUMED_MINUTES_PER_GAME) / 60.0).round();
    let days = (hours / 24.0).round();

    vec![
        StatisticItem::new("Total Games", games, "Across all queues"),
        StatisticItem::new(
            "Win Rate",
            format!("{win_rate:.1}%"),
            "Overall performance",
        ),
        StatisticItem::new(
            "Total Kills",
            kills,
            format!("{kills_per_game:.1} per game"),
        ),
        StatisticItem::new(
            "Pentakills",
            pentakills,
            if pentakills > 0 {
                "One man army!"
            } else {
                "Keep trying!"
            },
        ),
        StatisticItem::new("Hours Played", hours, format!("That's {days} days!")),
    ]
}

/// Games per role, most played first; ties keep [`Role::ALL`] order.
/// Roles with no games are omitted.
pub fn role_distribution(players: &[&ParticipantDto]) -> Vec<RoleShare> {
    let mut counts = [0u32; 5];
    for p in players {
        let role = Role::classify(
            Some(p.team_position.as_str()),
            Some(p.individual_position.as_str()),
        );
        counts[role.index()] += 1;
    }

    let mut shares: Vec<RoleShare> = Role::ALL
        .into_iter()
        .map(|role| RoleShare {
            role,
            value: counts[role.index()],
        })
        .filter(|s| s.value > 0)
        .collect();
    // stable sort keeps the tie order
    shares.sort_by(|a, b| b.value.cmp(&a.value));
    shares
}
