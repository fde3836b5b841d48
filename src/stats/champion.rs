//! Per-champion tallies joined with mastery.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::riot::{ChampionMasteryDto, ParticipantDto};
use crate::stats::metrics::round2;

/// How many champions a response lists.
pub const TOP_CHAMPIONS: usize = 5;

/// Mastery summary for one champion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mastery {
    /// Mastery level
    pub level: u32,
    /// Lifetime mastery points
    pub points: u64,
    /// Whether this season's chest was earned
    pub chest_granted: bool,
}

impl From<&ChampionMasteryDto> for Mastery {
    fn from(dto: &ChampionMasteryDto) -> Self {
        Self {
            level: dto.champion_level,
            points: dto.champion_points,
            chest_granted: dto.chest_granted,
        }
    }
}

/// A champion's record over the player's matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionStats {
    /// Champion name as reported by the last match
    pub name: String,
    /// Matches played on the champion
    pub matches: u32,
    /// Matches won on the champion
    pub wins: u32,
    /// Win percentage
    #[serde(with = "rust_decimal::serde::float")]
    pub winrate: Decimal,
    /// Mastery, when the player has any on this champion
    pub mastery: Option<Mastery>,
}

#[derive(Debug, Clone)]
struct Tally {
    champion_id: i64,
    name: String,
    matches: u32,
    wins: u32,
}

/// Counts matches and wins per champion id.
#[derive(Debug, Clone, Default)]
pub struct ChampionTally {
    tallies: HashMap<i64, Tally>,
}

impl ChampionTally {
    /// An empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally a player's participant records.
    pub fn from_players<'a>(players: impl IntoIterator<Item = &'a ParticipantDto>) -> Self {
        let mut tally = Self::new();
        for p in players {
            tally.add(p);
        }
        tally
    }

    /// Record one game. The most recently seen name wins.
    pub fn add(&mut self, player: &ParticipantDto) {
        let entry = self
            .tallies
            .entry(player.champion_id)
            .or_insert_with(|| Tally {
                champion_id: player.champion_id,
                name: player.champion_name.clone(),
                matches: 0,
                wins: 0,
            });
        entry.matches += 1;
        if player.win {
            entry.wins += 1;
        }
        entry.name.clone_from(&player.champion_name);
    }

    /// Number of distinct champions seen.
    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    /// Whether no games were recorded.
    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Most played champions with their mastery, at most [`TOP_CHAMPIONS`].
    ///
    /// Sorted by matches descending; ties by champion id so the output does
    /// not depend on hash order.
    pub fn top(&self, masteries: &[ChampionMasteryDto]) -> Vec<ChampionStats> {
        let mastery_by_id: HashMap<i64, Mastery> = masteries
            .iter()
            .map(|m| (m.champion_id, Mastery::from(m)))
            .collect();

        let mut tallies: Vec<&Tally> = self.tallies.values().collect();
        tallies.sort_by(|a, b| {
            b.matches
                .cmp(&a.matches)
                .then(a.champion_id.cmp(&b.champion_id))
        });

        tallies
            .into_iter()
            .take(TOP_CHAMPIONS)
            .map(|t| ChampionStats {
                name: t.name.clone(),
                matches: t.matches,
                wins: t.wins,
                winrate: round2(f64::from(t.wins) / f64::from(t.matches) * 100.0),
                mastery: mastery_by_id.get(&t.champion_id).copied(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn game(champion_id: i64, name: &str, win: bool) -> ParticipantDto {
        ParticipantDto {
            champion_id,
            champion_name: name.to_string(),
            win,
            ..ParticipantDto::default()
        }
    }

    #[test]
    fn test_top_five_by_matches() {
        let mut games = Vec::new();
        for (id, count) in [(1, 1), (2, 4), (3, 2), (4, 6), (5, 2), (6, 3)] {
            for i in 0..count {
                games.push(game(id, &format!("Champ{id}"), i % 2 == 0));
            }
        }
        let tally = ChampionTally::from_players(&games);
        assert_eq!(tally.len(), 6);

        let top = tally.top(&[]);
        let names: Vec<_> = top.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Champ4", "Champ2", "Champ6", "Champ3", "Champ5"]);
        assert_eq!(top[0].wins, 3);
        assert_eq!(top[0].winrate, Decimal::from(50));
        assert!(top.iter().all(|c| c.mastery.is_none()));
    }

    #[test]
    fn test_joins_mastery() {
        let games = [game(222, "Jinx", true), game(222, "Jinx", false), game(222, "Jinx", false)];
        let masteries = [ChampionMasteryDto {
            champion_id: 222,
            champion_level: 7,
            champion_points: 250_000,
            chest_granted: true,
        }];

        let top = ChampionTally::from_players(&games).top(&masteries);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].winrate, Decimal::from_str("33.33").unwrap());
        assert_eq!(
            top[0].mastery,
            Some(Mastery {
                level: 7,
                points: 250_000,
                chest_granted: true
            })
        );

        let json = serde_json::to_value(&top[0]).unwrap();
        assert_eq!(json["mastery"]["chestGranted"], true);
        assert_eq!(json["winrate"], 33.33);
    }

    #[test]
    fn test_empty_tally() {
        let tally = ChampionTally::new();
        assert!(tally.is_empty());
        assert!(tally.top(&[]).is_empty());
    }
}
