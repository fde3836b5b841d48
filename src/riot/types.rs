//! Riot API response and request types.
//!
//! Only the fields the statistics pipeline reads are modeled; everything
//! else in the (very large) match and timeline payloads is ignored.

use serde::{Deserialize, Serialize};
use serde_with::{TimestampMilliSeconds, serde_as};
use time::OffsetDateTime;

use crate::riot::endpoints::RANKED_SOLO_QUEUE;

/// Match-v5 match detail.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDto {
    /// Match metadata.
    pub metadata: MatchMetadata,
    /// Match body.
    pub info: MatchInfo,
}

impl MatchDto {
    /// The match identifier, e.g. `EUW1_6812345678`.
    pub fn id(&self) -> &str {
        &self.metadata.match_id
    }

    /// The participant record for a PUUID, if the player was in this match.
    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }

    /// Total kills of everyone on the given team.
    pub fn team_kills(&self, team_id: u32) -> u32 {
        self.info
            .participants
            .iter()
            .filter(|p| p.team_id == team_id)
            .map(|p| p.kills)
            .sum()
    }
}

/// Match metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    /// Match identifier.
    pub match_id: String,
    /// PUUIDs of all participants.
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Match body.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Game creation time (sent as epoch milliseconds).
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    pub game_creation: OffsetDateTime,
    /// Game length in seconds.
    #[serde(default)]
    pub game_duration: u64,
    /// Queue the game was played in.
    #[serde(default)]
    pub queue_id: u16,
    /// All ten participants.
    #[serde(default)]
    pub participants: Vec<ParticipantDto>,
}

/// One player's record within a match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantDto {
    /// Player PUUID.
    pub puuid: String,
    /// In-match participant id (1-10), referenced by timeline events.
    pub participant_id: u32,
    /// Champion id.
    pub champion_id: i64,
    /// Champion name.
    pub champion_name: String,
    /// Team id (100 or 200).
    pub team_id: u32,
    /// Whether the player's team won.
    pub win: bool,

    /// Kills.
    pub kills: u32,
    /// Deaths.
    pub deaths: u32,
    /// Assists.
    pub assists: u32,
    /// Pentakills.
    pub penta_kills: u32,

    /// Lane minions killed.
    pub total_minions_killed: u32,
    /// Jungle monsters killed.
    pub neutral_minions_killed: u32,

    /// Damage dealt to champions.
    pub total_damage_dealt_to_champions: u64,
    /// Damage taken.
    pub total_damage_taken: u64,

    /// Vision score; older payloads only carry it under `challenges`.
    pub vision_score: Option<f64>,
    /// Derived per-player statistics.
    pub challenges: Option<Challenges>,

    /// Seconds this player was in the game.
    pub time_played: Option<u64>,

    /// Position assigned by matchmaking, e.g. `UTILITY`.
    pub team_position: String,
    /// Position inferred from play, e.g. `BOTTOM`.
    pub individual_position: String,
}

impl ParticipantDto {
    /// Lane plus jungle creep score.
    pub fn creep_score(&self) -> u32 {
        self.total_minions_killed + self.neutral_minions_killed
    }

    /// Vision score with the `challenges` fallback.
    pub fn vision(&self) -> f64 {
        self.vision_score
            .or_else(|| self.challenges.as_ref().and_then(|c| c.vision_score))
            .unwrap_or(0.0)
    }

    /// Solo kills, or zero when challenges are missing.
    pub fn solo_kills(&self) -> f64 {
        self.challenges
            .as_ref()
            .and_then(|c| c.solo_kills)
            .unwrap_or(0.0)
    }
}

/// Subset of the `challenges` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Challenges {
    /// Vision score.
    pub vision_score: Option<f64>,
    /// Kills with no assisting ally.
    pub solo_kills: Option<f64>,
}

/// Match-v5 timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineDto {
    /// Timeline body.
    pub info: TimelineInfo,
}

/// Timeline body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimelineInfo {
    /// One frame per minute.
    pub frames: Vec<FrameDto>,
}

/// One timeline frame.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrameDto {
    /// Events that happened during the frame.
    pub events: Vec<EventDto>,
}

/// A timeline event. Only elite monster kills are interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDto {
    /// Event type, e.g. `ELITE_MONSTER_KILL`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Monster killed, e.g. `DRAGON`, `BARON_NASHOR`, `RIFTHERALD`.
    pub monster_type: Option<String>,
    /// Participant credited with the kill.
    pub killer_id: Option<u32>,
    /// Participants credited with an assist.
    pub assisting_participant_ids: Vec<u32>,
}

/// Epic monster takedowns credited to one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectiveTakedowns {
    /// Dragons (including elder)
    pub dragons: u32,
    /// Baron Nashor
    pub barons: u32,
    /// Rift Herald
    pub heralds: u32,
}

impl ObjectiveTakedowns {
    /// Sum across objective types.
    pub fn total(&self) -> u32 {
        self.dragons + self.barons + self.heralds
    }
}

impl TimelineDto {
    /// Count epic monster kills and assists for a participant.
    pub fn objective_takedowns(&self, participant_id: u32) -> ObjectiveTakedowns {
        let mut out = ObjectiveTakedowns::default();
        let events = self
            .info
            .frames
            .iter()
            .flat_map(|f| f.events.iter())
            .filter(|e| e.kind == "ELITE_MONSTER_KILL");

        for event in events {
            let involved = event.killer_id == Some(participant_id)
                || event.assisting_participant_ids.contains(&participant_id);
            if !involved {
                continue;
            }
            match event.monster_type.as_deref() {
                Some("DRAGON") => out.dragons += 1,
                Some("BARON_NASHOR") => out.barons += 1,
                Some("RIFTHERALD") => out.heralds += 1,
                _ => {}
            }
        }
        out
    }
}

/// Champion-mastery-v4 entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampionMasteryDto {
    /// Champion id.
    pub champion_id: i64,
    /// Mastery level.
    pub champion_level: u32,
    /// Mastery points.
    pub champion_points: u64,
    /// Whether a chest was granted this season.
    pub chest_granted: bool,
}

/// Filters for the match id listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchIdQuery {
    /// Queue filter (`None` for all queues).
    pub queue: Option<u16>,
    /// Inclusive lower bound, epoch seconds.
    pub start_time: Option<i64>,
    /// Inclusive upper bound, epoch seconds.
    pub end_time: Option<i64>,
    /// Ids per page (the API caps this at 100).
    pub page_size: u32,
    /// Stop after collecting this many ids.
    pub max_ids: usize,
}

impl MatchIdQuery {
    /// Ranked solo games from the start of `now`'s UTC year until `now`.
    pub fn season_to_date(now: OffsetDateTime) -> Self {
        let now = now.to_offset(time::UtcOffset::UTC);
        let year_start = time::Date::from_ordinal_date(now.year(), 1)
            .map(|d| d.midnight().assume_utc())
            .unwrap_or(now);
        Self {
            queue: Some(RANKED_SOLO_QUEUE),
            start_time: Some(year_start.unix_timestamp()),
            end_time: Some(now.unix_timestamp()),
            ..Self::default()
        }
    }

    /// Page size clamped to what the endpoint accepts.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, 100) as usize
    }

    /// Query parameters for one page.
    pub(crate) fn page(&self, start: usize) -> MatchIdPage {
        MatchIdPage {
            start,
            count: self.effective_page_size() as u32,
            start_time: self.start_time,
            end_time: self.end_time,
            queue: self.queue,
        }
    }
}

impl Default for MatchIdQuery {
    fn default() -> Self {
        Self {
            queue: Some(RANKED_SOLO_QUEUE),
            start_time: None,
            end_time: None,
            page_size: 100,
            max_ids: 120,
        }
    }
}

/// Serialized query string of one listing page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MatchIdPage {
    start: usize,
    count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    queue: Option<u16>,
}

/// A fetched match plus its best-effort timeline.
#[derive(Debug, Clone)]
pub struct ResolvedMatch {
    /// Match detail.
    pub detail: MatchDto,
    /// Timeline, if it could be fetched.
    pub timeline: Option<TimelineDto>,
}

impl ResolvedMatch {
    /// The match identifier.
    pub fn id(&self) -> &str {
        self.detail.id()
    }

    /// Objective takedowns for a participant; zero when the timeline is missing.
    pub fn objective_takedowns(&self, participant_id: u32) -> ObjectiveTakedowns {
        self.timeline
            .as_ref()
            .map(|t| t.objective_takedowns(participant_id))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_deserialize_match() {
        let json = serde_json::json!({
            "metadata": { "matchId": "EUW1_1", "participants": ["a", "b"] },
            "info": {
                "gameCreation": 1_739_000_000_000i64,
                "gameDuration": 1800,
                "queueId": 420,
                "participants": [{
                    "puuid": "a",
                    "participantId": 1,
                    "championId": 222,
                    "championName": "Jinx",
                    "teamId": 100,
                    "win": true,
                    "kills": 7,
                    "deaths": 2,
                    "assists": 9,
                    "pentaKills": 0,
                    "totalMinionsKilled": 200,
                    "neutralMinionsKilled": 12,
                    "totalDamageDealtToChampions": 25000,
                    "totalDamageTaken": 14000,
                    "challenges": { "visionScore": 18.0, "soloKills": 2 },
                    "teamPosition": "BOTTOM",
                    "individualPosition": "BOTTOM",
                    "unknownField": { "ignored": true }
                }]
            }
        });

        let m: MatchDto = serde_json::from_value(json).unwrap();
        assert_eq!(m.id(), "EUW1_1");
        assert_eq!(m.info.game_creation, datetime!(2025-02-08 07:33:20 UTC));
        let p = m.participant("a").unwrap();
        assert_eq!(p.creep_score(), 212);
        assert_eq!(p.vision(), 18.0);
        assert_eq!(p.solo_kills(), 2.0);
        assert_eq!(p.time_played, None);
        assert!(m.participant("zzz").is_none());
    }

    #[test]
    fn test_objective_takedowns() {
        let json = serde_json::json!({
            "info": { "frames": [
                { "events": [
                    {
                        "type": "ELITE_MONSTER_KILL",
                        "monsterType": "DRAGON",
                        "killerId": 2,
                        "assistingParticipantIds": [1, 3]
                    },
                    { "type": "CHAMPION_KILL", "killerId": 1 }
                ]},
                { "events": [
                    { "type": "ELITE_MONSTER_KILL", "monsterType": "BARON_NASHOR", "killerId": 1 },
                    { "type": "ELITE_MONSTER_KILL", "monsterType": "RIFTHERALD", "killerId": 7 },
                    { "type": "ELITE_MONSTER_KILL", "monsterType": "HORDE", "killerId": 1 }
                ]}
            ]}
        });
        let timeline: TimelineDto = serde_json::from_value(json).unwrap();
        let t = timeline.objective_takedowns(1);
        assert_eq!(
            t,
            ObjectiveTakedowns {
                dragons: 1,
                barons: 1,
                heralds: 0
            }
        );
        assert_eq!(t.total(), 2);
        assert_eq!(timeline.objective_takedowns(7).heralds, 1);
    }

    #[test]
    fn test_season_to_date() {
        let q = MatchIdQuery::season_to_date(datetime!(2025-06-15 12:00:00 UTC));
        assert_eq!(
            q.start_time,
            Some(datetime!(2025-01-01 00:00:00 UTC).unix_timestamp())
        );
        assert_eq!(
            q.end_time,
            Some(datetime!(2025-06-15 12:00:00 UTC).unix_timestamp())
        );
        assert_eq!(q.queue, Some(420));
        assert_eq!(q.max_ids, 120);
    }

    #[test]
    fn test_page_query_string() {
        let q = MatchIdQuery {
            start_time: Some(10),
            end_time: None,
            ..MatchIdQuery::default()
        };
        let qs = serde_urlencoded::to_string(q.page(100)).unwrap();
        assert_eq!(qs, "start=100&count=100&startTime=10&queue=420");
    }
}
