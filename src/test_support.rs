//! Fixtures and an in-memory [`MatchSource`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use time::OffsetDateTime;

use crate::error::TrendsError;
use crate::riot::types::{EventDto, FrameDto, MatchInfo, MatchMetadata, TimelineInfo};
use crate::riot::{
    ChampionMasteryDto, MatchDto, MatchIdQuery, MatchSource, ParticipantDto, ResolvedMatch,
    TimelineDto,
};

/// A participant with a champion, a team and a vision score of 10.
pub(crate) fn participant(puuid: &str, position: &str) -> ParticipantDto {
    ParticipantDto {
        puuid: puuid.to_string(),
        participant_id: 1,
        champion_id: 1,
        champion_name: "Annie".to_string(),
        team_id: 100,
        vision_score: Some(10.0),
        team_position: position.to_string(),
        individual_position: position.to_string(),
        ..ParticipantDto::default()
    }
}

pub(crate) fn match_with(
    id: &str,
    created: OffsetDateTime,
    duration_secs: u64,
    participants: Vec<ParticipantDto>,
) -> MatchDto {
    MatchDto {
        metadata: MatchMetadata {
            match_id: id.to_string(),
            participants: participants.iter().map(|p| p.puuid.clone()).collect(),
        },
        info: MatchInfo {
            game_creation: created,
            game_duration: duration_secs,
            queue_id: 420,
            participants,
        },
    }
}

pub(crate) fn resolved(detail: MatchDto) -> ResolvedMatch {
    ResolvedMatch {
        detail,
        timeline: None,
    }
}

/// An `ELITE_MONSTER_KILL` event.
pub(crate) fn monster_kill(monster: &str, killer: u32, assists: &[u32]) -> EventDto {
    EventDto {
        kind: "ELITE_MONSTER_KILL".to_string(),
        monster_type: Some(monster.to_string()),
        killer_id: Some(killer),
        assisting_participant_ids: assists.to_vec(),
    }
}

/// A single-frame timeline holding `events`.
pub(crate) fn timeline(events: Vec<EventDto>) -> TimelineDto {
    TimelineDto {
        info: TimelineInfo {
            frames: vec![FrameDto { events }],
        },
    }
}

/// How a scripted match fails.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    NotFound,
    Rejected,
    Server,
}

impl Failure {
    fn to_error(self, match_id: &str) -> TrendsError {
        let path = format!("/lol/match/v5/matches/{match_id}");
        match self {
            Failure::NotFound => TrendsError::NotFound { path },
            Failure::Rejected => TrendsError::Rejected { status: 403, path },
            Failure::Server => TrendsError::RetriesExhausted {
                attempts: 6,
                last: Box::new(TrendsError::Server { status: 503 }),
            },
        }
    }
}

/// Scripted match source that records call counts and peak concurrency.
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    ids: Vec<String>,
    details: HashMap<String, MatchDto>,
    failures: HashMap<String, Failure>,
    missing_timelines: HashSet<String>,
    masteries: Option<Vec<ChampionMasteryDto>>,
    latency: Duration,
    detail_calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self {
            latency: Duration::from_millis(10),
            ..Self::default()
        }
    }

    pub(crate) fn with_match(mut self, detail: MatchDto) -> Self {
        self.ids.push(detail.id().to_string());
        self.details.insert(detail.id().to_string(), detail);
        self
    }

    /// List `detail` under `listed_id` even though its metadata says otherwise.
    pub(crate) fn with_match_as(mut self, listed_id: &str, detail: MatchDto) -> Self {
        self.ids.push(listed_id.to_string());
        self.details.insert(listed_id.to_string(), detail);
        self
    }

    pub(crate) fn failing(mut self, match_id: &str, failure: Failure) -> Self {
        self.ids.push(match_id.to_string());
        self.failures.insert(match_id.to_string(), failure);
        self
    }

    pub(crate) fn without_timeline(mut self, match_id: &str) -> Self {
        self.missing_timelines.insert(match_id.to_string());
        self
    }

    pub(crate) fn with_masteries(mut self, masteries: Vec<ChampionMasteryDto>) -> Self {
        self.masteries = Some(masteries);
        self
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    pub(crate) fn detail_calls(&self, match_id: &str) -> usize {
        self.detail_calls
            .lock()
            .unwrap()
            .get(match_id)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl MatchSource for FakeSource {
    async fn match_ids(
        &self,
        _puuid: &str,
        query: &MatchIdQuery,
    ) -> Result<Vec<String>, TrendsError> {
        Ok(self.ids.iter().take(query.max_ids).cloned().collect())
    }

    async fn match_detail(&self, match_id: &str) -> Result<MatchDto, TrendsError> {
        *self
            .detail_calls
            .lock()
            .unwrap()
            .entry(match_id.to_string())
            .or_default() += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(failure) = self.failures.get(match_id) {
            return Err(failure.to_error(match_id));
        }
        self.details
            .get(match_id)
            .cloned()
            .ok_or_else(|| TrendsError::NotFound {
                path: match_id.to_string(),
            })
    }

    async fn match_timeline(&self, match_id: &str) -> Result<TimelineDto, TrendsError> {
        if self.missing_timelines.contains(match_id) {
            return Err(TrendsError::NotFound {
                path: format!("/lol/match/v5/matches/{match_id}/timeline"),
            });
        }
        Ok(TimelineDto {
            info: TimelineInfo::default(),
        })
    }

    async fn champion_masteries(
        &self,
        _puuid: &str,
    ) -> Result<Vec<ChampionMasteryDto>, TrendsError> {
        self.masteries
            .clone()
            .ok_or(TrendsError::Server { status: 503 })
    }
}
