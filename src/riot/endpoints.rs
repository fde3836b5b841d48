//! Riot API hosts, paths and region routing.

use std::fmt;

/// Ranked solo/duo queue id.
pub const RANKED_SOLO_QUEUE: u16 = 420;

/// Header carrying the API key (`X-Riot-Token`).
pub const RIOT_TOKEN_HEADER: &str = "x-riot-token";

/// Match-v5 endpoints (regional routing).
pub mod matches {
    /// Path prefix for match resources.
    pub const MATCHES: [&str; 4] = ["lol", "match", "v5", "matches"];
    /// Segment selecting the by-puuid listing.
    pub const BY_PUUID: &str = "by-puuid";
    /// Trailing segment of the id listing.
    pub const IDS: &str = "ids";
    /// Trailing segment of the timeline resource.
    pub const TIMELINE: &str = "timeline";
}

/// Champion-mastery-v4 endpoints (platform routing).
pub mod mastery {
    /// Path to masteries by PUUID.
    pub const BY_PUUID: [&str; 5] = [
        "lol",
        "champion-mastery",
        "v4",
        "champion-masteries",
        "by-puuid",
    ];
}

/// Regional routing values used by match-v5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingRegion {
    /// NA, BR, LAN, LAS
    Americas,
    /// EUW, EUNE, TR, RU
    Europe,
    /// KR, JP
    Asia,
    /// OCE and the south-east Asian shards
    Sea,
}

impl RoutingRegion {
    /// Host label for this routing region.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Americas => "americas",
            Self::Europe => "europe",
            Self::Asia => "asia",
            Self::Sea => "sea",
        }
    }

    /// Routing region serving a platform shard, e.g. `euw1` → `europe`.
    pub fn for_platform(platform: &str) -> Option<Self> {
        match platform.trim().to_ascii_lowercase().as_str() {
            "na1" | "br1" | "la1" | "la2" => Some(Self::Americas),
            "euw1" | "eun1" | "tr1" | "ru" => Some(Self::Europe),
            "kr" | "jp1" => Some(Self::Asia),
            "oc1" | "ph2" | "sg2" | "th2" | "tw2" | "vn2" => Some(Self::Sea),
            _ => None,
        }
    }

    /// Base URL for this routing region.
    pub fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }
}

impl fmt::Display for RoutingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base URL for a platform shard, e.g. `https://euw1.api.riotgames.com`.
pub fn platform_base_url(platform: &str) -> String {
    format!(
        "https://{}.api.riotgames.com",
        platform.trim().to_ascii_lowercase()
    )
}
