//! Lane role normalization.

use std::fmt;

use serde::Serialize;

/// One of the five lane roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    /// Bottom lane carry
    #[serde(rename = "ADC")]
    Adc,
    /// Middle lane
    Mid,
    /// Jungle
    Jungle,
    /// Top lane
    Top,
    /// Bottom lane support
    Support,
}

impl Role {
    /// All roles in tie-break order: when two roles have the same game count
    /// the one listed first wins.
    pub const ALL: [Role; 5] = [Role::Adc, Role::Mid, Role::Jungle, Role::Top, Role::Support];

    /// Classify a participant from its team and individual positions.
    ///
    /// The first non-empty position is used. Matching is case-insensitive and
    /// anything unrecognized (including no position at all) maps to ADC.
    pub fn classify(team_position: Option<&str>, individual_position: Option<&str>) -> Role {
        let raw = [team_position, individual_position]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|p| !p.is_empty())
            .unwrap_or_default()
            .to_ascii_uppercase();

        match raw.as_str() {
            "MIDDLE" | "MID" => Role::Mid,
            "JUNGLE" => Role::Jungle,
            "TOP" => Role::Top,
            "UTILITY" | "SUPPORT" | "DUO_SUPPORT" => Role::Support,
            // ADC, BOTTOM, BOT, DUO_CARRY and everything else
            _ => Role::Adc,
        }
    }

    /// Display name used in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Adc => "ADC",
            Role::Mid => "Mid",
            Role::Jungle => "Jungle",
            Role::Top => "Top",
            Role::Support => "Support",
        }
    }

    /// Position in [`Role::ALL`].
    pub(crate) fn index(&self) -> usize {
        match self {
            Role::Adc => 0,
            Role::Mid => 1,
            Role::Jungle => 2,
            Role::Top => 3,
            Role::Support => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
