use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side blew a double-digit lead
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlownLeadSide {
    Home,
    Away,
}

impl BlownLeadSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlownLeadSide::Home => "home",
            BlownLeadSide::Away => "away",
        }
    }
}

/// Storyline metrics mined from one game's play-by-play log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameNarrative {
    /// Matchup key: `"{away} @ {home}"`
    pub game: String,

    /// Game date
    pub game_date: NaiveDate,

    /// Home display name
    pub home_team: String,

    /// Away display name
    pub away_team: String,

    /// Final home points
    pub home_points: i32,

    /// Final away points
    pub away_points: i32,

    /// Largest lead the home side held at any point, overtime included
    pub max_home_lead: i32,

    /// Largest lead the away side held at any point, overtime included
    pub max_away_lead: i32,

    /// Display name of the team that blew a 10+ point lead, if any
    pub blown_lead_team: Option<String>,

    /// Side of the blown lead, if any
    pub blown_lead_side: Option<BlownLeadSide>,

    /// Home points scored in the last five minutes of the fourth quarter
    pub clutch_home_points: i32,

    /// Away points scored in the last five minutes of the fourth quarter
    pub clutch_away_points: i32,

    /// Clutch margin from the home side's perspective
    pub clutch_margin: i32,
}

/// One team's narrative signals from one game, used by recent-N aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamNarrativeEntry {
    /// Game date
    pub game_date: NaiveDate,

    /// Clutch margin signed for this team
    pub clutch_margin: i32,

    /// This team's largest lead in the game
    pub max_lead: i32,

    /// Whether this team blew a 10+ point lead
    pub blew_lead: bool,
}

/// Per-team chronological narrative logs keyed by team id
pub type NarrativeHistory = std::collections::HashMap<String, Vec<TeamNarrativeEntry>>;
