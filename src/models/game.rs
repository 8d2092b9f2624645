use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw game record as downloaded from the schedule feed.
///
/// Every field is optional so a partially-filled record still parses; records
/// that lack what the pipeline needs are rejected during ingestion instead of
/// failing the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Feed game identifier
    pub id: Option<String>,

    /// Game status (`closed`, `complete`, `scheduled`, ...)
    pub status: Option<String>,

    /// Scheduled tip-off as an RFC3339 timestamp
    pub scheduled: Option<String>,

    /// Home team side
    #[serde(default)]
    pub home: TeamSide,

    /// Away team side
    #[serde(default)]
    pub away: TeamSide,

    /// Play-by-play periods, present only when the summary was fetched
    #[serde(default)]
    pub periods: Vec<Period>,
}

/// One side of a game record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSide {
    /// Feed team identifier
    pub id: Option<String>,

    /// Market part of the display name (e.g. "Boston")
    pub market: Option<String>,

    /// Name part of the display name (e.g. "Celtics")
    pub name: Option<String>,

    /// Short alias (e.g. "BOS")
    pub alias: Option<String>,

    /// Final points, when reported directly on the side
    pub points: Option<i32>,

    /// Nested scoring object some feed variants use instead of `points`
    pub scoring: Option<Scoring>,
}

/// Nested scoring payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoring {
    pub points: Option<i32>,
}

/// One period of play-by-play data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Period type (`quarter`, `overtime`)
    #[serde(rename = "type")]
    pub period_type: Option<String>,

    /// Period number within its type (1-4 for quarters)
    pub number: Option<u32>,

    /// Chronological events with cumulative scores
    #[serde(default)]
    pub events: Vec<PlayEvent>,
}

/// One play-by-play event carrying the cumulative score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Cumulative home points after this event
    pub home_points: Option<i32>,

    /// Cumulative away points after this event
    pub away_points: Option<i32>,

    /// Remaining game clock as "MM:SS"
    pub clock: Option<String>,

    /// Event type label from the feed
    pub event_type: Option<String>,
}

/// One team's outcome in one completed game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: String,
    pub date: NaiveDate,
    pub is_home: bool,
    pub points_for: i32,
    pub points_against: i32,
    pub opponent_id: String,
}

impl GameResult {
    pub fn margin(&self) -> i32 {
        self.points_for - self.points_against
    }
}

/// Why a raw record was rejected during ingestion
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("game is not completed")]
    NotCompleted,
    #[error("missing or unparseable scheduled date")]
    MissingDate,
    #[error("missing game id")]
    MissingGameId,
    #[error("missing final points")]
    MissingPoints,
}

impl TeamSide {
    /// Display name built from market + name, falling back to alias then id
    pub fn display_name(&self) -> String {
        let market = self.market.as_deref().unwrap_or("");
        let name = self.name.as_deref().unwrap_or("");
        let display = format!("{} {}", market, name).trim().to_string();
        if !display.is_empty() {
            return display;
        }
        if let Some(alias) = self.alias.as_deref() {
            if !alias.is_empty() {
                return alias.to_string();
            }
        }
        self.team_id()
    }

    /// Feed team id, or "unknown" when the feed omitted it
    pub fn team_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| "unknown".to_string())
    }

    /// Final points, either direct or nested under the scoring object
    pub fn final_points(&self) -> Option<i32> {
        if let Some(points) = self.points {
            return Some(points);
        }
        self.scoring.as_ref().and_then(|s| s.points)
    }
}

impl GameRecord {
    /// Whether the game finished and carries a final result
    pub fn is_completed(&self) -> bool {
        matches!(
            self.status.as_deref().map(str::to_lowercase).as_deref(),
            Some("closed") | Some("complete") | Some("completed") | Some("final")
        )
    }

    /// Game date parsed from the scheduled timestamp
    pub fn game_date(&self) -> Option<NaiveDate> {
        let scheduled = self.scheduled.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(scheduled)
            .ok()
            .map(|dt| dt.date_naive())
    }

    /// Matchup key used for narrative caching: `"{away} @ {home}"`
    pub fn matchup_key(&self) -> String {
        format!("{} @ {}", self.away.display_name(), self.home.display_name())
    }

    /// Split a completed record into the two per-team results
    pub fn team_results(&self) -> Result<(GameResult, GameResult), RecordError> {
        if !self.is_completed() {
            return Err(RecordError::NotCompleted);
        }
        let date = self.game_date().ok_or(RecordError::MissingDate)?;
        let game_id = self.id.clone().ok_or(RecordError::MissingGameId)?;
        let home_points = self.home.final_points().ok_or(RecordError::MissingPoints)?;
        let away_points = self.away.final_points().ok_or(RecordError::MissingPoints)?;

        let home_id = self.home.team_id();
        let away_id = self.away.team_id();

        let home_result = GameResult {
            game_id: game_id.clone(),
            date,
            is_home: true,
            points_for: home_points,
            points_against: away_points,
            opponent_id: away_id,
        };
        let away_result = GameResult {
            game_id,
            date,
            is_home: false,
            points_for: away_points,
            points_against: home_points,
            opponent_id: home_id,
        };

        Ok((home_result, away_result))
    }
}
