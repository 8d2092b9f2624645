use serde::{Deserialize, Serialize};

/// Against-the-spread outcome for one graded game.
///
/// Exactly one of these is assigned per graded game; a push is a first-class
/// no-decision state, not an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AtsOutcome {
    Win,
    Loss,
    Push,
}

impl AtsOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AtsOutcome::Win => "W",
            AtsOutcome::Loss => "L",
            AtsOutcome::Push => "PUSH",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "W" => AtsOutcome::Win,
            "L" => AtsOutcome::Loss,
            _ => AtsOutcome::Push,
        }
    }
}

/// Side the model's edge points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgePick {
    Away,
    Home,
    Push,
}

impl EdgePick {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgePick::Away => "AWAY",
            EdgePick::Home => "HOME",
            EdgePick::Push => "PUSH",
        }
    }
}

/// One graded bet, everything in away-team terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsMetrics {
    /// Actual away-team margin
    pub away_margin: f64,

    /// Predicted away-team margin (injury-adjusted when a report was available)
    pub pred_away_margin: f64,

    /// Market line as the away team's point spread
    pub line: f64,

    /// away_margin + line; zero means the line hit exactly
    pub actual_diff: f64,

    /// pred_away_margin + line; the model's edge over the line
    pub pred_diff: f64,

    /// Graded outcome
    pub result: AtsOutcome,

    /// Edge in points (same value as pred_diff)
    pub edge: f64,

    /// Whether the edge clears the fixed opportunity threshold
    pub edge_opportunity: bool,

    /// Side the edge points at
    pub edge_pick: EdgePick,

    /// Whether the edge pick covered; undefined on pushes and zero edge
    pub edge_hit: Option<bool>,

    /// |pred_away_margin - away_margin|
    pub model_error: f64,

    /// |line - away_margin|
    pub market_error: f64,
}

/// Aggregate over a set of graded games.
///
/// Rates are `None` when their denominator is empty, never zero-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsSummary {
    pub total_games: usize,
    pub graded_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub ats_accuracy: Option<f64>,
    pub edge_opportunities: usize,
    pub edge_bets: usize,
    pub edge_wins: usize,
    pub edge_hit_rate: Option<f64>,
    pub model_mae: Option<f64>,
    pub market_mae: Option<f64>,
}

/// One row of a threshold sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdResult {
    /// Minimum |pred_diff| required to take the bet
    pub threshold: f64,

    /// Selected non-push bets at this threshold
    pub bets: usize,

    /// ATS accuracy over the selection; `None` when nothing was selected
    pub accuracy: Option<f64>,
}

/// One game's prediction as written by the external predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Matchup key: `"{away} @ {home}"`
    pub game: Option<String>,

    /// Feed team ids, when the predictor kept them
    pub home_id: Option<String>,
    pub away_id: Option<String>,

    /// Display names, when the predictor kept them
    pub home_team: Option<String>,
    pub away_team: Option<String>,

    /// Market line as the away team's point spread; 0.0 means no line known
    #[serde(default)]
    pub market_spread: f64,

    /// Predicted away-team margin before injury adjustment
    #[serde(default)]
    pub pred_away_margin: f64,
}

/// Predictions file for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionsFile {
    pub date: String,
    #[serde(default)]
    pub games: Vec<PredictionRecord>,
}
