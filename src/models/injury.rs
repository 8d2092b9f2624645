use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One player's line on the injury report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjuryEntry {
    /// Player display name
    pub player: String,

    /// Report status (`Out`, `Questionable`, `Day-To-Day`, ...)
    pub status: String,

    /// Season points per game, when known
    pub ppg: Option<f64>,

    /// 1-based scoring rank on the team, when known
    pub ppg_rank: Option<u32>,
}

impl InjuryEntry {
    /// Only players ruled out carry a penalty
    pub fn is_out(&self) -> bool {
        self.status.eq_ignore_ascii_case("out")
    }
}

/// Pre-built, read-only injury report for one date.
///
/// The core never fetches this itself; whoever assembled the snapshot stamps
/// `fetched_at` so staleness is visible downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjurySnapshot {
    /// Report date
    pub date: NaiveDate,

    /// When the snapshot was assembled
    pub fetched_at: DateTime<Utc>,

    /// Entries grouped by team display name
    #[serde(default)]
    pub teams: HashMap<String, Vec<InjuryEntry>>,
}
