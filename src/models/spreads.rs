use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pre-built, read-only market line snapshot.
///
/// Keys are `"{date}:{norm_away}@{norm_home}"` (see `matching::spread_key`).
/// Spreads are in away-team terms: positive means the away side is the
/// underdog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadSnapshot {
    /// When the snapshot was assembled
    pub fetched_at: DateTime<Utc>,

    /// Closing lines
    #[serde(default)]
    pub closing: HashMap<String, f64>,

    /// Opening lines, used for line movement
    #[serde(default)]
    pub opening: HashMap<String, f64>,
}

impl SpreadSnapshot {
    pub fn closing_for(&self, key: &str) -> Option<f64> {
        self.closing.get(key).copied()
    }

    pub fn opening_for(&self, key: &str) -> Option<f64> {
        self.opening.get(key).copied()
    }
}
