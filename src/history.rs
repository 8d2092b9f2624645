use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{GameRecord, GameResult};

/// Chronological per-team game logs built from raw game records.
///
/// Each completed game contributes one entry to both teams' logs. Records
/// that cannot be split into results are dropped, not fatal.
pub struct TeamHistory {
    games: HashMap<String, Vec<GameResult>>,
    names: HashMap<String, String>,
    dropped: usize,
}

impl TeamHistory {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut games: HashMap<String, Vec<GameResult>> = HashMap::new();
        let mut names = HashMap::new();
        let mut dropped = 0;

        for record in records {
            let (home_result, away_result) = match record.team_results() {
                Ok(results) => results,
                Err(e) => {
                    debug!("Dropping record {:?}: {}", record.id, e);
                    dropped += 1;
                    continue;
                }
            };

            let home_id = record.home.team_id();
            let away_id = record.away.team_id();
            names.insert(home_id.clone(), record.home.display_name());
            names.insert(away_id.clone(), record.away.display_name());

            games.entry(home_id).or_default().push(home_result);
            games.entry(away_id).or_default().push(away_result);
        }

        for log in games.values_mut() {
            log.sort_by_key(|g| g.date);
        }

        if dropped > 0 {
            warn!("Dropped {} records during history build", dropped);
        }

        Self {
            games,
            names,
            dropped,
        }
    }

    /// Full chronological log for a team; empty for unknown teams
    pub fn games(&self, team_id: &str) -> &[GameResult] {
        self.games.get(team_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Log filtered to games strictly before the cutoff date.
    ///
    /// This filter is the pipeline's leakage guard: every stats or feature
    /// computation for a date goes through it.
    pub fn games_before(&self, team_id: &str, cutoff: NaiveDate) -> Vec<GameResult> {
        self.games(team_id)
            .iter()
            .filter(|g| g.date < cutoff)
            .cloned()
            .collect()
    }

    /// Display name for a team id, falling back to the id itself
    pub fn display_name(&self, team_id: &str) -> String {
        self.names
            .get(team_id)
            .cloned()
            .unwrap_or_else(|| team_id.to_string())
    }

    pub fn team_count(&self) -> usize {
        self.games.len()
    }

    pub fn dropped_records(&self) -> usize {
        self.dropped
    }
}
