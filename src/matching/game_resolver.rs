use std::collections::HashMap;

use tracing::debug;

use crate::matching::names::normalize_team_name;
use crate::models::{GameRecord, PredictionRecord};

/// Final score of one completed game, in the terms the evaluator wants
#[derive(Debug, Clone)]
pub struct FinalScore {
    pub home_points: i32,
    pub away_points: i32,
    pub home_id: Option<String>,
    pub away_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
}

impl FinalScore {
    /// Actual away-team margin
    pub fn away_margin(&self) -> f64 {
        f64::from(self.away_points - self.home_points)
    }
}

/// One day's final scores indexed three ways: by team ids, by the display
/// matchup key, and by normalized names.
///
/// Lookup tries the keys in that order, so predictions that kept feed ids
/// resolve exactly and name-only predictions still land through the
/// normalized fallback.
pub struct GameResultIndex {
    scores: Vec<FinalScore>,
    by_id: HashMap<String, usize>,
    by_key: HashMap<String, usize>,
    by_norm: HashMap<String, usize>,
}

impl GameResultIndex {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut index = Self {
            scores: Vec::new(),
            by_id: HashMap::new(),
            by_key: HashMap::new(),
            by_norm: HashMap::new(),
        };

        for record in records {
            let (home_points, away_points) =
                match (record.home.final_points(), record.away.final_points()) {
                    (Some(h), Some(a)) => (h, a),
                    _ => continue,
                };

            let score = FinalScore {
                home_points,
                away_points,
                home_id: record.home.id.clone(),
                away_id: record.away.id.clone(),
                home_team: record.home.display_name(),
                away_team: record.away.display_name(),
            };

            let idx = index.scores.len();
            if let (Some(home_id), Some(away_id)) = (&score.home_id, &score.away_id) {
                index.by_id.insert(format!("{}@{}", away_id, home_id), idx);
            }
            index
                .by_key
                .insert(format!("{} @ {}", score.away_team, score.home_team), idx);

            let away_norm = normalize_team_name(&score.away_team);
            let home_norm = normalize_team_name(&score.home_team);
            if !away_norm.is_empty() && !home_norm.is_empty() {
                index
                    .by_norm
                    .insert(format!("{}@{}", away_norm, home_norm), idx);
            }

            index.scores.push(score);
        }

        index
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Resolve a prediction to its final score: id key first, then the
    /// display key, then normalized names.
    pub fn resolve(&self, prediction: &PredictionRecord) -> Option<&FinalScore> {
        if let (Some(away_id), Some(home_id)) = (&prediction.away_id, &prediction.home_id) {
            if let Some(&idx) = self.by_id.get(&format!("{}@{}", away_id, home_id)) {
                return Some(&self.scores[idx]);
            }
        }

        if let Some(key) = &prediction.game {
            if let Some(&idx) = self.by_key.get(key) {
                return Some(&self.scores[idx]);
            }
        }

        let (away_team, home_team) = match (&prediction.away_team, &prediction.home_team) {
            (Some(a), Some(h)) => (a.clone(), h.clone()),
            _ => match prediction.game.as_deref().and_then(|k| k.split_once(" @ ")) {
                Some((a, h)) => (a.to_string(), h.to_string()),
                None => return None,
            },
        };

        let norm_key = format!(
            "{}@{}",
            normalize_team_name(&away_team),
            normalize_team_name(&home_team)
        );
        let resolved = self.by_norm.get(&norm_key).map(|&idx| &self.scores[idx]);
        if resolved.is_none() {
            debug!("No result for prediction key {}", norm_key);
        }
        resolved
    }
}
