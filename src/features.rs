use chrono::NaiveDate;
use tracing::debug;

use crate::history::TeamHistory;
use crate::models::{FeatureVector, NarrativeHistory, TeamNarrativeEntry};
use crate::narrative::{avg_clutch_margin, avg_max_lead, blown_rate};
use crate::stats::{
    compute_team_stats, head_to_head, recent_avg_margin, recent_avg_points_against,
    recent_avg_points_for, recent_win_pct, rest_signals,
};

/// Assembles the fixed-schema model input for a matchup at a date.
///
/// Every lookup is filtered to games strictly before the target date. A side
/// with zero qualifying games makes the whole assembly return `None`; callers
/// skip the matchup rather than feed the model fabricated zeros.
pub struct FeatureBuilder<'a> {
    history: &'a TeamHistory,
    narratives: &'a NarrativeHistory,
    half_life: f64,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(history: &'a TeamHistory, narratives: &'a NarrativeHistory, half_life: f64) -> Self {
        Self {
            history,
            narratives,
            half_life,
        }
    }

    fn narratives_before(&self, team_id: &str, cutoff: NaiveDate) -> Vec<TeamNarrativeEntry> {
        self.narratives
            .get(team_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.game_date < cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Build the feature vector for `(home, away, date)`.
    ///
    /// `market_spread` is the away team's point spread (0.0 when unknown);
    /// `opening_spread` feeds the line-movement feature when present.
    pub fn build(
        &self,
        home_id: &str,
        away_id: &str,
        date: NaiveDate,
        market_spread: f64,
        opening_spread: Option<f64>,
    ) -> Option<FeatureVector> {
        let home_games = self.history.games_before(home_id, date);
        let away_games = self.history.games_before(away_id, date);

        if home_games.is_empty() || away_games.is_empty() {
            debug!(
                "No features for {} @ {} on {}: insufficient history",
                away_id, home_id, date
            );
            return None;
        }

        let home_stats = compute_team_stats(
            home_id,
            &home_games,
            &self.history.display_name(home_id),
            self.half_life,
        );
        let away_stats = compute_team_stats(
            away_id,
            &away_games,
            &self.history.display_name(away_id),
            self.half_life,
        );

        let (rest_diff, home_b2b, away_b2b) =
            rest_signals(home_stats.last_game_date, away_stats.last_game_date, date);

        let home_narr = self.narratives_before(home_id, date);
        let away_narr = self.narratives_before(away_id, date);

        let (h2h_margin_avg, h2h_win_pct, h2h_games_played) = head_to_head(&home_games, away_id);

        Some(FeatureVector {
            home_weighted_margin: home_stats.weighted_home_margin,
            away_weighted_margin: away_stats.weighted_away_margin,
            home_weighted_win_pct: home_stats.weighted_win_pct,
            away_weighted_win_pct: away_stats.weighted_win_pct,
            home_recent_10_win_pct: home_stats.recent_10_win_pct,
            away_recent_10_win_pct: away_stats.recent_10_win_pct,
            home_weighted_points_for: home_stats.weighted_points_for,
            away_weighted_points_for: away_stats.weighted_points_for,
            home_weighted_points_against: home_stats.weighted_points_against,
            away_weighted_points_against: away_stats.weighted_points_against,
            home_weighted_point_diff: home_stats.weighted_points_for
                - home_stats.weighted_points_against,
            away_weighted_point_diff: away_stats.weighted_points_for
                - away_stats.weighted_points_against,
            home_recent_margin_3: recent_avg_margin(&home_games, 3),
            home_recent_margin_5: recent_avg_margin(&home_games, 5),
            home_recent_margin_10: recent_avg_margin(&home_games, 10),
            away_recent_margin_3: recent_avg_margin(&away_games, 3),
            away_recent_margin_5: recent_avg_margin(&away_games, 5),
            away_recent_margin_10: recent_avg_margin(&away_games, 10),
            home_recent_win_pct_3: recent_win_pct(&home_games, 3),
            home_recent_win_pct_5: recent_win_pct(&home_games, 5),
            away_recent_win_pct_3: recent_win_pct(&away_games, 3),
            away_recent_win_pct_5: recent_win_pct(&away_games, 5),
            home_recent_points_for_5: recent_avg_points_for(&home_games, 5),
            home_recent_points_against_5: recent_avg_points_against(&home_games, 5),
            away_recent_points_for_5: recent_avg_points_for(&away_games, 5),
            away_recent_points_against_5: recent_avg_points_against(&away_games, 5),
            home_blown_rate_10: blown_rate(&home_narr, 10),
            away_blown_rate_10: blown_rate(&away_narr, 10),
            home_clutch_margin_10: avg_clutch_margin(&home_narr, 10),
            away_clutch_margin_10: avg_clutch_margin(&away_narr, 10),
            home_max_lead_10: avg_max_lead(&home_narr, 10),
            away_max_lead_10: avg_max_lead(&away_narr, 10),
            home_h2h_margin_avg: h2h_margin_avg,
            home_h2h_win_pct: h2h_win_pct,
            h2h_games_played: h2h_games_played as f64,
            rest_diff,
            home_b2b,
            away_b2b,
            home_games_played: home_games.len() as f64,
            away_games_played: away_games.len() as f64,
            market_spread,
            line_move: opening_spread.map(|open| market_spread - open).unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameRecord, TeamSide};

    fn record(id: &str, date: &str, home_id: &str, away_id: &str, hp: i32, ap: i32) -> GameRecord {
        GameRecord {
            id: Some(id.to_string()),
            status: Some("closed".to_string()),
            scheduled: Some(format!("{}T00:00:00Z", date)),
            home: TeamSide {
                id: Some(home_id.to_string()),
                name: Some(home_id.to_uppercase()),
                points: Some(hp),
                ..Default::default()
            },
            away: TeamSide {
                id: Some(away_id.to_string()),
                name: Some(away_id.to_uppercase()),
                points: Some(ap),
                ..Default::default()
            },
            periods: vec![],
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_insufficient_history_yields_none() {
        let records = vec![record("g1", "2026-01-05", "bos", "mia", 100, 95)];
        let history = TeamHistory::from_records(&records);
        let narratives = NarrativeHistory::new();
        let builder = FeatureBuilder::new(&history, &narratives, 10.0);

        // nyk has never played
        assert!(builder
            .build("bos", "nyk", date("2026-01-10"), 0.0, None)
            .is_none());

        // both have history before the cutoff
        assert!(builder
            .build("bos", "mia", date("2026-01-10"), 0.0, None)
            .is_some());

        // neither has history at the season opener
        assert!(builder
            .build("bos", "mia", date("2026-01-05"), 0.0, None)
            .is_none());
    }

    #[test]
    fn test_no_lookahead() {
        let base = vec![
            record("g1", "2026-01-02", "bos", "mia", 100, 95),
            record("g2", "2026-01-04", "mia", "bos", 110, 104),
        ];
        let history = TeamHistory::from_records(&base);
        let narratives = NarrativeHistory::new();
        let builder = FeatureBuilder::new(&history, &narratives, 10.0);
        let target = date("2026-01-10");
        let before = builder.build("bos", "mia", target, 3.5, None).unwrap();

        // append games on and after the target date; features must not move
        let mut extended = base.clone();
        extended.push(record("g3", "2026-01-10", "bos", "mia", 140, 80));
        extended.push(record("g4", "2026-01-12", "mia", "bos", 130, 90));
        let history = TeamHistory::from_records(&extended);
        let builder = FeatureBuilder::new(&history, &narratives, 10.0);
        let after = builder.build("bos", "mia", target, 3.5, None).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_h2h_and_counts() {
        let records = vec![
            record("g1", "2026-01-02", "bos", "mia", 100, 90),
            record("g2", "2026-01-04", "bos", "nyk", 100, 99),
            record("g3", "2026-01-06", "mia", "bos", 95, 105),
        ];
        let history = TeamHistory::from_records(&records);
        let narratives = NarrativeHistory::new();
        let builder = FeatureBuilder::new(&history, &narratives, 10.0);

        let features = builder
            .build("bos", "mia", date("2026-01-10"), 0.0, None)
            .unwrap();
        // g1 and g3 were both meetings with mia from bos's log
        assert_eq!(features.h2h_games_played, 2.0);
        assert_eq!(features.home_h2h_margin_avg, 10.0);
        assert_eq!(features.home_h2h_win_pct, 1.0);
        assert_eq!(features.home_games_played, 3.0);
        assert_eq!(features.away_games_played, 2.0);
    }

    #[test]
    fn test_market_inputs_passthrough() {
        let records = vec![
            record("g1", "2026-01-02", "bos", "mia", 100, 95),
            record("g2", "2026-01-04", "mia", "bos", 90, 95),
        ];
        let history = TeamHistory::from_records(&records);
        let narratives = NarrativeHistory::new();
        let builder = FeatureBuilder::new(&history, &narratives, 10.0);

        let with_open = builder
            .build("bos", "mia", date("2026-01-10"), 6.5, Some(4.0))
            .unwrap();
        assert_eq!(with_open.market_spread, 6.5);
        assert!((with_open.line_move - 2.5).abs() < 1e-12);

        let without_open = builder
            .build("bos", "mia", date("2026-01-10"), 6.5, None)
            .unwrap();
        assert_eq!(without_open.line_move, 0.0);
    }
}
