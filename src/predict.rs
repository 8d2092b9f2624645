use chrono::NaiveDate;

use crate::stats::TeamStats;

/// Tunable weights for the baseline matchup model
#[derive(Debug, Clone)]
pub struct PredictParams {
    /// Home court advantage in points
    pub home_advantage: f64,

    /// Points per rest-day advantage (rest difference capped at +/-3)
    pub rest_weight: f64,

    /// Points swung by a back-to-back on either side
    pub b2b_weight: f64,

    /// Scale for converting an expected margin to a win probability
    pub margin_scale: f64,
}

impl Default for PredictParams {
    fn default() -> Self {
        Self {
            home_advantage: 2.5,
            rest_weight: 0.5,
            b2b_weight: 1.0,
            margin_scale: 8.5,
        }
    }
}

fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Baseline expected home margin from the two decayed snapshots.
///
/// Split margins plus home advantage, adjusted for rest (capped) and
/// back-to-backs. This is the reference predictor the pipeline falls back to
/// when no external model predictions exist for a date.
pub fn predict_home_margin(
    home: &TeamStats,
    away: &TeamStats,
    game_date: NaiveDate,
    params: &PredictParams,
) -> f64 {
    let base = (home.weighted_home_margin - away.weighted_away_margin) + params.home_advantage;

    let mut adjustment = 0.0;
    if let (Some(home_last), Some(away_last)) = (home.last_game_date, away.last_game_date) {
        let home_rest = (game_date - home_last).num_days();
        let away_rest = (game_date - away_last).num_days();

        adjustment += params.rest_weight * clamp((home_rest - away_rest) as f64, -3.0, 3.0);

        let home_b2b = if home_rest == 0 { 1.0 } else { 0.0 };
        let away_b2b = if away_rest == 0 { 1.0 } else { 0.0 };
        adjustment += params.b2b_weight * (away_b2b - home_b2b);
    }

    base + adjustment
}

/// Home win probability implied by an expected margin
pub fn win_probability(expected_margin: f64, margin_scale: f64) -> f64 {
    sigmoid(expected_margin / margin_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(home_margin: f64, away_margin: f64, last: Option<&str>) -> TeamStats {
        let mut s = TeamStats::default_snapshot("t", "Team");
        s.weighted_home_margin = home_margin;
        s.weighted_away_margin = away_margin;
        s.last_game_date = last.map(|d| d.parse().unwrap());
        s
    }

    #[test]
    fn test_base_margin_uses_splits() {
        let home = stats(4.0, 1.0, None);
        let away = stats(2.0, -1.5, None);
        let params = PredictParams::default();

        // 4.0 - (-1.5) + 2.5, no rest data so no adjustment
        let margin = predict_home_margin(&home, &away, "2026-01-10".parse().unwrap(), &params);
        assert!((margin - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_rest_advantage_is_capped() {
        let home = stats(0.0, 0.0, Some("2026-01-02"));
        let away = stats(0.0, 0.0, Some("2026-01-09"));
        let params = PredictParams {
            home_advantage: 0.0,
            ..Default::default()
        };

        // home rested 8 days vs 1, capped at +3 days of advantage
        let margin = predict_home_margin(&home, &away, "2026-01-10".parse().unwrap(), &params);
        assert!((margin - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_back_to_back_penalty() {
        let home = stats(0.0, 0.0, Some("2026-01-10"));
        let away = stats(0.0, 0.0, Some("2026-01-08"));
        let params = PredictParams {
            home_advantage: 0.0,
            ..Default::default()
        };

        // home on a back-to-back: -1.0 b2b swing + 0.5 * (-2) rest
        let margin = predict_home_margin(&home, &away, "2026-01-10".parse().unwrap(), &params);
        assert!((margin - -2.0).abs() < 1e-12);
    }

    #[test]
    fn test_win_probability_symmetry() {
        assert!((win_probability(0.0, 8.5) - 0.5).abs() < 1e-12);
        let up = win_probability(5.0, 8.5);
        let down = win_probability(-5.0, 8.5);
        assert!((up + down - 1.0).abs() < 1e-12);
        assert!(up > 0.5);
    }
}
