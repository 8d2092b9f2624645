use serde::{Deserialize, Serialize};

/// Model input for one matchup at one date.
///
/// The field set, names and order are a contract with the external predictor:
/// `FIELD_NAMES` and `values()` walk the fields in the same fixed order, and
/// neither varies by input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub home_weighted_margin: f64,
    pub away_weighted_margin: f64,
    pub home_weighted_win_pct: f64,
    pub away_weighted_win_pct: f64,
    pub home_recent_10_win_pct: f64,
    pub away_recent_10_win_pct: f64,
    pub home_weighted_points_for: f64,
    pub away_weighted_points_for: f64,
    pub home_weighted_points_against: f64,
    pub away_weighted_points_against: f64,
    pub home_weighted_point_diff: f64,
    pub away_weighted_point_diff: f64,
    pub home_recent_margin_3: f64,
    pub home_recent_margin_5: f64,
    pub home_recent_margin_10: f64,
    pub away_recent_margin_3: f64,
    pub away_recent_margin_5: f64,
    pub away_recent_margin_10: f64,
    pub home_recent_win_pct_3: f64,
    pub home_recent_win_pct_5: f64,
    pub away_recent_win_pct_3: f64,
    pub away_recent_win_pct_5: f64,
    pub home_recent_points_for_5: f64,
    pub home_recent_points_against_5: f64,
    pub away_recent_points_for_5: f64,
    pub away_recent_points_against_5: f64,
    pub home_blown_rate_10: f64,
    pub away_blown_rate_10: f64,
    pub home_clutch_margin_10: f64,
    pub away_clutch_margin_10: f64,
    pub home_max_lead_10: f64,
    pub away_max_lead_10: f64,
    pub home_h2h_margin_avg: f64,
    pub home_h2h_win_pct: f64,
    pub h2h_games_played: f64,
    pub rest_diff: f64,
    pub home_b2b: f64,
    pub away_b2b: f64,
    pub home_games_played: f64,
    pub away_games_played: f64,
    pub market_spread: f64,
    pub line_move: f64,
}

impl FeatureVector {
    /// Column names in serialization order
    pub const FIELD_NAMES: [&'static str; 42] = [
        "home_weighted_margin",
        "away_weighted_margin",
        "home_weighted_win_pct",
        "away_weighted_win_pct",
        "home_recent_10_win_pct",
        "away_recent_10_win_pct",
        "home_weighted_points_for",
        "away_weighted_points_for",
        "home_weighted_points_against",
        "away_weighted_points_against",
        "home_weighted_point_diff",
        "away_weighted_point_diff",
        "home_recent_margin_3",
        "home_recent_margin_5",
        "home_recent_margin_10",
        "away_recent_margin_3",
        "away_recent_margin_5",
        "away_recent_margin_10",
        "home_recent_win_pct_3",
        "home_recent_win_pct_5",
        "away_recent_win_pct_3",
        "away_recent_win_pct_5",
        "home_recent_points_for_5",
        "home_recent_points_against_5",
        "away_recent_points_for_5",
        "away_recent_points_against_5",
        "home_blown_rate_10",
        "away_blown_rate_10",
        "home_clutch_margin_10",
        "away_clutch_margin_10",
        "home_max_lead_10",
        "away_max_lead_10",
        "home_h2h_margin_avg",
        "home_h2h_win_pct",
        "h2h_games_played",
        "rest_diff",
        "home_b2b",
        "away_b2b",
        "home_games_played",
        "away_games_played",
        "market_spread",
        "line_move",
    ];

    /// Field values in the same order as `FIELD_NAMES`
    pub fn values(&self) -> [f64; 42] {
        [
            self.home_weighted_margin,
            self.away_weighted_margin,
            self.home_weighted_win_pct,
            self.away_weighted_win_pct,
            self.home_recent_10_win_pct,
            self.away_recent_10_win_pct,
            self.home_weighted_points_for,
            self.away_weighted_points_for,
            self.home_weighted_points_against,
            self.away_weighted_points_against,
            self.home_weighted_point_diff,
            self.away_weighted_point_diff,
            self.home_recent_margin_3,
            self.home_recent_margin_5,
            self.home_recent_margin_10,
            self.away_recent_margin_3,
            self.away_recent_margin_5,
            self.away_recent_margin_10,
            self.home_recent_win_pct_3,
            self.home_recent_win_pct_5,
            self.away_recent_win_pct_3,
            self.away_recent_win_pct_5,
            self.home_recent_points_for_5,
            self.home_recent_points_against_5,
            self.away_recent_points_for_5,
            self.away_recent_points_against_5,
            self.home_blown_rate_10,
            self.away_blown_rate_10,
            self.home_clutch_margin_10,
            self.away_clutch_margin_10,
            self.home_max_lead_10,
            self.away_max_lead_10,
            self.home_h2h_margin_avg,
            self.home_h2h_win_pct,
            self.h2h_games_played,
            self.rest_diff,
            self.home_b2b,
            self.away_b2b,
            self.home_games_played,
            self.away_games_played,
            self.market_spread,
            self.line_move,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_json_keys() {
        let vector = FeatureVector {
            home_weighted_margin: 1.0,
            away_weighted_margin: 2.0,
            home_weighted_win_pct: 0.0,
            away_weighted_win_pct: 0.0,
            home_recent_10_win_pct: 0.0,
            away_recent_10_win_pct: 0.0,
            home_weighted_points_for: 0.0,
            away_weighted_points_for: 0.0,
            home_weighted_points_against: 0.0,
            away_weighted_points_against: 0.0,
            home_weighted_point_diff: 0.0,
            away_weighted_point_diff: 0.0,
            home_recent_margin_3: 0.0,
            home_recent_margin_5: 0.0,
            home_recent_margin_10: 0.0,
            away_recent_margin_3: 0.0,
            away_recent_margin_5: 0.0,
            away_recent_margin_10: 0.0,
            home_recent_win_pct_3: 0.0,
            home_recent_win_pct_5: 0.0,
            away_recent_win_pct_3: 0.0,
            away_recent_win_pct_5: 0.0,
            home_recent_points_for_5: 0.0,
            home_recent_points_against_5: 0.0,
            away_recent_points_for_5: 0.0,
            away_recent_points_against_5: 0.0,
            home_blown_rate_10: 0.0,
            away_blown_rate_10: 0.0,
            home_clutch_margin_10: 0.0,
            away_clutch_margin_10: 0.0,
            home_max_lead_10: 0.0,
            away_max_lead_10: 0.0,
            home_h2h_margin_avg: 0.0,
            home_h2h_win_pct: 0.0,
            h2h_games_played: 0.0,
            rest_diff: 0.0,
            home_b2b: 0.0,
            away_b2b: 0.0,
            home_games_played: 0.0,
            away_games_played: 0.0,
            market_spread: 0.0,
            line_move: 0.0,
        };

        let json = serde_json::to_value(&vector).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), FeatureVector::FIELD_NAMES.len());
        for name in FeatureVector::FIELD_NAMES {
            assert!(object.contains_key(name), "missing field {}", name);
        }
        assert_eq!(vector.values().len(), FeatureVector::FIELD_NAMES.len());
        assert_eq!(vector.values()[0], 1.0);
        assert_eq!(vector.values()[1], 2.0);
    }
}
