use crate::models::{AtsMetrics, AtsOutcome, AtsSummary, EdgePick, ThresholdResult};

/// Minimum |edge| in points for a game to count as an edge opportunity
pub const EDGE_THRESHOLD: f64 = 3.0;

/// Thresholds swept by the evaluation binaries
pub const SWEEP_THRESHOLDS: [f64; 10] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];

/// Grade one game against the spread.
///
/// All three inputs are in away-team terms: `away_margin` the actual margin,
/// `pred_away_margin` the (injury-adjusted) prediction, `line` the away
/// team's point spread. Exactly one of WIN/LOSS/PUSH comes back for every
/// input triple.
pub fn compute_ats_metrics(away_margin: f64, pred_away_margin: f64, line: f64) -> AtsMetrics {
    let actual_diff = away_margin + line;
    let pred_diff = pred_away_margin + line;

    let result = if actual_diff == 0.0 {
        AtsOutcome::Push
    } else if (actual_diff > 0.0) == (pred_diff > 0.0) {
        AtsOutcome::Win
    } else {
        AtsOutcome::Loss
    };

    let edge = pred_diff;
    let edge_pick = if edge > 0.0 {
        EdgePick::Away
    } else if edge < 0.0 {
        EdgePick::Home
    } else {
        EdgePick::Push
    };
    let edge_hit = if actual_diff != 0.0 && edge_pick != EdgePick::Push {
        Some((edge > 0.0) == (actual_diff > 0.0))
    } else {
        None
    };

    AtsMetrics {
        away_margin,
        pred_away_margin,
        line,
        actual_diff,
        pred_diff,
        result,
        edge,
        edge_opportunity: edge.abs() >= EDGE_THRESHOLD,
        edge_pick,
        edge_hit,
        model_error: (pred_away_margin - away_margin).abs(),
        market_error: (line - away_margin).abs(),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Aggregate a run of graded games.
///
/// Rates come back as `None` when their denominator is empty, never 0.0.
pub fn summarize(rows: &[AtsMetrics]) -> AtsSummary {
    let mut wins = 0;
    let mut losses = 0;
    let mut pushes = 0;
    let mut edge_opportunities = 0;
    let mut edge_bets = 0;
    let mut edge_wins = 0;
    let mut model_errors = Vec::with_capacity(rows.len());
    let mut market_errors = Vec::with_capacity(rows.len());

    for row in rows {
        match row.result {
            AtsOutcome::Win => wins += 1,
            AtsOutcome::Loss => losses += 1,
            AtsOutcome::Push => pushes += 1,
        }

        model_errors.push(row.model_error);
        market_errors.push(row.market_error);

        if row.edge_opportunity {
            edge_opportunities += 1;
            if row.result != AtsOutcome::Push {
                edge_bets += 1;
                if row.edge_hit == Some(true) {
                    edge_wins += 1;
                }
            }
        }
    }

    let graded_games = wins + losses;
    AtsSummary {
        total_games: graded_games + pushes,
        graded_games,
        wins,
        losses,
        pushes,
        ats_accuracy: if graded_games > 0 {
            Some(wins as f64 / graded_games as f64)
        } else {
            None
        },
        edge_opportunities,
        edge_bets,
        edge_wins,
        edge_hit_rate: if edge_bets > 0 {
            Some(edge_wins as f64 / edge_bets as f64)
        } else {
            None
        },
        model_mae: mean(&model_errors),
        market_mae: mean(&market_errors),
    }
}

/// Sweep bet-selection thresholds over a set of graded games.
///
/// At threshold `t` a game is selected when `pred_diff >= t` (bet away) or
/// `pred_diff <= -t` (bet home); pushes are dropped from the selection, and
/// accuracy is undefined (`None`) when nothing survives.
pub fn evaluate_thresholds(rows: &[AtsMetrics], thresholds: &[f64]) -> Vec<ThresholdResult> {
    thresholds
        .iter()
        .map(|&threshold| {
            let selected: Vec<&AtsMetrics> = rows
                .iter()
                .filter(|r| r.pred_diff >= threshold || r.pred_diff <= -threshold)
                .filter(|r| r.actual_diff != 0.0)
                .collect();

            let bets = selected.len();
            let accuracy = if bets > 0 {
                let hits = selected
                    .iter()
                    .filter(|r| (r.pred_diff > 0.0) == (r.actual_diff > 0.0))
                    .count();
                Some(hits as f64 / bets as f64)
            } else {
                None
            };

            ThresholdResult {
                threshold,
                bets,
                accuracy,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_scenario() {
        // home won by 5, model liked the away side against a 3.5 line
        let metrics = compute_ats_metrics(-5.0, 2.0, 3.5);
        assert!((metrics.actual_diff - -1.5).abs() < 1e-12);
        assert!((metrics.pred_diff - 5.5).abs() < 1e-12);
        assert_eq!(metrics.result, AtsOutcome::Loss);
        assert_eq!(metrics.edge_pick, EdgePick::Away);
        assert!(metrics.edge_opportunity);
        assert_eq!(metrics.edge_hit, Some(false));
        assert!((metrics.model_error - 7.0).abs() < 1e-12);
        assert!((metrics.market_error - 8.5).abs() < 1e-12);
    }

    #[test]
    fn test_push_iff_line_hits_exactly() {
        assert_eq!(compute_ats_metrics(-3.0, 5.0, 3.0).result, AtsOutcome::Push);
        assert_eq!(compute_ats_metrics(-3.5, 5.0, 3.0).result, AtsOutcome::Loss);
        assert_eq!(compute_ats_metrics(4.0, 5.0, 3.0).result, AtsOutcome::Win);
    }

    #[test]
    fn test_classification_is_total() {
        let cases = [
            (-5.0, 2.0, 3.5),
            (0.0, 0.0, 0.0),
            (7.0, -1.0, -7.0),
            (12.0, 12.0, -3.0),
            (-1.0, -1.0, 1.0),
        ];
        for (a, p, l) in cases {
            let metrics = compute_ats_metrics(a, p, l);
            // exactly one outcome, and PUSH exactly when the line hits
            assert_eq!(metrics.result == AtsOutcome::Push, a + l == 0.0);
        }
    }

    #[test]
    fn test_edge_hit_undefined_on_push_or_zero_edge() {
        let push = compute_ats_metrics(-3.0, 5.0, 3.0);
        assert_eq!(push.edge_hit, None);

        let zero_edge = compute_ats_metrics(4.0, -3.0, 3.0);
        assert_eq!(zero_edge.edge_pick, EdgePick::Push);
        assert_eq!(zero_edge.edge_hit, None);
    }

    #[test]
    fn test_summary_counts_add_up() {
        let rows = vec![
            compute_ats_metrics(5.0, 6.0, 1.0),   // win, edge 7
            compute_ats_metrics(-5.0, 2.0, 3.5),  // loss, edge 5.5
            compute_ats_metrics(-3.0, 5.0, 3.0),  // push
            compute_ats_metrics(2.0, 1.0, -0.5),  // win, edge 0.5, no opportunity
        ];
        let summary = summarize(&rows);

        assert_eq!(summary.wins + summary.losses + summary.pushes, summary.total_games);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.pushes, 1);
        assert_eq!(summary.graded_games, 3);
        assert!((summary.ats_accuracy.unwrap() - 2.0 / 3.0).abs() < 1e-12);

        // push with a big edge counts as an opportunity but not a bet
        assert_eq!(summary.edge_opportunities, 3);
        assert_eq!(summary.edge_bets, 2);
        assert_eq!(summary.edge_wins, 1);
        assert!((summary.edge_hit_rate.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary_has_no_rates() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.ats_accuracy, None);
        assert_eq!(summary.edge_hit_rate, None);
        assert_eq!(summary.model_mae, None);
        assert_eq!(summary.market_mae, None);
    }

    #[test]
    fn test_threshold_sweep_counts_non_increasing() {
        let rows = vec![
            compute_ats_metrics(5.0, 6.0, 1.0),
            compute_ats_metrics(-5.0, 2.0, 3.5),
            compute_ats_metrics(2.0, 1.0, -1.5),
            compute_ats_metrics(-8.0, -9.0, 2.0),
            compute_ats_metrics(-3.0, 5.0, 3.0), // push, always dropped
        ];
        let results = evaluate_thresholds(&rows, &SWEEP_THRESHOLDS);

        assert_eq!(results.len(), SWEEP_THRESHOLDS.len());
        for pair in results.windows(2) {
            assert!(pair[1].bets <= pair[0].bets);
        }
        // threshold 0 selects every non-push game
        assert_eq!(results[0].bets, 4);
    }

    #[test]
    fn test_threshold_sweep_empty_selection_undefined() {
        let rows = vec![compute_ats_metrics(2.0, 1.0, -1.5)]; // pred_diff -0.5
        let results = evaluate_thresholds(&rows, &[6.0]);
        assert_eq!(results[0].bets, 0);
        assert_eq!(results[0].accuracy, None);
    }
}
