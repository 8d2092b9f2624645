use std::collections::HashMap;

use tracing::debug;

use crate::models::InjurySnapshot;

/// Scale from season PPG to spread points (20 PPG is worth about 3.0)
pub const POINTS_PER_PPG: f64 = 0.15;

fn rank_multiplier(rank: u32) -> f64 {
    match rank {
        1 => 1.8,
        2 => 1.5,
        3 => 1.3,
        4 => 1.15,
        5 => 1.1,
        _ => 1.0,
    }
}

fn ppg_multiplier(ppg: f64) -> f64 {
    if ppg >= 25.0 {
        1.8
    } else if ppg >= 20.0 {
        1.5
    } else if ppg >= 15.0 {
        1.3
    } else if ppg >= 10.0 {
        1.15
    } else {
        1.0
    }
}

/// Point penalty for one player ruled out.
///
/// The rank multiplier applies when the player's scoring rank on the team is
/// known; otherwise the PPG bucket multiplier stands in.
pub fn player_penalty(ppg: f64, rank: Option<u32>) -> f64 {
    let base = ppg * POINTS_PER_PPG;
    let multiplier = match rank {
        Some(rank) => rank_multiplier(rank),
        None => ppg_multiplier(ppg),
    };
    base * multiplier
}

/// Per-team penalties from an injury snapshot.
///
/// Only players with status "out" and a known PPG contribute; teams whose
/// penalty works out to zero are left out of the map.
pub fn team_penalties(snapshot: &InjurySnapshot) -> HashMap<String, f64> {
    let mut penalties = HashMap::new();

    for (team, entries) in &snapshot.teams {
        let mut penalty = 0.0;
        for entry in entries {
            if !entry.is_out() {
                continue;
            }
            let ppg = match entry.ppg {
                Some(ppg) => ppg,
                None => {
                    debug!("No PPG for out player {} ({})", entry.player, team);
                    continue;
                }
            };
            penalty += player_penalty(ppg, entry.ppg_rank);
        }
        if penalty > 0.0 {
            penalties.insert(team.clone(), penalty);
        }
    }

    penalties
}

/// Injury-adjust a predicted away-team margin.
///
/// An absent away player reduces the away margin; an absent home player
/// raises it.
pub fn apply_adjustment(
    pred_away_margin: f64,
    away_team: &str,
    home_team: &str,
    penalties: &HashMap<String, f64>,
) -> f64 {
    let away_penalty = penalties.get(away_team).copied().unwrap_or(0.0);
    let home_penalty = penalties.get(home_team).copied().unwrap_or(0.0);
    pred_away_margin - away_penalty + home_penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InjuryEntry;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn entry(player: &str, status: &str, ppg: Option<f64>, rank: Option<u32>) -> InjuryEntry {
        InjuryEntry {
            player: player.to_string(),
            status: status.to_string(),
            ppg,
            ppg_rank: rank,
        }
    }

    fn snapshot(teams: Vec<(&str, Vec<InjuryEntry>)>) -> InjurySnapshot {
        InjurySnapshot {
            date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            fetched_at: Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap(),
            teams: teams
                .into_iter()
                .map(|(name, list)| (name.to_string(), list))
                .collect(),
        }
    }

    #[test]
    fn test_rank_multiplier_beats_bucket() {
        // 20 PPG scorer: rank 1 -> 3.0 * 1.8, unranked falls to the >=20 bucket
        assert!((player_penalty(20.0, Some(1)) - 5.4).abs() < 1e-12);
        assert!((player_penalty(20.0, None) - 4.5).abs() < 1e-12);
        // deep-rotation rank outside the table gets no boost
        assert!((player_penalty(20.0, Some(8)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bucket_multipliers() {
        assert!((player_penalty(26.0, None) - 26.0 * 0.15 * 1.8).abs() < 1e-12);
        assert!((player_penalty(16.0, None) - 16.0 * 0.15 * 1.3).abs() < 1e-12);
        assert!((player_penalty(5.0, None) - 5.0 * 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_only_out_players_count() {
        let snapshot = snapshot(vec![(
            "Boston Celtics",
            vec![
                entry("A", "Out", Some(25.0), Some(1)),
                entry("B", "Questionable", Some(20.0), Some(2)),
                entry("C", "out", None, Some(3)), // no PPG, skipped
            ],
        )]);

        let penalties = team_penalties(&snapshot);
        let expected = 25.0 * 0.15 * 1.8;
        assert!((penalties["Boston Celtics"] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_healthy_team_absent_from_map() {
        let snapshot = snapshot(vec![(
            "Miami Heat",
            vec![entry("A", "Day-To-Day", Some(18.0), Some(1))],
        )]);
        assert!(team_penalties(&snapshot).is_empty());
    }

    #[test]
    fn test_apply_adjustment_signs() {
        let mut penalties = HashMap::new();
        penalties.insert("Miami Heat".to_string(), 3.0);
        penalties.insert("Boston Celtics".to_string(), 1.0);

        // away Miami misses 3 points of talent, home Boston misses 1
        let adjusted = apply_adjustment(2.0, "Miami Heat", "Boston Celtics", &penalties);
        assert!((adjusted - 0.0).abs() < 1e-12);

        // no report for either team leaves the margin alone
        let untouched = apply_adjustment(2.0, "X", "Y", &penalties);
        assert_eq!(untouched, 2.0);
    }
}
