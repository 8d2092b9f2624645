use chrono::NaiveDate;

use crate::models::GameResult;

/// A team's form as of a cutoff date, recomputed on demand from its game log.
#[derive(Debug, Clone)]
pub struct TeamStats {
    pub team_id: String,
    pub name: String,
    pub weighted_win_pct: f64,
    pub weighted_margin: f64,
    pub weighted_home_margin: f64,
    pub weighted_away_margin: f64,
    pub weighted_points_for: f64,
    pub weighted_points_against: f64,
    pub recent_10_win_pct: f64,
    pub games_played: usize,
    pub last_game_date: Option<NaiveDate>,
}

impl TeamStats {
    /// Snapshot used when a team has no qualifying games or the decayed sums
    /// degenerate to zero weight. Callers may substitute it, but feature
    /// assembly treats empty history as a hard skip instead.
    pub fn default_snapshot(team_id: &str, name: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            name: name.to_string(),
            weighted_win_pct: 0.5,
            weighted_margin: 0.0,
            weighted_home_margin: 0.0,
            weighted_away_margin: 0.0,
            weighted_points_for: 0.0,
            weighted_points_against: 0.0,
            recent_10_win_pct: 0.5,
            games_played: 0,
            last_game_date: None,
        }
    }
}

/// Weight of the game `games_ago` games before the most recent one.
///
/// weight(0) = 1.0 and the weight halves every `half_life` games.
pub fn decay_weight(games_ago: usize, half_life: f64) -> f64 {
    0.5_f64.powf(games_ago as f64 / half_life)
}

/// Weight-normalized (win_pct, margin, points_for, points_against) over the
/// entire sequence. Returns `None` when the sequence is empty or the total
/// weight degenerates to zero.
fn weighted_stats(games: &[GameResult], half_life: f64) -> Option<(f64, f64, f64, f64)> {
    if games.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut weighted_wins = 0.0;
    let mut weighted_margin = 0.0;
    let mut weighted_for = 0.0;
    let mut weighted_against = 0.0;

    let most_recent = games.len() - 1;
    for (idx, game) in games.iter().enumerate() {
        let weight = decay_weight(most_recent - idx, half_life);
        total += weight;
        if game.margin() > 0 {
            weighted_wins += weight;
        }
        weighted_margin += weight * f64::from(game.margin());
        weighted_for += weight * f64::from(game.points_for);
        weighted_against += weight * f64::from(game.points_against);
    }

    if total == 0.0 {
        return None;
    }

    Some((
        weighted_wins / total,
        weighted_margin / total,
        weighted_for / total,
        weighted_against / total,
    ))
}

/// Compute the decayed snapshot for one team from its chronological log.
///
/// Home/away split margins use the same weighting restricted to the home-only
/// or away-only subsequence, falling back to the overall margin when the
/// subsequence is empty.
pub fn compute_team_stats(
    team_id: &str,
    games: &[GameResult],
    name: &str,
    half_life: f64,
) -> TeamStats {
    let (win_pct, margin, points_for, points_against) = match weighted_stats(games, half_life) {
        Some(stats) => stats,
        None => return TeamStats::default_snapshot(team_id, name),
    };

    let home_games: Vec<GameResult> = games.iter().filter(|g| g.is_home).cloned().collect();
    let away_games: Vec<GameResult> = games.iter().filter(|g| !g.is_home).cloned().collect();

    let home_margin = weighted_stats(&home_games, half_life)
        .map(|(_, m, _, _)| m)
        .unwrap_or(margin);
    let away_margin = weighted_stats(&away_games, half_life)
        .map(|(_, m, _, _)| m)
        .unwrap_or(margin);

    TeamStats {
        team_id: team_id.to_string(),
        name: name.to_string(),
        weighted_win_pct: win_pct,
        weighted_margin: margin,
        weighted_home_margin: home_margin,
        weighted_away_margin: away_margin,
        weighted_points_for: points_for,
        weighted_points_against: points_against,
        recent_10_win_pct: recent_win_pct(games, 10),
        games_played: games.len(),
        last_game_date: games.last().map(|g| g.date),
    }
}

fn last_n(games: &[GameResult], n: usize) -> &[GameResult] {
    let start = games.len().saturating_sub(n);
    &games[start..]
}

/// Simple (unweighted) mean over the last `n` games, distinct from the
/// decayed metrics.
pub fn recent_avg(games: &[GameResult], n: usize, value: impl Fn(&GameResult) -> f64) -> f64 {
    let recent = last_n(games, n);
    if recent.is_empty() {
        return 0.0;
    }
    recent.iter().map(value).sum::<f64>() / recent.len() as f64
}

pub fn recent_avg_margin(games: &[GameResult], n: usize) -> f64 {
    recent_avg(games, n, |g| f64::from(g.margin()))
}

pub fn recent_avg_points_for(games: &[GameResult], n: usize) -> f64 {
    recent_avg(games, n, |g| f64::from(g.points_for))
}

pub fn recent_avg_points_against(games: &[GameResult], n: usize) -> f64 {
    recent_avg(games, n, |g| f64::from(g.points_against))
}

/// Win rate over the last `n` games; 0.0 for an empty log
pub fn recent_win_pct(games: &[GameResult], n: usize) -> f64 {
    let recent = last_n(games, n);
    if recent.is_empty() {
        return 0.0;
    }
    let wins = recent.iter().filter(|g| g.margin() > 0).count();
    wins as f64 / recent.len() as f64
}

/// Head-to-head (avg margin, win_pct, meetings) from the home team's log
/// against one opponent. All zeros when the teams have not met.
pub fn head_to_head(home_games: &[GameResult], away_id: &str) -> (f64, f64, usize) {
    let meetings: Vec<&GameResult> = home_games
        .iter()
        .filter(|g| g.opponent_id == away_id)
        .collect();
    if meetings.is_empty() {
        return (0.0, 0.0, 0);
    }
    let count = meetings.len();
    let avg_margin = meetings.iter().map(|g| f64::from(g.margin())).sum::<f64>() / count as f64;
    let wins = meetings.iter().filter(|g| g.margin() > 0).count();
    (avg_margin, wins as f64 / count as f64, count)
}

/// Rest and back-to-back signals for a matchup date.
///
/// Returns (rest_diff, home_b2b, away_b2b); all zeros when either side has no
/// prior game to measure from.
pub fn rest_signals(
    home_last: Option<NaiveDate>,
    away_last: Option<NaiveDate>,
    date: NaiveDate,
) -> (f64, f64, f64) {
    let (home_last, away_last) = match (home_last, away_last) {
        (Some(h), Some(a)) => (h, a),
        _ => return (0.0, 0.0, 0.0),
    };

    let home_rest = (date - home_last).num_days();
    let away_rest = (date - away_last).num_days();
    let home_b2b = if home_rest == 0 { 1.0 } else { 0.0 };
    let away_b2b = if away_rest == 0 { 1.0 } else { 0.0 };

    ((home_rest - away_rest) as f64, home_b2b, away_b2b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(date: &str, is_home: bool, pf: i32, pa: i32) -> GameResult {
        GameResult {
            game_id: format!("g-{}", date),
            date: date.parse().unwrap(),
            is_home,
            points_for: pf,
            points_against: pa,
            opponent_id: "opp".to_string(),
        }
    }

    #[test]
    fn test_decay_weight_monotone() {
        assert_eq!(decay_weight(0, 10.0), 1.0);
        let mut prev = decay_weight(0, 10.0);
        for k in 1..40 {
            let w = decay_weight(k, 10.0);
            assert!(w < prev, "weight must strictly decrease at k={}", k);
            prev = w;
        }
        // half-life definition: weight halves every H games
        assert!((decay_weight(10, 10.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_stats_single_game() {
        let games = vec![game("2026-01-10", true, 110, 100)];
        let stats = compute_team_stats("t", &games, "Team", 10.0);
        assert!((stats.weighted_win_pct - 1.0).abs() < 1e-12);
        assert!((stats.weighted_margin - 10.0).abs() < 1e-12);
        assert!((stats.weighted_points_for - 110.0).abs() < 1e-12);
        assert!((stats.weighted_points_against - 100.0).abs() < 1e-12);
        assert_eq!(stats.games_played, 1);
    }

    #[test]
    fn test_weighted_margin_favors_recent() {
        // Old blowout win, recent narrow losses: decayed margin must sit
        // closer to the recent games than the simple mean does.
        let games = vec![
            game("2026-01-01", true, 130, 100),
            game("2026-01-03", true, 100, 102),
            game("2026-01-05", true, 100, 102),
        ];
        let stats = compute_team_stats("t", &games, "Team", 2.0);
        let simple_mean = (30.0 - 2.0 - 2.0) / 3.0;
        assert!(stats.weighted_margin < simple_mean);
    }

    #[test]
    fn test_empty_history_default_snapshot() {
        let stats = compute_team_stats("t", &[], "Team", 10.0);
        assert!((stats.weighted_win_pct - 0.5).abs() < 1e-12);
        assert_eq!(stats.weighted_margin, 0.0);
        assert_eq!(stats.games_played, 0);
        assert!(stats.last_game_date.is_none());
    }

    #[test]
    fn test_split_margin_falls_back_to_overall() {
        // All games on the road: home split must fall back to the overall
        // weighted margin instead of zero.
        let games = vec![
            game("2026-01-01", false, 100, 90),
            game("2026-01-03", false, 100, 95),
        ];
        let stats = compute_team_stats("t", &games, "Team", 10.0);
        assert!((stats.weighted_home_margin - stats.weighted_margin).abs() < 1e-12);
        assert!(stats.weighted_away_margin > 0.0);
    }

    #[test]
    fn test_recent_margin_is_simple_mean() {
        // Margins +5, -2, +8 in the last three games: recent_margin_3 is the
        // simple mean 3.667 regardless of the half-life.
        let games = vec![
            game("2026-01-01", true, 100, 95),
            game("2026-01-03", true, 98, 100),
            game("2026-01-05", true, 108, 100),
        ];
        let expected = (5.0 - 2.0 + 8.0) / 3.0;
        assert!((recent_avg_margin(&games, 3) - expected).abs() < 1e-9);

        // the decayed metric differs from the simple mean
        let short = compute_team_stats("t", &games, "Team", 1.0);
        assert!((short.weighted_margin - expected).abs() > 1e-9);
    }

    #[test]
    fn test_recent_n_with_short_log() {
        let games = vec![game("2026-01-01", true, 100, 95)];
        assert!((recent_avg_margin(&games, 5) - 5.0).abs() < 1e-12);
        assert!((recent_win_pct(&games, 10) - 1.0).abs() < 1e-12);
        assert_eq!(recent_win_pct(&[], 10), 0.0);
    }

    #[test]
    fn test_head_to_head() {
        let mut games = vec![
            game("2026-01-01", true, 100, 90),
            game("2026-01-05", true, 95, 100),
        ];
        games[0].opponent_id = "rival".to_string();
        games[1].opponent_id = "rival".to_string();
        games.push(game("2026-01-08", true, 120, 80));

        let (margin, win_pct, count) = head_to_head(&games, "rival");
        assert_eq!(count, 2);
        assert!((margin - 2.5).abs() < 1e-12);
        assert!((win_pct - 0.5).abs() < 1e-12);

        let (margin, win_pct, count) = head_to_head(&games, "stranger");
        assert_eq!((margin, win_pct, count), (0.0, 0.0, 0));
    }

    #[test]
    fn test_rest_signals() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let home_last = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let away_last = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();

        let (rest_diff, home_b2b, away_b2b) =
            rest_signals(Some(home_last), Some(away_last), date);
        assert_eq!(rest_diff, -3.0);
        assert_eq!(home_b2b, 1.0);
        assert_eq!(away_b2b, 0.0);

        assert_eq!(rest_signals(None, Some(away_last), date), (0.0, 0.0, 0.0));
    }
}
