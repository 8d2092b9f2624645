use std::collections::HashMap;
use std::env;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hoop_edge::config::Config;
use hoop_edge::db::{NarrativeStore, ResultsStore};
use hoop_edge::evaluation::{
    compute_ats_metrics, evaluate_thresholds, summarize, SWEEP_THRESHOLDS,
};
use hoop_edge::history::TeamHistory;
use hoop_edge::ingest;
use hoop_edge::injury;
use hoop_edge::matching::{spread_key, GameResultIndex};
use hoop_edge::models::{AtsMetrics, AtsSummary, GameRecord, PredictionRecord};
use hoop_edge::narrative::extract_narrative;
use hoop_edge::predict::{predict_home_margin, PredictParams};
use hoop_edge::stats::compute_team_stats;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoop_edge=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments
    let args: Vec<String> = env::args().collect();
    let target_date = parse_date(&args).unwrap_or_else(|| Utc::now().date_naive());

    info!("Grading ATS predictions for {}", target_date);

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Load the day's game records
    let day_games = ingest::load_games_for_date(&config.data_dir, target_date)?;
    if day_games.is_empty() {
        warn!("No game records for {}, nothing to grade", target_date);
        return Ok(());
    }
    info!("Loaded {} game records for {}", day_games.len(), target_date);

    // Extract and cache narratives for the day's games
    let narrative_store = NarrativeStore::new(&config.database_url).await?;
    let mut narrated = 0;
    for game in &day_games {
        if let Some(narrative) = extract_narrative(game) {
            narrative_store.upsert(&narrative).await?;
            narrated += 1;
        }
    }
    info!("Cached {} narratives", narrated);

    // Index the day's final scores
    let index = GameResultIndex::from_records(&day_games);
    info!("Indexed {} final scores", index.len());

    // Predictions: external predictor output, or the baseline model
    let predictions_path = config
        .tracking_dir
        .join(format!("{}_predictions.json", target_date));
    let predictions = match ingest::load_predictions(&predictions_path)? {
        Some(file) => {
            info!(
                "Loaded {} predictions from {}",
                file.games.len(),
                predictions_path.display()
            );
            file.games
        }
        None => {
            info!("No predictions file, grading the baseline model instead");
            baseline_predictions(&config, target_date, &day_games)?
        }
    };
    if predictions.is_empty() {
        warn!("No predictions to grade for {}", target_date);
        return Ok(());
    }

    // Injury snapshot, when one was assembled for the date
    let injuries_path = config
        .tracking_dir
        .join(format!("{}_injuries.json", target_date));
    let penalties = match ingest::load_injury_snapshot(&injuries_path)? {
        Some(snapshot) => {
            info!(
                "Injury snapshot fetched at {} covers {} teams",
                snapshot.fetched_at,
                snapshot.teams.len()
            );
            injury::team_penalties(&snapshot)
        }
        None => {
            info!("No injury snapshot for {}", target_date);
            HashMap::new()
        }
    };

    // Grade each prediction against its final score
    let mut graded: Vec<(String, AtsMetrics)> = Vec::new();
    for prediction in &predictions {
        let score = match index.resolve(prediction) {
            Some(score) => score,
            None => {
                warn!("No final score found for {:?}", prediction.game);
                continue;
            }
        };

        if prediction.market_spread == 0.0 {
            debug!(
                "Skipping {} @ {}: no market line",
                score.away_team, score.home_team
            );
            continue;
        }

        let adjusted = injury::apply_adjustment(
            prediction.pred_away_margin,
            &score.away_team,
            &score.home_team,
            &penalties,
        );
        let metrics = compute_ats_metrics(score.away_margin(), adjusted, prediction.market_spread);

        let game_key = format!("{} @ {}", score.away_team, score.home_team);
        info!(
            "{} | {} | line {:+.1} | pred {:+.1} | actual {:+.1}",
            game_key,
            metrics.result.as_str(),
            metrics.line,
            metrics.pred_away_margin,
            metrics.away_margin,
        );
        graded.push((game_key, metrics));
    }

    let rows: Vec<AtsMetrics> = graded.iter().map(|(_, m)| m.clone()).collect();
    let summary = summarize(&rows);
    log_summary(&summary);

    info!("Edge threshold sweep:");
    for result in evaluate_thresholds(&rows, &SWEEP_THRESHOLDS) {
        match result.accuracy {
            Some(accuracy) => info!(
                "  >= {:>4.1} pts | {:>3} bets | {:>5.1}%",
                result.threshold,
                result.bets,
                accuracy * 100.0
            ),
            None => info!(
                "  >= {:>4.1} pts | {:>3} bets | n/a",
                result.threshold, result.bets
            ),
        }
    }

    // Persist the run
    let results_store = ResultsStore::new(&config.database_url).await?;
    results_store.save_run(target_date, &summary, &graded).await?;
    info!("Stored graded run for {}", target_date);

    Ok(())
}

/// Parse --date argument
fn parse_date(args: &[String]) -> Option<NaiveDate> {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--date" || arg == "-d" {
            if let Some(value) = args.get(i + 1) {
                if let Ok(date) = value.parse() {
                    return Some(date);
                }
            }
        }
    }
    None
}

/// Build baseline predictions for the day's completed games.
///
/// Uses only history strictly before the target date; games where either
/// side has no prior games are skipped, mirroring the feature builder's
/// leakage guard.
fn baseline_predictions(
    config: &Config,
    target_date: NaiveDate,
    day_games: &[GameRecord],
) -> Result<Vec<PredictionRecord>> {
    let all_games = ingest::load_all_games(&config.data_dir)?;
    let history = TeamHistory::from_records(&all_games);
    let spreads = ingest::load_spread_snapshot(&config.tracking_dir.join("spreads.json"))?;
    let params = PredictParams {
        home_advantage: config.home_advantage,
        ..Default::default()
    };

    let mut predictions = Vec::new();
    for record in day_games {
        if !record.is_completed() {
            continue;
        }
        let home_id = record.home.team_id();
        let away_id = record.away.team_id();

        let home_games = history.games_before(&home_id, target_date);
        let away_games = history.games_before(&away_id, target_date);
        if home_games.is_empty() || away_games.is_empty() {
            debug!(
                "Skipping baseline for {}: insufficient history",
                record.matchup_key()
            );
            continue;
        }

        let home_stats = compute_team_stats(
            &home_id,
            &home_games,
            &history.display_name(&home_id),
            config.half_life_games,
        );
        let away_stats = compute_team_stats(
            &away_id,
            &away_games,
            &history.display_name(&away_id),
            config.half_life_games,
        );

        let expected_home_margin =
            predict_home_margin(&home_stats, &away_stats, target_date, &params);

        let home_team = record.home.display_name();
        let away_team = record.away.display_name();
        let market_spread = spreads
            .as_ref()
            .and_then(|s| s.closing_for(&spread_key(target_date, &away_team, &home_team)))
            .unwrap_or(0.0);

        predictions.push(PredictionRecord {
            game: Some(record.matchup_key()),
            home_id: Some(home_id),
            away_id: Some(away_id),
            home_team: Some(home_team),
            away_team: Some(away_team),
            market_spread,
            pred_away_margin: -expected_home_margin,
        });
    }

    info!("Built {} baseline predictions", predictions.len());
    Ok(predictions)
}

fn log_summary(summary: &AtsSummary) {
    info!(
        "ATS summary: {}-{}-{} ({} graded)",
        summary.wins, summary.losses, summary.pushes, summary.graded_games
    );
    info!("  accuracy: {}", fmt_rate(summary.ats_accuracy));
    info!(
        "  edge: {} opportunities, {} bets, {} wins, hit rate {}",
        summary.edge_opportunities,
        summary.edge_bets,
        summary.edge_wins,
        fmt_rate(summary.edge_hit_rate)
    );
    info!(
        "  model MAE: {} | market MAE: {}",
        fmt_points(summary.model_mae),
        fmt_points(summary.market_mae)
    );
}

fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate * 100.0),
        None => "n/a".to_string(),
    }
}

fn fmt_points(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.2}", value),
        None => "n/a".to_string(),
    }
}
