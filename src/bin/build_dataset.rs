use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hoop_edge::config::Config;
use hoop_edge::features::FeatureBuilder;
use hoop_edge::history::TeamHistory;
use hoop_edge::ingest;
use hoop_edge::matching::spread_key;
use hoop_edge::narrative::build_team_narratives;

const DEFAULT_RANGE_DAYS: i64 = 60;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "build_dataset=info,hoop_edge=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments
    let args: Vec<String> = env::args().collect();
    let end_date =
        parse_date_arg(&args, "--end").unwrap_or_else(|| Utc::now().date_naive() - Duration::days(1));
    let start_date = parse_date_arg(&args, "--start")
        .unwrap_or_else(|| end_date - Duration::days(DEFAULT_RANGE_DAYS));

    info!("Building feature dataset from {} to {}", start_date, end_date);

    let config = Config::from_env()?;

    // History and narratives are built from the full archive so teams carry
    // their form into the requested range
    let all_games = ingest::load_all_games(&config.data_dir)?;
    if all_games.is_empty() {
        warn!("No game records under {}", config.data_dir.display());
        return Ok(());
    }
    info!("Loaded {} game records", all_games.len());

    let history = TeamHistory::from_records(&all_games);
    info!("Team history covers {} teams", history.team_count());

    let narratives = build_team_narratives(&all_games);
    info!("Narrative index covers {} teams", narratives.len());

    let spreads = ingest::load_spread_snapshot(&config.tracking_dir.join("spreads.json"))?;
    match &spreads {
        Some(snapshot) => info!(
            "Spread snapshot fetched at {}: {} closing, {} opening lines",
            snapshot.fetched_at,
            snapshot.closing.len(),
            snapshot.opening.len()
        ),
        None => info!("No spread snapshot, market features default to 0.0"),
    }

    let builder = FeatureBuilder::new(&history, &narratives, config.half_life_games);

    let output_path = config.tracking_dir.join("dataset.jsonl");
    std::fs::create_dir_all(&config.tracking_dir)
        .context("Failed to create tracking directory")?;
    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut rows = 0;
    let mut skipped = 0;
    for record in &all_games {
        if !record.is_completed() {
            continue;
        }
        let game_date = match record.game_date() {
            Some(date) if date >= start_date && date <= end_date => date,
            _ => continue,
        };
        let (home_points, away_points) =
            match (record.home.final_points(), record.away.final_points()) {
                (Some(h), Some(a)) => (h, a),
                _ => continue,
            };

        let home_team = record.home.display_name();
        let away_team = record.away.display_name();
        let key = spread_key(game_date, &away_team, &home_team);
        let market_spread = spreads
            .as_ref()
            .and_then(|s| s.closing_for(&key))
            .unwrap_or(0.0);
        let opening_spread = spreads.as_ref().and_then(|s| s.opening_for(&key));

        let features = match builder.build(
            &record.home.team_id(),
            &record.away.team_id(),
            game_date,
            market_spread,
            opening_spread,
        ) {
            Some(features) => features,
            None => {
                debug!("Skipping {}: insufficient history", record.matchup_key());
                skipped += 1;
                continue;
            }
        };

        let row = json!({
            "game_date": game_date,
            "home_team": home_team,
            "away_team": away_team,
            "actual_margin": home_points - away_points,
            "features": features,
        });
        serde_json::to_writer(&mut writer, &row).context("Failed to serialize dataset row")?;
        writer.write_all(b"\n").context("Failed to write dataset row")?;
        rows += 1;
    }

    writer.flush().context("Failed to flush dataset file")?;

    info!(
        "Saved dataset: {} ({} rows, {} matchups skipped for missing history)",
        output_path.display(),
        rows,
        skipped
    );

    Ok(())
}

/// Parse a `--flag YYYY-MM-DD` argument
fn parse_date_arg(args: &[String], flag: &str) -> Option<NaiveDate> {
    for (i, arg) in args.iter().enumerate() {
        if arg == flag {
            if let Some(value) = args.get(i + 1) {
                if let Ok(date) = value.parse() {
                    return Some(date);
                }
            }
        }
    }
    None
}
