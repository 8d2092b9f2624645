use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{GameRecord, InjurySnapshot, PredictionsFile, SpreadSnapshot};

/// Load every game record for one date from `<data_dir>/<date>/*.json`.
///
/// A missing day directory is an empty day, and a file that fails to parse
/// is dropped with a warning instead of failing the run.
pub fn load_games_for_date(data_dir: &Path, date: NaiveDate) -> Result<Vec<GameRecord>> {
    let day_dir = data_dir.join(date.to_string());
    if !day_dir.exists() {
        debug!("No game directory for {}", date);
        return Ok(Vec::new());
    }

    let mut games = Vec::new();
    let entries = std::fs::read_dir(&day_dir)
        .with_context(|| format!("Failed to read game directory {}", day_dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_game_file(&path) {
            Ok(game) => games.push(game),
            Err(e) => warn!("Skipping unreadable game file {}: {}", path.display(), e),
        }
    }

    Ok(games)
}

/// Load every game record under the data directory.
///
/// Day directories are visited in date order so repeated runs see the same
/// sequence; directories that are not named like a date are ignored.
pub fn load_all_games(data_dir: &Path) -> Result<Vec<GameRecord>> {
    if !data_dir.exists() {
        warn!("Data directory {} does not exist", data_dir.display());
        return Ok(Vec::new());
    }

    let mut dates: Vec<NaiveDate> = Vec::new();
    let entries = std::fs::read_dir(data_dir)
        .with_context(|| format!("Failed to read data directory {}", data_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(date) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<NaiveDate>().ok())
        {
            dates.push(date);
        }
    }
    dates.sort();

    let mut games = Vec::new();
    for date in dates {
        games.extend(load_games_for_date(data_dir, date)?);
    }
    Ok(games)
}

fn read_game_file(path: &Path) -> Result<GameRecord> {
    let content = std::fs::read_to_string(path).context("Failed to read game file")?;
    serde_json::from_str(&content).context("Failed to parse game JSON")
}

/// Load the predictions file for a date, if the predictor wrote one
pub fn load_predictions(path: &Path) -> Result<Option<PredictionsFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read predictions file {}", path.display()))?;
    let predictions =
        serde_json::from_str(&content).context("Failed to parse predictions JSON")?;
    Ok(Some(predictions))
}

/// Load the injected injury snapshot for a date, if one was assembled
pub fn load_injury_snapshot(path: &Path) -> Result<Option<InjurySnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read injury snapshot {}", path.display()))?;
    let snapshot = serde_json::from_str(&content).context("Failed to parse injury snapshot")?;
    Ok(Some(snapshot))
}

/// Load the injected spread snapshot, if one was assembled
pub fn load_spread_snapshot(path: &Path) -> Result<Option<SpreadSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read spread snapshot {}", path.display()))?;
    let snapshot = serde_json::from_str(&content).context("Failed to parse spread snapshot")?;
    Ok(Some(snapshot))
}
