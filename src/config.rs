use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of raw game records, one subdirectory per date
    pub data_dir: PathBuf,

    /// Directory of injected snapshots and predictor output
    pub tracking_dir: PathBuf,

    /// SQLite database path
    pub database_url: String,

    /// Half-life in games for recency weighting
    pub half_life_games: f64,

    /// Home court advantage in points for the baseline predictor
    pub home_advantage: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),

            tracking_dir: env::var("TRACKING_DIR")
                .unwrap_or_else(|_| "tracking".to_string())
                .into(),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/hoopedge.db".to_string()),

            half_life_games: env::var("HALF_LIFE_GAMES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("HALF_LIFE_GAMES must be a valid number")?,

            home_advantage: env::var("HOME_ADVANTAGE")
                .unwrap_or_else(|_| "2.5".to_string())
                .parse()
                .context("HOME_ADVANTAGE must be a valid number")?,
        })
    }
}
