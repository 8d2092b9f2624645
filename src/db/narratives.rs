use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::info;

use crate::models::{BlownLeadSide, GameNarrative};

/// SQLite cache of per-game narratives, keyed by the matchup string
pub struct NarrativeStore {
    pool: Pool<Sqlite>,
}

impl NarrativeStore {
    /// Create a new narrative store and initialize the database
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Narrative store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS narratives (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game TEXT UNIQUE NOT NULL,
                game_date TEXT NOT NULL,
                home_team TEXT NOT NULL,
                away_team TEXT NOT NULL,
                home_points INTEGER NOT NULL,
                away_points INTEGER NOT NULL,
                max_home_lead INTEGER NOT NULL,
                max_away_lead INTEGER NOT NULL,
                blown_lead_team TEXT,
                blown_lead_side TEXT,
                clutch_home_points INTEGER NOT NULL,
                clutch_away_points INTEGER NOT NULL,
                clutch_margin INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create narratives table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_narratives_date
            ON narratives (game_date)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or refresh one game's narrative
    pub async fn upsert(&self, narrative: &GameNarrative) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO narratives (
                game,
                game_date,
                home_team,
                away_team,
                home_points,
                away_points,
                max_home_lead,
                max_away_lead,
                blown_lead_team,
                blown_lead_side,
                clutch_home_points,
                clutch_away_points,
                clutch_margin
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&narrative.game)
        .bind(narrative.game_date.to_string())
        .bind(&narrative.home_team)
        .bind(&narrative.away_team)
        .bind(narrative.home_points)
        .bind(narrative.away_points)
        .bind(narrative.max_home_lead)
        .bind(narrative.max_away_lead)
        .bind(&narrative.blown_lead_team)
        .bind(narrative.blown_lead_side.map(|s| s.as_str()))
        .bind(narrative.clutch_home_points)
        .bind(narrative.clutch_away_points)
        .bind(narrative.clutch_margin)
        .execute(&self.pool)
        .await
        .context("Failed to insert narrative")?;

        Ok(result.last_insert_rowid())
    }

    /// Look up one narrative by its matchup key
    pub async fn get(&self, game_key: &str) -> Result<Option<GameNarrative>> {
        let row = sqlx::query_as::<_, NarrativeRow>(
            "SELECT * FROM narratives WHERE game = ?",
        )
        .bind(game_key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch narrative")?;

        Ok(row.map(|r| r.into()))
    }

    /// All narratives for one date
    pub async fn get_for_date(&self, date: NaiveDate) -> Result<Vec<GameNarrative>> {
        let rows = sqlx::query_as::<_, NarrativeRow>(
            "SELECT * FROM narratives WHERE game_date = ? ORDER BY game",
        )
        .bind(date.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch narratives for date")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get count of cached narratives
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM narratives")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count narratives")?;

        Ok(row.0)
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct NarrativeRow {
    #[allow(dead_code)]
    id: i64,
    game: String,
    game_date: String,
    home_team: String,
    away_team: String,
    home_points: i32,
    away_points: i32,
    max_home_lead: i32,
    max_away_lead: i32,
    blown_lead_team: Option<String>,
    blown_lead_side: Option<String>,
    clutch_home_points: i32,
    clutch_away_points: i32,
    clutch_margin: i32,
}

impl From<NarrativeRow> for GameNarrative {
    fn from(row: NarrativeRow) -> Self {
        GameNarrative {
            game: row.game,
            game_date: row.game_date.parse().unwrap_or_default(),
            home_team: row.home_team,
            away_team: row.away_team,
            home_points: row.home_points,
            away_points: row.away_points,
            max_home_lead: row.max_home_lead,
            max_away_lead: row.max_away_lead,
            blown_lead_team: row.blown_lead_team,
            blown_lead_side: row.blown_lead_side.as_deref().and_then(parse_side),
            clutch_home_points: row.clutch_home_points,
            clutch_away_points: row.clutch_away_points,
            clutch_margin: row.clutch_margin,
        }
    }
}

fn parse_side(s: &str) -> Option<BlownLeadSide> {
    match s {
        "home" => Some(BlownLeadSide::Home),
        "away" => Some(BlownLeadSide::Away),
        _ => None,
    }
}
