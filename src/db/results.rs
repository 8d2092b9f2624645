use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::info;

use crate::models::{AtsMetrics, AtsOutcome, AtsSummary, EdgePick};

/// SQLite store for graded ATS runs: one summary row per date plus the
/// per-game metric rows behind it
pub struct ResultsStore {
    pool: Pool<Sqlite>,
}

impl ResultsStore {
    /// Create a new results store and initialize the database
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

        info!("Results store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ats_runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_date TEXT UNIQUE NOT NULL,
                total_games INTEGER NOT NULL,
                graded_games INTEGER NOT NULL,
                wins INTEGER NOT NULL,
                losses INTEGER NOT NULL,
                pushes INTEGER NOT NULL,
                ats_accuracy REAL,
                edge_opportunities INTEGER NOT NULL,
                edge_bets INTEGER NOT NULL,
                edge_wins INTEGER NOT NULL,
                edge_hit_rate REAL,
                model_mae REAL,
                market_mae REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create ats_runs table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ats_games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_date TEXT NOT NULL,
                game TEXT NOT NULL,
                away_margin REAL NOT NULL,
                pred_away_margin REAL NOT NULL,
                line REAL NOT NULL,
                actual_diff REAL NOT NULL,
                pred_diff REAL NOT NULL,
                result TEXT NOT NULL,
                edge REAL NOT NULL,
                edge_opportunity BOOLEAN NOT NULL,
                edge_pick TEXT NOT NULL,
                edge_hit BOOLEAN,
                model_error REAL NOT NULL,
                market_error REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create ats_games table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_ats_games_date
            ON ats_games (run_date)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist one graded run, replacing any earlier grade of the same date
    pub async fn save_run(
        &self,
        date: NaiveDate,
        summary: &AtsSummary,
        games: &[(String, AtsMetrics)],
    ) -> Result<()> {
        let run_date = date.to_string();

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO ats_runs (
                run_date,
                total_games,
                graded_games,
                wins,
                losses,
                pushes,
                ats_accuracy,
                edge_opportunities,
                edge_bets,
                edge_wins,
                edge_hit_rate,
                model_mae,
                market_mae
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&run_date)
        .bind(summary.total_games as i64)
        .bind(summary.graded_games as i64)
        .bind(summary.wins as i64)
        .bind(summary.losses as i64)
        .bind(summary.pushes as i64)
        .bind(summary.ats_accuracy)
        .bind(summary.edge_opportunities as i64)
        .bind(summary.edge_bets as i64)
        .bind(summary.edge_wins as i64)
        .bind(summary.edge_hit_rate)
        .bind(summary.model_mae)
        .bind(summary.market_mae)
        .execute(&self.pool)
        .await
        .context("Failed to insert run summary")?;

        sqlx::query("DELETE FROM ats_games WHERE run_date = ?")
            .bind(&run_date)
            .execute(&self.pool)
            .await
            .context("Failed to clear previous game rows")?;

        for (game, metrics) in games {
            sqlx::query(
                r#"
                INSERT INTO ats_games (
                    run_date,
                    game,
                    away_margin,
                    pred_away_margin,
                    line,
                    actual_diff,
                    pred_diff,
                    result,
                    edge,
                    edge_opportunity,
                    edge_pick,
                    edge_hit,
                    model_error,
                    market_error
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&run_date)
            .bind(game)
            .bind(metrics.away_margin)
            .bind(metrics.pred_away_margin)
            .bind(metrics.line)
            .bind(metrics.actual_diff)
            .bind(metrics.pred_diff)
            .bind(metrics.result.as_str())
            .bind(metrics.edge)
            .bind(metrics.edge_opportunity)
            .bind(metrics.edge_pick.as_str())
            .bind(metrics.edge_hit)
            .bind(metrics.model_error)
            .bind(metrics.market_error)
            .execute(&self.pool)
            .await
            .context("Failed to insert game metrics")?;
        }

        Ok(())
    }

    /// Fetch the summary for one date
    pub async fn get_run(&self, date: NaiveDate) -> Result<Option<AtsSummary>> {
        let row = sqlx::query_as::<_, RunRow>(
            "SELECT * FROM ats_runs WHERE run_date = ?",
        )
        .bind(date.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch run summary")?;

        Ok(row.map(|r| r.into()))
    }

    /// Fetch the per-game rows for one date
    pub async fn get_games(&self, date: NaiveDate) -> Result<Vec<(String, AtsMetrics)>> {
        let rows = sqlx::query_as::<_, GameRow>(
            "SELECT * FROM ats_games WHERE run_date = ? ORDER BY game",
        )
        .bind(date.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch game metrics")?;

        Ok(rows.into_iter().map(|r| (r.game.clone(), r.into())).collect())
    }

    /// Get count of graded runs
    pub async fn run_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ats_runs")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count runs")?;

        Ok(row.0)
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct RunRow {
    #[allow(dead_code)]
    id: i64,
    #[allow(dead_code)]
    run_date: String,
    total_games: i64,
    graded_games: i64,
    wins: i64,
    losses: i64,
    pushes: i64,
    ats_accuracy: Option<f64>,
    edge_opportunities: i64,
    edge_bets: i64,
    edge_wins: i64,
    edge_hit_rate: Option<f64>,
    model_mae: Option<f64>,
    market_mae: Option<f64>,
}

impl From<RunRow> for AtsSummary {
    fn from(row: RunRow) -> Self {
        AtsSummary {
            total_games: row.total_games as usize,
            graded_games: row.graded_games as usize,
            wins: row.wins as usize,
            losses: row.losses as usize,
            pushes: row.pushes as usize,
            ats_accuracy: row.ats_accuracy,
            edge_opportunities: row.edge_opportunities as usize,
            edge_bets: row.edge_bets as usize,
            edge_wins: row.edge_wins as usize,
            edge_hit_rate: row.edge_hit_rate,
            model_mae: row.model_mae,
            market_mae: row.market_mae,
        }
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct GameRow {
    #[allow(dead_code)]
    id: i64,
    #[allow(dead_code)]
    run_date: String,
    game: String,
    away_margin: f64,
    pred_away_margin: f64,
    line: f64,
    actual_diff: f64,
    pred_diff: f64,
    result: String,
    edge: f64,
    edge_opportunity: bool,
    edge_pick: String,
    edge_hit: Option<bool>,
    model_error: f64,
    market_error: f64,
}

impl From<GameRow> for AtsMetrics {
    fn from(row: GameRow) -> Self {
        AtsMetrics {
            away_margin: row.away_margin,
            pred_away_margin: row.pred_away_margin,
            line: row.line,
            actual_diff: row.actual_diff,
            pred_diff: row.pred_diff,
            result: AtsOutcome::parse(&row.result),
            edge: row.edge,
            edge_opportunity: row.edge_opportunity,
            edge_pick: parse_pick(&row.edge_pick),
            edge_hit: row.edge_hit,
            model_error: row.model_error,
            market_error: row.market_error,
        }
    }
}

fn parse_pick(s: &str) -> EdgePick {
    match s {
        "AWAY" => EdgePick::Away,
        "HOME" => EdgePick::Home,
        _ => EdgePick::Push,
    }
}
