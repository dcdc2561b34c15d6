//! SQLite persistence layer.
//!
//! `DbConnection` wraps the connection pool and exposes per-entity CRUD
//! methods (one module per entity). Expected failures - a lookup or mutation
//! aimed at a missing row - are reported as `Option` / `bool`, never as
//! errors; only genuinely unexpected failures propagate as `Err`.

use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

mod crops;
mod expenses;
mod farms;
mod income;
mod tasks;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:farmdash.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database, honoring DATABASE_URL when set
    pub async fn init() -> Result<Self> {
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // No uniqueness or referential-integrity constraints beyond primary
        // keys: dangling foreign keys are tolerated and resolved to
        // placeholder labels at display time.
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS farms (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                size REAL NOT NULL,
                size_unit TEXT NOT NULL,
                location TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS crops (
                id TEXT PRIMARY KEY,
                farm_id TEXT NOT NULL,
                name TEXT NOT NULL,
                variety TEXT NOT NULL,
                planting_date TEXT NOT NULL,
                expected_harvest_date TEXT NOT NULL,
                growth_stage TEXT NOT NULL,
                field TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                farm_id TEXT NOT NULL,
                crop_id TEXT,
                task_type TEXT NOT NULL,
                description TEXT NOT NULL,
                due_date TEXT NOT NULL,
                priority TEXT NOT NULL,
                status TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                farm_id TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS income (
                id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                source TEXT NOT NULL,
                crop_id TEXT,
                farm_id TEXT,
                notes TEXT NOT NULL
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement).execute(pool).await?;
        }

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
