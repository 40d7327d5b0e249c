pub mod models;

use chrono::{SecondsFormat, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqliteConnection, SqlitePool};

use crate::error::{AppError, Result};

pub const DEFAULT_PROJECT_COLOR: &str = "#6366f1";

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        // Ensure the data directory exists
        if let Some(path) = url.strip_prefix("sqlite:") {
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Fresh migrated and seeded database that lives as long as the pool.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite `:memory:` connection opens its own empty database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        db.seed_defaults().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Inserts the "Personal" project when no project has ever been created.
    pub async fn seed_defaults(&self) -> anyhow::Result<()> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        if count == 0 {
            sqlx::query(
                "INSERT INTO projects (name, description, color, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind("Personal")
            .bind("General personal tasks and ideas")
            .bind(DEFAULT_PROJECT_COLOR)
            .bind(timestamp())
            .execute(&self.pool)
            .await?;
            tracing::info!("Seeded default project");
        }

        Ok(())
    }
}

/// Current UTC time in the format every timestamp column uses.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Children may only be attached to a project that is still active
pub async fn ensure_active_project(
    conn: &mut SqliteConnection,
    project_id: Option<i64>,
) -> Result<()> {
    let Some(project_id) = project_id else {
        return Ok(());
    };

    let exists =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = ? AND is_active = 1")
            .bind(project_id)
            .fetch_one(&mut *conn)
            .await?;

    if exists == 0 {
        return Err(AppError::Validation(format!(
            "Project {project_id} does not exist"
        )));
    }
    Ok(())
}

/// Returns whether a row with `id` exists in `table`.
///
/// `table` is always one of the fixed table names used by the routes, never
/// request input.
pub async fn row_exists(conn: &mut SqliteConnection, table: &str, id: i64) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table} WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}
