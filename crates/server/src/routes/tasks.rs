use axum::{
    extract::{Path, State},
    routing::{delete, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    db::{
        ensure_active_project,
        models::{EnergyLevel, Priority},
        row_exists, timestamp,
    },
    error::{AppError, Result},
    routes::{input, Ack},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quick-add", post(quick_add_task))
        .route("/:id/update", put(update_task))
        .route("/:id/complete", post(complete_task))
        .route("/:id/uncomplete", post(uncomplete_task))
        .route("/:id/delete", delete(delete_task))
}

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "input::optional_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub energy_level: EnergyLevel,
    /// Minutes.
    #[serde(default, deserialize_with = "input::optional_number")]
    pub estimated_time: Option<i64>,
    #[serde(default, deserialize_with = "input::optional_text")]
    pub due_date: Option<String>,
    /// Only read on creation; updates keep the task's project.
    #[serde(default, deserialize_with = "input::optional_id")]
    pub project_id: Option<i64>,
}

impl TaskRequest {
    fn validate(&self) -> Result<()> {
        input::required(&self.title, "Task title is required")
    }
}

async fn quick_add_task(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<TaskRequest>, AppError>,
) -> Result<Json<Ack>> {
    body.validate()?;

    let mut conn = state.db.pool.acquire().await?;
    ensure_active_project(&mut conn, body.project_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (title, description, priority, energy_level, estimated_time, due_date, project_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.priority)
    .bind(body.energy_level)
    .bind(body.estimated_time)
    .bind(&body.due_date)
    .bind(body.project_id)
    .bind(timestamp())
    .execute(&mut *conn)
    .await?;

    tracing::info!(task_id = result.last_insert_rowid(), "Created task");
    Ok(Ack::ok())
}

async fn update_task(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<TaskRequest>, AppError>,
) -> Result<Json<Ack>> {
    body.validate()?;

    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "tasks", id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    sqlx::query(
        r#"
        UPDATE tasks
        SET title = ?, description = ?, priority = ?, energy_level = ?, estimated_time = ?, due_date = ?
        WHERE id = ?
        "#,
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.priority)
    .bind(body.energy_level)
    .bind(body.estimated_time)
    .bind(&body.due_date)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    tracing::info!(task_id = id, "Updated task");
    Ok(Ack::ok())
}

// Completion is rewritten unconditionally, so repeating either call is harmless.
async fn complete_task(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Ack>> {
    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "tasks", id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    sqlx::query("UPDATE tasks SET is_completed = 1, completed_at = ? WHERE id = ?")
        .bind(timestamp())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(task_id = id, "Completed task");
    Ok(Ack::ok())
}

async fn uncomplete_task(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Ack>> {
    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "tasks", id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    sqlx::query("UPDATE tasks SET is_completed = 0, completed_at = NULL WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(task_id = id, "Reopened task");
    Ok(Ack::ok())
}

async fn delete_task(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Ack>> {
    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "tasks", id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(task_id = id, "Deleted task");
    Ok(Ack::with_message("Task deleted successfully"))
}
