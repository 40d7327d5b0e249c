use axum::{
    extract::{Path, State},
    routing::{delete, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    db::{ensure_active_project, row_exists, timestamp},
    error::{AppError, Result},
    routes::{input, Ack},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quick-add", post(quick_add_idea))
        .route("/:id/update", put(update_idea))
        .route("/:id/delete", delete(delete_idea))
}

#[derive(Debug, Deserialize)]
pub struct IdeaRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "input::optional_text")]
    pub description: Option<String>,
    /// Left out on update keeps the stored tags.
    #[serde(default, deserialize_with = "input::patch_text")]
    pub tags: Option<Option<String>>,
    #[serde(default, deserialize_with = "input::optional_id")]
    pub project_id: Option<i64>,
}

async fn quick_add_idea(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<IdeaRequest>, AppError>,
) -> Result<Json<Ack>> {
    input::required(&body.title, "Idea title is required")?;

    let mut conn = state.db.pool.acquire().await?;
    ensure_active_project(&mut conn, body.project_id).await?;

    let result = sqlx::query(
        "INSERT INTO ideas (title, description, tags, project_id, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.tags.clone().flatten())
    .bind(body.project_id)
    .bind(timestamp())
    .execute(&mut *conn)
    .await?;

    tracing::info!(idea_id = result.last_insert_rowid(), "Captured idea");
    Ok(Ack::ok())
}

async fn update_idea(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<IdeaRequest>, AppError>,
) -> Result<Json<Ack>> {
    input::required(&body.title, "Idea title is required")?;

    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "ideas", id).await? {
        return Err(AppError::NotFound("Idea not found".to_string()));
    }

    sqlx::query(
        r#"
        UPDATE ideas
        SET title = ?, description = ?, tags = CASE WHEN ? THEN ? ELSE tags END
        WHERE id = ?
        "#,
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.tags.is_some())
    .bind(body.tags.clone().flatten())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    tracing::info!(idea_id = id, "Updated idea");
    Ok(Ack::ok())
}

async fn delete_idea(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Ack>> {
    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "ideas", id).await? {
        return Err(AppError::NotFound("Idea not found".to_string()));
    }

    sqlx::query("DELETE FROM ideas WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(idea_id = id, "Deleted idea");
    Ok(Ack::with_message("Idea deleted successfully"))
}
