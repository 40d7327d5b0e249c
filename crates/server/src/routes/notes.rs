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
        .route("/quick-add", post(quick_add_note))
        .route("/:id/update", put(update_note))
        .route("/:id/delete", delete(delete_note))
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(default, deserialize_with = "input::optional_text")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Left out on update keeps the stored tags.
    #[serde(default, deserialize_with = "input::patch_text")]
    pub tags: Option<Option<String>>,
    #[serde(default, deserialize_with = "input::optional_id")]
    pub project_id: Option<i64>,
}

async fn quick_add_note(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<NoteRequest>, AppError>,
) -> Result<Json<Ack>> {
    input::required(&body.content, "Note content is required")?;

    let mut conn = state.db.pool.acquire().await?;
    ensure_active_project(&mut conn, body.project_id).await?;

    let now = timestamp();
    let result = sqlx::query(
        r#"
        INSERT INTO notes (title, content, tags, project_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&body.title)
    .bind(&body.content)
    .bind(body.tags.clone().flatten())
    .bind(body.project_id)
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    tracing::info!(note_id = result.last_insert_rowid(), "Created note");
    Ok(Ack::ok())
}

async fn update_note(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<NoteRequest>, AppError>,
) -> Result<Json<Ack>> {
    input::required(&body.content, "Note content is required")?;

    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "notes", id).await? {
        return Err(AppError::NotFound("Note not found".to_string()));
    }

    sqlx::query(
        r#"
        UPDATE notes
        SET title = ?, content = ?, tags = CASE WHEN ? THEN ? ELSE tags END, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&body.title)
    .bind(&body.content)
    .bind(body.tags.is_some())
    .bind(body.tags.clone().flatten())
    .bind(timestamp())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    tracing::info!(note_id = id, "Updated note");
    Ok(Ack::ok())
}

async fn delete_note(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Ack>> {
    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "notes", id).await? {
        return Err(AppError::NotFound("Note not found".to_string()));
    }

    sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(note_id = id, "Deleted note");
    Ok(Ack::with_message("Note deleted successfully"))
}
