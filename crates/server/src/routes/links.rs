// Backburner links: saved URLs parked under a project for later.

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
        .route("/quick-add", post(quick_add_link))
        .route("/:id/update", put(update_link))
        .route("/:id/delete", delete(delete_link))
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "input::optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "input::optional_text")]
    pub description: Option<String>,
    /// Left out on update keeps the stored tags.
    #[serde(default, deserialize_with = "input::patch_text")]
    pub tags: Option<Option<String>>,
    #[serde(default, deserialize_with = "input::optional_id")]
    pub project_id: Option<i64>,
}

async fn quick_add_link(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LinkRequest>, AppError>,
) -> Result<Json<Ack>> {
    input::required(&body.url, "Link URL is required")?;

    let mut conn = state.db.pool.acquire().await?;
    ensure_active_project(&mut conn, body.project_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO backburner_links (url, title, description, tags, project_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&body.url)
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.tags.clone().flatten())
    .bind(body.project_id)
    .bind(timestamp())
    .execute(&mut *conn)
    .await?;

    tracing::info!(link_id = result.last_insert_rowid(), "Saved link");
    Ok(Ack::ok())
}

async fn update_link(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<LinkRequest>, AppError>,
) -> Result<Json<Ack>> {
    input::required(&body.url, "Link URL is required")?;

    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "backburner_links", id).await? {
        return Err(AppError::NotFound("Link not found".to_string()));
    }

    sqlx::query(
        r#"
        UPDATE backburner_links
        SET url = ?, title = ?, description = ?, tags = CASE WHEN ? THEN ? ELSE tags END
        WHERE id = ?
        "#,
    )
    .bind(&body.url)
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.tags.is_some())
    .bind(body.tags.clone().flatten())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    tracing::info!(link_id = id, "Updated link");
    Ok(Ack::ok())
}

async fn delete_link(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Ack>> {
    let mut conn = state.db.pool.acquire().await?;
    if !row_exists(&mut conn, "backburner_links", id).await? {
        return Err(AppError::NotFound("Link not found".to_string()));
    }

    sqlx::query("DELETE FROM backburner_links WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(link_id = id, "Deleted link");
    Ok(Ack::with_message("Link deleted successfully"))
}
