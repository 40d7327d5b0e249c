use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    db::{timestamp, DEFAULT_PROJECT_COLOR},
    error::{AppError, Result},
    routes::{input, Ack},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:id/update", put(update_project))
        .route("/:id/delete", delete(delete_project))
}

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "input::optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "input::optional_text")]
    pub color: Option<String>,
}

impl ProjectRequest {
    fn validate(&self) -> Result<()> {
        input::required(&self.name, "Project name is required")
    }

    fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_PROJECT_COLOR)
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectResponse>>> {
    let mut conn = state.db.pool.acquire().await?;

    let projects = sqlx::query_as::<_, (i64, String, Option<String>, String)>(
        "SELECT id, name, description, color FROM projects WHERE is_active = 1 ORDER BY name ASC",
    )
    .fetch_all(&mut *conn)
    .await?;

    let projects = projects
        .into_iter()
        .map(|(id, name, description, color)| ProjectResponse {
            id,
            name,
            description,
            color,
        })
        .collect();

    Ok(Json(projects))
}

async fn create_project(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ProjectRequest>, AppError>,
) -> Result<Json<Ack>> {
    body.validate()?;

    let mut conn = state.db.pool.acquire().await?;
    let result = sqlx::query(
        "INSERT INTO projects (name, description, color, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&body.name)
    .bind(&body.description)
    .bind(body.color())
    .bind(timestamp())
    .execute(&mut *conn)
    .await?;

    tracing::info!(project_id = result.last_insert_rowid(), "Created project");
    Ok(Ack::ok())
}

async fn update_project(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<ProjectRequest>, AppError>,
) -> Result<Json<Ack>> {
    body.validate()?;

    let mut conn = state.db.pool.acquire().await?;
    let exists =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = ? AND is_active = 1")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

    if exists == 0 {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    sqlx::query("UPDATE projects SET name = ?, description = ?, color = ? WHERE id = ?")
        .bind(&body.name)
        .bind(&body.description)
        .bind(body.color())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(project_id = id, "Updated project");
    Ok(Ack::with_message("Project updated successfully"))
}

// Projects are deactivated rather than removed; their children stay and are
// detached.
async fn delete_project(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<Ack>> {
    let mut tx = state.db.pool.begin().await?;

    let exists =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = ? AND is_active = 1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    if exists == 0 {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    sqlx::query("UPDATE projects SET is_active = 0 WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for table in ["tasks", "ideas", "notes", "backburner_links"] {
        sqlx::query(&format!(
            "UPDATE {table} SET project_id = NULL WHERE project_id = ?"
        ))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(project_id = id, "Deactivated project and detached its items");
    Ok(Ack::with_message("Project deleted successfully"))
}
