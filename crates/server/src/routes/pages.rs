use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use sqlx::SqliteConnection;
use tera::Context;

use crate::{
    db::models::{BackburnerLink, Idea, Note, Project, ProjectSummary, Task, PRIORITY_RANK},
    error::AppError,
    templates, AppState,
};

const FOCUS_LIMIT: i64 = 5;
const RECENT_LIMIT: i64 = 3;
const COMPLETED_LIMIT: i64 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/project/:id", get(project_detail))
        .route("/quick-capture", get(quick_capture))
}

/// Pages report errors as plain text instead of the JSON envelope.
#[derive(Debug)]
pub struct PageError(AppError);

impl<E> From<E> for PageError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.0.status(), self.0.public_message()).into_response()
    }
}

type PageResult = std::result::Result<Html<String>, PageError>;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub projects: Vec<ProjectSummary>,
    pub focus_tasks: Vec<Task>,
    pub recent_ideas: Vec<Idea>,
    pub recent_notes: Vec<Note>,
}

impl Dashboard {
    pub async fn load(conn: &mut SqliteConnection, today: NaiveDate) -> crate::error::Result<Self> {
        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id, p.name, p.description, p.color, p.created_at,
                (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id AND t.is_completed = 0) AS task_count,
                (SELECT COUNT(*) FROM ideas i WHERE i.project_id = p.id) AS idea_count,
                (SELECT COUNT(*) FROM notes n WHERE n.project_id = p.id) AS note_count
            FROM projects p
            WHERE p.is_active = 1
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        // High stakes or due today; SQLite sorts undated tasks first within a rank
        let focus_tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT t.*, p.name AS project_name
            FROM tasks t
            LEFT JOIN projects p ON t.project_id = p.id
            WHERE t.is_completed = 0
                AND (t.priority IN ('high', 'urgent') OR DATE(t.due_date) = ?)
            ORDER BY {PRIORITY_RANK} DESC, t.due_date ASC
            LIMIT ?
            "#
        ))
        .bind(today.format("%Y-%m-%d").to_string())
        .bind(FOCUS_LIMIT)
        .fetch_all(&mut *conn)
        .await?;

        let recent_ideas = sqlx::query_as::<_, Idea>(
            r#"
            SELECT i.*, p.name AS project_name
            FROM ideas i
            LEFT JOIN projects p ON i.project_id = p.id
            ORDER BY i.created_at DESC, i.id DESC
            LIMIT ?
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&mut *conn)
        .await?;

        let recent_notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT n.*, p.name AS project_name
            FROM notes n
            LEFT JOIN projects p ON n.project_id = p.id
            ORDER BY n.updated_at DESC, n.id DESC
            LIMIT ?
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Self {
            projects,
            focus_tasks,
            recent_ideas,
            recent_notes,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectPage {
    pub project: Project,
    pub tasks: Vec<Task>,
    pub completed_tasks: Vec<Task>,
    pub ideas: Vec<Idea>,
    pub links: Vec<BackburnerLink>,
    pub notes: Vec<Note>,
}

impl ProjectPage {
    /// Returns `None` when the project is missing or deactivated.
    pub async fn load(
        conn: &mut SqliteConnection,
        project_id: i64,
    ) -> crate::error::Result<Option<Self>> {
        let Some(project) =
            sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ? AND is_active = 1")
                .bind(project_id)
                .fetch_optional(&mut *conn)
                .await?
        else {
            return Ok(None);
        };

        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT t.* FROM tasks t
            WHERE t.project_id = ? AND t.is_completed = 0
            ORDER BY {PRIORITY_RANK} DESC, t.created_at ASC, t.id ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;

        let completed_tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE project_id = ? AND is_completed = 1
            ORDER BY completed_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(project_id)
        .bind(COMPLETED_LIMIT)
        .fetch_all(&mut *conn)
        .await?;

        let ideas = sqlx::query_as::<_, Idea>(
            "SELECT * FROM ideas WHERE project_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;

        let links = sqlx::query_as::<_, BackburnerLink>(
            "SELECT * FROM backburner_links WHERE project_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;

        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE project_id = ? ORDER BY updated_at DESC, id DESC",
        )
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(Self {
            project,
            tasks,
            completed_tasks,
            ideas,
            links,
            notes,
        }))
    }
}

async fn dashboard(State(state): State<AppState>) -> PageResult {
    let mut conn = state.db.pool.acquire().await?;
    let dashboard = Dashboard::load(&mut conn, Local::now().date_naive()).await?;

    let context = Context::from_serialize(&dashboard)?;
    Ok(templates::render(&state.templates, "index.html", &context)?)
}

async fn project_detail(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, PageError>,
) -> PageResult {
    let mut conn = state.db.pool.acquire().await?;
    let page = ProjectPage::load(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let context = Context::from_serialize(&page)?;
    Ok(templates::render(&state.templates, "project.html", &context)?)
}

async fn quick_capture(State(state): State<AppState>) -> PageResult {
    let mut conn = state.db.pool.acquire().await?;
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE is_active = 1 ORDER BY name ASC",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut context = Context::new();
    context.insert("projects", &projects);
    Ok(templates::render(&state.templates, "quick_capture.html", &context)?)
}
