use axum::{extract::State, routing::get, Json, Router};
use chrono::{Local, Timelike};
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::{
    db::models::{EnergyLevel, Priority, PRIORITY_RANK},
    error::Result,
    AppState,
};

const MAX_SUGGESTIONS: i64 = 3;

pub fn router() -> Router<AppState> {
    Router::new().route("/smart-suggestions", get(smart_suggestions))
}

/// Part of the day, which decides how much energy a suggested task may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Daypart {
    Morning,
    Afternoon,
    Evening,
}

impl Daypart {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Daypart::Morning,
            12..=16 => Daypart::Afternoon,
            _ => Daypart::Evening,
        }
    }

    pub fn energy_levels(self) -> &'static [EnergyLevel] {
        match self {
            Daypart::Morning => &[EnergyLevel::High, EnergyLevel::Medium],
            Daypart::Afternoon => &[EnergyLevel::Medium, EnergyLevel::High, EnergyLevel::Low],
            Daypart::Evening => &[EnergyLevel::Low, EnergyLevel::Medium],
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Suggestion {
    pub id: i64,
    pub title: String,
    pub priority: Priority,
    pub energy_level: EnergyLevel,
    pub project_name: Option<String>,
}

/// Open tasks that fit the energy window of `hour`, most important first.
pub async fn suggestions_for_hour(
    conn: &mut SqliteConnection,
    hour: u32,
) -> Result<Vec<Suggestion>> {
    let levels = Daypart::from_hour(hour).energy_levels();
    let placeholders = vec!["?"; levels.len()].join(", ");

    let sql = format!(
        r#"
        SELECT t.id, t.title, t.priority, t.energy_level, p.name AS project_name
        FROM tasks t
        LEFT JOIN projects p ON t.project_id = p.id
        WHERE t.is_completed = 0 AND t.energy_level IN ({placeholders})
        ORDER BY {PRIORITY_RANK} DESC, t.created_at ASC
        LIMIT ?
        "#
    );

    let mut query = sqlx::query_as::<_, Suggestion>(&sql);
    for level in levels {
        query = query.bind(*level);
    }

    Ok(query.bind(MAX_SUGGESTIONS).fetch_all(conn).await?)
}

async fn smart_suggestions(State(state): State<AppState>) -> Result<Json<Vec<Suggestion>>> {
    let hour = Local::now().hour();
    let mut conn = state.db.pool.acquire().await?;

    let suggestions = suggestions_for_hour(&mut conn, hour).await?;
    tracing::debug!(hour, count = suggestions.len(), "Built smart suggestions");

    Ok(Json(suggestions))
}
