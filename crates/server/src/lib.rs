use std::sync::Arc;

use axum::{routing::get, Router};
use tera::Tera;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod templates;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Database,
    pub config: config::Config,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(db: db::Database, config: config::Config) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            config,
            templates: Arc::new(templates::load()?),
        })
    }
}

/// Builds the full HTTP surface: pages, JSON API and static assets.
pub fn app(state: AppState) -> Router {
    let api_router = Router::new()
        .nest("/projects", routes::projects::router())
        .nest("/tasks", routes::tasks::router())
        .nest("/ideas", routes::ideas::router())
        .nest("/links", routes::links::router())
        .nest("/notes", routes::notes::router())
        .merge(routes::suggestions::router());

    let static_files = ServeDir::new(&state.config.static_path);

    Router::new()
        .route("/health", get(health_check))
        .merge(routes::pages::router())
        .nest("/api", api_router)
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
