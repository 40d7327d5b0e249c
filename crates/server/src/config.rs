use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub static_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(36287),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/focus.db?mode=rwc".to_string()),
            static_path: env::var("STATIC_PATH").unwrap_or_else(|_| "./static".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 36287,
            database_url: "sqlite::memory:".to_string(),
            static_path: "./static".to_string(),
        }
    }
}
