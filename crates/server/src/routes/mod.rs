pub mod ideas;
pub mod input;
pub mod links;
pub mod notes;
pub mod pages;
pub mod projects;
pub mod suggestions;
pub mod tasks;

use axum::Json;
use serde::Serialize;

/// Body returned by every successful mutation.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl Ack {
    pub fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
        })
    }

    pub fn with_message(message: &'static str) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message),
        })
    }
}
