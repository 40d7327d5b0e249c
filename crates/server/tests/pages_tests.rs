use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_health_check() {
    let app = common::setup().await;
    let (status, body) = app.request(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_dashboard_renders_projects_and_focus_tasks() {
    let app = common::setup().await;
    app.json(
        Method::POST,
        "/api/tasks/quick-add",
        Some(json!({"title": "Renew passport", "priority": "urgent", "project_id": 1})),
    )
    .await;
    app.json(
        Method::POST,
        "/api/ideas/quick-add",
        Some(json!({"title": "Reading nook"})),
    )
    .await;

    let (status, html) = app.request(Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Personal"));
    assert!(html.contains("Renew passport"));
    assert!(html.contains("Reading nook"));
}

#[tokio::test]
async fn test_dashboard_escapes_user_text() {
    let app = common::setup().await;
    app.json(
        Method::POST,
        "/api/ideas/quick-add",
        Some(json!({"title": "<script>alert(1)</script>"})),
    )
    .await;

    let (_, html) = app.request(Method::GET, "/", None).await;
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_project_page_lists_items() {
    let app = common::setup().await;
    app.json(
        Method::POST,
        "/api/links/quick-add",
        Some(json!({"url": "https://example.com/recipes", "project_id": 1})),
    )
    .await;
    app.json(
        Method::POST,
        "/api/notes/quick-add",
        Some(json!({"content": "Call back Tuesday", "project_id": 1})),
    )
    .await;

    let (status, html) = app.request(Method::GET, "/project/1", None).await;
    assert_eq!(status, StatusCode::OK);
    // Autoescaping encodes the slashes of user-supplied URLs
    assert!(html.contains("https:&#x2F;&#x2F;example.com&#x2F;recipes"));
    assert!(!html.contains("https://example.com/recipes"));
    assert!(html.contains("Call back Tuesday"));
}

#[tokio::test]
async fn test_unknown_project_page_is_plain_not_found() {
    let app = common::setup().await;
    let (status, body) = app.request(Method::GET, "/project/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Project not found");
}

#[tokio::test]
async fn test_non_numeric_project_page_is_plain_not_found() {
    let app = common::setup().await;
    let (status, body) = app.request(Method::GET, "/project/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.starts_with("Invalid id"));
}

#[tokio::test]
async fn test_quick_capture_lists_active_projects() {
    let app = common::setup().await;
    app.json(Method::POST, "/api/projects", Some(json!({"name": "Side hustle"})))
        .await;

    let (status, html) = app.request(Method::GET, "/quick-capture", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Side hustle"));
    assert!(html.contains("Personal"));
}
