use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_created_project_is_listed_once() {
    let app = common::setup().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/projects",
            Some(json!({"name": "Garden", "description": "Spring planting", "color": "#22c55e"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, projects) = app.json(Method::GET, "/api/projects", None).await;
    assert_eq!(status, StatusCode::OK);

    let matches: Vec<_> = projects
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["name"] == "Garden")
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["description"], "Spring planting");
    assert_eq!(matches[0]["color"], "#22c55e");
}

#[tokio::test]
async fn test_project_listing_is_sorted_by_name_with_default_color() {
    let app = common::setup().await;
    app.json(Method::POST, "/api/projects", Some(json!({"name": "Archive"})))
        .await;

    let (_, projects) = app.json(Method::GET, "/api/projects", None).await;
    let names: Vec<_> = projects
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Archive", "Personal"]);
    assert_eq!(projects[0]["color"], "#6366f1");
}

#[tokio::test]
async fn test_project_without_name_is_rejected() {
    let app = common::setup().await;

    let (status, body) = app
        .json(Method::POST, "/api/projects", Some(json!({"description": "nameless"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Project name is required");
    assert_eq!(app.count("SELECT COUNT(*) FROM projects").await, 1);
}

#[tokio::test]
async fn test_update_project() {
    let app = common::setup().await;

    let (status, body) = app
        .json(
            Method::PUT,
            "/api/projects/1/update",
            Some(json!({"name": "Home", "color": "#f97316"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project updated successfully");

    let (_, projects) = app.json(Method::GET, "/api/projects", None).await;
    assert_eq!(projects[0]["name"], "Home");
    assert_eq!(projects[0]["color"], "#f97316");
}

#[tokio::test]
async fn test_update_missing_project_is_not_found() {
    let app = common::setup().await;

    let (status, body) = app
        .json(Method::PUT, "/api/projects/77/update", Some(json!({"name": "Ghost"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Project not found"}));
}

#[tokio::test]
async fn test_deleting_project_deactivates_and_detaches_children() {
    let app = common::setup().await;
    app.json(Method::POST, "/api/projects", Some(json!({"name": "Move"})))
        .await;

    app.json(
        Method::POST,
        "/api/tasks/quick-add",
        Some(json!({"title": "Book van", "project_id": "2"})),
    )
    .await;
    app.json(
        Method::POST,
        "/api/ideas/quick-add",
        Some(json!({"title": "Sell sofa", "project_id": 2})),
    )
    .await;
    app.json(
        Method::POST,
        "/api/notes/quick-add",
        Some(json!({"content": "Keys with neighbour", "project_id": 2})),
    )
    .await;
    app.json(
        Method::POST,
        "/api/links/quick-add",
        Some(json!({"url": "https://example.com/movers", "project_id": 2})),
    )
    .await;
    app.json(
        Method::POST,
        "/api/tasks/quick-add",
        Some(json!({"title": "Unrelated", "project_id": 1})),
    )
    .await;

    let (status, body) = app.json(Method::DELETE, "/api/projects/2/delete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");

    let (_, projects) = app.json(Method::GET, "/api/projects", None).await;
    assert!(projects
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["name"] != "Move"));

    let (status, text) = app.request(Method::GET, "/project/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(text, "Project not found");

    for table in ["tasks", "ideas", "notes", "backburner_links"] {
        let attached = app
            .count(&format!("SELECT COUNT(*) FROM {table} WHERE project_id = 2"))
            .await;
        assert_eq!(attached, 0, "{table} still attached");
    }
    assert_eq!(app.count("SELECT COUNT(*) FROM tasks").await, 2);
    assert_eq!(
        app.count("SELECT COUNT(*) FROM tasks WHERE project_id = 1").await,
        1
    );

    let (status, _) = app.json(Method::DELETE, "/api/projects/2/delete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivated_project_cannot_take_new_items() {
    let app = common::setup().await;
    app.json(Method::DELETE, "/api/projects/1/delete", None).await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/tasks/quick-add",
            Some(json!({"title": "Orphan", "project_id": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(app.count("SELECT COUNT(*) FROM tasks").await, 0);
}
