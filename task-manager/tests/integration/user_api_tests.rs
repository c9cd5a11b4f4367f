// tests/integration/user_api_tests.rs

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::common::app_helper::setup_app;
use crate::common::request::{create_request, empty_request, json_body};
use crate::common::test_data::create_project;

#[tokio::test]
async fn test_create_user_and_duplicate_username() {
    let app = setup_app().await;
    let manager_id = Some(app.manager.id);

    let payload = json!({ "username": "alex", "email": "alex@example.com" });

    let res = app
        .router
        .clone()
        .oneshot(create_request("POST", "/users", manager_id, Some(&payload)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["data"]["username"], "alex");
    assert_eq!(body["data"]["role"], "Developer");

    let res = app
        .router
        .clone()
        .oneshot(create_request("POST", "/users", manager_id, Some(&payload)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // 不正なユーザー名とロール
    let res = app
        .router
        .clone()
        .oneshot(create_request(
            "POST",
            "/users",
            manager_id,
            Some(&json!({ "username": "bad name!", "role": "Owner" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_with_assigned_task_cannot_be_deleted() {
    let app = setup_app().await;
    let manager_id = Some(app.manager.id);
    let project_id = create_project(&app.db.connection, "Docs").await;

    let res = app
        .router
        .clone()
        .oneshot(create_request(
            "POST",
            "/users",
            manager_id,
            Some(&json!({ "username": "alex" })),
        ))
        .await
        .unwrap();
    let user_id = json_body(res).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let res = app
        .router
        .clone()
        .oneshot(create_request(
            "POST",
            "/tasks",
            manager_id,
            Some(&json!({ "project_id": project_id, "title": "Docs", "assignee_id": user_id })),
        ))
        .await
        .unwrap();
    let task_id = json_body(res).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let res = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/users/{}", user_id), manager_id))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // 担当を外せば削除できる
    app.router
        .clone()
        .oneshot(create_request(
            "PATCH",
            &format!("/tasks/{}", task_id),
            manager_id,
            Some(&json!({ "assignee_id": null })),
        ))
        .await
        .unwrap();

    let res = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/users/{}", user_id), manager_id))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .router
        .clone()
        .oneshot(empty_request("GET", &format!("/users/{}", user_id), manager_id))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seeded_superuser_can_manage() {
    let app = setup_app().await;

    let res = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/users", Some(app.manager.id)))
        .await
        .unwrap();
    let body = json_body(res).await;
    let admin_id = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "admin")
        .and_then(|u| u["id"].as_str())
        .unwrap()
        .parse()
        .unwrap();

    let res = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/projects", Some(admin_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
