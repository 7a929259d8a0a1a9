//! Faculty API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_and_get_faculty() {
    let app = TestApp::new().await;

    let (status, created) = app
        .post_json("/api/v1/faculties", json!({ "name": "  Engineering  " }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Engineering");
    assert_eq!(created["version"], 1);
    assert_eq!(created["groups"], json!([]));

    let id = created["id"].as_str().unwrap();
    let (status, loaded) = app.get(&format!("/api/v1/faculties/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn test_list_faculties() {
    let app = TestApp::new().await;
    let first = app.create_faculty("Engineering").await;
    let second = app.create_faculty("Medicine").await;
    app.create_group(&first, "CS101").await;

    let (status, body) = app.get("/api/v1/faculties").await;

    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], first.as_str());
    assert_eq!(list[0]["group_count"], 1);
    assert_eq!(list[1]["id"], second.as_str());
    assert_eq!(list[1]["group_count"], 0);
}

#[tokio::test]
async fn test_rename_faculty_bumps_version() {
    let app = TestApp::new().await;
    let id = app.create_faculty("Engineering").await;

    let (status, body) = app
        .patch_json(
            &format!("/api/v1/faculties/{id}"),
            json!({ "name": "Applied Engineering" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Applied Engineering");
    assert_eq!(body["version"], 2);
}

#[tokio::test]
async fn test_delete_faculty() {
    let app = TestApp::new().await;
    let id = app.create_faculty("Engineering").await;

    let (status, _) = app.delete(&format!("/api/v1/faculties/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/v1/faculties/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");

    let (status, _) = app.delete(&format!("/api/v1/faculties/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_name_is_rejected_by_domain() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json("/api/v1/faculties", json!({ "name": "   " }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "FacultyName.Empty");
}

#[tokio::test]
async fn test_empty_name_fails_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json("/api/v1/faculties", json!({ "name": "" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");
    assert_eq!(
        body["errors"],
        json!([{ "field": "name", "message": "Name must be 1-100 characters" }])
    );
}

#[tokio::test]
async fn test_invalid_faculty_id() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/faculties/not-a-number").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid faculty ID");
}

#[tokio::test]
async fn test_department_heads() {
    let app = TestApp::new().await;
    let id = app.create_faculty("Engineering").await;
    let uri = format!("/api/v1/faculties/{id}/department-heads/42");

    let (status, body) = app.put(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["department_head_ids"], json!(["42"]));

    let (status, body) = app.put(&uri).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Faculty.DepartmentHeadIdAlreadyExists");

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["department_head_ids"], json!([]));

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Faculty.DepartmentHeadIdDoesNotExist");
}

#[tokio::test]
async fn test_faculty_summary() {
    let app = TestApp::new().await;
    let id = app.create_faculty("Engineering").await;
    app.create_group(&id, "CS101").await;
    app.create_group(&id, "CS102").await;

    let (status, body) = app.get(&format!("/api/v1/faculties/{id}/summary")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group_count"], 2);
    assert_eq!(body["department_head_count"], 0);
    assert_eq!(body["version"], 3);
}
