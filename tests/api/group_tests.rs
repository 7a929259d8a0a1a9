//! Group API Tests
//!
//! Groups, memberships, merge, split and transfer.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_add_group_and_get_it_back() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let group = app.create_group(&faculty, "CS101").await;

    let (status, body) = app
        .get(&format!("/api/v1/faculties/{faculty}/groups/{group}"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "CS101");
    assert_eq!(body["faculty_id"], faculty.as_str());
    assert_eq!(body["student_ids"], json!([]));
    assert_eq!(body["student_count"], 0);
}

#[tokio::test]
async fn test_duplicate_group_name_conflicts() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    app.create_group(&faculty, "CS101").await;

    let (status, body) = app
        .post_json(
            &format!("/api/v1/faculties/{faculty}/groups"),
            json!({ "name": "CS101" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Faculty.GroupNameAlreadyExists");
    assert_eq!(body["code"], 10009);
}

#[tokio::test]
async fn test_rename_and_remove_group() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let group = app.create_group(&faculty, "CS101").await;
    let uri = format!("/api/v1/faculties/{faculty}/groups/{group}");

    let (status, body) = app.patch_json(&uri, json!({ "name": "CS102" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "CS102");

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Faculty.GroupDoesNotExist");
}

#[tokio::test]
async fn test_student_membership() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let group = app.create_group(&faculty, "CS101").await;
    let uri = format!("/api/v1/faculties/{faculty}/groups/{group}/students/5");

    let (status, body) = app.put(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student_ids"], json!(["5"]));

    let (status, body) = app.put(&uri).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Group.StudentAlreadyInGroup");

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student_count"], 0);

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Group.StudentNotInGroup");
}

#[tokio::test]
async fn test_merge_groups() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let a = app.create_group(&faculty, "A").await;
    let b = app.create_group(&faculty, "B").await;
    app.enrol(&faculty, &a, &[1, 2]).await;
    app.enrol(&faculty, &b, &[2, 3]).await;

    let (status, body) = app
        .post_json(
            &format!("/api/v1/faculties/{faculty}/groups/merge"),
            json!({ "group_ids": [a, b] }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "A-B-Merged");
    assert_eq!(body["student_ids"], json!(["1", "2", "3"]));

    let (_, faculty_body) = app.get(&format!("/api/v1/faculties/{faculty}")).await;
    assert_eq!(faculty_body["groups"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_merge_with_source_removal() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let a = app.create_group(&faculty, "A").await;
    let b = app.create_group(&faculty, "B").await;

    let (status, _) = app
        .post_json(
            &format!("/api/v1/faculties/{faculty}/groups/merge"),
            json!({ "group_ids": [a, b], "remove_sources": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, faculty_body) = app.get(&format!("/api/v1/faculties/{faculty}")).await;
    let groups = faculty_body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "A-B-Merged");
}

#[tokio::test]
async fn test_merge_rejections() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let a = app.create_group(&faculty, "A").await;
    let uri = format!("/api/v1/faculties/{faculty}/groups/merge");

    let (status, body) = app.post_json(&uri, json!({ "group_ids": [a] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faculty.MergeGroupCountInsufficient");

    let (status, body) = app
        .post_json(&uri, json!({ "group_ids": [a, "999"] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Faculty.GroupDoesNotExist");

    let (_, faculty_body) = app.get(&format!("/api/v1/faculties/{faculty}")).await;
    assert_eq!(faculty_body["version"], 2);
}

#[tokio::test]
async fn test_split_group_redistributes_remainder() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let group = app.create_group(&faculty, "CS").await;
    app.enrol(&faculty, &group, &[1, 2, 3, 4, 5, 6, 7]).await;

    let (status, body) = app
        .post_json(
            &format!("/api/v1/faculties/{faculty}/groups/{group}/split"),
            json!({ "number_of_groups": 3 }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let parts = body["groups"].as_array().unwrap();
    let names: Vec<_> = parts.iter().map(|p| p["name"].as_str().unwrap()).collect();
    let sizes: Vec<_> = parts.iter().map(|p| p["student_count"].as_u64().unwrap()).collect();
    assert_eq!(names, vec!["CS-Part1", "CS-Part2", "CS-Part3"]);
    assert_eq!(sizes, vec![3, 2, 2]);

    let (status, _) = app
        .get(&format!("/api/v1/faculties/{faculty}/groups/{group}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_split_with_too_few_students() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let group = app.create_group(&faculty, "CS").await;
    app.enrol(&faculty, &group, &[1]).await;

    let (status, body) = app
        .post_json(
            &format!("/api/v1/faculties/{faculty}/groups/{group}/split"),
            json!({ "number_of_groups": 2 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faculty.InvalidSplitGroupParameters");
}

#[tokio::test]
async fn test_split_with_negative_part_count() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let group = app.create_group(&faculty, "CS").await;
    app.enrol(&faculty, &group, &[1, 2]).await;

    let (status, body) = app
        .post_json(
            &format!("/api/v1/faculties/{faculty}/groups/{group}/split"),
            json!({ "number_of_groups": -1 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10009);
    assert_eq!(body["error"], "Faculty.InvalidSplitGroupParameters");
}

#[tokio::test]
async fn test_malformed_body_uses_error_format() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;

    let (status, body) = app
        .post_json(
            &format!("/api/v1/faculties/{faculty}/groups/merge"),
            json!({ "group_ids": [1, 2] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);
    assert_eq!(body["error"], "BadRequest");
    assert!(body["message"].as_str().unwrap().contains("group_ids"));

    let (status, body) = app
        .post_json(&format!("/api/v1/faculties/{faculty}/groups"), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
}

#[tokio::test]
async fn test_transfer_student() {
    let app = TestApp::new().await;
    let faculty = app.create_faculty("Engineering").await;
    let a = app.create_group(&faculty, "A").await;
    let b = app.create_group(&faculty, "B").await;
    app.enrol(&faculty, &a, &[9]).await;
    let uri = format!("/api/v1/faculties/{faculty}/students/9/transfer");

    let (status, body) = app
        .post_json(&uri, json!({ "from_group_id": a, "to_group_id": b }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"]["student_ids"], json!([]));
    assert_eq!(body["to"]["student_ids"], json!(["9"]));

    let (status, body) = app
        .post_json(&uri, json!({ "from_group_id": b, "to_group_id": b }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faculty.InvalidTransfer");
}
