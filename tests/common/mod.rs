//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use faculty_service::presentation::http::routes;
use faculty_service::startup::AppState;

/// Test application builder
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    /// Create a new test application backed by in-memory storage
    pub async fn new() -> Self {
        Self {
            router: routes::create_router(AppState::in_memory(7)),
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PATCH", uri, Some(body)).await
    }

    /// Make a PUT request without body
    pub async fn put(&self, uri: &str) -> (StatusCode, Value) {
        self.request("PUT", uri, None).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }

    /// Create a faculty and return its ID
    pub async fn create_faculty(&self, name: &str) -> String {
        let (status, body) = self
            .post_json("/api/v1/faculties", json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Add a group to a faculty and return its ID
    pub async fn create_group(&self, faculty_id: &str, name: &str) -> String {
        let (status, body) = self
            .post_json(
                &format!("/api/v1/faculties/{faculty_id}/groups"),
                json!({ "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Enrol students in a group
    pub async fn enrol(&self, faculty_id: &str, group_id: &str, students: &[i64]) {
        for student in students {
            let (status, body) = self
                .put(&format!(
                    "/api/v1/faculties/{faculty_id}/groups/{group_id}/students/{student}"
                ))
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }
    }
}
