//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new().nest("/faculties", faculty_routes())
}

/// Faculty routes, groups and department heads included
fn faculty_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::faculty::create_faculty).get(handlers::faculty::list_faculties),
        )
        .route(
            "/{faculty_id}",
            get(handlers::faculty::get_faculty)
                .patch(handlers::faculty::update_faculty)
                .delete(handlers::faculty::delete_faculty),
        )
        .route(
            "/{faculty_id}/summary",
            get(handlers::faculty::get_faculty_summary),
        )
        .route(
            "/{faculty_id}/department-heads/{user_id}",
            put(handlers::faculty::add_department_head)
                .delete(handlers::faculty::remove_department_head),
        )
        .route("/{faculty_id}/groups", post(handlers::group::create_group))
        .route("/{faculty_id}/groups/merge", post(handlers::group::merge_groups))
        .route(
            "/{faculty_id}/groups/{group_id}",
            get(handlers::group::get_group)
                .patch(handlers::group::update_group)
                .delete(handlers::group::delete_group),
        )
        .route(
            "/{faculty_id}/groups/{group_id}/split",
            post(handlers::group::split_group),
        )
        .route(
            "/{faculty_id}/groups/{group_id}/students/{student_id}",
            put(handlers::group::add_student).delete(handlers::group::remove_student),
        )
        .route(
            "/{faculty_id}/students/{student_id}/transfer",
            post(handlers::group::transfer_student),
        )
}
