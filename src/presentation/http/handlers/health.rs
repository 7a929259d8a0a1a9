//! Health Check Handlers
//!
//! `/health` and `/health/live` only prove the process answers. `/health/ready`
//! also checks the configured storage backend and answers 503 when it cannot
//! be reached.

use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use sqlx::PgPool;

use crate::startup::AppState;

/// Round trips slower than this mark postgres as degraded.
const SLOW_STORAGE_THRESHOLD: Duration = Duration::from_millis(100);

static STARTED: Lazy<(Instant, DateTime<Utc>)> = Lazy::new(|| (Instant::now(), Utc::now()));

/// Pin the start time so uptime counts from boot, not from the first probe.
pub fn init_server_start() {
    Lazy::force(&STARTED);
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: StorageHealth,
}

/// Result of probing the faculty store
#[derive(Debug, Serialize)]
pub struct StorageHealth {
    /// `memory` or `postgres`
    pub backend: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION")),
    })
}

pub async fn liveness() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive",
        version: None,
    })
}

pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let storage = match &state.db {
        Some(pool) => check_postgres(pool).await,
        None => StorageHealth {
            backend: "memory",
            status: HealthStatus::Healthy,
            latency_ms: None,
            message: None,
        },
    };

    let status = storage.status;
    let (started, started_at) = &*STARTED;
    let response = ReadinessResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: started.elapsed().as_secs(),
        started_at: started_at.to_rfc3339(),
        checks: HealthChecks { storage },
    };

    (status_code(status), Json(response))
}

async fn check_postgres(pool: &PgPool) -> StorageHealth {
    let start = Instant::now();
    let result = sqlx::query("SELECT 1 FROM faculties LIMIT 1")
        .fetch_optional(pool)
        .await;
    let elapsed = start.elapsed();

    match result {
        Ok(_) => StorageHealth {
            backend: "postgres",
            status: latency_status(elapsed),
            latency_ms: Some(elapsed.as_millis() as u64),
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Storage readiness check failed");
            StorageHealth {
                backend: "postgres",
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                message: Some(format!("Faculty store unreachable: {}", e)),
            }
        }
    }
}

fn latency_status(elapsed: Duration) -> HealthStatus {
    if elapsed < SLOW_STORAGE_THRESHOLD {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}

/// Degraded storage still serves traffic.
fn status_code(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_status() {
        assert_eq!(latency_status(Duration::from_millis(5)), HealthStatus::Healthy);
        assert_eq!(
            latency_status(Duration::from_millis(250)),
            HealthStatus::Degraded
        );
    }

    #[test]
    fn test_only_unhealthy_is_unavailable() {
        assert_eq!(status_code(HealthStatus::Degraded), StatusCode::OK);
        assert_eq!(
            status_code(HealthStatus::Unhealthy),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_memory_storage_serialization() {
        let health = StorageHealth {
            backend: "memory",
            status: HealthStatus::Healthy,
            latency_ms: None,
            message: None,
        };

        let json = serde_json::to_value(&health).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "backend": "memory", "status": "healthy" })
        );
    }
}
