//! # Faculty Service
//!
//! HTTP service managing faculties, their student groups and department heads.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Storage backend (in-memory or PostgreSQL)
//! - HTTP server

use anyhow::Result;
use tracing::info;

use faculty_service::config::Settings;
use faculty_service::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    faculty_service::telemetry::init_tracing();

    info!("Starting Faculty Service...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        storage = ?settings.storage.backend,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
