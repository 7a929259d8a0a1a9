//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{FacultyService, FacultyServiceImpl};
use crate::config::{Settings, StorageBackend};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{InMemoryFacultyRepository, PgFacultyRepository};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub faculty_service: Arc<dyn FacultyService>,
    /// Present only with the postgres backend; used by the readiness probe
    pub db: Option<PgPool>,
}

impl AppState {
    /// State backed by process-local storage.
    pub fn in_memory(machine_id: u16) -> Self {
        let service = FacultyServiceImpl::new(
            Arc::new(InMemoryFacultyRepository::new()),
            Arc::new(SnowflakeGenerator::new(machine_id)),
        );

        Self {
            faculty_service: Arc::new(service),
            db: None,
        }
    }

    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, machine_id: u16) -> Self {
        let service = FacultyServiceImpl::new(
            Arc::new(PgFacultyRepository::new(pool.clone())),
            Arc::new(SnowflakeGenerator::new(machine_id)),
        );

        Self {
            faculty_service: Arc::new(service),
            db: Some(pool),
        }
    }

    /// Build the state for the configured storage backend.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let machine_id = settings.snowflake.machine_id;

        match settings.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Ok(Self::in_memory(machine_id))
            }
            StorageBackend::Postgres => {
                let db = database::create_pool(&settings.database)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                tracing::info!("Database connection pool created");

                if settings.database.run_migrations {
                    database::run_migrations(&db)
                        .await
                        .context("Failed to run database migrations")?;
                    tracing::info!("Database migrations applied");
                }

                Ok(Self::postgres(db, machine_id))
            }
        }
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let state = AppState::from_settings(&settings).await?;

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(middleware::from_fn(logging::track_metrics))
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .with_context(|| format!("Invalid server address {}", settings.server_addr()))?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until Ctrl+C or SIGTERM
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
