//! # Faculty Service Library
//!
//! This crate manages university faculties as an aggregate:
//! - Groups of students, with unique names inside a faculty
//! - Department heads referenced by user ID
//! - Merging several groups into one and splitting one into several
//! - RESTful HTTP API over in-memory or PostgreSQL storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: The Faculty aggregate, value objects, and the repository trait
//! - **Application Layer**: Faculty service and DTOs
//! - **Infrastructure Layer**: Repositories, database access, and metrics
//! - **Presentation Layer**: HTTP routes, handlers, and middleware
//!
//! ## Module Structure
//!
//! ```text
//! faculty_service/
//! +-- config/         Configuration management
//! +-- domain/         Aggregate, entities, value objects, and traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Repositories, database, and metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
