//! # Console Session Library
//!
//! Client-side session lifecycle for the bulk SMS administration console:
//! - Login/logout with persisted, namespaced state
//! - Rehydration on startup
//! - Idle timeout and absolute session lifetime
//! - Proactive bearer token refresh
//! - Route guards and logout navigation
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Session entity, events, token claims and collaborator traits
//! - **Application Layer**: The session manager and its timers
//! - **Infrastructure Layer**: Key-value stores, refresh endpoint client, notifier
//! - **Presentation Layer**: Route guards, navigation and activity listeners
//!
//! ## Module Structure
//!
//! ```text
//! console_session/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, events and ports
//! +-- application/    Session manager and timers
//! +-- infrastructure/ Storage, HTTP refresh client, notifications
//! +-- presentation/   Guards and listeners
//! +-- shared/         Common utilities (errors, clocks)
//! ```

// Configuration module
pub mod config;

// Domain layer - Session model and contracts
pub mod domain;

// Application layer - Session lifecycle
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - Guards and listeners
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and wiring
pub mod startup;

// Telemetry and observability
pub mod telemetry;
