//! # Console Session
//!
//! Headless runner for the console session core.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Persistent session store
//! - Refresh endpoint client
//! - Session monitors

use anyhow::Result;
use tracing::info;

use console_session::config::Settings;
use console_session::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    console_session::telemetry::init_tracing();

    info!("Starting console session...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        environment = %settings.environment,
        store = %settings.storage.path.display(),
        idle_timeout_ms = settings.session.idle_timeout_ms,
        session_lifetime_ms = settings.session.session_lifetime_ms,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings)?;

    application.run_until_stopped().await?;

    info!("Console session stopped");
    Ok(())
}
