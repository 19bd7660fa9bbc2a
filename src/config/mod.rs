//! # Configuration Module
//!
//! This module handles session configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use console_session::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Refreshing against {}", settings.api.refresh_url());
//! ```

mod settings;

pub use settings::*;
