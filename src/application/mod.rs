//! Application Layer
//!
//! Orchestrates the session lifecycle on top of the domain contracts.

pub mod services;
