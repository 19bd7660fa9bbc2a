//! Presentation Layer
//!
//! Glue between the session core and a UI: route guards, logout navigation
//! and activity forwarding.

pub mod activity;
pub mod guard;
pub mod navigation;

pub use activity::ActivityListener;
pub use guard::{GuardDecision, RouteGuard};
pub use navigation::{LoggingNavigator, NavigationListener};
