//! Application Services
//!
//! ## Available Services
//!
//! - **SessionManager**: login, logout, refresh, idle and absolute expiry
//! - **Timers**: abort-on-drop handles for the manager's timer lines

pub mod session_manager;
pub mod timers;

pub use session_manager::{SessionBackends, SessionManager};
pub use timers::{TimerHandle, Timers};
