//! # Domain Layer
//!
//! The domain layer contains the client session model and the contracts of
//! the collaborators the session core depends on. It is independent of any
//! runtime, HTTP client or storage backend.
//!
//! ## Structure
//!
//! - **entities**: `SessionState` and the `KeyValueStore` it persists through
//! - **value_objects**: token claims, activity kinds, notification severity
//! - **events**: lifecycle events published by the session manager
//! - **ports**: refresh endpoint, notification and navigation sinks

pub mod entities;
pub mod events;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use events::*;
pub use ports::*;
pub use value_objects::*;
