//! Storage Module
//!
//! Key-value stores backing the session core.
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! |  SessionManager   |
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! |  NamespacedStore  |  <-- prefixes keys, purges by prefix
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! |   KeyValueStore   |  <-- Abstract interface (domain)
//! +-------------------+
//!     |           |
//!     v           v
//! FileStore   MemoryStore
//! (long-lived) (short-lived / tests)
//! ```

mod file_store;
mod memory_store;
mod namespaced;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use namespaced::NamespacedStore;
