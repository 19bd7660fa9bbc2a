//! # Domain Entities
//!
//! The session core has a single entity, the client-side `SessionState`,
//! persisted as string keys through the `KeyValueStore` contract. The store
//! trait is implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod session;

pub use session::{
    KeyValueStore, PendingLogin, SessionState, StorageOp, EMAIL_KEY, LOGIN_TIME_KEY, ROLE_KEY, TOKEN_KEY,
};
