//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **TokenClaims**: the `exp` claim peeked out of a bearer token
//! - **ActivityKind**: user interactions that reset the idle timer
//! - **Severity**: notification level, plus the fixed notification texts

mod activity;
mod notification;
mod token_claims;

pub use activity::*;
pub use notification::*;
pub use token_claims::*;
