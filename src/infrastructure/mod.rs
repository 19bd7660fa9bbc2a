//! Infrastructure Layer
//!
//! Implementations of the domain contracts:
//! - Key-value stores (JSON file, in-memory, prefix scoping)
//! - HTTP client for the token refresh endpoint
//! - Log-backed notification sink

pub mod http;
pub mod notify;
pub mod storage;
