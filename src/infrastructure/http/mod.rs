//! HTTP clients for the console API.

mod refresh_client;

pub use refresh_client::HttpRefreshClient;
