//! Refresh endpoint client.
//!
//! `POST {base_url}{refresh_path}` with `Authorization: Bearer <token>` and no
//! body. A successful response is a JSON object with a string `token` field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ApiSettings;
use crate::domain::TokenRefresher;
use crate::shared::error::RefreshError;

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    token: Option<serde_json::Value>,
}

/// reqwest-backed `TokenRefresher`.
#[derive(Clone)]
pub struct HttpRefreshClient {
    client: Client,
    url: String,
}

impl HttpRefreshClient {
    /// Create a client for an explicit endpoint URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RefreshError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("console-session/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a client from API settings.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self, RefreshError> {
        Self::new(settings.refresh_url(), settings.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenRefresher for HttpRefreshClient {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn refresh(&self, token: &str) -> Result<String, RefreshError> {
        let response = self
            .client
            .post(&self.url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: RefreshResponse = serde_json::from_str(&body)
            .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?;

        match parsed.token {
            Some(serde_json::Value::String(token)) if !token.is_empty() => {
                debug!("Refresh endpoint issued a new token");
                Ok(token)
            }
            _ => Err(RefreshError::MissingToken),
        }
    }
}
