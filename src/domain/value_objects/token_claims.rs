//! Bearer token claim inspection.
//!
//! The client never verifies signatures; it only peeks at the `exp` claim to
//! schedule a proactive refresh. The server stays the authority on validity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::shared::error::TokenDecodeError;

/// Claims the session core reads from a bearer token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp, seconds)
    #[serde(default)]
    pub exp: Option<f64>,
}

impl TokenClaims {
    /// Decode the claims segment of a three-part dot-delimited token.
    ///
    /// Accepts padded and unpadded base64url.
    pub fn decode(token: &str) -> Result<Self, TokenDecodeError> {
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenDecodeError::Malformed);
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Expiry in epoch milliseconds, if the token carries one.
    pub fn expires_at_millis(&self) -> Option<i64> {
        self.exp
            .filter(|exp| exp.is_finite() && *exp != 0.0)
            .map(|exp| (exp * 1000.0) as i64)
    }

    /// True when expiry is still ahead but closer than `threshold_ms`.
    pub fn within_refresh_window(&self, now_ms: i64, threshold_ms: u64) -> bool {
        match self.expires_at_millis() {
            Some(expires_at) => {
                let time_left = expires_at.saturating_sub(now_ms);
                let threshold = i64::try_from(threshold_ms).unwrap_or(i64::MAX);
                time_left > 0 && time_left < threshold
            }
            None => false,
        }
    }
}
