//! JWT expiry inspection.
//!
//! The client never verifies signatures; it only reads the `exp` claim
//! to decide whether a stored token is still worth presenting. Every
//! decode failure counts as expired: a token we cannot read is a token
//! we do not trust.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use std::fmt;

/// Why a token's expiry could not be read.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The token does not have a claims segment.
    MissingClaims,
    /// The claims segment is not valid base64url.
    Base64,
    /// The decoded claims are not valid JSON.
    Json,
    /// The claims carry no `exp` field.
    MissingExpiry,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingClaims => write!(f, "token has no claims segment"),
            Self::Base64 => write!(f, "claims segment is not valid base64url"),
            Self::Json => write!(f, "claims are not valid JSON"),
            Self::MissingExpiry => write!(f, "claims carry no exp field"),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Extract the expiry instant from a JWT, in Unix milliseconds.
///
/// Tolerates both padded and unpadded base64url claims segments.
pub fn decode_expiry(token: &str) -> Result<i64, DecodeError> {
    let claims_segment = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(DecodeError::MissingClaims)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(claims_segment.trim_end_matches('='))
        .map_err(|_| DecodeError::Base64)?;
    let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| DecodeError::Json)?;
    let exp_secs = claims.exp.ok_or(DecodeError::MissingExpiry)?;
    Ok(exp_secs.saturating_mul(1000))
}

/// Whether `token` is expired at `now_millis`.
///
/// Fails closed: any token whose expiry cannot be decoded reads as
/// expired.
pub fn is_expired(token: &str, now_millis: i64) -> bool {
    match decode_expiry(token) {
        Ok(expiry_millis) => now_millis >= expiry_millis,
        Err(err) => {
            tracing::debug!("treating undecodable token as expired: {err}");
            true
        }
    }
}
