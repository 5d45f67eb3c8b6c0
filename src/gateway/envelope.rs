//! Response envelope unwrapping.
//!
//! Every backend response wraps its payload in
//! `{success, message, data, code?}`. A 2xx transport status does not
//! imply business success: a non-200 `code` (or `success = false`) must
//! surface as a typed error, never as a payload.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Business success code used by the backend.
const BUSINESS_OK: i64 = 200;

/// Outer JSON wrapper around every API response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub code: Option<i64>,
}

impl Envelope {
    /// Validate the envelope and deserialize its payload.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        if let Some(code) = self.code {
            if code != BUSINESS_OK {
                return Err(ApiError::Business {
                    code,
                    message: self.message,
                });
            }
        }
        if !self.success {
            return Err(ApiError::Business {
                code: self.code.unwrap_or_default(),
                message: self.message,
            });
        }
        serde_json::from_value(self.data)
            .map_err(|err| ApiError::InvalidResponse(format!("payload shape mismatch: {err}")))
    }
}
