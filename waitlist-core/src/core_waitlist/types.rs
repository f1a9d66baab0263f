//! Request/response bodies

use super::error::WaitlistError;
use serde::Serialize;
use serde_json::Value;

/// Body of `POST /waitlist`
///
/// The email is kept as a raw JSON value; the normalizer decides whether it
/// is acceptable. A body that is valid JSON but not an object, or an object
/// without `email`, yields `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRequest {
    pub email: Value,
}

impl JoinRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, WaitlistError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| WaitlistError::InvalidJson)?;
        let email = value.get("email").cloned().unwrap_or(Value::Null);
        Ok(Self { email })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub ok: bool,
    pub already_joined: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub ok: bool,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub ok: bool,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
