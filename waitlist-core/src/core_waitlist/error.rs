//! Error taxonomy for the waitlist endpoints

use super::types::ErrorResponse;
use crate::core_email::EmailRejected;
use crate::core_store::StoreError;
use crate::telemetry::{self, STORE_ERRORS};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum WaitlistError {
    /// Request body is not JSON
    #[error("Invalid JSON")]
    InvalidJson,

    /// `email` is missing or not an acceptable address
    #[error("Invalid email")]
    InvalidEmail(#[source] EmailRejected),

    /// Admin key missing, wrong, or not configured
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The store failed; details are logged, never returned
    #[error("Server error")]
    Server(#[from] StoreError),
}

impl WaitlistError {
    pub fn status(&self) -> StatusCode {
        match self {
            WaitlistError::InvalidJson | WaitlistError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            WaitlistError::Unauthorized => StatusCode::UNAUTHORIZED,
            WaitlistError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WaitlistError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WaitlistError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            WaitlistError::Unauthorized | WaitlistError::MethodNotAllowed => {
                (status, self.to_string()).into_response()
            }
            WaitlistError::Server(ref source) => {
                error!("Store operation failed: {}", source);
                telemetry::record_counter(STORE_ERRORS);
                (status, Json(ErrorResponse::new(self.to_string()))).into_response()
            }
            WaitlistError::InvalidJson | WaitlistError::InvalidEmail(_) => {
                (status, Json(ErrorResponse::new(self.to_string()))).into_response()
            }
        }
    }
}

pub type WaitlistResult<T> = Result<T, WaitlistError>;
