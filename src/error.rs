//! Error types for errtrack-actix
//!
//! Reporter failures are logged and dropped, and [`PanicError`] only exists
//! to hand a caught panic to the tracker as an ordinary error value. The one
//! error a client ever sees is [`RecoveredPanic`], as a bare 500.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::any::Any;

use thiserror::Error;

/// Failure returned by a [`Reporter`](crate::Reporter)
#[derive(Error, Debug)]
pub enum ReportError {
    /// The tracker client could not hand the report off
    #[error("Failed to send report: {0}")]
    Transport(String),

    /// Building the report payload failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error for unexpected failures
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl ReportError {
    /// Create a generic error from any message
    pub fn from_string(msg: impl Into<String>) -> Self {
        ReportError::Other(msg.into())
    }
}

/// A caught panic, rendered to a string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PanicError(String);

impl PanicError {
    /// Render a panic payload.
    ///
    /// `panic!` with a literal produces `&'static str`, with format args a
    /// `String`. Anything else came from `panic_any` and has no text.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_owned()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "Box<dyn Any>".to_owned()
        };
        Self(message)
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Error returned by [`ErrorRecovery`](crate::ErrorRecovery) in place of a
/// panicked request
///
/// Renders as `500 Internal Server Error` with an empty body.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Internal Server Error")]
pub struct RecoveredPanic;

impl ResponseError for RecoveredPanic {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError().finish()
    }
}
