//! Error types for facet processing.
//!
//! Filter validation failures are client errors and render as an HTTP 400
//! response with one entry per offending field:
//!
//! ```json
//! {
//!   "status": 400,
//!   "message": "Validation error.",
//!   "errors": [{ "field": "year", "message": "Invalid range format." }]
//! }
//! ```
//!
//! Configuration errors are the hosting application's fault and render as 500.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message used for every malformed range value.
pub const INVALID_RANGE_FORMAT: &str = "Invalid range format.";

/// The error type for facet operations.
#[derive(Error, Debug)]
pub enum FacetError {
    /// A request value could not be turned into a filter expression.
    #[error("invalid value for filter '{field}': {message}")]
    FilterValidation { field: String, message: String },

    /// The facet configuration document is malformed.
    #[error("invalid facet configuration: {message}")]
    Config { message: String },

    /// The facet configuration file could not be read.
    #[error("failed to read facet configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl FacetError {
    /// Creates a filter validation error scoped to `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FacetError::FilterValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        FacetError::Config {
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by client input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FacetError::FilterValidation { .. })
    }

    /// Returns the `(field, message)` pairs reported to the client.
    pub fn field_errors(&self) -> Vec<(&str, &str)> {
        match self {
            FacetError::FilterValidation { field, message } => {
                vec![(field.as_str(), message.as_str())]
            }
            _ => Vec::new(),
        }
    }

    /// Returns the HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Builds the JSON error envelope.
    pub fn to_envelope(&self) -> serde_json::Value {
        let status = self.status_code();
        if self.is_client_error() {
            let errors: Vec<_> = self
                .field_errors()
                .into_iter()
                .map(|(field, message)| json!({ "field": field, "message": message }))
                .collect();
            json!({
                "status": status.as_u16(),
                "message": "Validation error.",
                "errors": errors,
            })
        } else {
            json!({
                "status": status.as_u16(),
                "message": self.to_string(),
            })
        }
    }
}

impl From<serde_json::Error> for FacetError {
    fn from(err: serde_json::Error) -> Self {
        FacetError::config(err.to_string())
    }
}

impl IntoResponse for FacetError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.to_envelope())).into_response()
    }
}

/// Result type alias for facet operations.
pub type FacetResult<T> = Result<T, FacetError>;
