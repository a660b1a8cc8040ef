use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::geometry::GeometryError;

/// Core error taxonomy shared by the layout, pricing and quote modules.
///
/// Every variant carries a human-readable cause; the HTTP layer decides the status code.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Malformed or out-of-range numeric input, rejected before any computation.
    #[error("Invalid quote input: {0}")]
    InvalidQuoteInput(String),

    #[error("Unknown sofa topology: '{0}'")]
    UnknownTopology(String),

    #[error("Missing dimension '{dimension}' required by topology {topology}")]
    MissingDimension {
        topology: String,
        dimension: &'static str,
    },

    /// Unexpected failure inside the geometry model or the cushion packer.
    /// No partial report ever escapes alongside this error.
    #[error("Layout computation failed: {source}")]
    LayoutComputation {
        #[source]
        source: GeometryError,
    },
}

impl QuoteError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        QuoteError::InvalidQuoteInput(msg.into())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    /// Request body could not be read as a configuration record.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Quote(err) => match err {
                QuoteError::InvalidQuoteInput(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_QUOTE_INPUT", err.to_string())
                }
                QuoteError::UnknownTopology(_) => {
                    (StatusCode::BAD_REQUEST, "UNKNOWN_TOPOLOGY", err.to_string())
                }
                QuoteError::MissingDimension { .. } => {
                    (StatusCode::BAD_REQUEST, "MISSING_DIMENSION", err.to_string())
                }
                QuoteError::LayoutComputation { source } => {
                    tracing::error!("Layout computation error: {source}");
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "LAYOUT_COMPUTATION_ERROR",
                        err.to_string(),
                    )
                }
            },
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let resp = AppError::from(QuoteError::invalid("thickness must be positive")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_layout_computation_maps_to_unprocessable() {
        let err = QuoteError::LayoutComputation {
            source: GeometryError::DegenerateBench {
                bench: "bottom".to_string(),
                length_cm: -40.0,
            },
        };
        let resp = AppError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let resp = AppError::from(anyhow::anyhow!("worker thread panicked")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_dimension_message_names_dimension() {
        let err = QuoteError::MissingDimension {
            topology: "u_two_corners".to_string(),
            dimension: "tz",
        };
        let msg = err.to_string();
        assert!(msg.contains("tz"));
        assert!(msg.contains("u_two_corners"));
    }

    #[test]
    fn test_layout_computation_keeps_source() {
        use std::error::Error;
        let err = QuoteError::LayoutComputation {
            source: GeometryError::DegenerateBench {
                bench: "left".to_string(),
                length_cm: 0.0,
            },
        };
        assert!(err.source().is_some());
    }
}
