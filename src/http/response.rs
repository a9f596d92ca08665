//! Error-to-status translation.
//!
//! # Responsibilities
//! - Map pipeline errors to HTTP status codes
//! - Render a uniform JSON error body
//!
//! # Design Decisions
//! - Client input problems (body, validation, mapping) are 400
//! - Scoring failures are 500 and do not echo model internals
//! - Persistence never appears here; it cannot fail a request

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{MappingError, ValidationError};
use crate::model::ScoringError;

/// Every way `/predict` can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be read or deserialized into a `ChurnRequest`.
    #[error("invalid request body: {detail}")]
    InvalidRequest { status: StatusCode, detail: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest { status, .. } => *status,
            ApiError::Validation(_) | ApiError::Mapping(_) => StatusCode::BAD_REQUEST,
            ApiError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::InvalidRequest { detail, .. } => ErrorBody::new("invalid_request", detail.clone()),
            ApiError::Validation(e) => ErrorBody {
                group: Some(e.group().to_string()),
                ..ErrorBody::new("validation_failed", e.to_string())
            },
            ApiError::Mapping(e) => ErrorBody::new("mapping_failed", e.to_string()),
            ApiError::Scoring(_) => ErrorBody::new("scoring_failed", "the model could not score this request"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413; everything else is a plain bad request.
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::InvalidRequest {
            status,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// JSON error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable kind.
    pub error: String,
    pub detail: String,
    /// Offending one-hot group, for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ErrorBody {
    fn new(error: &str, detail: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            detail: detail.into(),
            group: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation = ApiError::from(ValidationError::GroupSum {
            group: "gender",
            sum: 2.0,
        });
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let mapping = ApiError::from(MappingError::MissingFeature("x".into()));
        assert_eq!(mapping.status(), StatusCode::BAD_REQUEST);

        let scoring = ApiError::from(ScoringError::ShapeMismatch {
            expected: 45,
            actual: 44,
        });
        assert_eq!(scoring.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_body_names_group() {
        let body = ApiError::from(ValidationError::GroupSum {
            group: "contract",
            sum: 0.0,
        })
        .body();
        assert_eq!(body.error, "validation_failed");
        assert_eq!(body.group.as_deref(), Some("contract"));
        assert!(body.detail.contains("'contract'"));
    }

    #[test]
    fn test_scoring_body_hides_internals() {
        let body = ApiError::from(ScoringError::Runtime("thread panicked at model.rs".into())).body();
        assert_eq!(body.error, "scoring_failed");
        assert!(!body.detail.contains("panicked"));
    }
}
