use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Reason string reported to clients for every rejected bar.
pub const INVALID_INPUT: &str = "invalid-input";

/// Why a candidate bar was rejected.  Rejection never mutates engine state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("bar payload is not a JSON object")]
    NotAnObject,

    #[error("malformed bar payload: {0}")]
    Malformed(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` is not a number")]
    NotNumeric(&'static str),

    #[error("field `{0}` is not finite")]
    NonFinite(&'static str),

    #[error("timestamp is empty")]
    EmptyTimestamp,
}

impl ValidationError {
    pub fn reason(&self) -> &'static str {
        INVALID_INPUT
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = json!({
            "ok": false,
            "reason": self.reason(),
            "detail": self.to_string(),
        });
        (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
    }
}
