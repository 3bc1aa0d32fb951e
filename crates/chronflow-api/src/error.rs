//! Maps `chronflow_core::Error` onto an HTTP status + JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

pub struct ApiError(chronflow_core::Error);

impl From<chronflow_core::Error> for ApiError {
    fn from(e: chronflow_core::Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self.0 {
            chronflow_core::Error::BadInput(msg) => (StatusCode::BAD_REQUEST, "bad_input", msg),
            chronflow_core::Error::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            chronflow_core::Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };
        (status, Json(ErrorBody { code, message })).into_response()
    }
}
