//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};

use super::errors::ErrorResponse;

pub mod send_email;

/// Answer requests for paths that do not exist
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Catch panics and return a 500 error
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };

    tracing::error!(%details, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(details))).into_response()
}
