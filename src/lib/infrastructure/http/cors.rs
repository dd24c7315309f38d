//! CORS headers added to every response

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, VARY,
        },
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use clap::Parser;

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct CorsConfig {
    /// The origin allowed to call the API
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "*")]
    pub allowed_origin: String,
}

impl CorsConfig {
    /// The `Access-Control-Allow-Origin` value for this configuration
    pub fn allow_origin(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.allowed_origin)
            .with_context(|| format!("invalid ALLOWED_ORIGIN: {:?}", self.allowed_origin))
    }
}

/// Sets the CORS headers on the response, whatever its status.
pub async fn cors_headers(
    State(allow_origin): State<HeaderValue>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(VARY, HeaderValue::from_static("Origin"));

    response
}
