//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Logs request method, path, status, and duration.
///
/// Push tokens are part of the path, so only the route prefix is logged for
/// the public API.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = redact_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request"
        );
    }

    response
}

/// Replace the endpoint token in `/api/push/{token}[/ask]` with `***`.
fn redact_path(path: &str) -> String {
    match path.strip_prefix("/api/push/") {
        Some(rest) => match rest.split_once('/') {
            Some((_, tail)) => format!("/api/push/***/{tail}"),
            None => "/api/push/***".to_string(),
        },
        None => path.to_string(),
    }
}
