use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Request observability middleware: wraps every request in a span carrying
/// a fresh request id, the method and the matched route pattern, and logs
/// the response status with latency.
pub async fn observability_middleware(
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    // Unmatched requests have no route pattern; fall back to the raw path.
    let route = matched_path
        .as_ref()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let start_time = Instant::now();

    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        route = %route,
        request_id = %uuid::Uuid::now_v7(),
    );

    let response = next.run(request).instrument(span).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    info!(
        method = %method,
        route = %route,
        status = status_code,
        duration_ms = duration.as_millis() as u64,
        "request completed"
    );

    response
}
