//! Per-exchange access logging.
//!
//! Every request is logged once its response is ready, whatever the outcome:
//! method, full URL, protocol version, referer and user agent, plus the
//! status and how long the handler took.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, HeaderName, Request},
    middleware::Next,
    response::Response,
};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Middleware that writes one access log line per exchange.
pub async fn access_log(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();
    let referer = header_text(request.headers(), header::REFERER);
    let user_agent = header_text(request.headers(), header::USER_AGENT);
    let request_id = header_text(request.headers(), HeaderName::from_static(X_REQUEST_ID));
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    let response = next.run(request).await;

    tracing::info!(
        request_id = %request_id,
        peer = %peer,
        method = %method,
        uri = %uri,
        version = ?version,
        referer = %referer,
        user_agent = %user_agent,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "\"{} {} {:?}\" \"{}\" \"{}\"",
        method,
        uri,
        version,
        referer,
        user_agent
    );

    response
}

fn header_text(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
