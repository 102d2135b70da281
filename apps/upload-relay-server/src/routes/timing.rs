//! Request arrival timestamps

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// When the request reached the router, before any extraction ran
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

/// Middleware stamping each request with its arrival time
pub async fn stamp_start(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(RequestStart(Instant::now()));
    next.run(request).await
}
