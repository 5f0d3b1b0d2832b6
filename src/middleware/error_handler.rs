use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::error;

/// 服务器错误的响应体最多记录这么多字节
const LOGGED_BODY_LIMIT: usize = 4096;

pub async fn log_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;

    if !response.status().is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, LOGGED_BODY_LIMIT).await {
        Ok(b) => b,
        Err(e) => {
            error!("{} {} failed with {}, body unreadable: {}", method, uri, parts.status, e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    error!(
        "{} {} failed with {}: {}",
        method,
        uri,
        parts.status,
        String::from_utf8_lossy(&bytes)
    );

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
