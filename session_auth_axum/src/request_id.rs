use axum::{extract::Request, middleware::Next, response::Response};
use http::header::HeaderValue;
use uuid::Uuid;

/// Unique id assigned to each request, available via request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Assign each request a UUID, make it available to handlers and echo it
/// back in the `X-Request-ID` response header.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(request_id.clone()));

    tracing::info!(%request_id, method = %req.method(), uri = %req.uri(), "Incoming request");

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("X-Request-ID", value);
    }
    tracing::info!(%request_id, status = response.status().as_u16(), "Outgoing response");

    response
}
