//! Request Logging
//!
//! One structured event per request, levelled by status band. Also assigns
//! the request id used to correlate log lines.
//!
//! The event fires once the response body has been sent or dropped, so
//! `bytes` is the number of body bytes actually written.

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request};
use axum::http::HeaderValue;
use axum::middleware::Next;
use http_body_util::BodyExt;
use axum::response::Response;
use platform::client::extract_client_ip;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inbound ids longer than this are replaced
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request id stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Logging middleware
pub async fn log_requests(mut req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let remote_addr = extract_client_ip(req.headers(), direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status().as_u16();
    let (parts, body) = response.into_parts();

    let body = count_body(body, move |bytes| {
        let duration_ms = start.elapsed().as_millis() as u64;
        match status {
            500.. => tracing::error!(
                duration_ms, %method, %path, status, bytes, %remote_addr, %request_id,
                "Request failed"
            ),
            400..=499 => tracing::warn!(
                duration_ms, %method, %path, status, bytes, %remote_addr, %request_id,
                "Request rejected"
            ),
            _ => tracing::info!(
                duration_ms, %method, %path, status, bytes, %remote_addr, %request_id,
                "Request completed"
            ),
        }
    });

    Response::from_parts(parts, body)
}

/// Reports the bytes seen so far when dropped
struct BodyCounter<F: FnOnce(u64)> {
    bytes: u64,
    on_done: Option<F>,
}

impl<F: FnOnce(u64)> Drop for BodyCounter<F> {
    fn drop(&mut self) {
        if let Some(on_done) = self.on_done.take() {
            on_done(self.bytes);
        }
    }
}

/// Wrap `body` so `on_done` receives the number of data bytes polled out of
/// it once the body is finished or dropped
fn count_body<F>(body: Body, on_done: F) -> Body
where
    F: FnOnce(u64) + Send + 'static,
{
    let mut counter = BodyCounter {
        bytes: 0,
        on_done: Some(on_done),
    };
    Body::new(body.map_frame(move |frame| {
        if let Some(data) = frame.data_ref() {
            counter.bytes += data.len() as u64;
        }
        frame
    }))
}
