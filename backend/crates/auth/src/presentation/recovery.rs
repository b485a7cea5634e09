//! Panic Recovery
//!
//! Outermost stage. Converts a panic anywhere downstream into a 500 and
//! keeps the server running.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::AssertUnwindSafe;

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;
use kernel::error::app_error::AppError;

/// Panic payload that deliberately aborts the request
///
/// Raise it with `std::panic::panic_any(AbortRequest)`. Recovery re-raises
/// it instead of answering.
#[derive(Debug, Clone, Copy)]
pub struct AbortRequest;

thread_local! {
    static LAST_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Install a panic hook that records the backtrace at the panic site
///
/// The recorded trace is attached to the recovery log entry. The previous
/// hook still runs afterwards.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if info.payload().is::<AbortRequest>() {
            return;
        }
        let backtrace = Backtrace::force_capture().to_string();
        LAST_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(backtrace));
        previous(info);
    }));
}

/// Recovery middleware
pub async fn recover(req: Request, next: Next) -> Response {
    let upgrading = is_upgrade_request(req.headers());
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            if payload.is::<AbortRequest>() {
                std::panic::resume_unwind(payload);
            }

            // Unwinding runs on the polling thread, so the hook's slot is ours
            let backtrace = LAST_BACKTRACE
                .with(|slot| slot.borrow_mut().take())
                .unwrap_or_else(|| Backtrace::force_capture().to_string());

            tracing::error!(
                panic = %panic_message(payload.as_ref()),
                method = %method,
                path = %path,
                backtrace = %backtrace,
                "Recovered from panic in request handler"
            );

            if upgrading {
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                response
                    .headers_mut()
                    .insert(header::CONNECTION, HeaderValue::from_static("close"));
                response
            } else {
                AppError::internal("internal server error").into_response()
            }
        }
    }
}

/// `Connection: upgrade` together with an `Upgrade` header
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    let connection_upgrade = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));

    connection_upgrade && headers.contains_key(header::UPGRADE)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_detection() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, Upgrade"));
        assert!(!is_upgrade_request(&headers));

        headers.insert(header::UPGRADE, HeaderValue::from_static("websocket"));
        assert!(is_upgrade_request(&headers));

        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        assert!(!is_upgrade_request(&headers));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(payload.as_ref()), "kaboom");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
