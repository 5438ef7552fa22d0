//! Guarantees every request and response carries `X-Request-Id`.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Client-supplied id if present and non-blank.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
}

fn generate_request_id() -> String {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Propagates a supplied id or generates one, on the request and the response.
pub async fn ensure_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = match request_id(req.headers()) {
        Some(id) => id.to_string(),
        None => generate_request_id(),
    };
    let value = HeaderValue::from_str(&id).ok();
    if let Some(v) = &value {
        req.headers_mut().insert(REQUEST_ID_HEADER, v.clone());
    }

    let mut res = next.run(req).await;
    if let Some(v) = value {
        res.headers_mut().insert(REQUEST_ID_HEADER, v);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_ignored() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  "));
        assert_eq!(request_id(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-1"));
        assert_eq!(request_id(&headers), Some("abc-1"));
    }

    #[test]
    fn generated_ids_are_valid_header_values() {
        let id = generate_request_id();
        assert!(id.starts_with("req-"));
        assert!(HeaderValue::from_str(&id).is_ok());
    }
}
