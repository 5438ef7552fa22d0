//! Rewrites axum's plain-text JSON rejections into the error envelope.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    msg.contains("query").then(|| "query".to_string())
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("missing field") {
        Some("Send a JSON object like { \"query\": \"your question\" }.".into())
    } else if msg.contains("expected a string") || msg.contains("invalid type") {
        Some("Field `query` must be a string.".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"query\": \"...\" }).".into())
    } else {
        None
    }
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    // handler errors are already JSON
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    let envelope = ApiResponse::<()>::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        vec![ApiErrorDetail {
            path: guess_path_from_serde_msg(&original),
            hint: hint_from_serde_msg(&original),
        }],
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_for_common_rejections() {
        let missing = "Failed to deserialize the JSON body into the target type: missing field `query` at line 1 column 2";
        assert_eq!(guess_path_from_serde_msg(missing).as_deref(), Some("query"));
        assert!(hint_from_serde_msg(missing).unwrap().contains("\"query\""));

        let wrong = "Failed to deserialize the JSON body into the target type: query: invalid type: integer `5`, expected a string";
        assert_eq!(hint_from_serde_msg(wrong).as_deref(), Some("Field `query` must be a string."));

        assert_eq!(hint_from_serde_msg("Failed to parse the request body as JSON"), None);
    }
}
