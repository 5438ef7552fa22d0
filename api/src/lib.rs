//! HTTP surface of the grant-writing Q&A service.

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

#[cfg(test)]
mod test_support;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::{json_extractor::json_error_mapper, request_id::ensure_request_id},
    routes::{
        history::history_route::{clear_history_route, history_route},
        query::query_route::query_route,
    },
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Builds the router. Each route also answers with a trailing slash.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/query", post(query_route))
        .route("/query/", post(query_route))
        .route("/history", get(history_route))
        .route("/history/", get(history_route))
        .route("/clear_history", delete(clear_history_route))
        .route("/clear_history/", delete(clear_history_route))
        .layer(middleware::from_fn(json_error_mapper))
        .layer(middleware::from_fn(ensure_request_id))
        .with_state(state)
}

/// Wires the pipeline from the environment and serves until Ctrl+C.
///
/// # Errors
/// `AppError::Config` before binding if configuration is invalid,
/// `AppError::Bind`/`AppError::Server` for socket failures.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env()?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::middleware_layer::request_id::REQUEST_ID_HEADER;
    use crate::test_support::{Answer, read_body, state};

    fn post_query(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn bare(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn query_streams_on_both_paths() {
        let state = state(Answer::Text("The funding is 2 million euros."));

        for uri in ["/query", "/query/"] {
            let res = router(state.clone())
                .oneshot(post_query(uri, r#"{"query":"What is the funding amount?"}"#))
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::OK, "{uri}");
            let id = res.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_owned();
            assert!(id.starts_with("req-"), "{id}");
            assert_eq!(read_body(res).await, "The funding is 2 million euros. ");
        }
    }

    #[tokio::test]
    async fn supplied_request_id_is_echoed() {
        let mut req = post_query("/query", r#"{"query":"q"}"#);
        req.headers_mut()
            .insert(REQUEST_ID_HEADER, axum::http::HeaderValue::from_static("abc-123"));

        let res = router(state(Answer::Text("ok"))).oneshot(req).await.unwrap();
        assert_eq!(res.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn wrong_shape_is_wrapped_in_envelope() {
        let res = router(state(Answer::Text("unused")))
            .oneshot(post_query("/query", r#"{"q":1}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));

        let body: Value = serde_json::from_str(&read_body(res).await).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert_eq!(body["error"]["details"][0]["path"], "query");
    }

    #[tokio::test]
    async fn broken_json_is_wrapped_in_envelope() {
        let res = router(state(Answer::Text("unused")))
            .oneshot(post_query("/query", r#"{"query":"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&read_body(res).await).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn blank_query_keeps_handler_error_body() {
        let res = router(state(Answer::Text("unused")))
            .oneshot(post_query("/query/", r#"{"query":"   "}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&read_body(res).await).unwrap();
        assert_eq!(body["error"], "BAD_REQUEST");
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn clear_then_list_history() {
        let state = state(Answer::Text("ok"));
        for q in ["first", "second"] {
            let res = router(state.clone())
                .oneshot(post_query("/query", &json!({ "query": q }).to_string()))
                .await
                .unwrap();
            read_body(res).await;
        }

        let res = router(state.clone()).oneshot(bare(Method::GET, "/history")).await.unwrap();
        let listed: Value = serde_json::from_str(&read_body(res).await).unwrap();
        assert_eq!(listed[0]["question"], "second");

        let res = router(state.clone())
            .oneshot(bare(Method::DELETE, "/clear_history/"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let cleared: Value = serde_json::from_str(&read_body(res).await).unwrap();
        assert_eq!(cleared["deleted"], 2);

        let res = router(state).oneshot(bare(Method::GET, "/history/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(read_body(res).await, "[]");
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let res = router(state(Answer::Text("unused")))
            .oneshot(bare(Method::GET, "/query"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
