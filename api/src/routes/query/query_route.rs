//! POST /query — answers a question from the indexed documents.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use tracing::{Instrument, debug, info, info_span};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
    routes::query::query_request::QueryRequest,
};

pub const PLAIN_TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// Handler: POST /query
///
/// Streams the answer as `token + " "` chunks once the pipeline has a
/// complete, recorded answer; any failure before that is a JSON error.
///
/// # Example
/// ```bash
/// curl -N -X POST http://127.0.0.1:8000/query \
///   -H 'content-type: application/json' \
///   -d '{"query":"What is the funding amount per action?"}'
/// ```
pub async fn query_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(r): Json<QueryRequest>,
) -> AppResult<Response> {
    let span = info_span!("query", request_id = request_id(&headers).unwrap_or("-"));

    async move {
        if r.query.trim().is_empty() {
            return Err(AppError::BadRequest("field `query` must be a non-empty string".into()));
        }
        debug!(query_chars = r.query.len(), "query: start");

        let chunks = state.pipeline.answer_stream(&r.query).await?;
        info!("query: streaming answer");

        let body = Body::from_stream(chunks.map(Ok::<_, Infallible>));
        Ok(([(header::CONTENT_TYPE, HeaderValue::from_static(PLAIN_TEXT_UTF8))], body).into_response())
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::test_support::{Answer, read_body, state};

    fn request(q: &str) -> Json<QueryRequest> {
        Json(QueryRequest { query: q.into() })
    }

    #[tokio::test]
    async fn streams_plain_text_answer() {
        let state = state(Answer::Text("The funding is 2 million euros."));
        let res = query_route(State(state.clone()), HeaderMap::new(), request("What is the funding amount?"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], PLAIN_TEXT_UTF8);
        assert_eq!(read_body(res).await, "The funding is 2 million euros. ");

        let history = state.pipeline.history().await.unwrap();
        assert_eq!(history[0].question, "What is the funding amount?");
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let state = state(Answer::Text("unused"));
        let err = query_route(State(state.clone()), HeaderMap::new(), request("  \n"))
            .await
            .err()
            .unwrap();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(state.pipeline.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn generation_failure_is_a_json_error() {
        let state = state(Answer::Fail);
        let err = query_route(State(state.clone()), HeaderMap::new(), request("q"))
            .await
            .err()
            .unwrap();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), "GENERATION_FAILED");
        assert!(state.pipeline.history().await.unwrap().is_empty());
    }
}
