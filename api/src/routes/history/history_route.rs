//! GET /history and DELETE /clear_history.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use history_store::HistoryRecord;
use tracing::{debug, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    middleware_layer::request_id::request_id,
    routes::history::clear_history_response::{CLEARED_MESSAGE, ClearHistoryResponse},
};

/// Handler: GET /history
///
/// Every recorded exchange as `{question, answer}`, newest first.
pub async fn history_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<HistoryRecord>>> {
    let records = state.pipeline.history().await?;
    debug!(request_id = request_id(&headers).unwrap_or("-"), count = records.len(), "history listed");
    Ok(Json(records))
}

/// Handler: DELETE /clear_history
pub async fn clear_history_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<ClearHistoryResponse>> {
    let deleted = state.pipeline.clear_history().await?;
    info!(request_id = request_id(&headers).unwrap_or("-"), deleted, "history cleared");
    Ok(Json(ClearHistoryResponse {
        message: CLEARED_MESSAGE,
        deleted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    use crate::routes::query::{query_request::QueryRequest, query_route::query_route};
    use crate::test_support::{Answer, read_body, state};

    async fn ask(state: &Arc<AppState>, q: &str) {
        query_route(
            State(state.clone()),
            HeaderMap::new(),
            axum::Json(QueryRequest { query: q.into() }),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let state = state(Answer::Text("ok"));
        ask(&state, "first").await;
        ask(&state, "second").await;

        let res = history_route(State(state), HeaderMap::new()).await.unwrap().into_response();
        let json: serde_json::Value = serde_json::from_str(&read_body(res).await).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"question": "second", "answer": "ok"},
                {"question": "first", "answer": "ok"}
            ])
        );
    }

    #[tokio::test]
    async fn clear_reports_deleted_count() {
        let state = state(Answer::Text("ok"));
        ask(&state, "one").await;
        ask(&state, "two").await;

        let Json(cleared) = clear_history_route(State(state.clone()), HeaderMap::new()).await.unwrap();
        assert_eq!(cleared.deleted, 2);
        assert_eq!(cleared.message, "Chat history cleared successfully");

        let Json(records) = history_route(State(state), HeaderMap::new()).await.unwrap();
        assert!(records.is_empty());
    }
}
