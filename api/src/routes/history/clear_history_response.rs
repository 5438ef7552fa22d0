use serde::Serialize;

pub const CLEARED_MESSAGE: &str = "Chat history cleared successfully";

/// Response payload for /clear_history.
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub message: &'static str,
    /// Rows removed by this call.
    pub deleted: usize,
}
