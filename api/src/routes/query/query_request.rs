use serde::Deserialize;

/// Request payload for /query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Natural language question, passed to the pipeline verbatim.
    pub query: String,
}
