//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Embedding or vector search failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] rag_store::RagError),

    /// The generative model call failed; no partial answer exists.
    #[error("generation error: {0}")]
    Generation(#[from] ai_llm_service::AiLlmError),

    #[error("history error: {0}")]
    History(#[from] history_store::HistoryError),

    /// Template body is unreadable or its slots are malformed.
    #[error("template error: {0}")]
    Template(String),

    /// A blocking history task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("config error: {0}")]
    Config(String),
}
