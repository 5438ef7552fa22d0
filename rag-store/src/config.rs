//! Runtime configuration for embedding and retrieval.

use ai_llm_service::error_handler::{env_or, env_parse, must_env, validate_http_endpoint};

use crate::errors::RagError;

/// Default index dimensionality when `EMBEDDING_DIM` is unset.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;
/// Default number of passages fetched per query.
pub const DEFAULT_TOP_K: u64 = 4;

/// Configuration for the vector index and the embedding adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Collection holding the pre-indexed passages.
    pub collection: String,
    /// Payload key that carries the passage text.
    pub text_key: String,
    /// Dimensionality D of every vector in the collection.
    pub embedding_dim: usize,
    /// Parallel provider calls in `embed_batch`.
    pub embedding_concurrency: usize,
    /// Retrieval depth k.
    pub top_k: u64,
}

impl RagConfig {
    /// Creates a config with defaults for everything except endpoint and collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            text_key: "text".into(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embedding_concurrency: 4,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Loads the config from environment variables and validates it.
    ///
    /// `QDRANT_COLLECTION` is required; everything else has a default.
    ///
    /// # Errors
    /// `RagError::Config` on a missing collection or malformed numbers.
    pub fn from_env() -> Result<Self, RagError> {
        let to_cfg = |e: ai_llm_service::AiLlmError| RagError::Config(e.to_string());

        let qdrant_url = env_or("QDRANT_URL", "http://localhost:6334");
        validate_http_endpoint("QDRANT_URL", &qdrant_url).map_err(to_cfg)?;

        let cfg = Self {
            qdrant_url,
            qdrant_api_key: std::env::var("QDRANT_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            collection: must_env("QDRANT_COLLECTION").map_err(to_cfg)?,
            text_key: env_or("RAG_TEXT_KEY", "text"),
            embedding_dim: env_parse("EMBEDDING_DIM", DEFAULT_EMBEDDING_DIM, "expected usize")
                .map_err(to_cfg)?,
            embedding_concurrency: env_parse("EMBEDDING_CONCURRENCY", 4usize, "expected usize")
                .map_err(to_cfg)?,
            top_k: env_parse("RAG_TOP_K", DEFAULT_TOP_K, "expected u64").map_err(to_cfg)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.text_key.trim().is_empty() {
            return Err(RagError::Config("text_key is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RagConfig::new_default("http://localhost:6334", "grants");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.embedding_dim, 1024);
        assert_eq!(cfg.top_k, 4);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let mut cfg = RagConfig::new_default("http://localhost:6334", "grants");
        cfg.embedding_dim = 0;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }
}
