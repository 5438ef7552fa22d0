//! Embedding provider backed by the shared LLM service.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use futures::future::BoxFuture;

use crate::{EmbeddingsProvider, RagError};

/// Delegates to the **embedding** profile of [`LlmServiceProfiles`]
/// (OpenAI `/v1/embeddings` or Ollama `/api/embeddings`).
///
/// Returns raw vectors; wrap it in [`crate::ResizedEmbedder`] to fit the index.
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(async move { Ok(self.svc.embed(text).await?) })
    }
}
