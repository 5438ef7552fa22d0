//! Embedding abstraction and the dimension adapter.
//!
//! Providers return vectors of whatever length their model produces. The
//! collection has a fixed dimensionality, so every raw vector goes through
//! [`normalize_dimension`] inside [`ResizedEmbedder`] before it is used
//! as a query.

pub mod llm;

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, trace};

use crate::errors::RagError;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in an embedding backend. Async because real
/// providers perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    /// Produces a raw embedding for `text`.
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>>;
}

/// Fits `v` to exactly `dim` components.
///
/// - `len == dim`: unchanged
/// - `len > dim`: keeps the first `dim` components (prefix truncation, not a projection)
/// - `len < dim`: pads with zeros
///
/// # Example
/// ```
/// use rag_store::normalize_dimension;
///
/// assert_eq!(normalize_dimension(vec![1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
/// assert_eq!(normalize_dimension(vec![1.0], 3), vec![1.0, 0.0, 0.0]);
/// ```
pub fn normalize_dimension(mut v: Vec<f32>, dim: usize) -> Vec<f32> {
    if v.len() != dim {
        trace!(from = v.len(), to = dim, "normalize_dimension: resizing");
    }
    v.resize(dim, 0.0);
    v
}

/// Embedding adapter that guarantees the index dimensionality.
///
/// Wraps any [`EmbeddingsProvider`]; provider errors pass through unchanged
/// and are never retried.
#[derive(Clone)]
pub struct ResizedEmbedder {
    inner: Arc<dyn EmbeddingsProvider>,
    dim: usize,
    concurrency: usize,
}

impl ResizedEmbedder {
    /// `dim` is the collection dimensionality; `concurrency` bounds parallel
    /// provider calls in [`ResizedEmbedder::embed_batch`].
    pub fn new(inner: Arc<dyn EmbeddingsProvider>, dim: usize, concurrency: usize) -> Self {
        Self {
            inner,
            dim,
            concurrency: concurrency.max(1),
        }
    }

    /// Target dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embeds one text and fits it to the index dimensionality.
    ///
    /// # Errors
    /// Whatever the provider returns.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let raw = self.inner.embed(text).await?;
        if raw.len() != self.dim {
            debug!(raw = raw.len(), target = self.dim, "embedding dimension adjusted");
        }
        Ok(normalize_dimension(raw, self.dim))
    }

    /// Embeds several texts; output order matches `texts`.
    ///
    /// The first failing call fails the whole batch.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        debug!(
            total = texts.len(),
            concurrency = self.concurrency,
            "embed_batch: start"
        );

        stream::iter(texts.iter())
            .map(|t| self.embed_query(t))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}

impl EmbeddingsProvider for ResizedEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(self.embed_query(text))
    }
}
