//! Passage retrieval over a vector index.

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::config::RagConfig;
use crate::errors::RagError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::Passage;

/// Nearest-neighbour lookup for a ready query vector.
///
/// Implementations return at most `k` passages, ordered by descending
/// similarity as reported by the index, with no local re-ranking.
pub trait VectorRetriever: Send + Sync {
    fn retrieve<'a>(&'a self, query_vector: Vec<f32>, k: u64) -> BoxFuture<'a, Result<Vec<Passage>, RagError>>;
}

/// [`VectorRetriever`] over a Qdrant collection.
pub struct QdrantRetriever {
    facade: QdrantFacade,
    text_key: String,
    dim: usize,
}

impl QdrantRetriever {
    /// # Errors
    /// Returns `RagError::Config`/`RagError::Qdrant` if the client cannot be created.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        Ok(Self {
            facade: QdrantFacade::new(cfg)?,
            text_key: cfg.text_key.clone(),
            dim: cfg.embedding_dim,
        })
    }

    async fn search(&self, query_vector: Vec<f32>, k: u64) -> Result<Vec<Passage>, RagError> {
        check_dimension(&query_vector, self.dim)?;

        let hits = self.facade.search(query_vector, k).await?;
        let passages = into_passages(hits, &self.text_key, k);

        info!(
            collection = %self.facade.collection(),
            passages = passages.len(),
            "retrieved passages"
        );
        for p in &passages {
            debug!(rank = p.rank, score = p.score, metadata = ?p.metadata, text = %p.text, "passage");
        }
        Ok(passages)
    }
}

impl VectorRetriever for QdrantRetriever {
    fn retrieve<'a>(&'a self, query_vector: Vec<f32>, k: u64) -> BoxFuture<'a, Result<Vec<Passage>, RagError>> {
        Box::pin(self.search(query_vector, k))
    }
}

/// Every query vector must match the collection dimensionality.
pub fn check_dimension(v: &[f32], dim: usize) -> Result<(), RagError> {
    if v.len() != dim {
        return Err(RagError::VectorSizeMismatch { got: v.len(), want: dim });
    }
    Ok(())
}

/// Maps raw hits to passages, keeping index order and capping at `k`.
fn into_passages(
    hits: Vec<(f32, serde_json::Map<String, serde_json::Value>)>,
    text_key: &str,
    k: u64,
) -> Vec<Passage> {
    hits.into_iter()
        .take(usize::try_from(k).unwrap_or(usize::MAX))
        .enumerate()
        .map(|(rank, (score, payload))| Passage::from_payload(payload, text_key, score, rank))
        .collect()
}
