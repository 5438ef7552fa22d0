//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! Retrieval only: the collection is populated upstream, so the facade
//! never creates, drops or writes to it.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{SearchPointsBuilder, Value as QValue};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::RagConfig;
use crate::errors::RagError;

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
}

impl QdrantFacade {
    /// Builds the gRPC client. Does not touch the collection.
    ///
    /// # Errors
    /// `RagError::Config` for invalid config, `RagError::Qdrant` if the client cannot be built.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(format!("client build: {e}")))?;

        info!(url = %cfg.qdrant_url, collection = %cfg.collection, "Qdrant client ready");

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    /// Collection name this facade searches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// k-NN search with payloads.
    ///
    /// Returns `(score, payload)` in the order Qdrant reports (descending similarity).
    pub async fn search(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<(f32, Map<String, Value>)>, RagError> {
        debug!(collection = %self.collection, top_k, "search_points");

        let builder = SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(format!("search_points: {e}")))?;

        let out = res
            .result
            .into_iter()
            .map(|p| (p.score, qpayload_to_json(p.payload)))
            .collect::<Vec<_>>();

        debug!(hits = out.len(), "search completed");
        Ok(out)
    }
}

/// Converts a Qdrant payload into a JSON object, nested values included.
fn qpayload_to_json(payload: HashMap<String, QValue>) -> Map<String, Value> {
    payload.into_iter().map(|(k, v)| (k, v.into_json())).collect()
}
