//! Embedding adapter and passage retrieval for the Q&A pipeline.
//!
//! This crate provides:
//! - [`ResizedEmbedder`]: wraps any [`EmbeddingsProvider`] and fits vectors to the index dimensionality
//! - [`VectorRetriever`] / [`QdrantRetriever`]: top‑K passages for a query vector
//!
//! Ingestion is out of scope: the collection is populated upstream.

mod config;
mod embed;
mod errors;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{DEFAULT_EMBEDDING_DIM, DEFAULT_TOP_K, RagConfig};
pub use embed::llm::LlmEmbedder;
pub use embed::{EmbeddingsProvider, ResizedEmbedder, normalize_dimension};
pub use errors::RagError;
pub use record::Passage;
pub use retrieve::{QdrantRetriever, VectorRetriever, check_dimension};
