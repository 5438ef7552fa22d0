//! Retrieval-augmented answering for the grant-writing Q&A service.
//!
//! [`RagPipeline`] embeds the question, retrieves top-K passages from
//! `rag-store`, fills a [`PromptTemplate`], asks the generation model,
//! records the exchange in `history-store` and hands back the answer as a
//! word-by-word stream.
//!
//! # Example
//! ```no_run
//! # use futures::StreamExt;
//! # #[tokio::main] async fn main() -> Result<(), contextor::ContextorError> {
//! let pipeline = contextor::RagPipeline::from_env()?;
//! let mut chunks = pipeline.answer_stream("What is the funding per action?").await?;
//! while let Some(chunk) = chunks.next().await {
//!     print!("{chunk}");
//! }
//! # Ok(()) }
//! ```

mod cfg;
mod error;
mod llm;
mod pipeline;
mod presenter;
mod prompt;

pub use cfg::{DEFAULT_HISTORY_DB_PATH, DEFAULT_STREAM_DELAY_MS, HistoryWritePolicy, PipelineConfig};
pub use error::ContextorError;
pub use llm::{AnswerGenerator, LlmAnswerGenerator};
pub use pipeline::RagPipeline;
pub use presenter::present;
pub use prompt::{HORIZON_EUROPE_TEMPLATE, PASSAGE_SEPARATOR, PromptTemplate};
