//! In-process pipeline with stub collaborators for handler tests.

use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use contextor::{AnswerGenerator, ContextorError, HistoryWritePolicy, PipelineConfig, PromptTemplate, RagPipeline};
use futures::future::BoxFuture;
use history_store::SqliteHistoryStore;
use rag_store::{EmbeddingsProvider, Passage, RagError, ResizedEmbedder, VectorRetriever};

use crate::core::app_state::AppState;

const DIM: usize = 4;

pub enum Answer {
    Text(&'static str),
    Fail,
}

struct ConstEmbedder;

impl EmbeddingsProvider for ConstEmbedder {
    fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(async { Ok(vec![0.1; DIM]) })
    }
}

struct OnePassage;

impl VectorRetriever for OnePassage {
    fn retrieve<'a>(&'a self, _v: Vec<f32>, _k: u64) -> BoxFuture<'a, Result<Vec<Passage>, RagError>> {
        Box::pin(async { Ok(vec![Passage::new("Funding per action: EUR 2 million.", 0.9, 0)]) })
    }
}

struct StubGenerator(Answer);

impl AnswerGenerator for StubGenerator {
    fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, ContextorError>> {
        Box::pin(async move {
            match self.0 {
                Answer::Text(t) => Ok(t.to_string()),
                Answer::Fail => Err(ai_llm_service::AiLlmError::from(ai_llm_service::ProviderError::new(
                    ai_llm_service::error_handler::Provider::OpenAI,
                    ai_llm_service::ProviderErrorKind::EmptyChoices,
                ))
                .into()),
            }
        })
    }
}

pub fn state(answer: Answer) -> Arc<AppState> {
    let pipeline = RagPipeline::new(
        ResizedEmbedder::new(Arc::new(ConstEmbedder), DIM, 1),
        Arc::new(OnePassage),
        PromptTemplate::horizon_europe(),
        Arc::new(StubGenerator(answer)),
        Arc::new(SqliteHistoryStore::open_in_memory().unwrap()),
        PipelineConfig {
            stream_delay: Duration::ZERO,
            history_policy: HistoryWritePolicy::Required,
            ..PipelineConfig::default()
        },
    );
    Arc::new(AppState::new(pipeline))
}

pub async fn read_body(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
