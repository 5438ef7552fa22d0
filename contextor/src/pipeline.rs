//! The RAG pipeline: embed → retrieve → assemble → generate → record → present.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use futures::StreamExt;
use futures::stream::BoxStream;
use history_store::{HistoryRecord, HistoryStore, SqliteHistoryStore};
use rag_store::{LlmEmbedder, QdrantRetriever, RagConfig, ResizedEmbedder, VectorRetriever};
use tracing::{debug, info, warn};

use crate::cfg::{HistoryWritePolicy, PipelineConfig};
use crate::error::ContextorError;
use crate::llm::{AnswerGenerator, LlmAnswerGenerator};
use crate::presenter::present;
use crate::prompt::PromptTemplate;

/// Request-scoped orchestration over long-lived collaborators.
///
/// Built once at startup and shared behind an `Arc`; every method takes
/// `&self`, so concurrent requests never contend except on the history store.
pub struct RagPipeline {
    embedder: ResizedEmbedder,
    retriever: Arc<dyn VectorRetriever>,
    template: PromptTemplate,
    generator: Arc<dyn AnswerGenerator>,
    history: Arc<dyn HistoryStore>,
    cfg: PipelineConfig,
}

impl RagPipeline {
    pub fn new(
        embedder: ResizedEmbedder,
        retriever: Arc<dyn VectorRetriever>,
        template: PromptTemplate,
        generator: Arc<dyn AnswerGenerator>,
        history: Arc<dyn HistoryStore>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            retriever,
            template,
            generator,
            history,
            cfg,
        }
    }

    /// Wires the production collaborators from environment variables.
    ///
    /// # Errors
    /// `ContextorError::Config` for missing or invalid settings,
    /// `ContextorError::Template` for an unusable template file,
    /// `ContextorError::History` if the database cannot be opened.
    pub fn from_env() -> Result<Self, ContextorError> {
        let svc = Arc::new(LlmServiceProfiles::from_env().map_err(|e| ContextorError::Config(e.to_string()))?);
        let rag_cfg = RagConfig::from_env().map_err(|e| ContextorError::Config(e.to_string()))?;
        let cfg = PipelineConfig::from_env(rag_cfg.top_k)?;

        let embedder = ResizedEmbedder::new(
            Arc::new(LlmEmbedder::new(Arc::clone(&svc))),
            rag_cfg.embedding_dim,
            rag_cfg.embedding_concurrency,
        );
        let retriever = QdrantRetriever::new(&rag_cfg).map_err(|e| ContextorError::Config(e.to_string()))?;

        let template = match &cfg.template_path {
            Some(path) => PromptTemplate::from_file(path)?,
            None => PromptTemplate::horizon_europe(),
        };
        let history = SqliteHistoryStore::open(&cfg.history_db_path)?;

        info!(
            collection = %rag_cfg.collection,
            embedding_dim = rag_cfg.embedding_dim,
            top_k = cfg.top_k,
            template = %template.name(),
            history_db = %cfg.history_db_path.display(),
            history_policy = %cfg.history_policy,
            "pipeline ready"
        );

        Ok(Self::new(
            embedder,
            Arc::new(retriever),
            template,
            Arc::new(LlmAnswerGenerator::new(svc)),
            Arc::new(history),
            cfg,
        ))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Runs the pipeline up to a complete, recorded answer.
    ///
    /// Nothing is recorded when any stage before the append fails.
    ///
    /// # Errors
    /// `Retrieval` for embedding/search failures, `Generation` for the model
    /// call, `History`/`Join` when the append fails under the required policy.
    pub async fn answer(&self, question: &str) -> Result<String, ContextorError> {
        let query_vector = self.embedder.embed_query(question).await?;

        let passages = self.retriever.retrieve(query_vector, self.cfg.top_k).await?;
        info!(passages = passages.len(), "context retrieved");

        let prompt = self.template.assemble(question, &passages);
        debug!(prompt_chars = prompt.len(), template = %self.template.name(), "prompt assembled");

        let answer = self.generator.generate(&prompt).await?;

        match (self.record(question, &answer).await, self.cfg.history_policy) {
            (Ok(id), _) => debug!(id, "exchange recorded"),
            (Err(e), HistoryWritePolicy::BestEffort) => {
                warn!(error = %e, "history append failed; answering anyway");
            }
            (Err(e), HistoryWritePolicy::Required) => return Err(e),
        }

        Ok(answer)
    }

    /// [`RagPipeline::answer`] followed by word-by-word presentation.
    ///
    /// All failures surface here, before the first chunk.
    pub async fn answer_stream(&self, question: &str) -> Result<BoxStream<'static, String>, ContextorError> {
        let answer = self.answer(question).await?;
        Ok(present(answer, self.cfg.stream_delay).boxed())
    }

    /// Every recorded exchange, newest first.
    pub async fn history(&self) -> Result<Vec<HistoryRecord>, ContextorError> {
        let store = Arc::clone(&self.history);
        Ok(tokio::task::spawn_blocking(move || store.list_all()).await??)
    }

    /// Deletes every record; returns the number removed.
    pub async fn clear_history(&self) -> Result<usize, ContextorError> {
        let store = Arc::clone(&self.history);
        Ok(tokio::task::spawn_blocking(move || store.clear_all()).await??)
    }

    async fn record(&self, question: &str, answer: &str) -> Result<i64, ContextorError> {
        let store = Arc::clone(&self.history);
        let (q, a) = (question.to_owned(), answer.to_owned());
        Ok(tokio::task::spawn_blocking(move || store.append(&q, &a)).await??)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use ai_llm_service::{AiLlmError, ProviderError, ProviderErrorKind};
    use ai_llm_service::error_handler::Provider;
    use futures::future::BoxFuture;
    use history_store::HistoryError;
    use rag_store::{EmbeddingsProvider, Passage, RagError};

    const DIM: usize = 8;

    /// Raw vectors shorter than the index; the adapter pads them.
    struct ShortEmbedder;

    impl EmbeddingsProvider for ShortEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
            Box::pin(async { Ok(vec![0.5; 3]) })
        }
    }

    struct FailingEmbedder;

    impl EmbeddingsProvider for FailingEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
            Box::pin(async { Err(RagError::Qdrant("unreachable".into())) })
        }
    }

    /// Returns fixed passages and remembers what it was asked.
    struct StubRetriever {
        passages: Vec<Passage>,
        seen: Mutex<Vec<(usize, u64)>>,
    }

    impl StubRetriever {
        fn new(texts: &[&str]) -> Self {
            Self {
                passages: texts
                    .iter()
                    .enumerate()
                    .map(|(i, t)| Passage::new(*t, 1.0 - i as f32 / 10.0, i))
                    .collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl VectorRetriever for StubRetriever {
        fn retrieve<'a>(&'a self, query_vector: Vec<f32>, k: u64) -> BoxFuture<'a, Result<Vec<Passage>, RagError>> {
            Box::pin(async move {
                rag_store::check_dimension(&query_vector, DIM)?;
                self.seen.lock().unwrap().push((query_vector.len(), k));
                Ok(self.passages.iter().take(k as usize).cloned().collect())
            })
        }
    }

    struct StubGenerator {
        answer: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Some(answer.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                answer: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnswerGenerator for StubGenerator {
        fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ContextorError>> {
            Box::pin(async move {
                self.prompts.lock().unwrap().push(prompt.to_string());
                match &self.answer {
                    Some(a) => Ok(a.clone()),
                    None => Err(AiLlmError::from(ProviderError::new(
                        Provider::OpenAI,
                        ProviderErrorKind::EmptyChoices,
                    ))
                    .into()),
                }
            })
        }
    }

    struct BrokenHistory;

    impl HistoryStore for BrokenHistory {
        fn append(&self, _q: &str, _a: &str) -> Result<i64, HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn list_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
            Err(HistoryError::Poisoned)
        }
        fn clear_all(&self) -> Result<usize, HistoryError> {
            Err(HistoryError::Poisoned)
        }
    }

    fn template() -> PromptTemplate {
        PromptTemplate::new("test", "CTX[{context}] Q[{question}]").unwrap()
    }

    fn cfg(policy: HistoryWritePolicy) -> PipelineConfig {
        PipelineConfig {
            stream_delay: Duration::ZERO,
            history_policy: policy,
            ..PipelineConfig::default()
        }
    }

    fn pipeline(
        embedder: Arc<dyn EmbeddingsProvider>,
        retriever: Arc<StubRetriever>,
        generator: Arc<StubGenerator>,
        history: Arc<dyn HistoryStore>,
        policy: HistoryWritePolicy,
    ) -> RagPipeline {
        RagPipeline::new(
            ResizedEmbedder::new(embedder, DIM, 2),
            retriever,
            template(),
            generator,
            history,
            cfg(policy),
        )
    }

    fn memory_history() -> Arc<SqliteHistoryStore> {
        Arc::new(SqliteHistoryStore::open_in_memory().unwrap())
    }

    #[tokio::test]
    async fn streams_answer_and_records_exchange() {
        let retriever = Arc::new(StubRetriever::new(&["P1", "P2"]));
        let generator = Arc::new(StubGenerator::answering("The funding is 2 million euros."));
        let history = memory_history();
        let p = pipeline(
            Arc::new(ShortEmbedder),
            Arc::clone(&retriever),
            Arc::clone(&generator),
            history.clone(),
            HistoryWritePolicy::Required,
        );

        let chunks: Vec<String> = p
            .answer_stream("What is the funding amount?")
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(chunks, ["The ", "funding ", "is ", "2 ", "million ", "euros. "]);

        assert_eq!(*retriever.seen.lock().unwrap(), [(DIM, 4)]);
        assert_eq!(
            generator.prompts.lock().unwrap()[0],
            "CTX[P1\n\nP2] Q[What is the funding amount?]"
        );

        let newest = &p.history().await.unwrap()[0];
        assert_eq!(newest.question, "What is the funding amount?");
        assert_eq!(newest.answer, "The funding is 2 million euros.");
    }

    #[tokio::test]
    async fn no_passages_still_generates() {
        let generator = Arc::new(StubGenerator::answering("I could not find that in the documents."));
        let p = pipeline(
            Arc::new(ShortEmbedder),
            Arc::new(StubRetriever::new(&[])),
            Arc::clone(&generator),
            memory_history(),
            HistoryWritePolicy::Required,
        );

        let answer = p.answer("Unknown topic?").await.unwrap();
        assert_eq!(answer, "I could not find that in the documents.");
        assert_eq!(generator.prompts.lock().unwrap()[0], "CTX[] Q[Unknown topic?]");
    }

    #[tokio::test]
    async fn generation_failure_records_nothing() {
        let p = pipeline(
            Arc::new(ShortEmbedder),
            Arc::new(StubRetriever::new(&["P1"])),
            Arc::new(StubGenerator::failing()),
            memory_history(),
            HistoryWritePolicy::Required,
        );

        let err = p.answer_stream("q").await.err().unwrap();
        assert!(matches!(err, ContextorError::Generation(_)));
        assert!(p.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_skips_generation() {
        let generator = Arc::new(StubGenerator::answering("unused"));
        let p = pipeline(
            Arc::new(FailingEmbedder),
            Arc::new(StubRetriever::new(&["P1"])),
            Arc::clone(&generator),
            memory_history(),
            HistoryWritePolicy::Required,
        );

        assert!(matches!(p.answer("q").await, Err(ContextorError::Retrieval(_))));
        assert!(generator.prompts.lock().unwrap().is_empty());
        assert!(p.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn required_policy_fails_on_storage_error() {
        let p = pipeline(
            Arc::new(ShortEmbedder),
            Arc::new(StubRetriever::new(&["P1"])),
            Arc::new(StubGenerator::answering("fine")),
            Arc::new(BrokenHistory),
            HistoryWritePolicy::Required,
        );

        assert!(matches!(
            p.answer_stream("q").await.err(),
            Some(ContextorError::History(HistoryError::Poisoned))
        ));
    }

    #[tokio::test]
    async fn best_effort_policy_streams_despite_storage_error() {
        let p = pipeline(
            Arc::new(ShortEmbedder),
            Arc::new(StubRetriever::new(&["P1"])),
            Arc::new(StubGenerator::answering("still here")),
            Arc::new(BrokenHistory),
            HistoryWritePolicy::BestEffort,
        );

        let chunks: Vec<String> = p.answer_stream("q").await.unwrap().collect().await;
        assert_eq!(chunks, ["still ", "here "]);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_clearable() {
        let p = pipeline(
            Arc::new(ShortEmbedder),
            Arc::new(StubRetriever::new(&["P1"])),
            Arc::new(StubGenerator::answering("a")),
            memory_history(),
            HistoryWritePolicy::Required,
        );

        p.answer("first").await.unwrap();
        p.answer("second").await.unwrap();

        let all = p.history().await.unwrap();
        assert_eq!(all.iter().map(|r| r.question.as_str()).collect::<Vec<_>>(), ["second", "first"]);

        assert_eq!(p.clear_history().await.unwrap(), 2);
        assert!(p.history().await.unwrap().is_empty());
    }
}
