//! Answer generation over the shared LLM service.

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::LlmServiceProfiles;
use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::error::ContextorError;

/// One completion call per prompt; no multi-turn state.
pub trait AnswerGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ContextorError>>;
}

/// Delegates to the **generation** profile of [`LlmServiceProfiles`].
///
/// The prompt already carries the instructions, so no system message is sent.
#[derive(Clone)]
pub struct LlmAnswerGenerator {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmAnswerGenerator {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl AnswerGenerator for LlmAnswerGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ContextorError>> {
        Box::pin(async move {
            let (generation, _) = self.svc.profiles();
            debug!(model = %generation.model, prompt_chars = prompt.len(), "generation: start");

            let started = Instant::now();
            let answer = self.svc.generate(prompt, None).await?;

            info!(
                model = %generation.model,
                latency_ms = started.elapsed().as_millis() as u64,
                answer_chars = answer.len(),
                "generation: done"
            );
            Ok(answer)
        })
    }
}
