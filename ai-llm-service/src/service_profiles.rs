//! Shared LLM service with two profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Provider clients are built eagerly, so a bad profile fails at startup.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let answer = svc.generate("Summarize the call topic.", None).await?;
//! let emb = svc.embed("Horizon Europe").await?;
//! println!("{answer} / dim = {}", emb.len());
//! # Ok(()) }
//! ```

use crate::{
    config::{
        default_config::{config_embedding_from_env, config_generation_from_env},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// One provider client bound to a profile.
enum ProviderClient {
    OpenAi(OpenAiService),
    Ollama(OllamaService),
}

impl ProviderClient {
    fn new(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        match cfg.provider {
            LlmProvider::OpenAI => Ok(Self::OpenAi(OpenAiService::new(cfg.clone())?)),
            LlmProvider::Ollama => Ok(Self::Ollama(OllamaService::new(cfg.clone())?)),
        }
    }
}

/// Service that manages the **generation** and **embedding** profiles.
pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    embedding: LlmModelConfig,

    generation_client: ProviderClient,
    embedding_client: ProviderClient,
}

impl LlmServiceProfiles {
    /// Creates the service and builds both provider clients.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either client rejects its config.
    pub fn new(generation: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        let generation_client = ProviderClient::new(&generation)?;
        let embedding_client = ProviderClient::new(&embedding)?;

        Ok(Self {
            generation,
            embedding,
            generation_client,
            embedding_client,
        })
    }

    /// Resolves both profiles from the environment (see [`crate::config::default_config`]).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_generation_from_env()?, config_embedding_from_env()?)
    }

    /// Generates text with the **generation** profile.
    ///
    /// `system` is only honored by chat-style providers (OpenAI).
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match &self.generation_client {
            ProviderClient::OpenAi(cli) => cli.generate(prompt, system).await,
            ProviderClient::Ollama(cli) => cli.generate(prompt).await,
        }
    }

    /// Computes one embedding with the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding_client {
            ProviderClient::OpenAi(cli) => cli.embeddings(input).await,
            ProviderClient::Ollama(cli) => cli.embeddings(input).await,
        }
    }

    /// Returns references to the current profiles `(generation, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.generation, &self.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: model.into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(10),
        }
    }

    #[test]
    fn keeps_profiles_separate() {
        let svc =
            LlmServiceProfiles::new(openai("gpt-4o-mini"), openai("text-embedding-ada-002")).unwrap();
        let (generation, embedding) = svc.profiles();
        assert_eq!(generation.model, "gpt-4o-mini");
        assert_eq!(embedding.model, "text-embedding-ada-002");
    }

    #[test]
    fn bad_embedding_profile_fails_construction() {
        let mut emb = openai("text-embedding-ada-002");
        emb.api_key = None;
        assert!(LlmServiceProfiles::new(openai("gpt-4o-mini"), emb).is_err());
    }
}
