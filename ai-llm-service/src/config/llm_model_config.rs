use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM role (generation or embedding).
///
/// # Fields
///
/// - `provider`: which backend serves this role.
/// - `model`: model identifier (e.g. `"gpt-4o-mini"`, `"text-embedding-ada-002"`).
/// - `endpoint`: base URL of the provider API, without the route suffix.
/// - `api_key`: bearer token for providers that need one (OpenAI).
/// - `max_tokens`: generation cap, if any.
/// - `temperature`: sampling temperature; generation is pinned to `0.0`.
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: per-request HTTP timeout.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: None,
///     temperature: Some(0.0),
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert!(cfg.is_deterministic());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Base URL of the provider API.
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// `true` when the config requests zero-temperature sampling.
    pub fn is_deterministic(&self) -> bool {
        matches!(self.temperature, Some(t) if t == 0.0)
    }
}
