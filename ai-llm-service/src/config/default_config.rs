//! LLM configs loaded strictly from environment variables.
//!
//! Two roles are resolved for the selected provider (`LLM_KIND`):
//!
//! - **Generation** → answer model, always zero temperature
//! - **Embedding**  → embedding model used for query vectors
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = `openai` (default) or `ollama`
//! - `LLM_MAX_TOKENS`    = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`  = generation timeout, default 120
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`          = credential (mandatory)
//! - `OPENAI_URL`              = base URL, default `https://api.openai.com`
//! - `OPENAI_MODEL`            = generation model, default `gpt-4o-mini`
//! - `OPENAI_EMBEDDING_MODEL`  = embedding model, default `text-embedding-ada-002`
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = generation model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_or, env_parse, must_env, validate_http_endpoint,
    },
};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

const GENERATION_TIMEOUT_SECS: u64 = 120;
const EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Reads `LLM_KIND`, defaulting to OpenAI.
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for unknown values.
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    Ok(env_or("LLM_KIND", "openai").parse::<LlmProvider>()?)
}

/// Generation profile for the provider selected by `LLM_KIND`.
pub fn config_generation_from_env() -> Result<LlmModelConfig, AiLlmError> {
    match provider_from_env()? {
        LlmProvider::OpenAI => config_openai_generation(),
        LlmProvider::Ollama => config_ollama_generation(),
    }
}

/// Embedding profile for the provider selected by `LLM_KIND`.
pub fn config_embedding_from_env() -> Result<LlmModelConfig, AiLlmError> {
    match provider_from_env()? {
        LlmProvider::OpenAI => config_openai_embedding(),
        LlmProvider::Ollama => config_ollama_embedding(),
    }
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

fn generation_timeout() -> Result<u64, AiLlmError> {
    env_parse("LLM_TIMEOUT_SECS", GENERATION_TIMEOUT_SECS, "expected u64 seconds")
}

/// OpenAI chat-completions profile used to answer questions.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_MODEL`, `OPENAI_URL`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.0)`
pub fn config_openai_generation() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL);

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint: openai_endpoint()?,
        api_key: Some(api_key),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(generation_timeout()?),
    })
}

/// OpenAI embeddings profile.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_EMBEDDING_MODEL`, `OPENAI_URL` (optional)
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = env_or("OPENAI_EMBEDDING_MODEL", DEFAULT_OPENAI_EMBEDDING_MODEL);

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint: openai_endpoint()?,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(EMBEDDING_TIMEOUT_SECS),
    })
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", &url)?;
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Ollama `/api/generate` profile used to answer questions.
///
/// # Env
/// - `OLLAMA_MODEL` (required)
/// - `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional)
pub fn config_ollama_generation() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(generation_timeout()?),
    })
}

/// Ollama `/api/embeddings` profile.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(EMBEDDING_TIMEOUT_SECS),
    })
}
