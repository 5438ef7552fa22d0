//! Shared LLM access for the Q&A backend.
//!
//! Two provider clients (OpenAI, Ollama) sit behind [`service_profiles::LlmServiceProfiles`],
//! which binds one config to the **generation** role and one to the **embedding** role.
//! Configuration is read strictly from environment variables (see [`config::default_config`]).

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind, Result};
pub use service_profiles::LlmServiceProfiles;
