//! Runtime configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ai_llm_service::error_handler::{env_or, env_parse};
use rag_store::DEFAULT_TOP_K;

use crate::error::ContextorError;

/// Default pause between streamed chunks.
pub const DEFAULT_STREAM_DELAY_MS: u64 = 50;
pub const DEFAULT_HISTORY_DB_PATH: &str = "chat_history.db";

/// What a failed history append does to the request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryWritePolicy {
    /// The record is written before streaming; a storage error fails the request.
    #[default]
    Required,
    /// A storage error is logged and the answer is streamed anyway.
    BestEffort,
}

impl FromStr for HistoryWritePolicy {
    type Err = ContextorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(ContextorError::Config(format!(
                "HISTORY_WRITE_POLICY: expected 'required' or 'best_effort', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for HistoryWritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::BestEffort => "best_effort",
        })
    }
}

/// Pipeline knobs that are not owned by a collaborator crate.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub top_k: u64,
    pub stream_delay: Duration,
    pub history_policy: HistoryWritePolicy,
    /// `None` selects the built-in template.
    pub template_path: Option<PathBuf>,
    pub history_db_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            stream_delay: Duration::from_millis(DEFAULT_STREAM_DELAY_MS),
            history_policy: HistoryWritePolicy::Required,
            template_path: None,
            history_db_path: PathBuf::from(DEFAULT_HISTORY_DB_PATH),
        }
    }
}

impl PipelineConfig {
    /// Reads `STREAM_DELAY_MS`, `HISTORY_WRITE_POLICY`, `PROMPT_TEMPLATE_PATH`
    /// and `HISTORY_DB_PATH`. `top_k` comes from the retrieval config.
    ///
    /// # Errors
    /// `ContextorError::Config` on malformed values.
    pub fn from_env(top_k: u64) -> Result<Self, ContextorError> {
        let to_cfg = |e: ai_llm_service::AiLlmError| ContextorError::Config(e.to_string());

        let delay_ms = env_parse("STREAM_DELAY_MS", DEFAULT_STREAM_DELAY_MS, "expected u64 milliseconds")
            .map_err(to_cfg)?;
        let history_policy = env_or("HISTORY_WRITE_POLICY", "required").parse()?;
        let template_path = std::env::var("PROMPT_TEMPLATE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            top_k,
            stream_delay: Duration::from_millis(delay_ms),
            history_policy,
            template_path,
            history_db_path: PathBuf::from(env_or("HISTORY_DB_PATH", DEFAULT_HISTORY_DB_PATH)),
        })
    }
}
