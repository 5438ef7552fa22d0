use std::sync::Arc;

use contextor::RagPipeline;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fully wired pipeline; one instance per process.
    pub pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: RagPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// `AppError::Config` when the pipeline cannot be wired.
    pub fn from_env() -> Result<Self, AppError> {
        let pipeline = RagPipeline::from_env().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self::new(pipeline))
    }
}
