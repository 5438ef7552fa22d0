use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{Level, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; a malformed one is not.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .try_init()?;

    info!(version = env!("CARGO_PKG_VERSION"), "grant-qa-backend starting");

    if let Err(e) = api::start().await {
        error!(error = %e, code = e.error_code(), "service terminated");
        return Err(e.into());
    }

    Ok(())
}
