//! CLI commands.

pub mod chat;
pub mod context;
pub mod dashboard;
pub mod docs;
pub mod info;
pub mod tip;
pub mod tracker;

use vitalsync_ai::{AIConfig, GeminiClient};
use vitalsync_driver::Session;

/// Session with sample data backed by the configured Gemini model.
pub(crate) fn connect() -> miette::Result<Session<GeminiClient>> {
    let client = GeminiClient::new(AIConfig::from_env())
        .map_err(|e| miette::miette!("Failed to create Gemini client: {}", e))?;
    Ok(Session::with_seed_data(client))
}
