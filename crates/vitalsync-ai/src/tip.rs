//! Daily health tips.

use tracing::{info, warn};
use vitalsync_core::{KnowledgeDoc, UserProfile};

use crate::assistant::Assistant;
use crate::backend::ChatBackend;
use crate::prompt;

/// Tip returned when the request fails.
pub const TIP_ERROR_FALLBACK: &str = "Stay active and hydrated today!";

/// Tip returned when the request succeeds without any text.
pub const TIP_EMPTY_FALLBACK: &str = "Drink more water today!";

impl<B: ChatBackend> Assistant<B> {
    /// Generate one short personalized tip. Never fails.
    pub async fn daily_tip(&self, profile: &UserProfile, docs: &[KnowledgeDoc]) -> String {
        let prompt = prompt::tip_prompt(profile, docs);

        match self.backend().generate(&prompt).await {
            Ok(Some(tip)) if !tip.is_empty() => {
                info!("Generated daily tip");
                tip
            }
            Ok(_) => {
                warn!("Model returned an empty tip");
                TIP_EMPTY_FALLBACK.to_string()
            }
            Err(e) => {
                warn!("Tip generation failed: {}", e);
                TIP_ERROR_FALLBACK.to_string()
            }
        }
    }
}
