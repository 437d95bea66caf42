//! Dashboard command - profile stats, recent records and today's tip.

use tracing::warn;
use vitalsync_ai::{AIConfig, Assistant, GeminiClient, TIP_ERROR_FALLBACK};
use vitalsync_core::{dashboard_stats, seed, DocumentStore};

use super::docs::print_doc;

pub(crate) async fn run() -> miette::Result<()> {
    let profile = seed::initial_profile();
    let store = DocumentStore::with_documents(seed::initial_documents());

    println!("Hello, {}", profile.name);
    println!("Goal: {}", profile.goal);
    println!();

    for stat in dashboard_stats(&profile) {
        println!("  {:<10} {}", stat.label, stat.value);
    }
    if let Some(bmi) = profile.bmi() {
        println!("  {:<10} {:.1}", "BMI", bmi);
    }
    println!();

    println!("Recent Records");
    for doc in store.recent(3) {
        print_doc(doc, false);
    }
    println!();

    // Only HTTP client setup can fail here; a missing key fails inside the call
    let tip = match GeminiClient::new(AIConfig::from_env()) {
        Ok(client) => {
            Assistant::new(client)
                .daily_tip(&profile, &store.snapshot())
                .await
        }
        Err(e) => {
            warn!("Cannot reach the assistant: {}", e);
            TIP_ERROR_FALLBACK.to_string()
        }
    };
    println!("Daily Tip: {}", tip);
    println!();
    println!("Run `vitalsync chat` to talk to your assistant.");

    Ok(())
}
