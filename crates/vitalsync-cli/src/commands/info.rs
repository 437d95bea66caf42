//! Info command - show configuration and version information.

use vitalsync_ai::AIConfig;

pub(crate) fn run() -> miette::Result<()> {
    let config = AIConfig::from_env();

    println!("VitalSync Health Assistant");
    println!("==========================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Components:");
    println!("  vitalsync-core    - Documents, profile, transcript");
    println!("  vitalsync-ai      - Context assembly and Gemini client");
    println!("  vitalsync-driver  - Session state");
    println!();

    println!("AI Configuration:");
    println!("  Model:    {}", config.model);
    println!("  Endpoint: {}", config.base_url);
    println!("  Timeout:  {}s", config.request_timeout.as_secs());
    println!(
        "  API key:  {}",
        if config.is_valid() {
            "set"
        } else {
            "not set (export GEMINI_API_KEY)"
        }
    );
    println!();

    println!("Note: AI can make mistakes. Please verify important medical information.");

    Ok(())
}
