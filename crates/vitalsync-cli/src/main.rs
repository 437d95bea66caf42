//! VitalSync CLI - terminal front end for the VitalSync health assistant.

use clap::{Parser, Subcommand};

mod commands;

/// VitalSync - a personalized health assistant grounded in your own records
#[derive(Parser)]
#[command(name = "vitalsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show profile stats, recent records and today's tip
    Dashboard,

    /// Chat with the assistant
    Chat,

    /// List the knowledge base
    Docs {
        /// Show full document content
        #[arg(long)]
        full: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show weekly weight and sleep trends
    Tracker,

    /// Print a personalized health tip
    Tip,

    /// Print the system instruction the assistant receives
    Context,

    /// Show configuration and version information
    Info,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    match cli.command {
        Commands::Docs { full, json } => commands::docs::run(full, json),
        Commands::Tracker => commands::tracker::run(),
        Commands::Context => commands::context::run(),
        Commands::Info => commands::info::run(),
        Commands::Dashboard => block_on(commands::dashboard::run()),
        Commands::Chat => block_on(commands::chat::run()),
        Commands::Tip => block_on(commands::tip::run()),
    }
}

fn block_on<F>(future: F) -> miette::Result<()>
where
    F: std::future::Future<Output = miette::Result<()>>,
{
    tokio::runtime::Runtime::new()
        .map_err(|e| miette::miette!("Failed to start async runtime: {}", e))?
        .block_on(future)
}
