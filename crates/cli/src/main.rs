//! Herald CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive or single-message mode
//! - `status`  — Show configuration and engine status
//! - `kb`      — List knowledge base entries
//! - `init`    — Write a default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "herald",
    about = "Herald — rule-first command assistant with a generative fallback",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send commands to the engine
    Chat {
        /// Send a single command instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Credential for the generative fallback
        #[arg(long, env = "HERALD_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Print the audit line after each reply
        #[arg(long)]
        audit: bool,
    },

    /// Show configuration and engine status
    Status,

    /// List knowledge base entries, optionally for one subject
    Kb {
        subject: Option<String>,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat {
            message,
            api_key,
            audit,
        } => commands::chat::run(message, api_key, audit).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Kb { subject } => commands::kb::run(subject).await?,
        Commands::Init { force } => commands::init::run(force).await?,
    }

    Ok(())
}
