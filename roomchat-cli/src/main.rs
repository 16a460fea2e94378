//! Main entry point for the Roomchat terminal client.

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use shared::config::client::{Config, Overrides};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};
use url::Url;

use commands::session::SessionCommand;

mod commands;
mod http;
mod render;
mod sse;

/// Roomchat CLI
#[derive(Parser)]
#[command(name = "roomchat")]
#[command(about = "Terminal client for the Roomchat group chat", long_about = None)]
struct Cli {
    /// Path to the configuration file (yaml or json)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the document store
    #[arg(long, global = true)]
    store_url: Option<Url>,

    /// Base URL of the auth service
    #[arg(long, global = true)]
    auth_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Roomchat CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in, inspect or end the saved session
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Join the room: live transcript plus a prompt for sending
    Chat,

    /// Print the current transcript and exit
    Transcript,

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Generate a configuration file in the current directory
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(long, short)]
        format: Option<String>,
    },
}

fn build_env_filter(config: &Config) -> EnvFilter {
    let default_level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    })
}

/// Logs go to stderr so they never interleave with the transcript on stdout.
fn initialize_tracing(config: &Config) {
    fmt::fmt()
        .with_env_filter(build_env_filter(config))
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let provider = match &cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(*shell);
            return Ok(());
        }
        Commands::Config { format } => {
            let dir = env::current_dir().context("failed to resolve the current directory")?;
            return commands::config::generate_config(format.as_deref().unwrap_or("yaml"), &dir);
        }
        Commands::Session {
            command: SessionCommand::Login(args),
        } => args.provider.clone(),
        _ => None,
    };

    let config = Config::load_config(
        cli.config,
        Overrides {
            store_url: cli.store_url,
            auth_url: cli.auth_url,
            provider,
        },
    )?;
    initialize_tracing(&config);

    match cli.command {
        Commands::Session { command } => match command {
            SessionCommand::Login(_) => commands::session::login(&config).await,
            SessionCommand::Me => commands::session::me(&config).await,
            SessionCommand::Logout => commands::session::logout(&config).await,
        },
        Commands::Chat => commands::chat::run_chat(&config).await,
        Commands::Transcript => commands::transcript::print_transcript(&config).await,
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}
