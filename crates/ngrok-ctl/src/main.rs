//! ngrok-ctl CLI
//!
//! Inspect and stop the tunnels of a locally running ngrok agent:
//! - `root` prints the agent's API root document
//! - `list`, `get` and `any` show tunnels
//! - `stop` terminates tunnels by name

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ngrok_api::{Session, SessionBuilder, TracingObserver};
use ngrok_ctl::commands;
use ngrok_ctl::config::{default_config_path, resolve_config, Overrides};

#[derive(Parser)]
#[command(name = "ngrok-ctl")]
#[command(author, version, about = "Inspect and stop tunnels of a local ngrok agent")]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the agent API
    #[arg(long, global = true, env = "NGROK_API_URL")]
    api_url: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Tunnel(TunnelCommand),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Commands that talk to the agent
#[derive(Subcommand)]
enum TunnelCommand {
    /// Show the agent API root document
    Root,

    /// List active tunnels
    List {
        /// Only show tunnels with this protocol (http, https, tcp)
        #[arg(short, long)]
        proto: Option<String>,
        /// Show detailed information
        #[arg(short, long)]
        long: bool,
    },

    /// Show a tunnel by name
    Get {
        /// Tunnel name
        name: String,
    },

    /// Stop one or more tunnels by name
    Stop {
        /// Tunnel name(s) to stop
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show a random tunnel with the given protocol
    Any {
        /// Protocol tag (http, https, tcp)
        proto: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Show config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let overrides = Overrides {
        api_url: cli.api_url,
        timeout_secs: cli.timeout,
    };

    let command = match cli.command {
        Commands::Config { action } => {
            return match action {
                ConfigAction::Show => commands::config_show(cli.config.as_deref(), &overrides),
                ConfigAction::Path => {
                    let path = cli.config.unwrap_or_else(default_config_path);
                    println!("{}", path.display());
                    Ok(())
                }
                ConfigAction::Init { force } => {
                    let path = cli.config.unwrap_or_else(default_config_path);
                    commands::config_init(&path, force)
                }
            };
        }
        Commands::Tunnel(command) => command,
    };

    let mut config = resolve_config(cli.config.as_deref())?.session;
    overrides.apply(&mut config);

    // Ctrl-C abandons whatever request is in flight
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling pending request");
                shutdown.cancel();
            }
        });
    }

    let session = SessionBuilder::from_config(&config)
        .observer(TracingObserver)
        .cancellation_token(shutdown)
        .build()
        .with_context(|| format!("Failed to create session for {}", config.api_url))?;

    let result = run(&session, command).await;
    session.close();
    result
}

async fn run(session: &Session, command: TunnelCommand) -> Result<()> {
    match command {
        TunnelCommand::Root => commands::root_command(session).await,
        TunnelCommand::List { proto, long } => {
            commands::list_command(session, proto.as_deref(), long).await
        }
        TunnelCommand::Get { name } => commands::get_command(session, &name).await,
        TunnelCommand::Stop { names } => commands::stop_command(session, &names).await,
        TunnelCommand::Any { proto } => commands::any_command(session, &proto).await,
    }
}
