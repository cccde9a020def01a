// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vigil - event subsystem management CLI

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod completions;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{definition, post, query};
use std::path::PathBuf;

use crate::client::DaemonClient;
use crate::completions::CompletionsArgs;
use crate::output::OutputFormat;
use vigil_daemon::Config;

#[derive(Parser)]
#[command(name = "vigil", version, about = "Vigil - network event subsystem client")]
struct Cli {
    /// Path to vigil.toml (defaults to the state directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post an event
    Post(post::PostArgs),
    /// Create or modify an event template
    Template(definition::TemplateArgs),
    /// Create or modify an event group
    Group(definition::GroupArgs),
    /// Delete a template or group
    Delete {
        /// Definition code
        code: u32,
    },
    /// Reload every definition from storage
    Reload,
    /// List event definitions
    List,
    /// Show the last processed events for a source object
    Recent {
        /// Source object id
        source: u32,
    },
    /// Show daemon status
    Status,
    /// Stop the daemon
    Shutdown,
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let format = cli.output;

    if let Commands::Completions(args) = cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    // Status and shutdown never start a daemon
    match cli.command {
        Commands::Status => {
            let client = DaemonClient::connect(&config)?;
            return query::status(&client, format).await;
        }
        Commands::Shutdown => {
            match DaemonClient::connect(&config) {
                Ok(client) => {
                    client.shutdown().await?;
                    println!("Daemon shutting down");
                }
                Err(client::ClientError::DaemonNotRunning) => println!("Daemon not running"),
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }
        _ => {}
    }

    let client = DaemonClient::connect_or_start(&config, cli.config.as_deref())?;

    match cli.command {
        Commands::Post(args) => post::handle(&client, args, format).await?,
        Commands::Template(args) => definition::upsert(&client, args.to_request(), format).await?,
        Commands::Group(args) => definition::upsert(&client, args.to_request(), format).await?,
        Commands::Delete { code } => definition::delete(&client, code, format).await?,
        Commands::Reload => definition::reload(&client, format).await?,
        Commands::List => query::list(&client, format).await?,
        Commands::Recent { source } => query::recent(&client, source, format).await?,
        Commands::Status | Commands::Shutdown | Commands::Completions(_) => {}
    }

    Ok(())
}

/// Diagnostics go to stderr, controlled by `RUST_LOG` (default: warnings only)
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
