//! CLI definitions for Mesa.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mesa CLI.
#[derive(Parser)]
#[command(name = "mesa")]
#[command(about = "Multi-agent restaurant assistant")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/mesa.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub(crate) enum Commands {
    /// Run the chat server in foreground (default)
    Run {
        /// Server host, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate the configuration
    CheckConfig,
}
