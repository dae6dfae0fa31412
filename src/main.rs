//! Mesa - multi-agent restaurant assistant
//!
//! Main entry point for the Mesa CLI and chat server.

mod cli;
mod register;
mod server;

use clap::Parser;

use mesa_config::ConfigLoader;

use crate::cli::{Cli, Commands};
use crate::server::{check_config, init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CheckConfig) => check_config(&cli.config),
        Some(Commands::Run { host, port }) => {
            let mut config = ConfigLoader::resolve(&cli.config)?;
            init_tracing(&config.logging)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await
        }
        None => {
            let config = ConfigLoader::resolve(&cli.config)?;
            init_tracing(&config.logging)?;
            run_server(config).await
        }
    }
}
