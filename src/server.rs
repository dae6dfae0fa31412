//! Tracing setup and server startup for Mesa.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mesa_api::{InterfaceConfig, InterfaceServer};
use mesa_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::register::{build_coordinator, build_provider};

/// Directory for rolling log files.
fn log_dir(logging: &LoggingConfig) -> PathBuf {
    match logging.directory {
        Some(ref dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mesa")
            .join("logs"),
    }
}

/// Initialize tracing with console and file output.
///
/// `RUST_LOG` wins over `logging.level`. Files rotate daily and 30 are kept.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = log_dir(logging);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("mesa")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Run the chat server in foreground.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Mesa v{}", env!("CARGO_PKG_VERSION"));

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        let errors: Vec<String> = validation
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        return Err(format!("invalid configuration: {}", errors.join("; ")).into());
    }

    let provider = build_provider(&config)?;
    let coordinator = build_coordinator(&config, provider)?;
    info!("Agents ready: {}", coordinator.agent_ids().join(", "));

    let interface = InterfaceConfig::new(config.server.host.clone(), config.server.port);
    InterfaceServer::new(interface, coordinator).run().await?;

    info!("Mesa stopped");
    Ok(())
}

/// Load, validate and print the configuration.
pub(crate) fn check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::resolve(path)?;
    report_config(path, &config)
}

fn report_config(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let validation = ConfigValidator::validate(config);

    println!("Configuration: {}", path.display());
    println!("  server:   {}:{}", config.server.host, config.server.port);
    println!("  backend:  {}", config.backend.base_url);
    println!("  model:    {}", config.provider.model);
    println!("  fallback: {}", config.orchestrator.default_agent);

    for warning in &validation.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &validation.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if validation.is_valid() {
        println!("Configuration is valid");
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", validation.errors.len()).into())
    }
}
