//! Server entry point.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info};

use aether_server::app::{build_router, build_services, spawn_cleanup_task};
use aether_server::config::{ServerConfig, load_config};
use aether_server::observability::init_tracing;

const CLEANUP_PERIOD: Duration = Duration::from_secs(300);

/// Where the configuration came from, for the startup log line.
enum ConfigSource {
    CliFlag(PathBuf),
    Environment(PathBuf),
    DefaultFile(PathBuf),
    BuiltIn,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CliFlag(path) => write!(f, "--config {}", path.display()),
            Self::Environment(path) => write!(f, "AETHER_CONFIG={}", path.display()),
            Self::DefaultFile(path) => write!(f, "{}", path.display()),
            Self::BuiltIn => write!(f, "built-in defaults"),
        }
    }
}

fn resolve_config() -> Result<(ServerConfig, ConfigSource), ExitCode> {
    let mut args = std::env::args().skip(1);
    let cli_path = loop {
        match args.next().as_deref() {
            Some("--config") => match args.next() {
                Some(path) => break Some(PathBuf::from(path)),
                None => {
                    eprintln!("error: --config requires a path");
                    return Err(ExitCode::from(2));
                }
            },
            Some(other) => {
                eprintln!("error: unknown argument: {other}");
                eprintln!("usage: aether-server [--config <path>]");
                return Err(ExitCode::from(2));
            }
            None => break None,
        }
    };

    let (path, source) = if let Some(path) = cli_path {
        (path.clone(), ConfigSource::CliFlag(path))
    } else if let Some(path) = std::env::var_os("AETHER_CONFIG").map(PathBuf::from) {
        (path.clone(), ConfigSource::Environment(path))
    } else {
        let path = PathBuf::from("aether.toml");
        if !path.exists() {
            return Ok((ServerConfig::default(), ConfigSource::BuiltIn));
        }
        (path.clone(), ConfigSource::DefaultFile(path))
    };

    match load_config(&path) {
        Ok(config) => Ok((config, source)),
        Err(err) => {
            eprintln!("error: {err}");
            Err(ExitCode::from(2))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let (config, source) = match resolve_config() {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };

    init_tracing(&config.logging.level);
    info!(config = %source, "starting aether-server");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let services = build_services(&config).await?;
    let router = build_router(&services);

    let cleanup = spawn_cleanup_task(&services, CLEANUP_PERIOD);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %listener.local_addr()?,
        issuer = %services.auth_config.issuer,
        "listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown signal handler");
        return;
    }
    info!("shutdown signal received");
}
