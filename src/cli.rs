use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::app::build_router;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "calorie-tracker")]
#[command(about = "Calorie tracker API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "YAML config file applied before environment overrides")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Bind address, overrides HOST")]
        host: Option<String>,

        #[arg(long, help = "Bind port, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Print the effective configuration with secrets redacted")]
    Config,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting calorie tracker in {:?} mode", config.environment);

    let state = AppState::new(config).context("failed to configure database pool")?;
    let pool = state.pool.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
