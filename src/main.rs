//! Timesheet server entry point.

use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use timesheet_engine::api::{AppState, create_router};
use timesheet_engine::config::ConfigLoader;
use timesheet_engine::service::TimesheetService;
use timesheet_engine::store::SqliteStore;

#[derive(Parser)]
#[command(name = "timesheet-engine")]
#[command(about = "Shift logging and earnings estimation server")]
#[command(version)]
struct Cli {
    /// YAML configuration file; built-in defaults apply when omitted
    #[arg(long)]
    config: Option<String>,

    /// Listen address, overriding the configuration file
    #[arg(long)]
    bind: Option<String>,

    /// SQLite database path, overriding the configuration file
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("timesheet_engine=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut loader = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::default(),
    };
    if let Some(bind) = cli.bind {
        loader = loader.with_bind_address(bind);
    }
    if let Some(database) = cli.database {
        loader = loader.with_database_path(database);
    }

    let config = loader.config();
    let settings = loader.calculation();
    info!(
        database = %config.database.path,
        timezone = settings.clock.name(),
        default_break_minutes = settings.default_break_minutes,
        "Configuration loaded"
    );

    let store = SqliteStore::open(&config.database.path)?;
    let state = AppState::new(TimesheetService::new(store, settings));
    let router = create_router(state);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    info!(address = %listener.local_addr()?, "Timesheet server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Timesheet server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }
}
