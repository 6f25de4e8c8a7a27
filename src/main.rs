//! Utility bills service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use utility_bills::api::{create_router, with_frontend, AppState};
use utility_bills::config::Config;
use utility_bills::db::{connect_with_retry, ensure_schema};
use utility_bills::error::AppError;
use utility_bills::metrics;
use utility_bills::store::{MemoryStore, MySqlStore};
use utility_bills::utils::shutdown_signal;

/// Utility bills CRUD service.
#[derive(Parser, Debug)]
#[command(name = "utility-bills")]
#[command(about = "REST service for EMBASA / COELBA utility bills")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep data in memory instead of MySQL.
        #[arg(long)]
        in_memory: bool,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Create the database tables and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("utility_bills=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if args.json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port, in_memory }) => cmd_serve(port, in_memory).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Migrate) => cmd_migrate().await,
        None => cmd_serve(None, false).await,
    }
}

/// Load and validate configuration.
fn load_config() -> Result<Config, AppError> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        AppError::InvalidConfig(e)
    })?;

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("UTILITY BILLS - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Database: {}", config.redacted_database_url());
    println!(
        "  Connect: {} attempts, {}s apart, pool of {}",
        config.db_connect_attempts, config.db_connect_retry_seconds, config.db_max_connections
    );
    println!("  Port: {}", config.port);
    println!("  Frontend: {}", config.frontend_dir);
    println!(
        "  Items API: {}",
        if config.enable_items { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Create the tables and exit.
async fn cmd_migrate() -> anyhow::Result<()> {
    let config = load_config()?;
    info!("Connecting to {}", config.redacted_database_url());

    let pool = connect_with_retry(&config).await?;
    ensure_schema(&pool).await?;
    pool.close().await;

    Ok(())
}

/// Run the HTTP server.
async fn cmd_serve(port_override: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port);

    let state = if in_memory {
        warn!("Using in-memory store; data is lost on exit");
        AppState::from_store(Arc::new(MemoryStore::new()))
    } else {
        info!("Connecting to {}", config.redacted_database_url());
        let pool = connect_with_retry(&config).await?;
        ensure_schema(&pool).await?;
        AppState::from_store(Arc::new(MySqlStore::new(pool)))
    };

    let state = match metrics::install_recorder() {
        Ok(handle) => state.with_metrics(handle),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            state
        }
    }
    .with_items_enabled(config.enable_items);

    let router = with_frontend(create_router(state), &config.frontend_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
