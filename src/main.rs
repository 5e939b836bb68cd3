//! Status daemon entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use statusd::api::{create_router, AppState};
use statusd::config::Config;
use statusd::db::{Breaker, DbChecker};
use statusd::metrics;
use statusd::provision::{provision, LogicalDir};
use statusd::shutdown::shutdown_signal;

/// Minimal HTTP status daemon.
#[derive(Parser, Debug)]
#[command(name = "statusd")]
#[command(about = "Provisions service directories and serves health probes over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Listen port (overrides APP_PORT/PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the daemon (default).
    Run {
        /// Listen port (overrides APP_PORT/PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Run one database ping from the terminal.
    DbPing,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("statusd=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::DbPing) => cmd_db_ping().await,
        Some(Command::Run { port }) => cmd_run(port.or(args.port)).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("STATUSD - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
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

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Port: {}", config.effective_port());
    for dir in LogicalDir::ALL {
        match config.override_for(dir) {
            Some(path) => println!("  {} dir ({}): {}", dir.name(), dir.env_key(), path),
            None => println!("  {} dir ({}): <default under home>", dir.name(), dir.env_key()),
        }
    }
    println!("  Database URL: {}", config.database_url);
    println!(
        "  Ping Timeout: {}",
        match config.db_ping_timeout_ms {
            Some(ms) => format!("{}ms", ms),
            None => "driver default".to_string(),
        }
    );
    println!(
        "  Connection Pool: {}",
        match config.db_pool_size {
            Some(n) => format!("{} connections", n),
            None => "disabled (fresh connection per ping)".to_string(),
        }
    );
    println!(
        "  Circuit Breaker: {}",
        match config.db_breaker_threshold {
            Some(n) => format!("open after {} consecutive failures", n),
            None => "disabled".to_string(),
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run one database ping from the terminal.
async fn cmd_db_ping() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("Pinging {} ...", config.database_url);

    let checker = DbChecker::from_config(&config)?;
    match checker.ping().await {
        Ok(value) => {
            println!("OK (SELECT 1 = {})", value);
            Ok(())
        }
        Err(e) => {
            println!("FAILED: {}", e);
            Err(anyhow::anyhow!("Database ping failed"))
        }
    }
}

/// Provision directories and serve the health endpoints.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    // Provision directories before anything binds. A failure here is fatal:
    // the process exits non-zero without ever accepting traffic.
    let dirs = provision(&config).map_err(|e| {
        error!("Directory provisioning failed: {}", e);
        e
    })?;

    // Initialize metrics. The daemon still serves probes if the recorder
    // cannot be installed; /metrics reports 503 in that case.
    let prometheus = match metrics::install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install metrics recorder: {}", e);
            None
        }
    };

    // Build shared state
    let db = DbChecker::from_config(&config)?;
    let breaker = Breaker::from_config(&config);
    let state = AppState::new(dirs, db, breaker, prometheus);

    // Provisioning is done; the process may receive traffic.
    state.set_ready(true);

    // Start HTTP server
    let port = port_override.unwrap_or_else(|| config.effective_port());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
