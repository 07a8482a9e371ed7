//! tridentd — the Trident dashboard daemon.
//!
//! Single binary that assembles the backend:
//! - Record store (redb)
//! - Registry engine, plugin catalog, result ledger
//! - REST API + dashboard
//!
//! # Usage
//!
//! ```text
//! tridentd serve --port 5000 --data-dir /var/lib/trident
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "tridentd", about = "Trident dashboard daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard backend.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Data directory for persistent state.
        #[arg(long, default_value = "/var/lib/trident")]
        data_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tridentd=debug,trident=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, data_dir } => serve(port, data_dir).await,
    }
}

async fn serve(port: u16, data_dir: PathBuf) -> anyhow::Result<()> {
    info!("Trident dashboard starting");

    // Ensure data directory exists.
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("trident.redb");

    let store = trident_state::RecordStore::open(&db_path)?;
    info!(path = ?db_path, "record store opened");

    let router = trident_api::build_router(store);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "dashboard server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
    });

    server.await?;

    info!("Trident dashboard stopped");
    Ok(())
}
