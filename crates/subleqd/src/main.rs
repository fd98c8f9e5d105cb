//! subleqd — the subleq custom metrics adapter.
//!
//! Serves `subleq-metric` for pods through the custom metrics API. Each
//! application's `name` label is a subleq program; every autoscaler poll
//! runs one instruction, and the output decides the replica count.
//!
//! # Usage
//!
//! ```text
//! subleqd serve --config /etc/subleqd/subleqd.toml --port 6443
//! subleqd run --program 9x-1x3x10x-1x6x0x0x-1x72x105x0
//! ```

mod config;
mod run;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use subleq_provider::{StaticInventory, SubleqProvider};

use crate::config::AdapterConfig;

#[derive(Parser)]
#[command(name = "subleqd", about = "Subleq custom metrics adapter", version)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the custom metrics API.
    Serve {
        /// Port to listen on (overrides [server].port).
        #[arg(long)]
        port: Option<u16>,

        /// Path to subleqd.toml with the pod inventory.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a program locally and print its outputs.
    Run {
        /// Program text, e.g. 9x-1x3x10x-1x6x0x0x-1x72x105x0.
        #[arg(long)]
        program: String,

        /// Stop after this many instructions if the program has not halted.
        #[arg(long, default_value = "10000")]
        max_steps: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,subleqd=debug,subleq_vm=debug,subleq_provider=debug,subleq_api=debug")
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Serve { port, config } => serve(port, config).await,
        Command::Run {
            program,
            max_steps,
            format,
        } => run::run(&program, max_steps, &format),
    }
}

async fn serve(port: Option<u16>, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    info!("subleq metrics adapter starting");

    let config = match &config_path {
        Some(path) => {
            let config = AdapterConfig::from_file(path)?;
            info!(path = ?path, pods = config.pods.len(), "config loaded");
            config
        }
        None => AdapterConfig::default(),
    };

    let port = config.port(port);
    let inventory = StaticInventory::from_pods(config.pods);
    let provider = Arc::new(SubleqProvider::new(inventory));

    let router = subleq_api::build_router(provider);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("subleq metrics adapter stopped");
    Ok(())
}
