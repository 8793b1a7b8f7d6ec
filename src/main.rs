//! string-analyzer
//!
//! HTTP service that analyzes strings, stores each distinct string once and
//! answers structured and natural-language filter queries.
//!
//! # Usage
//!
//! ```bash
//! string-analyzer --host 127.0.0.1 --port 3000
//! RUST_LOG=string_analyzer=debug string-analyzer --json-logs
//! ```

use clap::Parser;

use string_analyzer::{
    filter::FilterConfig,
    server::{ApiServer, ServerConfig},
    storage::StorageConfig,
};

/// String analysis server
#[derive(Parser, Debug)]
#[command(name = "string-analyzer")]
#[command(about = "Content-addressed string analysis server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Initial store capacity
    #[arg(long, default_value = "1024")]
    capacity: usize,

    /// Number of filter threads (0 = auto)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Disable parallel filtering
    #[arg(long)]
    no_parallel: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    if args.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let server_config = ServerConfig {
        host: args.host,
        port: args.port,
        storage: StorageConfig::with_capacity(args.capacity),
        filter: FilterConfig {
            parallel: !args.no_parallel,
            num_threads: args.threads,
            ..Default::default()
        },
    };

    tracing::info!(
        "Starting string analyzer on {}:{}",
        server_config.host,
        server_config.port
    );
    let server = ApiServer::new(server_config)?;
    server.run().await?;

    Ok(())
}
