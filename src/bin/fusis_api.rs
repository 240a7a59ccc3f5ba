//! fusis API binary

use clap::{Parser, Subcommand};
use fusis::{ApiServer, ApiService, Config, MemoryBalancer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fusis-api")]
#[command(about = "fusis load balancer control-plane API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server over a single-node engine
    Serve {
        /// Node ID
        #[arg(long, default_value = "fusis-1")]
        node_id: String,

        /// Config file (defaults to ./fusis.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Listening host (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listening port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Environment tag (overrides FUSIS_ENV)
        #[arg(long)]
        env: Option<String>,

        /// Start without cluster leadership; every write answers 503
        #[arg(long)]
        follower: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            node_id,
            config,
            host,
            port,
            env,
            follower,
        } => {
            // File and environment first, CLI has priority
            let mut config = Config::load(config.as_deref())?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(env) = env {
                config.env = env;
            }

            let balancer = if follower {
                tracing::warn!("Starting as follower: writes will be rejected");
                MemoryBalancer::new(Arc::new(fusis::balancer::ClusterState::new(node_id)))
            } else {
                MemoryBalancer::standalone(node_id)
            };

            let api = ApiService::new(Arc::new(balancer));
            ApiServer::new(config, api).serve().await?;
        }
    }

    Ok(())
}
