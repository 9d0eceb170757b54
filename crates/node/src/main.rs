//! scorewire node
//!
//! Main entry point for the score-event fabric. A process runs in one of
//! two modes: gateway (accepts submissions and dispatches each to exactly
//! one broker, with failover) or broker (accepts forwarded events and
//! records them in its own local store).

use anyhow::Result;
use clap::{Parser, ValueEnum};
use scorewire_broker::{BrokerConfig, BrokerContext, BrokerServer};
use scorewire_dispatch::NodeAddr;
use scorewire_gateway::{GatewayBuilder, GatewayServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Node mode
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Gateway mode - accepts submissions and dispatches with failover
    Gateway,
    /// Broker mode - records delivered events locally
    Broker,
}

/// scorewire score-event fabric node
#[derive(Parser, Debug)]
#[command(name = "scorewire")]
#[command(about = "Multi-node score-event distribution fabric", long_about = None)]
struct Args {
    /// Node mode (gateway or broker)
    #[arg(long, value_enum, default_value = "broker")]
    mode: Mode,

    /// HTTP bind address
    #[arg(long, default_value = "127.0.0.1:9090")]
    bind: String,

    /// Address other nodes should use to reach this one (defaults to --bind)
    #[arg(long)]
    advertise_addr: Option<String>,

    /// Broker pool in failover order, comma separated (gateway mode)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "127.0.0.1:9090,127.0.0.1:9091,127.0.0.1:9092"
    )]
    brokers: Vec<NodeAddr>,

    /// Per-attempt forward timeout in milliseconds (gateway mode)
    #[arg(long, default_value = "3000")]
    forward_timeout_ms: u64,

    /// Directory for the local event store (broker mode)
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.mode {
        Mode::Gateway => run_gateway(args).await,
        Mode::Broker => run_broker(args).await,
    }
}

/// Run in gateway mode - accept submissions, dispatch to the broker pool
async fn run_gateway(args: Args) -> Result<()> {
    let advertise = args
        .advertise_addr
        .clone()
        .unwrap_or_else(|| args.bind.clone());

    tracing::info!("Starting scorewire - GATEWAY MODE");
    tracing::info!("  HTTP: {}", args.bind);
    tracing::info!("  Advertised as: {}", advertise);
    tracing::info!("  Broker pool: {:?}", args.brokers);
    tracing::info!("  Forward timeout: {}ms", args.forward_timeout_ms);

    let gateway = Arc::new(
        GatewayBuilder::new()
            .advertise_addr(NodeAddr::new(advertise))
            .brokers(args.brokers.clone())
            .forward_timeout_ms(args.forward_timeout_ms)
            .build(),
    );

    let server = GatewayServer::new(gateway.clone());

    tracing::info!("Gateway running. Press Ctrl+C to stop.");

    tokio::select! {
        result = server.run(&args.bind) => result?,
        _ = tokio::signal::ctrl_c() => {
            let stats = gateway.stats();
            tracing::info!(
                "Shutting down gateway: {} delivered, {} exhausted, {} attempts total",
                stats.delivered,
                stats.exhausted,
                stats.attempts_total
            );
        }
    }

    Ok(())
}

/// Run in broker mode - record forwarded events in the local store
async fn run_broker(args: Args) -> Result<()> {
    let advertise = args
        .advertise_addr
        .clone()
        .unwrap_or_else(|| args.bind.clone());

    tracing::info!("Starting scorewire - BROKER MODE");
    tracing::info!("  HTTP: {}", args.bind);
    tracing::info!("  Advertised as: {}", advertise);
    tracing::info!("  Data directory: {:?}", args.data_dir);

    std::fs::create_dir_all(&args.data_dir)?;

    let config = BrokerConfig {
        advertise_addr: NodeAddr::new(advertise),
        data_dir: args.data_dir.clone(),
    };
    let context = Arc::new(BrokerContext::open(&config)?);

    let server = BrokerServer::new(context.clone());

    tracing::info!("Broker running. Press Ctrl+C to stop.");

    tokio::select! {
        result = server.run(&args.bind) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down broker...");
            context.store.flush()?;
            tracing::info!("Flushed store with {} events", context.store.len());
        }
    }

    Ok(())
}
