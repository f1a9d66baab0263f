use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use waitlist_core::config::{Config, ConfigOverrides};
use waitlist_core::logging::{init_logging_with_config, LogConfig};
use waitlist_core::shutdown::{install_signal_handlers, ShutdownCoordinator};
use waitlist_core::telemetry::init_metrics;
use waitlist_core::WaitlistServer;

#[derive(Parser, Debug)]
#[command(name = "waitlist-api")]
#[command(author, version, about = "Pre-launch waitlist API", long_about = None)]
struct Args {
    /// TOML configuration file. Without it, configuration is read from the environment.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Keep signups in process memory instead of Upstash
    #[arg(long)]
    memory_store: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind,
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
            memory_store: self.memory_store,
        }
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::read_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::from_lookup(|key| std::env::var(key).ok())
            .context("loading configuration from environment")?,
    };

    config.apply(&args.overrides());
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let log_config = LogConfig::try_from(&config.logging)?;
    init_logging_with_config(log_config)?;
    init_metrics();

    info!("Waitlist API starting");
    if config.admin_key().is_none() {
        warn!("ADMIN_KEY is not set; /waitlist-list will reject every request");
    }

    let shutdown = Arc::new(ShutdownCoordinator::new());
    install_signal_handlers(shutdown.clone())?;

    let server = WaitlistServer::from_config(&config)?;
    server.run(shutdown).await?;

    info!("Waitlist API finished");
    Ok(())
}
