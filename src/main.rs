//! custdash main entry point

use anyhow::Context;
use clap::Parser;
use custdash_api::start_server;
use custdash_config::Config;
use custdash_core::{refresh, source_from_config, Dashboard};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "custdash")]
#[command(version)]
#[command(about = "A lightweight customer transactions dashboard", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override server.host
    #[arg(long)]
    host: Option<String>,

    /// Override server.port
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("invalid configuration")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    if args.config.exists() {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::info!("No config file at {}, using defaults", args.config.display());
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        let source = source_from_config(&config.source).context("failed to set up data source")?;
        log::info!("Data source: {}", source.describe());

        let dashboard = Dashboard::new().into_shared();
        {
            let dashboard = dashboard.clone();
            let source = source.clone();
            tokio::spawn(async move {
                refresh(&dashboard, source.as_ref()).await;
            });
        }

        start_server(config, dashboard, source).await.context("server error")
    })
}
