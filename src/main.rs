#![cfg(not(tarpaulin_include))]

use clap::Parser;
use dimgrid::app;
use dimgrid::config::AppConfig;
use std::path::PathBuf;

/// Table editor session server
#[derive(Parser, Debug)]
#[command(name = "dimgrid-server", version, about)]
struct Args {
    /// JSON config file
    #[arg(short, long, env = "DIMGRID_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind, overrides the config file
    #[arg(short, long)]
    bind: Option<String>,

    /// Row cap of the table, overrides the config file
    #[arg(long)]
    max_rows: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(max_rows) = args.max_rows {
        config.max_rows = max_rows;
    }

    app::run(config).await
}
