//! wifi-presence CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wifi_presence_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => wifi_presence_cli::detect(args).await?,
        Commands::Capture(args) => wifi_presence_cli::capture(args).await?,
        Commands::Analyze(args) => wifi_presence_cli::analyze(args).await?,
        Commands::Version => {
            println!("wifi-presence {}", env!("CARGO_PKG_VERSION"));
            println!("core: {}", wifi_presence_core::VERSION);
            println!("signal: {}", wifi_presence_signal::VERSION);
        }
    }

    Ok(())
}
