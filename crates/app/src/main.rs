//! dynvar binary.

use clap::Parser;
use dynvar::Cli;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered output can be piped.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "dynvar v{}", env!("CARGO_PKG_VERSION"));

    let output = dynvar::run(&cli)?;
    print!("{output}");
    Ok(())
}
