//! `allegiance`: prints the player's standing with every faction.

#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use allegiance_engine::{app, EngineConfig};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("allegiance=info".parse()?))
        .init();

    info!("Allegiance {}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load();
    app::run(&config)?;

    info!("Allegiance shutdown complete");
    Ok(())
}
