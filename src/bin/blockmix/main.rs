//! blockmix - play a small positional scene through the default device
//!
//! Run with: cargo run
//! Set RUST_LOG=blockmix=debug to watch voices start and stop.

mod app;
mod tones;

use app::Demo;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Demo::new().seconds(12.0).orbit_radius(6.0).run()
}
