//! songspot - identify the song playing nearby.
//!
//! A capture client records a short sample from the microphone and uploads
//! it to a local relay server. The relay signs the request with the
//! provider credentials it alone holds, forwards the sample to the
//! ACRCloud identify endpoint and hands the JSON reply back for rendering.

pub mod capture;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod recognition;
pub mod relay;

#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(
            std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| "songspot=info".to_string()),
        );
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    let config = config::load();
    cli::run_command(args, config)
}
