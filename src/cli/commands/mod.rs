//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `serve`: the relay server
//! - `listen`: recording from the microphone, and identifying a WAV file
//! - `config`: credential diagnostics, signing and config file creation

mod config;
mod listen;
mod serve;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::Result;

pub use config::{cmd_check_config, cmd_init_config, cmd_sign};
pub use listen::{cmd_identify, cmd_listen};
pub use serve::cmd_serve;

/// songspot CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Provider credentials given on the command line or in the environment
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Provider host (or set ACRCLOUD_HOST)
    #[arg(long, env = "ACRCLOUD_HOST")]
    pub host: Option<String>,

    /// Provider access key (or set ACRCLOUD_ACCESS_KEY)
    #[arg(long, env = "ACRCLOUD_ACCESS_KEY")]
    pub access_key: Option<String>,

    /// Provider access secret (or set ACRCLOUD_ACCESS_SECRET)
    #[arg(long, env = "ACRCLOUD_ACCESS_SECRET", hide_env_values = true)]
    pub access_secret: Option<String>,
}

impl CredentialArgs {
    /// Apply these over the credentials in `config`.
    pub fn apply(&self, config: &mut Config) {
        config.credentials.merge(
            self.host.as_deref(),
            self.access_key.as_deref(),
            self.access_secret.as_deref(),
        );
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay server
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,
        /// Directory to stage uploads in
        #[arg(long)]
        upload_dir: Option<PathBuf>,
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Record from the microphone and identify the song
    Listen {
        /// Relay base URL
        #[arg(short, long)]
        relay: Option<String>,
        /// Recording window in seconds
        #[arg(short, long)]
        duration: Option<u64>,
        /// Input device name (substring match)
        #[arg(long)]
        device: Option<String>,
        /// Record silence instead of opening a device
        #[arg(long)]
        silence: bool,
    },
    /// Identify an existing WAV file through the relay
    Identify {
        /// Path to the WAV file
        path: PathBuf,
        /// Relay base URL
        #[arg(short, long)]
        relay: Option<String>,
    },
    /// Print the string-to-sign and signature for a request
    Sign {
        /// Provider access key
        #[arg(long)]
        access_key: String,
        /// Provider access secret
        #[arg(long)]
        access_secret: String,
        /// Unix timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Report which provider credentials are configured
    CheckConfig {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

/// Run the specified CLI command against the loaded `config`.
pub fn run_command(cli: Cli, config: Config) -> anyhow::Result<()> {
    dispatch(cli.command, config)?;
    Ok(())
}

fn dispatch(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Serve {
            bind,
            upload_dir,
            credentials,
        } => {
            credentials.apply(&mut config);
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(dir) = upload_dir {
                config.server.upload_dir = dir;
            }
            let rt = Runtime::new()?;
            cmd_serve(&rt, config)
        }
        Commands::Listen {
            relay,
            duration,
            device,
            silence,
        } => {
            if let Some(relay) = relay {
                config.capture.relay_url = relay;
            }
            if let Some(secs) = duration {
                config.capture.duration_secs = secs;
            }
            let rt = Runtime::new()?;
            cmd_listen(&rt, &config.capture, device, silence)
        }
        Commands::Identify { path, relay } => {
            let relay = relay.unwrap_or(config.capture.relay_url);
            let rt = Runtime::new()?;
            cmd_identify(&rt, &path, &relay)
        }
        Commands::Sign {
            access_key,
            access_secret,
            timestamp,
        } => cmd_sign(&access_key, &access_secret, timestamp),
        Commands::CheckConfig { credentials } => {
            credentials.apply(&mut config);
            cmd_check_config(&config)
        }
        Commands::InitConfig { force, credentials } => {
            credentials.apply(&mut config);
            cmd_init_config(&config, force)
        }
    }
}
