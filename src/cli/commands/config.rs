//! Credential diagnostics and config file commands.

use std::path::{Path, PathBuf};

use crate::config::{self, Config, ConfigError};
use crate::error::Result;
use crate::recognition::signing::{build_signature, string_to_sign};

/// Print the string-to-sign and its signature
pub fn cmd_sign(access_key: &str, access_secret: &str, timestamp: Option<i64>) -> Result<()> {
    let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let to_sign = string_to_sign(access_key, timestamp);
    let signature = build_signature(&to_sign, access_secret)?;

    println!("String to sign:");
    for line in to_sign.lines() {
        println!("  {}", line);
    }
    println!();
    println!("Timestamp: {}", timestamp);
    println!("Signature: {}", signature);
    Ok(())
}

/// Report which credentials are set, without printing the secret
pub fn cmd_check_config(config: &Config) -> Result<()> {
    let creds = &config.credentials;
    let missing = creds.missing();

    match config::config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not present)", path.display()),
        None => println!("Config file: unavailable"),
    }
    println!();

    println!("Provider Credentials");
    println!("====================");
    print_value("host", creds.host.as_deref(), true);
    print_value("access_key", creds.access_key.as_deref(), true);
    print_value("access_secret", creds.access_secret.as_deref(), false);
    println!();

    println!("Relay: {} (uploads in {:?})", config.server.bind, config.server.upload_dir);
    println!(
        "Client: {} ({}s window)",
        config.capture.relay_url, config.capture.duration_secs
    );
    println!();

    if missing.is_empty() {
        println!("✓ Ready to recognize");
    } else {
        println!("✗ Missing: {}", missing.join(", "));
        println!("Set ACRCLOUD_HOST, ACRCLOUD_ACCESS_KEY and ACRCLOUD_ACCESS_SECRET or edit the config file.");
    }
    Ok(())
}

fn print_value(name: &str, value: Option<&str>, show: bool) {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) if show => println!("  ✓ {:<14} {}", name, v),
        Some(_) => println!("  ✓ {:<14} (set)", name),
        None => println!("  ✗ {:<14} (missing)", name),
    }
}

/// Write the effective configuration to the config file
pub fn cmd_init_config(config: &Config, force: bool) -> Result<()> {
    let path = config::config_path().ok_or(ConfigError::NoConfigDir)?;
    let path = init_config_at(config, &path, force)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn init_config_at(config: &Config, path: &Path, force: bool) -> Result<PathBuf> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()).into());
    }
    config::save_to(config, path)?;
    Ok(path.to_path_buf())
}
