//! Capture client - records, uploads to the relay, and renders the answer.
//!
//! - [`recognizer`]: the attempt state machine
//! - [`relay_client`]: the `/recognize` upload
//! - [`render`]: display text for each step and outcome

pub mod recognizer;
pub mod relay_client;
pub mod render;

pub use recognizer::{ClientState, Recognizer};
pub use relay_client::RelayClient;
pub use render::{StatusDisplay, TerminalDisplay};

/// Errors talking to the relay
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Relay returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse relay response: {0}")]
    Parse(String),
}
