//! Internal domain models for track recognition.
//!
//! These types are OUR types - they don't change when the provider's API changes.
//! Provider responses get converted into these types via the adapter.

use std::fmt;
use std::time::Duration;

/// Outcome of one recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    /// The provider matched the sample
    Success(RecognizedTrack),
    /// Well-formed response without a match
    NotFound,
    /// The attempt failed before a usable response arrived
    Error { message: String },
}

impl RecognitionResult {
    /// Create an error outcome.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Track metadata reported by the provider for the best candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedTrack {
    pub title: String,
    /// Primary (first listed) artist
    pub artist: String,
    pub album: String,
}

/// A captured recording, encoded as a WAV container.
#[derive(Clone)]
pub struct AudioSample {
    /// Encoded RIFF/WAVE bytes
    pub bytes: Vec<u8>,
    /// Length of the recorded audio
    pub duration: Duration,
}

impl fmt::Debug for AudioSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSample")
            .field("bytes", &self.bytes.len())
            .field("duration", &self.duration)
            .finish()
    }
}

/// Complete set of provider credentials.
///
/// Only constructed once all three values are known, so holding one means
/// the relay may talk to the provider.
#[derive(Clone)]
pub struct ProviderCredentials {
    /// Provider host, e.g. `identify-eu-west-1.acrcloud.com`
    pub host: String,
    pub access_key: String,
    pub access_secret: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("host", &self.host)
            .field("access_key", &self.access_key)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

/// Errors that can occur while relaying a sample to the provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error(
        "Provider credentials not configured (missing {}). Please set ACRCLOUD_HOST, ACRCLOUD_ACCESS_KEY, and ACRCLOUD_ACCESS_SECRET environment variables.",
        .missing.join(", ")
    )]
    NotConfigured { missing: Vec<&'static str> },

    #[error("No audio field in upload")]
    MissingUpload,

    #[error("Failed to stage upload: {0}")]
    Upload(String),

    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl RecognitionError {
    /// Whether the failure is a configuration problem rather than a
    /// per-request one.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured { .. })
    }
}
