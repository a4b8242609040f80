//! Audio capture - records a fixed window from an input device.
//!
//! - [`source`]: the [`AudioSource`] seam and a silence source for tests
//! - [`microphone`]: cpal-backed default input device
//! - [`session`]: one timed capture attempt
//! - [`wav`]: encoding captured chunks into an [`AudioSample`](crate::recognition::AudioSample)

pub mod microphone;
pub mod session;
pub mod source;
pub mod wav;

pub use microphone::Microphone;
pub use session::{ActiveGuard, CaptureSession};
pub use source::{AudioSource, SilenceSource};

/// Errors that can occur while capturing
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptureError {
    /// No device, or the device refused to open
    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("A recording is already in progress")]
    Busy,

    #[error("Failed to encode sample: {0}")]
    Encode(String),

    #[error("Capture worker failed: {0}")]
    Worker(String),
}
