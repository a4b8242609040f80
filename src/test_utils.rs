//! Test utilities and fixtures for songspot tests.
//!
//! Provider reply bodies, multipart request bodies for exercising the
//! relay router directly, and an in-memory display that records every
//! replacement.

use std::time::Duration;

use parking_lot::Mutex;

use crate::capture::source::StreamFormat;
use crate::capture::wav;
use crate::client::StatusDisplay;
use crate::recognition::AudioSample;

/// Boundary used by [`multipart_body`]
const BOUNDARY: &str = "songspot-test-boundary";

/// A provider reply matching the success shape.
pub fn provider_success_json(title: &str, artist: &str, album: &str) -> String {
    serde_json::json!({
        "status": {"msg": "Success", "code": 0, "version": "1.0"},
        "metadata": {
            "music": [{
                "title": title,
                "artists": [{"name": artist}],
                "album": {"name": album}
            }]
        }
    })
    .to_string()
}

/// A provider reply for a sample it could not match.
pub fn provider_not_found_json() -> String {
    r#"{"status":{"msg":"No result","code":1001,"version":"1.0"}}"#.to_string()
}

/// `secs` seconds of mono 16 kHz silence, WAV encoded.
pub fn silence_sample(secs: u64) -> AudioSample {
    let format = StreamFormat {
        sample_rate: 16_000,
        channels: 1,
    };
    let frames = (secs * 16_000) as usize;
    wav::encode(format, &[vec![0.0; frames]]).expect("Failed to encode silence")
}

/// Build a single-file multipart body.
///
/// Returns `(content type header, body bytes)`.
pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Display that keeps every replacement for later inspection.
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    history: Mutex<Vec<String>>,
}

impl MemoryDisplay {
    /// What the display shows now.
    pub fn current(&self) -> String {
        self.history.lock().last().cloned().unwrap_or_default()
    }

    /// Every text shown, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

impl StatusDisplay for MemoryDisplay {
    fn replace(&self, text: &str) {
        self.history.lock().push(text.to_string());
    }
}

/// Window short enough to keep tests fast.
pub const SHORT_WINDOW: Duration = Duration::from_millis(10);
