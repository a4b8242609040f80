//! Result rendering - maps attempt progress and outcomes to display text.
//!
//! All user-visible text goes through a [`StatusDisplay`], a single area
//! whose content is replaced at each step.

use std::io::Write;
use std::time::Duration;

use crate::recognition::RecognitionResult;

pub const SENDING_TEXT: &str = "⏳ Sending to server...";
pub const NOT_RECOGNIZED_TEXT: &str = "❌ Song not recognized";

/// A display area whose content is replaced wholesale.
pub trait StatusDisplay: Send + Sync {
    fn replace(&self, text: &str);
}

/// Writes each replacement to stdout.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl StatusDisplay for TerminalDisplay {
    fn replace(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

/// Whole seconds, rounded up so a short window never reads as zero.
pub fn listening_text(window: Duration) -> String {
    let secs = window.as_millis().div_ceil(1000);
    let unit = if secs == 1 { "second" } else { "seconds" };
    format!("🎤 Listening for {} {}...", secs, unit)
}

/// Display text for a finished attempt.
pub fn render(result: &RecognitionResult) -> String {
    match result {
        RecognitionResult::Success(track) => format!(
            "🎶 Song Recognized\nTitle: {}\nArtist: {}\nAlbum: {}",
            track.title, track.artist, track.album
        ),
        RecognitionResult::NotFound => NOT_RECOGNIZED_TEXT.to_string(),
        RecognitionResult::Error { message } => format!("❌ {}", message),
    }
}
