//! Adapter layer: Convert identify DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use serde_json::Value;

use super::dto;
use crate::recognition::domain::{RecognitionResult, RecognizedTrack};

/// Status message the provider uses for a match
const SUCCESS_MSG: &str = "Success";

/// Shown when the provider omits a field of an otherwise good match
const UNKNOWN: &str = "Unknown";

/// Convert an identify response to a recognition outcome.
///
/// A response counts as a match only when the status says so AND at least
/// one candidate is present. Everything else is `NotFound`.
pub fn to_recognition(response: dto::IdentifyResponse) -> RecognitionResult {
    let is_success = response
        .status
        .as_ref()
        .and_then(|s| s.msg.as_deref())
        .is_some_and(|msg| msg == SUCCESS_MSG);
    if !is_success {
        return RecognitionResult::NotFound;
    }

    let Some(best) = response
        .metadata
        .and_then(|m| m.music.into_iter().next())
    else {
        return RecognitionResult::NotFound;
    };

    RecognitionResult::Success(convert_music(best))
}

/// Interpret an arbitrary JSON value, treating foreign shapes as `NotFound`.
pub fn from_json(value: Value) -> RecognitionResult {
    match serde_json::from_value::<dto::IdentifyResponse>(value) {
        Ok(response) => to_recognition(response),
        Err(e) => {
            tracing::debug!("Response did not match identify shape: {}", e);
            RecognitionResult::NotFound
        }
    }
}

fn convert_music(music: dto::Music) -> RecognizedTrack {
    let artist = music
        .artists
        .into_iter()
        .next()
        .and_then(|a| a.name)
        .unwrap_or_else(|| UNKNOWN.to_string());

    RecognizedTrack {
        title: music.title.unwrap_or_else(|| UNKNOWN.to_string()),
        artist,
        album: music
            .album
            .and_then(|a| a.name)
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}
