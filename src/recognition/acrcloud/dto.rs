//! ACRCloud identify API Data Transfer Objects
//!
//! These types mirror the parts of the identify response we read.
//! Every field is optional: anything that does not match the success shape
//! is treated as "not recognized", never as a parse failure.
//! DO NOT use these types outside the acrcloud module - convert to domain types.
//!
//! Example response:
//! ```json
//! {
//!   "status": { "msg": "Success", "code": 0, "version": "1.0" },
//!   "metadata": {
//!     "music": [{
//!       "title": "Song Title",
//!       "artists": [{ "name": "Artist Name" }],
//!       "album": { "name": "Album" }
//!     }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level identify response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentifyResponse {
    pub status: Option<Status>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Status {
    /// "Success" on a match, e.g. "No result" otherwise
    pub msg: Option<String>,
    pub code: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Metadata {
    /// Candidate matches, best first
    pub music: Vec<Music>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Music {
    pub title: Option<String>,
    pub artists: Vec<Artist>,
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Artist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Album {
    pub name: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs accept what the provider returns.
// ============================================================================
