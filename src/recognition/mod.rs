//! Track recognition - signs samples and hands them to the identification provider.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Our own result, sample and credential types
//! - **Signing** (`signing.rs`) - HMAC-SHA1 request signatures
//! - **API DTOs** (`acrcloud/dto.rs`) - Provider response shapes
//! - **Adapter** - Converts DTOs to domain results
//! - **Client** - HTTP client for the provider
//! - **Traits** - Seam for mocking the provider in tests
//!
//! Recognition itself happens entirely on the provider's side; this module
//! only builds the request and interprets the answer.

pub mod acrcloud;
pub mod domain;
pub mod signing;
pub mod traits;

pub use domain::{AudioSample, ProviderCredentials, RecognitionError, RecognitionResult, RecognizedTrack};
pub use signing::SignedRequest;
pub use traits::IdentifyApi;
