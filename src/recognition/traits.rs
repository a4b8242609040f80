//! Trait definitions for the identification provider.
//!
//! The relay depends on [`IdentifyApi`] rather than the concrete client so
//! tests can substitute a mock and count outbound calls.

use async_trait::async_trait;

use super::domain::{ProviderCredentials, RecognitionError};
use super::signing::SignedRequest;

/// Trait for the sample identification endpoint.
#[async_trait]
pub trait IdentifyApi: Send + Sync {
    /// Send a signed sample and return the provider's raw JSON body.
    async fn identify(
        &self,
        credentials: &ProviderCredentials,
        signed: &SignedRequest,
        sample: Vec<u8>,
    ) -> Result<Vec<u8>, RecognitionError>;
}

#[async_trait]
impl IdentifyApi for super::acrcloud::AcrCloudClient {
    async fn identify(
        &self,
        credentials: &ProviderCredentials,
        signed: &SignedRequest,
        sample: Vec<u8>,
    ) -> Result<Vec<u8>, RecognitionError> {
        self.identify(credentials, signed, sample).await
    }
}

#[async_trait]
impl<T: IdentifyApi + ?Sized> IdentifyApi for std::sync::Arc<T> {
    async fn identify(
        &self,
        credentials: &ProviderCredentials,
        signed: &SignedRequest,
        sample: Vec<u8>,
    ) -> Result<Vec<u8>, RecognitionError> {
        (**self).identify(credentials, signed, sample).await
    }
}
