//! Relay service - forwards one uploaded sample to the provider.
//!
//! 1. Check that provider credentials are configured
//! 2. Stage the upload on disk under a per-request name
//! 3. Read it back and sign a fresh request
//! 4. Send it to the provider and return the JSON body untouched

use std::path::PathBuf;

use crate::config::Credentials;
use crate::recognition::{IdentifyApi, ProviderCredentials, RecognitionError, SignedRequest};

use super::upload::StagedUpload;

/// Service bridging uploads to the identification provider
pub struct RelayService<P: IdentifyApi> {
    credentials: Credentials,
    upload_dir: PathBuf,
    provider: P,
}

impl<P: IdentifyApi> RelayService<P> {
    pub fn new(credentials: Credentials, upload_dir: impl Into<PathBuf>, provider: P) -> Self {
        Self {
            credentials,
            upload_dir: upload_dir.into(),
            provider,
        }
    }

    /// Provider credentials, or `NotConfigured` naming what is missing.
    pub fn ensure_configured(&self) -> Result<ProviderCredentials, RecognitionError> {
        self.credentials
            .complete()
            .ok_or_else(|| RecognitionError::NotConfigured {
                missing: self.credentials.missing(),
            })
    }

    /// Forward `upload` to the provider and return its raw JSON reply.
    ///
    /// Never contacts the provider when credentials are incomplete.
    pub async fn recognize(&self, upload: &[u8]) -> Result<Vec<u8>, RecognitionError> {
        let credentials = self.ensure_configured()?;

        let staged = StagedUpload::persist(&self.upload_dir, upload).await?;
        let sample = staged.read().await?;
        let signed = SignedRequest::sign_now(&credentials)?;

        let body = self.provider.identify(&credentials, &signed, sample).await?;

        // Dropping `staged` on the error paths above removes the file too;
        // here we remove it explicitly so a failed delete gets logged.
        match staged.remove() {
            Ok(path) => tracing::debug!(path = %path.display(), "Removed staged upload"),
            Err(e) => tracing::warn!("{}", e),
        }

        Ok(body)
    }
}
