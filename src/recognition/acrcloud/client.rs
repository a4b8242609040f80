//! ACRCloud HTTP client
//!
//! Sends a signed multipart identify request and hands back the raw
//! response body. The relay forwards that body untouched, so this client
//! only checks that it is JSON and never re-serializes it.

use reqwest::multipart;

use crate::recognition::domain::{ProviderCredentials, RecognitionError};
use crate::recognition::signing::SignedRequest;

/// Filename the sample is uploaded under
const SAMPLE_FILENAME: &str = "audio_sample.wav";

/// ACRCloud identify client
pub struct AcrCloudClient {
    http_client: reqwest::Client,
    /// `https` in production; tests point this at a plain HTTP mock
    scheme: String,
}

impl AcrCloudClient {
    /// Create a new client
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses
    /// - Send User-Agent header identifying the application
    pub fn new() -> Result<Self, RecognitionError> {
        Self::with_scheme("https")
    }

    /// Create a client that talks to the provider over `scheme`
    fn with_scheme(scheme: impl Into<String>) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            scheme: scheme.into(),
        })
    }

    /// Identify endpoint URL for `host`
    pub fn identify_url(&self, host: &str) -> String {
        format!("{}://{}{}", self.scheme, host, crate::recognition::signing::IDENTIFY_PATH)
    }

    /// Send `sample` to the provider and return the JSON body as received
    pub async fn identify(
        &self,
        credentials: &ProviderCredentials,
        signed: &SignedRequest,
        sample: Vec<u8>,
    ) -> Result<Vec<u8>, RecognitionError> {
        let url = self.identify_url(&credentials.host);

        let sample_part = multipart::Part::bytes(sample)
            .file_name(SAMPLE_FILENAME)
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::Network(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .part("sample", sample_part)
            .text("access_key", signed.access_key.clone())
            .text("data_type", signed.data_type)
            .text("signature_version", signed.signature_version)
            .text("signature", signed.signature.clone())
            .text("timestamp", signed.timestamp.to_string());

        tracing::debug!(url = %url, timestamp = signed.timestamp, "Sending sample to provider");

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Api {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        serde_json::from_slice::<serde::de::IgnoredAny>(&body)
            .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;

        Ok(body.to_vec())
    }
}
