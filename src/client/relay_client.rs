//! HTTP client for the relay's `/recognize` endpoint.

use reqwest::multipart;
use serde_json::Value;

use super::ClientError;
use crate::recognition::acrcloud;
use crate::recognition::{AudioSample, RecognitionResult};
use crate::relay::AUDIO_FIELD;

/// Filename the recording is uploaded under
const UPLOAD_FILENAME: &str = "sample.wav";

/// Message shown for any failure to get a usable reply
pub const CONTACT_ERROR: &str = "Error contacting server";

/// Relay client
pub struct RelayClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn recognize_url(&self) -> String {
        format!("{}/recognize", self.base_url)
    }

    /// Upload `sample` and interpret the reply.
    ///
    /// Never fails: transport and parse problems become
    /// [`RecognitionResult::Error`] after being logged.
    pub async fn recognize(&self, sample: &AudioSample) -> RecognitionResult {
        match self.upload(sample).await {
            Ok(value) => acrcloud::from_json(value),
            Err(e) => {
                tracing::error!(error = %e, "Recognition error");
                RecognitionResult::error(CONTACT_ERROR)
            }
        }
    }

    /// Upload `sample` and return the relay's JSON reply.
    pub async fn upload(&self, sample: &AudioSample) -> Result<Value, ClientError> {
        let part = multipart::Part::bytes(sample.bytes.clone())
            .file_name(UPLOAD_FILENAME)
            .mime_str("audio/wav")
            .map_err(|e| ClientError::Network(format!("mime: {}", e)))?;
        let form = multipart::Form::new().part(AUDIO_FIELD, part);

        let response = self
            .http_client
            .post(self.recognize_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        tracing::debug!(response = %value, "Relay reply");
        Ok(value)
    }
}
