use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::recognition::{IdentifyApi, RecognitionError};

use super::service::RelayService;

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// Body returned for every failure; upstream causes stay in the server log
pub const GENERIC_FAILURE: &str = "Recognition failed";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type AppState<P> = Arc<RelayService<P>>;

pub async fn health_handler() -> &'static str {
    "healthy"
}

#[tracing::instrument(skip(state, multipart))]
pub async fn recognize_handler<P>(
    State(state): State<AppState<P>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    P: IdentifyApi + 'static,
{
    if let Err(e) = state.ensure_configured() {
        tracing::warn!(error = %e, "Rejecting recognition request");
        return error_response(e.to_string());
    }

    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::error!(error = %rejection, "Malformed upload");
            return error_response(GENERIC_FAILURE.to_string());
        }
    };

    let upload = match read_audio_field(multipart).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Recognition error");
            return error_response(GENERIC_FAILURE.to_string());
        }
    };

    tracing::debug!(bytes = upload.len(), "Audio upload received");

    match state.recognize(&upload).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) if e.is_configuration() => error_response(e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Recognition error");
            error_response(GENERIC_FAILURE.to_string())
        }
    }
}

/// Pull the bytes of the `audio` field out of the form, ignoring other fields.
async fn read_audio_field(mut multipart: Multipart) -> Result<Vec<u8>, RecognitionError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RecognitionError::Upload(format!("multipart: {}", e)))?
    {
        if field.name() == Some(AUDIO_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| RecognitionError::Upload(format!("multipart: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(RecognitionError::MissingUpload)
}

fn error_response(error: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error }),
    )
        .into_response()
}
