use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::recognition::IdentifyApi;

use super::handlers::{health_handler, recognize_handler};
use super::service::RelayService;

/// Largest upload accepted, comfortably above a 10 second stereo WAV
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn create_router<P>(service: RelayService<P>) -> Router
where
    P: IdentifyApi + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/recognize", post(recognize_handler::<P>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(trace_layer)
        .layer(cors)
        .with_state(Arc::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::recognition::RecognitionError;
    use crate::recognition::traits::mocks::MockProvider;
    use crate::test_utils::{multipart_body, provider_not_found_json};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn configured() -> Credentials {
        let mut creds = Credentials::default();
        creds.merge(Some("identify.example.com"), Some("key"), Some("secret"));
        creds
    }

    fn recognize_request(field: &str, bytes: &[u8]) -> Request<Body> {
        let (content_type, body) = multipart_body(field, "sample.wav", bytes);
        Request::builder()
            .method("POST")
            .uri("/recognize")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(RelayService::new(
            Credentials::default(),
            dir.path(),
            MockProvider::replying("{}"),
        ));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"healthy");
    }

    #[tokio::test]
    async fn test_missing_credentials_returns_500_with_explanation() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(RelayService::new(
            Credentials::default(),
            dir.path(),
            MockProvider::replying("{}"),
        ));

        let response = app.oneshot(recognize_request("audio", b"RIFF")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("credentials not configured"));
    }

    #[tokio::test]
    async fn test_success_relays_provider_body() {
        let dir = tempfile::tempdir().unwrap();
        let reply = provider_not_found_json();
        let app = create_router(RelayService::new(
            configured(),
            dir.path(),
            MockProvider::replying(reply.clone()),
        ));

        let response = app.oneshot(recognize_request("audio", b"RIFF")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], reply.as_bytes());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic_500() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(RelayService::new(
            configured(),
            dir.path(),
            MockProvider::failing(RecognitionError::Api {
                status: 401,
                body: "invalid signature for key".to_string(),
            }),
        ));

        let response = app.oneshot(recognize_request("audio", b"RIFF")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"error": "Recognition failed"}));
    }

    fn empty_post() -> Request<Body> {
        Request::post("/recognize").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_non_multipart_without_credentials_explains_config() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(RelayService::new(
            Credentials::default(),
            dir.path(),
            MockProvider::replying("{}"),
        ));

        let response = app.oneshot(empty_post()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("credentials not configured")
        );
    }

    #[tokio::test]
    async fn test_non_multipart_is_generic_500() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(RelayService::new(
            configured(),
            dir.path(),
            MockProvider::replying("{}"),
        ));

        let response = app.oneshot(empty_post()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"error": "Recognition failed"}));
    }

    #[tokio::test]
    async fn test_missing_audio_field_is_generic_500() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(RelayService::new(
            configured(),
            dir.path(),
            MockProvider::replying("{}"),
        ));

        let response = app.oneshot(recognize_request("file", b"RIFF")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Recognition failed");
    }
}
