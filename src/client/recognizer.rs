//! Capture client - drives one recognition attempt end to end.
//!
//! ```text
//! Idle -> RequestingMic -> Recording -> Uploading -> Rendered(Success | NotFound | Error)
//! ```
//!
//! Any step may jump straight to `Rendered(Error)`. A rendered state does
//! not block a new attempt; only an attempt still in flight does.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use parking_lot::Mutex;

use super::relay_client::RelayClient;
use super::render::{SENDING_TEXT, StatusDisplay, listening_text, render};
use crate::capture::{ActiveGuard, AudioSource, CaptureError, CaptureSession};
use crate::recognition::RecognitionResult;

/// Where the client is in the current (or last) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    RequestingMic,
    Recording,
    Uploading,
    RenderedSuccess,
    RenderedNotFound,
    RenderedError,
}

/// Records from `source`, sends the sample to the relay and renders the outcome to `display`.
pub struct Recognizer<S, D> {
    source: Arc<S>,
    display: D,
    relay: RelayClient,
    window: Duration,
    active: Arc<AtomicBool>,
    state: Mutex<ClientState>,
}

impl<S: AudioSource + 'static, D: StatusDisplay> Recognizer<S, D> {
    pub fn new(source: S, display: D, relay: RelayClient, window: Duration) -> Self {
        Self {
            source: Arc::new(source),
            display,
            relay,
            window,
            active: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(ClientState::Idle),
        }
    }

    pub fn state(&self) -> ClientState {
        *self.state.lock()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run one attempt: listen for the window, upload, render.
    ///
    /// Returns `Err(Busy)` without touching the display if an attempt is
    /// already running. Capture failures are rendered and then returned as
    /// errors; relay failures are rendered and returned as
    /// [`RecognitionResult::Error`]. Nothing is retried.
    pub async fn start_recognition(&self) -> Result<RecognitionResult, CaptureError> {
        let _guard = ActiveGuard::acquire(&self.active)?;

        self.set_state(ClientState::RequestingMic);
        self.display.replace(&listening_text(self.window));

        let session = match CaptureSession::start(self.source.clone(), self.window).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Microphone error");
                return Err(self.capture_failed(e));
            }
        };

        self.set_state(ClientState::Recording);
        let sample = match session.finish().await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::error!(error = %e, "Recording error");
                return Err(self.capture_failed(e));
            }
        };
        tracing::info!(
            bytes = sample.bytes.len(),
            duration_secs = sample.duration.as_secs_f32(),
            "Recording finished"
        );

        self.set_state(ClientState::Uploading);
        self.display.replace(SENDING_TEXT);

        let result = self.relay.recognize(&sample).await;
        self.show(&result);
        Ok(result)
    }

    fn capture_failed(&self, error: CaptureError) -> CaptureError {
        let message = match error {
            CaptureError::PermissionDenied(_) => "Microphone access denied",
            _ => "Recording failed",
        };
        self.show(&RecognitionResult::error(message));
        error
    }

    fn show(&self, result: &RecognitionResult) {
        let state = match result {
            RecognitionResult::Success(_) => ClientState::RenderedSuccess,
            RecognitionResult::NotFound => ClientState::RenderedNotFound,
            RecognitionResult::Error { .. } => ClientState::RenderedError,
        };
        self.set_state(state);
        self.display.replace(&render(result));
    }

    fn set_state(&self, state: ClientState) {
        tracing::debug!(?state, "Client state");
        *self.state.lock() = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SilenceSource;
    use crate::capture::source::CaptureStream;
    use crate::test_utils::{MemoryDisplay, provider_success_json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct DeniedSource;

    impl AudioSource for DeniedSource {
        fn open(&self) -> Result<CaptureStream, CaptureError> {
            Err(CaptureError::PermissionDenied("user declined".to_string()))
        }
    }

    async fn relay_replying(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_success_renders_track() {
        let server = relay_replying(
            ResponseTemplate::new(200)
                .set_body_raw(provider_success_json("X", "Y", "Z"), "application/json"),
        )
        .await;

        let recognizer = Recognizer::new(
            SilenceSource::new(Duration::from_secs(1)),
            MemoryDisplay::default(),
            RelayClient::new(server.uri()).unwrap(),
            Duration::from_millis(10),
        );

        let result = recognizer.start_recognition().await.unwrap();
        assert!(matches!(result, RecognitionResult::Success(_)));
        assert_eq!(recognizer.state(), ClientState::RenderedSuccess);

        let shown = recognizer.display().current();
        assert!(shown.contains("Title: X"));
        assert!(shown.contains("Artist: Y"));
        assert!(shown.contains("Album: Z"));

        let history = recognizer.display().history();
        assert!(history[0].starts_with("🎤 Listening"));
        assert_eq!(history[1], "⏳ Sending to server...");
        assert_eq!(history.len(), 3);
    }

    #[tokio::test]
    async fn test_permission_denied_is_rendered() {
        let recognizer = Recognizer::new(
            DeniedSource,
            MemoryDisplay::default(),
            RelayClient::new("http://127.0.0.1:1").unwrap(),
            Duration::from_millis(10),
        );

        let err = recognizer.start_recognition().await.unwrap_err();
        assert!(matches!(err, CaptureError::PermissionDenied(_)));
        assert_eq!(recognizer.state(), ClientState::RenderedError);
        assert_eq!(recognizer.display().current(), "❌ Microphone access denied");
        assert!(!recognizer.display().history().iter().any(|t| t.contains("Sending")));
    }

    #[tokio::test]
    async fn test_relay_failure_renders_generic_error() {
        let server = relay_replying(
            ResponseTemplate::new(500)
                .set_body_raw(r#"{"error":"Recognition failed"}"#, "application/json"),
        )
        .await;

        let recognizer = Recognizer::new(
            SilenceSource::new(Duration::from_secs(1)),
            MemoryDisplay::default(),
            RelayClient::new(server.uri()).unwrap(),
            Duration::from_millis(10),
        );

        let result = recognizer.start_recognition().await.unwrap();
        assert_eq!(result, RecognitionResult::error("Error contacting server"));
        assert_eq!(recognizer.state(), ClientState::RenderedError);
        assert_eq!(recognizer.display().current(), "❌ Error contacting server");
    }

    #[tokio::test]
    async fn test_second_attempt_while_running_is_busy() {
        let server = relay_replying(
            ResponseTemplate::new(200)
                .set_body_raw(provider_success_json("X", "Y", "Z"), "application/json"),
        )
        .await;

        let recognizer = Recognizer::new(
            SilenceSource::new(Duration::from_secs(1)),
            MemoryDisplay::default(),
            RelayClient::new(server.uri()).unwrap(),
            Duration::from_millis(200),
        );

        let (first, second) = tokio::join!(recognizer.start_recognition(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            recognizer.start_recognition().await
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(CaptureError::Busy)));
        // The rejected attempt never wrote to the display
        assert_eq!(
            recognizer
                .display()
                .history()
                .iter()
                .filter(|t| t.starts_with("🎤"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_rendered_state_allows_restart() {
        let server = relay_replying(
            ResponseTemplate::new(200)
                .set_body_raw(provider_success_json("X", "Y", "Z"), "application/json"),
        )
        .await;

        let recognizer = Recognizer::new(
            SilenceSource::new(Duration::from_millis(100)),
            MemoryDisplay::default(),
            RelayClient::new(server.uri()).unwrap(),
            Duration::from_millis(5),
        );

        assert_eq!(recognizer.state(), ClientState::Idle);
        recognizer.start_recognition().await.unwrap();
        recognizer.start_recognition().await.unwrap();
        assert_eq!(recognizer.state(), ClientState::RenderedSuccess);
    }
}
