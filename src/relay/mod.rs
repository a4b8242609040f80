//! Relay server - receives uploaded samples and forwards them, signed, to the provider.
//!
//! The provider secret never leaves this process; clients only ever talk
//! to `POST /recognize`.
//!
//! | Route             | Response                                               |
//! |-------------------|--------------------------------------------------------|
//! | `POST /recognize` | `200` provider JSON verbatim, or `500 {"error": ...}`  |
//! | `GET /health`     | `200 healthy`                                          |

mod handlers;
mod router;
mod service;
mod upload;

pub use handlers::AUDIO_FIELD;
pub use router::create_router;
pub use service::RelayService;

use std::path::PathBuf;

use crate::config::Credentials;
use crate::error::{Result, ResultExt};
use crate::recognition::acrcloud::AcrCloudClient;

/// Settings for running the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: String,
    pub upload_dir: PathBuf,
    pub credentials: Credentials,
}

/// Run the relay until Ctrl-C.
///
/// Missing credentials are not fatal here: the server starts and answers
/// each request with a configuration error until they are provided.
pub async fn serve(config: RelayConfig) -> Result<()> {
    let missing = config.credentials.missing();
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "Provider credentials incomplete; /recognize will fail until they are set"
        );
    }

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(format!("creating upload dir {}", config.upload_dir.display()))?;

    let provider = AcrCloudClient::new()?;
    let service = RelayService::new(config.credentials, config.upload_dir, provider);
    let app = create_router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(format!("binding {}", config.bind))?;
    let addr = listener.local_addr()?;

    tracing::info!("🚀 Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
