//! One capture attempt.
//!
//! A [`CaptureSession`] owns the open stream and the stop timer. Dropping
//! the session (e.g. when the task running it is cancelled) aborts the
//! timer and releases the device.
//!
//! [`ActiveGuard`] marks a recorder busy for a whole attempt, from opening
//! the microphone until the result is rendered.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::CaptureError;
use super::source::{AudioSource, CaptureStream};
use super::wav;
use crate::recognition::AudioSample;

/// Marks a recorder busy for as long as it is alive.
#[derive(Debug)]
pub struct ActiveGuard {
    flag: Arc<AtomicBool>,
}

impl ActiveGuard {
    /// Claim `flag`, failing with `Busy` if another session holds it.
    pub fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, CaptureError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CaptureError::Busy)?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// An in-progress recording with a fixed window.
pub struct CaptureSession {
    stream: Option<CaptureStream>,
    stop_timer: JoinHandle<()>,
    stopped: Option<oneshot::Receiver<()>>,
    window: Duration,
}

impl CaptureSession {
    /// Open `source` and arm a timer that ends the recording after `window`.
    ///
    /// Opening may block on the device (or a permission prompt), so it runs
    /// on the blocking pool.
    pub async fn start(
        source: Arc<dyn AudioSource>,
        window: Duration,
    ) -> Result<Self, CaptureError> {
        let stream = tokio::task::spawn_blocking(move || source.open())
            .await
            .map_err(|e| CaptureError::Worker(e.to_string()))??;

        let (stop_tx, stop_rx) = oneshot::channel();
        let stop_timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let _ = stop_tx.send(());
        });

        tracing::debug!(window_secs = window.as_secs_f32(), "Capture session started");

        Ok(Self {
            stream: Some(stream),
            stop_timer,
            stopped: Some(stop_rx),
            window,
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait out the recording window, release the device and encode the
    /// captured chunks into a single sample.
    pub async fn finish(mut self) -> Result<AudioSample, CaptureError> {
        if let Some(stopped) = self.stopped.take() {
            stopped
                .await
                .map_err(|_| CaptureError::Worker("stop timer cancelled".to_string()))?;
        }

        let stream = self
            .stream
            .take()
            .ok_or_else(|| CaptureError::Worker("capture already finished".to_string()))?;
        let format = stream.format();

        let chunks = tokio::task::spawn_blocking(move || stream.finish())
            .await
            .map_err(|e| CaptureError::Worker(e.to_string()))??;

        tracing::debug!(chunks = chunks.len(), "Capture session stopped");

        tokio::task::spawn_blocking(move || wav::encode(format, &chunks))
            .await
            .map_err(|e| CaptureError::Worker(e.to_string()))?
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop_timer.abort();
    }
}
