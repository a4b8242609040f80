//! Audio source abstraction.
//!
//! A source opens a [`CaptureStream`]: a channel of interleaved `f32`
//! chunks in delivery order plus a stop signal for whatever worker feeds
//! it. Stopping (or dropping) the stream releases the underlying device.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::CaptureError;

/// Format of the samples a stream delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Something that can be recorded from.
pub trait AudioSource: Send + Sync {
    /// Acquire the device and start delivering chunks.
    fn open(&self) -> Result<CaptureStream, CaptureError>;
}

/// A running capture.
pub struct CaptureStream {
    format: StreamFormat,
    chunks: Receiver<Vec<f32>>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl CaptureStream {
    /// Assemble a stream from its parts.
    ///
    /// `stop` is dropped to tell the worker to release the device; the
    /// worker must exit promptly once its receiving end disconnects.
    pub fn new(
        format: StreamFormat,
        chunks: Receiver<Vec<f32>>,
        stop: Option<Sender<()>>,
        worker: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            format,
            chunks,
            stop,
            worker,
        }
    }

    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Stop the worker, wait for it to release the device, and return
    /// every chunk delivered so far, in order.
    ///
    /// Blocks until the worker has exited; call from a blocking context.
    pub fn finish(mut self) -> Result<Vec<Vec<f32>>, CaptureError> {
        self.release()?;
        Ok(self.chunks.try_iter().collect())
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        drop(self.stop.take());
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| CaptureError::Worker("capture thread panicked".to_string()))?;
        }
        Ok(())
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        // Signal only; joining here could block an async caller.
        drop(self.stop.take());
    }
}

/// A source that yields a fixed stretch of digital silence.
///
/// Useful for exercising the full pipeline without a microphone.
#[derive(Debug, Clone)]
pub struct SilenceSource {
    pub format: StreamFormat,
    pub length: Duration,
    /// Frames per delivered chunk
    pub chunk_frames: usize,
}

impl SilenceSource {
    pub fn new(length: Duration) -> Self {
        Self {
            format: StreamFormat {
                sample_rate: 16_000,
                channels: 1,
            },
            length,
            chunk_frames: 1_024,
        }
    }
}

impl AudioSource for SilenceSource {
    fn open(&self) -> Result<CaptureStream, CaptureError> {
        let (tx, rx) = unbounded();
        let total_frames =
            (self.length.as_secs_f64() * self.format.sample_rate as f64).round() as usize;
        let channels = self.format.channels as usize;

        let mut remaining = total_frames;
        while remaining > 0 {
            let frames = remaining.min(self.chunk_frames.max(1));
            let _ = tx.send(vec![0.0; frames * channels]);
            remaining -= frames;
        }

        Ok(CaptureStream::new(self.format, rx, None, None))
    }
}
