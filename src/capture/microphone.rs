//! Microphone input using cpal.
//!
//! The cpal stream is not `Send` on every platform, so it lives on a
//! dedicated thread that:
//! - Opens the default input device
//! - Forwards every callback buffer as an `f32` chunk
//! - Waits for the stop signal, then drops the stream (releasing the mic)

use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use super::CaptureError;
use super::source::{AudioSource, CaptureStream, StreamFormat};

/// The system's default input device.
#[derive(Debug, Default, Clone)]
pub struct Microphone {
    /// Preferred device name (substring, case-insensitive). Falls back to
    /// the default input device when absent or not found.
    pub device_name: Option<String>,
}

impl Microphone {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSource for Microphone {
    fn open(&self) -> Result<CaptureStream, CaptureError> {
        let (chunk_tx, chunk_rx) = unbounded::<Vec<f32>>();
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let (ready_tx, ready_rx) = bounded::<Result<StreamFormat, CaptureError>>(1);
        let device_name = self.device_name.clone();

        let worker = thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || capture_thread_main(device_name, chunk_tx, stop_rx, ready_tx))
            .map_err(|e| CaptureError::Worker(e.to_string()))?;

        // The thread reports once the device is open (or refused).
        let format = match ready_rx.recv() {
            Ok(Ok(format)) => format,
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => {
                let _ = worker.join();
                return Err(CaptureError::Worker(
                    "capture thread exited before opening the device".to_string(),
                ));
            }
        };

        Ok(CaptureStream::new(format, chunk_rx, Some(stop_tx), Some(worker)))
    }
}

fn capture_thread_main(
    device_name: Option<String>,
    chunk_tx: Sender<Vec<f32>>,
    stop_rx: Receiver<()>,
    ready_tx: Sender<Result<StreamFormat, CaptureError>>,
) {
    let (stream, format) = match open_stream(device_name.as_deref(), chunk_tx) {
        Ok(opened) => opened,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    tracing::info!(
        sample_rate = format.sample_rate,
        channels = format.channels,
        "Microphone open"
    );
    let _ = ready_tx.send(Ok(format));

    // Returns on an explicit stop or when the session drops its sender.
    let _ = stop_rx.recv();
    drop(stream);
    tracing::info!("Microphone released");
}

fn open_stream(
    device_name: Option<&str>,
    chunk_tx: Sender<Vec<f32>>,
) -> Result<(Stream, StreamFormat), CaptureError> {
    let host = cpal::default_host();
    let device = select_device(&host, device_name)?;

    let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    tracing::info!("Using input device: {}", name);

    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

    let config: StreamConfig = supported.config();
    let format = StreamFormat {
        sample_rate: config.sample_rate.0,
        channels: config.channels,
    };

    let stream = match supported.sample_format() {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, chunk_tx),
        SampleFormat::I16 => build_stream::<i16>(&device, &config, chunk_tx),
        SampleFormat::U16 => build_stream::<u16>(&device, &config, chunk_tx),
        SampleFormat::I32 => build_stream::<i32>(&device, &config, chunk_tx),
        other => {
            return Err(CaptureError::PermissionDenied(format!(
                "Unsupported sample format: {:?}",
                other
            )));
        }
    }
    .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

    stream
        .play()
        .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

    Ok((stream, format))
}

/// Pick the named device if it exists, otherwise the default input.
fn select_device(host: &cpal::Host, device_name: Option<&str>) -> Result<Device, CaptureError> {
    if let Some(wanted) = device_name {
        let wanted = wanted.to_lowercase();
        let found = host
            .input_devices()
            .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?
            .find(|d| {
                d.name()
                    .map(|n| n.to_lowercase().contains(&wanted))
                    .unwrap_or(false)
            });
        if let Some(device) = found {
            return Ok(device);
        }
        tracing::warn!("Input device {:?} not found, using default", wanted);
    }

    host.default_input_device()
        .ok_or_else(|| CaptureError::PermissionDenied("No input device found".to_string()))
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    chunk_tx: Sender<Vec<f32>>,
) -> Result<Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let chunk: Vec<f32> = data.iter().map(|s| s.to_sample::<f32>()).collect();
            // Receiver gone means the session is over; nothing left to do.
            let _ = chunk_tx.send(chunk);
        },
        |err| tracing::error!("Input stream error: {}", err),
        None,
    )
}
