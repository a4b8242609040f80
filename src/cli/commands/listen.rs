//! Recording and identification commands.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::capture::{AudioSource, Microphone, SilenceSource, wav};
use crate::client::{Recognizer, RelayClient, StatusDisplay, TerminalDisplay, render};
use crate::config::CaptureConfig;
use crate::error::{Error, Result, ResultExt};
use crate::recognition::AudioSample;

/// Record from the microphone (or silence), upload, and render the result
pub fn cmd_listen(
    rt: &Runtime,
    capture: &CaptureConfig,
    device: Option<String>,
    silence: bool,
) -> Result<()> {
    let relay = RelayClient::new(&capture.relay_url)?;
    let window = capture.duration();

    if silence {
        run_attempt(rt, SilenceSource::new(window), relay, window)
    } else {
        let source = Microphone {
            device_name: device,
        };
        run_attempt(rt, source, relay, window)
    }
}

fn run_attempt<S: AudioSource + 'static>(
    rt: &Runtime,
    source: S,
    relay: RelayClient,
    window: Duration,
) -> Result<()> {
    let recognizer = Recognizer::new(source, TerminalDisplay, relay, window);
    rt.block_on(recognizer.start_recognition())?;
    Ok(())
}

/// Upload an existing WAV file and render the result
pub fn cmd_identify(rt: &Runtime, path: &Path, relay_url: &str) -> Result<()> {
    let sample = read_sample(path)?;
    let relay = RelayClient::new(relay_url)?;
    let display = TerminalDisplay;

    println!("Identifying: {:?}", path);
    display.replace(render::SENDING_TEXT);

    let result = rt.block_on(relay.recognize(&sample));
    display.replace(&render::render(&result));
    Ok(())
}

/// Load a WAV file as an upload-ready sample.
fn read_sample(path: &Path) -> Result<AudioSample> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }

    let bytes = std::fs::read(path).with_context(format!("reading {}", path.display()))?;
    if !bytes.starts_with(b"RIFF") {
        return Err(Error::invalid_format(format!(
            "{} is not a WAV file",
            path.display()
        )));
    }

    let duration = {
        let reader = hound::WavReader::new(Cursor::new(&bytes))
            .map_err(|e| Error::invalid_format(format!("{}: {}", path.display(), e)))?;
        wav::frames_duration(reader.duration() as u64, reader.spec().sample_rate)
    };

    Ok(AudioSample { bytes, duration })
}
