//! WAV encoding of captured chunks.
//!
//! Chunks are concatenated in delivery order, mixed down to mono and
//! written as 16-bit PCM at the capture sample rate.

use std::io::Cursor;
use std::time::Duration;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::CaptureError;
use super::source::StreamFormat;
use crate::recognition::AudioSample;

/// Concatenate interleaved `chunks` and encode them as a mono WAV sample.
pub fn encode(format: StreamFormat, chunks: &[Vec<f32>]) -> Result<AudioSample, CaptureError> {
    let channels = format.channels.max(1) as usize;
    let spec = WavSpec {
        channels: 1,
        sample_rate: format.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let interleaved: Vec<f32> = chunks.iter().flatten().copied().collect();
    let frames = interleaved.len() / channels;

    let mut bytes = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
        for frame in interleaved.chunks_exact(channels) {
            let mono = frame.iter().sum::<f32>() / channels as f32;
            writer
                .write_sample(to_i16(mono))
                .map_err(|e| CaptureError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
    }

    Ok(AudioSample {
        bytes,
        duration: frames_duration(frames as u64, format.sample_rate),
    })
}

/// Playback length of `frames` frames at `sample_rate`.
pub fn frames_duration(frames: u64, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    let nanos = frames as u128 * 1_000_000_000 / sample_rate as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
