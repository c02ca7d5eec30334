//! Audio decoding using Symphonia
//!
//! Converts a file or an in-memory container into a [`SampleBuffer`] of f32
//! samples in [-1.0, 1.0], keeping every channel.

use super::sample_buffer::SampleBuffer;
use crate::error::DenoiseError;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file
///
/// The file extension, if any, is used as a format hint.
pub fn decode_audio_file(path: impl AsRef<Path>) -> Result<SampleBuffer, DenoiseError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let file = File::open(path).map_err(|e| {
        DenoiseError::DecodingError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let extension = path.extension().and_then(|e| e.to_str());
    decode_source(Box::new(file), extension)
}

/// Decode an encoded audio container held in memory
///
/// `extension_hint` is an optional file extension such as `"wav"`.
pub fn decode_audio_bytes(
    bytes: Vec<u8>,
    extension_hint: Option<&str>,
) -> Result<SampleBuffer, DenoiseError> {
    log::debug!("Decoding {} bytes of audio", bytes.len());
    decode_source(Box::new(Cursor::new(bytes)), extension_hint)
}

fn decode_source(
    source: Box<dyn MediaSource>,
    extension_hint: Option<&str>,
) -> Result<SampleBuffer, DenoiseError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DenoiseError::DecodingError(format!("Unrecognized format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DenoiseError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| DenoiseError::DecodingError("Track has no sample rate".to_string()))?;
    let mut num_channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DenoiseError::DecodingError(format!("Unsupported codec: {}", e)))?;

    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(DenoiseError::DecodingError(format!(
                    "Failed to read packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                num_channels = spec.channels.count();
                let mut buf = InterleavedBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
            }
            Err(e) => {
                return Err(DenoiseError::DecodingError(format!(
                    "Decoder failed: {}",
                    e
                )))
            }
        }
    }

    if num_channels == 0 {
        return Err(DenoiseError::DecodingError(
            "Could not determine channel count".to_string(),
        ));
    }

    let frames = interleaved.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    log::debug!(
        "Decoded {} frames x {} channels at {} Hz",
        frames,
        num_channels,
        sample_rate
    );

    SampleBuffer::new(sample_rate, channels)
}
