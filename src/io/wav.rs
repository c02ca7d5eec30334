//! Canonical RIFF/WAVE PCM-16 encoder
//!
//! Produces the classic 44-byte header followed by interleaved little-endian
//! 16-bit samples:
//!
//! | Offset | Field          | Value                              |
//! |--------|----------------|------------------------------------|
//! | 0      | ChunkID        | `"RIFF"`                           |
//! | 4      | ChunkSize      | total length - 8                   |
//! | 8      | Format         | `"WAVE"`                           |
//! | 12     | Subchunk1ID    | `"fmt "`                           |
//! | 16     | Subchunk1Size  | 16                                 |
//! | 20     | AudioFormat    | 1 (integer PCM)                    |
//! | 22     | NumChannels    | channel count                      |
//! | 24     | SampleRate     | sample rate                        |
//! | 28     | ByteRate       | sample rate * 2 * channels         |
//! | 32     | BlockAlign     | channels * 2                       |
//! | 34     | BitsPerSample  | 16                                 |
//! | 36     | Subchunk2ID    | `"data"`                           |
//! | 40     | Subchunk2Size  | data length in bytes               |
//!
//! # Example
//!
//! ```
//! use stratum_denoise::io::sample_buffer::SampleBuffer;
//! use stratum_denoise::io::wav::{encode_wav, WAV_HEADER_LEN};
//!
//! let buffer = SampleBuffer::mono(16000, vec![0.0; 100])?;
//! let bytes = encode_wav(&buffer)?;
//! assert_eq!(bytes.len(), WAV_HEADER_LEN + 200);
//! # Ok::<(), stratum_denoise::DenoiseError>(())
//! ```

use super::sample_buffer::SampleBuffer;
use crate::error::DenoiseError;

/// Size of the canonical PCM header in bytes
pub const WAV_HEADER_LEN: usize = 44;

const BYTES_PER_SAMPLE: usize = 2;
const BITS_PER_SAMPLE: u16 = 16;
const FORMAT_PCM: u16 = 1;
const FMT_CHUNK_SIZE: u32 = 16;

/// Encode every frame of `buffer`
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>, DenoiseError> {
    encode_wav_frames(buffer, buffer.len())
}

/// Encode the first `frames` frames of `buffer`
///
/// # Errors
///
/// Returns `DenoiseError::InvalidInput` if `frames` exceeds the buffer length,
/// or if the result would not fit the 32-bit RIFF size fields.
pub fn encode_wav_frames(buffer: &SampleBuffer, frames: usize) -> Result<Vec<u8>, DenoiseError> {
    if frames > buffer.len() {
        return Err(DenoiseError::InvalidInput(format!(
            "Cannot encode {} frames from a buffer of {}",
            frames,
            buffer.len()
        )));
    }

    let num_channels = buffer.num_channels();
    let channel_count = u16::try_from(num_channels).map_err(|_| {
        DenoiseError::InvalidInput(format!("Too many channels for WAV: {}", num_channels))
    })?;

    let data_len = frames
        .checked_mul(num_channels)
        .and_then(|n| n.checked_mul(BYTES_PER_SAMPLE))
        .filter(|&n| n <= u32::MAX as usize - WAV_HEADER_LEN)
        .ok_or_else(|| {
            DenoiseError::InvalidInput(format!(
                "{} frames x {} channels exceeds the RIFF size limit",
                frames, num_channels
            ))
        })?;
    let total_len = data_len + WAV_HEADER_LEN;

    let sample_rate = buffer.sample_rate();
    let block_align = channel_count.checked_mul(2).ok_or_else(|| {
        DenoiseError::InvalidInput(format!("Too many channels for WAV: {}", num_channels))
    })?;
    let byte_rate = sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| {
            DenoiseError::InvalidInput(format!(
                "Byte rate overflows at {} Hz x {} channels",
                sample_rate, num_channels
            ))
        })?;

    log::debug!(
        "Encoding WAV: {} frames, {} channels, {} Hz, {} bytes",
        frames,
        num_channels,
        sample_rate,
        total_len
    );

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((total_len - 8) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&channel_count.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    debug_assert_eq!(out.len(), WAV_HEADER_LEN);

    let channels = buffer.channels();
    for frame in 0..frames {
        for channel in channels {
            out.extend_from_slice(&sample_to_pcm16(channel[frame]).to_le_bytes());
        }
    }

    Ok(out)
}

/// Convert a float sample to signed 16-bit PCM
///
/// Clamps to [-1, 1], scales negatives by 32768 and non-negatives by 32767,
/// then truncates toward zero. NaN maps to 0.
pub fn sample_to_pcm16(sample: f32) -> i16 {
    let clamped = f64::from(sample.clamp(-1.0, 1.0));
    let scaled = if clamped < 0.0 {
        clamped * 32768.0
    } else {
        clamped * 32767.0
    };
    scaled as i16
}
