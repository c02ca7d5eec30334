//! Owned multi-channel sample buffers
//!
//! Every pipeline stage consumes a `&SampleBuffer` and returns a freshly
//! allocated one; no stage mutates its input.

use crate::error::DenoiseError;
use rayon::prelude::*;

/// Decoded audio: a sample rate and one or more equal-length channels
///
/// Samples are nominally in [-1.0, 1.0] but are not clamped here; filters may
/// overshoot and clamping only happens at encode time.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Create a buffer from per-channel sample vectors
    ///
    /// # Errors
    ///
    /// Returns `DenoiseError::InvalidInput` if the sample rate is zero, no
    /// channel is given, or the channels differ in length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, DenoiseError> {
        if sample_rate == 0 {
            return Err(DenoiseError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }

        let first_len = match channels.first() {
            Some(channel) => channel.len(),
            None => {
                return Err(DenoiseError::InvalidInput(
                    "Buffer must have at least one channel".to_string(),
                ))
            }
        };

        if let Some((idx, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != first_len)
        {
            return Err(DenoiseError::InvalidInput(format!(
                "Channel {} has {} samples, expected {}",
                idx,
                channel.len(),
                first_len
            )));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Create a single-channel buffer
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, DenoiseError> {
        Self::new(sample_rate, vec![samples])
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.len() as f32 / self.sample_rate as f32
    }

    /// Samples of channel `index`, if present
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels in order
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Build a new buffer by applying a pure transform to every channel
    ///
    /// Channels are independent, so they are processed in parallel; the
    /// result is identical to processing them one after another.
    pub fn map_channels<F>(&self, f: F) -> SampleBuffer
    where
        F: Fn(&[f32]) -> Vec<f32> + Sync + Send,
    {
        let channels: Vec<Vec<f32>> = self.channels.par_iter().map(|c| f(c.as_slice())).collect();
        debug_assert!(channels.iter().all(|c| c.len() == self.len()));
        SampleBuffer {
            sample_rate: self.sample_rate,
            channels,
        }
    }

    /// Fail with `ComputationError` if any sample is NaN or infinite
    ///
    /// `stage` names the producer of this buffer in the error message.
    pub fn ensure_finite(&self, stage: &str) -> Result<(), DenoiseError> {
        for (ch, channel) in self.channels.iter().enumerate() {
            if let Some(idx) = channel.iter().position(|s| !s.is_finite()) {
                return Err(DenoiseError::ComputationError(format!(
                    "{} produced non-finite sample {} at channel {}, index {}",
                    stage, channel[idx], ch, idx
                )));
            }
        }
        Ok(())
    }
}
