//! Pipeline result types

use crate::io::sample_buffer::SampleBuffer;
use crate::noise::NoiseDistribution;
use serde::{Deserialize, Serialize};

/// Everything produced by one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Input with synthetic noise added
    pub noisy: SampleBuffer,

    /// Output of the selected denoising filter
    pub filtered: SampleBuffer,

    /// `noisy` encoded as a PCM-16 WAV file
    pub noisy_wav: Vec<u8>,

    /// `filtered` encoded as a PCM-16 WAV file
    pub filtered_wav: Vec<u8>,

    /// Run metadata
    pub metadata: PipelineMetadata,
}

/// Run metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels processed
    pub num_channels: usize,

    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Requested SNR in dB
    pub snr_db: f32,

    /// Noise distribution used
    pub noise_distribution: NoiseDistribution,

    /// Mean power of each input channel
    pub signal_power: Vec<f32>,

    /// Target noise power of each channel, `P_signal / 10^(snr/10)`
    pub noise_power: Vec<f32>,

    /// Filter kind that produced `filtered`
    pub filter: String,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Crate version that produced the result
    pub algorithm_version: String,

    /// Legal but noteworthy conditions (silent input, unprocessed LMS tail, ...)
    pub warnings: Vec<String>,
}
