//! # Stratum Denoise
//!
//! Synthetic noise corruption and classic denoising filters for decoded audio
//! buffers, with canonical PCM-16 WAV output.
//!
//! ## Features
//!
//! - **Noise injection**: white noise at a target SNR (uniform or Gaussian)
//! - **Bandpass FIR**: Hamming-windowed sinc design, direct or FFT convolution
//!   (band edges are normalized by Nyquist, so the passband is twice the
//!   requested edges; see [`filters::fir_design`])
//! - **LMS adaptive filter**: self-referenced least-mean-squares predictor
//! - **Wiener filter**: three-sample local-statistics gain
//! - **WAV encoding**: 44-byte RIFF header, interleaved little-endian PCM-16
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_denoise::{process_audio, PipelineConfig, SampleBuffer};
//!
//! // Decoded mono audio, f32 in [-1.0, 1.0]
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let buffer = SampleBuffer::mono(16000, samples)?;
//!
//! let result = process_audio(&buffer, &PipelineConfig::default())?;
//! std::fs::write("noisy.wav", &result.noisy_wav).ok();
//! std::fs::write("filtered.wav", &result.filtered_wav).ok();
//! # Ok::<(), stratum_denoise::DenoiseError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! SampleBuffer → Noise injection → {Bandpass | Adaptive | Wiener} → WAV encode (x2)
//! ```
//!
//! Every stage returns a new buffer; inputs are never modified.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod noise;

// Re-export main types
pub use analysis::result::{PipelineMetadata, PipelineResult};
pub use config::{FilterConfig, FilterKind, PipelineConfig, PipelineSettings};
pub use error::DenoiseError;
pub use filters::fir::ConvolutionMode;
pub use filters::wiener::LocalVariance;
pub use io::sample_buffer::SampleBuffer;
pub use noise::NoiseDistribution;

use rand::Rng;

/// Main pipeline function
///
/// Adds noise to `buffer` at `config.snr_db`, runs the configured filter over
/// the noisy signal, and encodes both as WAV. Noise is drawn from the thread
/// RNG; use [`process_audio_with_rng`] for reproducible output.
///
/// # Errors
///
/// - `InvalidInput` / `InvalidConfig` if the buffer or configuration is
///   invalid (checked before any processing)
/// - `ComputationError` if a stage produces NaN or infinite samples
///
/// # Example
///
/// ```
/// use stratum_denoise::{process_audio, FilterConfig, LocalVariance, PipelineConfig, SampleBuffer};
///
/// let buffer = SampleBuffer::mono(8000, vec![0.0; 8000])?;
/// let config = PipelineConfig {
///     filter: FilterConfig::Wiener { variance: LocalVariance::Reference },
///     ..PipelineConfig::default()
/// };
/// let result = process_audio(&buffer, &config)?;
/// assert_eq!(result.filtered_wav.len(), 44 + 2 * 8000);
/// # Ok::<(), stratum_denoise::DenoiseError>(())
/// ```
pub fn process_audio(
    buffer: &SampleBuffer,
    config: &PipelineConfig,
) -> Result<PipelineResult, DenoiseError> {
    process_audio_with_rng(buffer, config, &mut rand::thread_rng())
}

/// [`process_audio`] with an explicit noise source
pub fn process_audio_with_rng<R: Rng + ?Sized>(
    buffer: &SampleBuffer,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<PipelineResult, DenoiseError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting denoise pipeline: {} samples x {} channels at {} Hz, snr={:.1} dB, filter={}",
        buffer.len(),
        buffer.num_channels(),
        buffer.sample_rate(),
        config.snr_db,
        config.filter.name()
    );

    config.validate(buffer.sample_rate())?;

    let mut warnings = Vec::new();

    let signal_power: Vec<f32> = buffer
        .channels()
        .iter()
        .map(|c| noise::power::mean_power(c))
        .collect();
    let noise_power: Vec<f32> = signal_power
        .iter()
        .map(|&p| noise::power::noise_power_for_snr(p, config.snr_db))
        .collect();
    if !buffer.is_empty() && signal_power.iter().any(|&p| p == 0.0) {
        warnings.push("Silent channel: no noise injected".to_string());
    }

    // 1. Noise injection
    let noisy = noise::inject_noise(buffer, config.snr_db, config.noise, rng)?;
    noisy.ensure_finite("noise injection")?;

    // 2. Filtering
    if let FilterConfig::Adaptive { filter_length, .. } = config.filter {
        let skipped = filter_length.min(noisy.len());
        if skipped > 0 {
            warnings.push(format!(
                "Adaptive filter leaves the last {} samples at zero",
                skipped
            ));
        }
    }
    let filtered = filters::apply_filter(&noisy, &config.filter)?;
    filtered.ensure_finite(config.filter.name())?;

    // 3. Encoding
    let noisy_wav = io::wav::encode_wav(&noisy)?;
    let filtered_wav = io::wav::encode_wav(&filtered)?;

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Pipeline finished in {:.2} ms ({} + {} WAV bytes)",
        processing_time_ms,
        noisy_wav.len(),
        filtered_wav.len()
    );

    let metadata = PipelineMetadata {
        sample_rate: buffer.sample_rate(),
        num_channels: buffer.num_channels(),
        duration_seconds: buffer.duration_seconds(),
        snr_db: config.snr_db,
        noise_distribution: config.noise,
        signal_power,
        noise_power,
        filter: config.filter.name().to_string(),
        processing_time_ms,
        algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        warnings,
    };

    Ok(PipelineResult {
        noisy,
        filtered,
        noisy_wav,
        filtered_wav,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invalid_config_fails_fast() {
        let buffer = SampleBuffer::mono(8000, vec![0.1; 100]).unwrap();
        let config = PipelineConfig {
            snr_db: 10.0,
            filter: FilterConfig::Adaptive {
                filter_length: 8,
                step_size: 0.0,
            },
            noise: NoiseDistribution::Uniform,
        };
        let result = process_audio_with_rng(&buffer, &config, &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(DenoiseError::InvalidConfig { field: "stepSize", .. })
        ));
    }

    #[test]
    fn test_diverging_lms_surfaces_computation_error() {
        let buffer = SampleBuffer::mono(8000, vec![0.9; 2000]).unwrap();
        let config = PipelineConfig {
            snr_db: 40.0,
            filter: FilterConfig::Adaptive {
                filter_length: 16,
                step_size: 10.0,
            },
            noise: NoiseDistribution::Uniform,
        };
        let result = process_audio_with_rng(&buffer, &config, &mut StdRng::seed_from_u64(1));
        assert!(
            matches!(result, Err(DenoiseError::ComputationError(_))),
            "{:?}",
            result.map(|r| r.metadata)
        );
    }

    #[test]
    fn test_metadata_reports_powers() {
        let buffer = SampleBuffer::mono(8000, vec![0.5; 8000]).unwrap();
        let config = PipelineConfig {
            snr_db: 10.0,
            filter: FilterConfig::Wiener {
                variance: LocalVariance::Reference,
            },
            noise: NoiseDistribution::Gaussian,
        };
        let result =
            process_audio_with_rng(&buffer, &config, &mut StdRng::seed_from_u64(2)).unwrap();

        let metadata = &result.metadata;
        assert_eq!(metadata.sample_rate, 8000);
        assert_eq!(metadata.num_channels, 1);
        assert!((metadata.duration_seconds - 1.0).abs() < 1e-6);
        assert!((metadata.signal_power[0] - 0.25).abs() < 1e-6);
        assert!((metadata.noise_power[0] - 0.025).abs() < 1e-6);
        assert_eq!(metadata.filter, "wiener");
        assert!(metadata.warnings.is_empty());
    }

    #[test]
    fn test_input_buffer_is_not_modified() {
        let samples: Vec<f32> = (0..500).map(|i| (i as f32 * 0.1).sin() * 0.5).collect();
        let buffer = SampleBuffer::mono(8000, samples.clone()).unwrap();
        let _ = process_audio_with_rng(
            &buffer,
            &PipelineConfig::default(),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        assert_eq!(buffer.channel(0).unwrap(), &samples[..]);
    }
}
