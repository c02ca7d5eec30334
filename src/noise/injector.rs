//! White noise injection at a target signal-to-noise ratio
//!
//! Algorithm (per channel):
//! 1. `P_signal = mean(x²)`
//! 2. `P_noise = P_signal / 10^(snr_db / 10)`
//! 3. `y[i] = x[i] + sqrt(P_noise) * n[i]`, with `n[i]` drawn from the
//!    selected [`NoiseDistribution`]
//!
//! Silence has zero signal power, so it receives zero noise.
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use stratum_denoise::io::sample_buffer::SampleBuffer;
//! use stratum_denoise::noise::{inject_noise, NoiseDistribution};
//!
//! let buffer = SampleBuffer::mono(8000, vec![0.5; 8000])?;
//! let mut rng = StdRng::seed_from_u64(7);
//! let noisy = inject_noise(&buffer, 20.0, NoiseDistribution::Uniform, &mut rng)?;
//! assert_eq!(noisy.len(), buffer.len());
//! # Ok::<(), stratum_denoise::DenoiseError>(())
//! ```

use super::power::{mean_power, noise_power_for_snr};
use crate::error::DenoiseError;
use crate::io::sample_buffer::SampleBuffer;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Distribution the unit noise samples are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseDistribution {
    /// `U(-1, 1)` scaled by `sqrt(P_noise)`
    ///
    /// Matches the historical output of the tool; the delivered noise power
    /// is `P_noise / 3` (the variance of `U(-1, 1)`).
    #[default]
    Uniform,
    /// `N(0, 1)` scaled by `sqrt(P_noise)`; delivers `P_noise` on average
    Gaussian,
}

impl NoiseDistribution {
    /// Expected power of the injected noise for a target `noise_power`
    pub fn delivered_power(&self, noise_power: f32) -> f32 {
        match self {
            NoiseDistribution::Uniform => noise_power / 3.0,
            NoiseDistribution::Gaussian => noise_power,
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            NoiseDistribution::Uniform => rng.gen_range(-1.0..1.0),
            NoiseDistribution::Gaussian => rng.sample(StandardNormal),
        }
    }
}

/// Add noise to one channel of samples at `snr_db`
///
/// # Errors
///
/// Returns `DenoiseError::InvalidConfig` (field `snrDb`) if `snr_db` is not finite.
pub fn add_noise<R: Rng + ?Sized>(
    samples: &[f32],
    snr_db: f32,
    distribution: NoiseDistribution,
    rng: &mut R,
) -> Result<Vec<f32>, DenoiseError> {
    if !snr_db.is_finite() {
        return Err(DenoiseError::config(
            "snrDb",
            format!("must be finite, got {}", snr_db),
        ));
    }

    let signal_power = mean_power(samples);
    let noise_power = noise_power_for_snr(signal_power, snr_db);

    log::debug!(
        "Injecting {:?} noise: {} samples, snr={:.1} dB, P_signal={:.3e}, P_noise={:.3e}",
        distribution,
        samples.len(),
        snr_db,
        signal_power,
        noise_power
    );

    if noise_power == 0.0 {
        if !samples.is_empty() {
            log::warn!("Signal power is zero, no noise injected");
        }
        return Ok(samples.to_vec());
    }

    let amplitude = f64::from(noise_power).sqrt();
    Ok(samples
        .iter()
        .map(|&x| x + (amplitude * distribution.draw(rng)) as f32)
        .collect())
}

/// Add noise to every channel of `buffer`
///
/// Each channel is calibrated against its own signal power. Channels draw
/// from `rng` in order, so a seeded generator gives reproducible output.
pub fn inject_noise<R: Rng + ?Sized>(
    buffer: &SampleBuffer,
    snr_db: f32,
    distribution: NoiseDistribution,
    rng: &mut R,
) -> Result<SampleBuffer, DenoiseError> {
    let channels = buffer
        .channels()
        .iter()
        .map(|channel| add_noise(channel, snr_db, distribution, rng))
        .collect::<Result<Vec<_>, _>>()?;
    SampleBuffer::new(buffer.sample_rate(), channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sine(len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect()
    }

    fn measured_noise_power(clean: &[f32], noisy: &[f32]) -> f32 {
        let diff: Vec<f32> = clean.iter().zip(noisy).map(|(a, b)| b - a).collect();
        mean_power(&diff)
    }

    #[test]
    fn test_length_preserved() {
        let mut rng = StdRng::seed_from_u64(1);
        for len in [0usize, 1, 7, 1000] {
            let samples = sine(len, 0.3);
            let noisy = add_noise(&samples, 10.0, NoiseDistribution::Uniform, &mut rng).unwrap();
            assert_eq!(noisy.len(), len);
        }
    }

    #[test]
    fn test_silence_stays_silent() {
        let mut rng = StdRng::seed_from_u64(2);
        let silence = vec![0.0f32; 4096];
        for distribution in [NoiseDistribution::Uniform, NoiseDistribution::Gaussian] {
            for snr in [-20.0, 0.0, 20.0] {
                let noisy = add_noise(&silence, snr, distribution, &mut rng).unwrap();
                assert!(noisy.iter().all(|&x| x == 0.0));
            }
        }
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let samples = sine(2048, 0.5);
        let a = add_noise(
            &samples,
            5.0,
            NoiseDistribution::Uniform,
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();
        let b = add_noise(
            &samples,
            5.0,
            NoiseDistribution::Uniform,
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, samples);
    }

    #[test]
    fn test_uniform_noise_power_is_a_third_of_target() {
        let samples = sine(200_000, 0.5);
        let target = noise_power_for_snr(mean_power(&samples), 10.0);
        let mut rng = StdRng::seed_from_u64(3);

        let noisy = add_noise(&samples, 10.0, NoiseDistribution::Uniform, &mut rng).unwrap();
        let measured = measured_noise_power(&samples, &noisy);
        let expected = NoiseDistribution::Uniform.delivered_power(target);

        assert!(
            (measured - expected).abs() / expected < 0.03,
            "Uniform noise power {:.5} should be near {:.5}",
            measured,
            expected
        );
    }

    #[test]
    fn test_gaussian_noise_power_matches_target() {
        let samples = sine(200_000, 0.5);
        let mut rng = StdRng::seed_from_u64(4);

        for snr in [-6.0f32, 0.0, 10.0, 30.0] {
            let target = noise_power_for_snr(mean_power(&samples), snr);
            let noisy = add_noise(&samples, snr, NoiseDistribution::Gaussian, &mut rng).unwrap();
            let measured = measured_noise_power(&samples, &noisy);
            assert!(
                (measured - target).abs() / target < 0.03,
                "Gaussian noise power {:.5} should be near {:.5} at {} dB",
                measured,
                target,
                snr
            );
        }
    }

    #[test]
    fn test_uniform_noise_is_bounded_by_amplitude() {
        let samples = sine(10_000, 0.8);
        let amplitude = noise_power_for_snr(mean_power(&samples), 0.0).sqrt();
        let mut rng = StdRng::seed_from_u64(5);
        let noisy = add_noise(&samples, 0.0, NoiseDistribution::Uniform, &mut rng).unwrap();

        for (clean, noisy) in samples.iter().zip(&noisy) {
            assert!((noisy - clean).abs() <= amplitude + 1e-6);
        }
    }

    #[test]
    fn test_non_finite_snr_rejected() {
        let mut rng = StdRng::seed_from_u64(6);
        let result = add_noise(&[0.1, 0.2], f32::NAN, NoiseDistribution::Uniform, &mut rng);
        assert!(matches!(
            result,
            Err(DenoiseError::InvalidConfig { field: "snrDb", .. })
        ));
    }

    #[test]
    fn test_channels_calibrated_independently() {
        let loud = sine(50_000, 0.9);
        let quiet = sine(50_000, 0.09);
        let buffer = SampleBuffer::new(16000, vec![loud.clone(), quiet.clone()]).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let noisy = inject_noise(&buffer, 20.0, NoiseDistribution::Gaussian, &mut rng).unwrap();
        let loud_noise = measured_noise_power(&loud, noisy.channel(0).unwrap());
        let quiet_noise = measured_noise_power(&quiet, noisy.channel(1).unwrap());

        // 20 dB amplitude difference -> 100x power difference
        let ratio = loud_noise / quiet_noise;
        assert!(ratio > 80.0 && ratio < 120.0, "Noise power ratio {}", ratio);
    }
}
