//! Windowed-sinc bandpass FIR design
//!
//! Algorithm (Hamming-windowed ideal bandpass):
//! 1. Normalize the band edges by Nyquist: `f = freq / (sample_rate / 2)`
//! 2. For tap `i` in `[0, N)`, with `m = i - (N - 1) / 2`:
//!    - `m == 0`: `h[i] = 2 * (f_high - f_low)`
//!    - otherwise: `h[i] = (sin(2π f_high m) - sin(2π f_low m)) / (π m)`,
//!      multiplied by `w[i] = 0.54 - 0.46 cos(2π i / (N - 1))`
//!
//! The center tap is left unwindowed; for odd `N` the Hamming window is
//! exactly 1.0 there anyway.
//!
//! # Effective passband
//!
//! The edges are normalized by Nyquist but the sinc terms use `2π f m`, the
//! form that expects edges normalized by the sample rate. The filter
//! therefore passes `2 * low_freq_hz ..= 2 * high_freq_hz` Hz: a request for
//! 500-2000 Hz at 16 kHz passes roughly 1000-4000 Hz. This is kept for
//! output compatibility with existing denoised files.
//!
//! [`validate_band`] only keeps the *requested* upper edge below Nyquist.
//! When `2 * high_freq_hz` exceeds Nyquist the effective upper edge folds
//! back (the default 300-3400 Hz at 8 kHz is one such case).
//!
//! # Example
//!
//! ```
//! use stratum_denoise::filters::fir_design::design_bandpass;
//!
//! let coefficients = design_bandpass(127, 300.0, 3400.0, 16000)?;
//! assert_eq!(coefficients.len(), 127);
//! # Ok::<(), stratum_denoise::DenoiseError>(())
//! ```

use crate::error::DenoiseError;
use std::f64::consts::PI;

/// Ordered FIR taps
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    taps: Vec<f32>,
}

impl FilterCoefficients {
    /// Wrap an arbitrary tap sequence
    pub fn new(taps: Vec<f32>) -> Self {
        Self { taps }
    }

    /// The taps, first applied to the newest sample
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Number of taps
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// True if there are no taps
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Center tap, for odd-length designs
    pub fn center_tap(&self) -> Option<f32> {
        if self.taps.len() % 2 == 1 {
            Some(self.taps[self.taps.len() / 2])
        } else {
            None
        }
    }

    /// Sum of taps (gain at DC)
    pub fn dc_gain(&self) -> f32 {
        self.taps.iter().sum()
    }

    /// True if `h[i] == h[N-1-i]` for every tap, within `tolerance`
    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        let n = self.taps.len();
        (0..n / 2).all(|i| (self.taps[i] - self.taps[n - 1 - i]).abs() <= tolerance)
    }

}

/// Check `0 < low < high < sample_rate / 2`
///
/// Reports the offending field (`lowFreqHz` or `highFreqHz`). The check is
/// on the requested edges, not the doubled passband the design produces.
pub fn validate_band(
    low_freq_hz: f32,
    high_freq_hz: f32,
    sample_rate: u32,
) -> Result<(), DenoiseError> {
    let nyquist = sample_rate as f32 / 2.0;

    if !low_freq_hz.is_finite() || low_freq_hz <= 0.0 {
        return Err(DenoiseError::config(
            "lowFreqHz",
            format!("must be a positive frequency, got {}", low_freq_hz),
        ));
    }
    if !high_freq_hz.is_finite() || high_freq_hz <= low_freq_hz {
        return Err(DenoiseError::config(
            "highFreqHz",
            format!(
                "must be greater than lowFreqHz ({} Hz), got {}",
                low_freq_hz, high_freq_hz
            ),
        ));
    }
    if high_freq_hz >= nyquist {
        return Err(DenoiseError::config(
            "highFreqHz",
            format!(
                "must be below Nyquist ({} Hz at {} Hz), got {}",
                nyquist, sample_rate, high_freq_hz
            ),
        ));
    }
    Ok(())
}

/// Design a Hamming-windowed sinc bandpass filter
///
/// # Arguments
///
/// * `filter_length` - Number of taps (odd lengths give a true center tap)
/// * `low_freq_hz` - Requested lower edge in Hz (passband starts at twice this)
/// * `high_freq_hz` - Requested upper edge in Hz (passband ends at twice this)
/// * `sample_rate` - Sample rate in Hz
///
/// # Errors
///
/// - `InvalidInput` if `sample_rate` is 0
/// - `InvalidConfig` (`filterLength`) if `filter_length < 2`, where the
///   window term would divide by zero
/// - `InvalidConfig` (`lowFreqHz`/`highFreqHz`) if the band is not
///   `0 < low < high < Nyquist`
pub fn design_bandpass(
    filter_length: usize,
    low_freq_hz: f32,
    high_freq_hz: f32,
    sample_rate: u32,
) -> Result<FilterCoefficients, DenoiseError> {
    if sample_rate == 0 {
        return Err(DenoiseError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    if filter_length < 2 {
        return Err(DenoiseError::config(
            "filterLength",
            format!("must be at least 2, got {}", filter_length),
        ));
    }
    validate_band(low_freq_hz, high_freq_hz, sample_rate)?;

    if filter_length % 2 == 0 {
        log::warn!(
            "Even filter length {} has no center tap; delay is fractional",
            filter_length
        );
    }

    let nyquist = f64::from(sample_rate) / 2.0;
    let f_low = f64::from(low_freq_hz) / nyquist;
    let f_high = f64::from(high_freq_hz) / nyquist;
    let half = (filter_length - 1) as f64 / 2.0;
    let span = (filter_length - 1) as f64;

    log::debug!(
        "Designing bandpass: {} taps, {:.1}-{:.1} Hz at {} Hz (normalized {:.4}-{:.4})",
        filter_length,
        low_freq_hz,
        high_freq_hz,
        sample_rate,
        f_low,
        f_high
    );

    let taps = (0..filter_length)
        .map(|i| {
            let m = i as f64 - half;
            let tap = if m == 0.0 {
                2.0 * (f_high - f_low)
            } else {
                let ideal = ((2.0 * PI * f_high * m).sin() - (2.0 * PI * f_low * m).sin())
                    / (PI * m);
                let window = 0.54 - 0.46 * (2.0 * PI * i as f64 / span).cos();
                ideal * window
            };
            tap as f32
        })
        .collect();

    Ok(FilterCoefficients::new(taps))
}
