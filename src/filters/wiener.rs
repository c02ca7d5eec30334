//! Local-statistics Wiener gain filter
//!
//! The noise floor is estimated as the power of the whole channel,
//! `P_noise = mean(x²)`. Each sample is then scaled by
//!
//! ```text
//! mean    = (x[i-1] + x[i] + x[i+1]) / 3          (missing neighbours are 0)
//! var     = see LocalVariance
//! P_sig   = max(var - P_noise, 0)
//! gain    = P_sig / (P_sig + P_noise)             (0 when both are 0)
//! y[i]    = gain · x[i]
//! ```

use crate::io::sample_buffer::SampleBuffer;
use serde::{Deserialize, Serialize};

/// Local variance estimator over the three-sample neighbourhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalVariance {
    /// `(a - m)² + (b - m)² + (c - m)² / 3`
    ///
    /// Only the last term is divided by three. This is the formula existing
    /// output was produced with and is kept for compatibility.
    #[default]
    Reference,
    /// `((a - m)² + (b - m)² + (c - m)²) / 3`
    Unbiased,
}

impl LocalVariance {
    fn estimate(&self, prev: f64, current: f64, next: f64) -> f64 {
        let mean = (prev + current + next) / 3.0;
        let d_prev = (prev - mean).powi(2);
        let d_current = (current - mean).powi(2);
        let d_next = (next - mean).powi(2);
        match self {
            LocalVariance::Reference => d_prev + d_current + d_next / 3.0,
            LocalVariance::Unbiased => (d_prev + d_current + d_next) / 3.0,
        }
    }
}

/// Wiener-filter one channel
pub fn wiener_filter(input: &[f32], variance: LocalVariance) -> Vec<f32> {
    if input.is_empty() {
        return Vec::new();
    }

    let noise_power = input
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        / input.len() as f64;

    let at = |idx: Option<usize>| -> f64 {
        idx.and_then(|i| input.get(i)).map_or(0.0, |&x| f64::from(x))
    };

    (0..input.len())
        .map(|i| {
            let current = f64::from(input[i]);
            let local_variance = variance.estimate(at(i.checked_sub(1)), current, at(Some(i + 1)));
            let signal_power = (local_variance - noise_power).max(0.0);
            let total = signal_power + noise_power;
            let gain = if total > 0.0 { signal_power / total } else { 0.0 };
            (gain * current) as f32
        })
        .collect()
}

/// Wiener-filter every channel of `buffer`
pub fn apply_wiener(buffer: &SampleBuffer, variance: LocalVariance) -> SampleBuffer {
    log::debug!(
        "Applying Wiener filter ({:?} variance) to {} samples x {} channels",
        variance,
        buffer.len(),
        buffer.num_channels()
    );
    buffer.map_channels(|channel| wiener_filter(channel, variance))
}
