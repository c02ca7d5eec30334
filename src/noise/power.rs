//! Power measurements used for noise calibration

/// Mean squared sample value
///
/// Returns 0.0 for an empty slice rather than NaN.
pub fn mean_power(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum_sq / samples.len() as f64) as f32
}

/// Noise power that puts `signal_power` at `snr_db` above it
///
/// `P_noise = P_signal / 10^(snr_db / 10)`
pub fn noise_power_for_snr(signal_power: f32, snr_db: f32) -> f32 {
    if signal_power == 0.0 {
        return 0.0;
    }
    (f64::from(signal_power) / 10f64.powf(f64::from(snr_db) / 10.0)) as f32
}
