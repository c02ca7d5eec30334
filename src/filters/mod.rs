//! Denoising filters
//!
//! - Windowed-sinc bandpass design and causal FIR filtering
//! - LMS adaptive filtering
//! - Local-statistics Wiener filtering
//!
//! [`apply_filter`] runs whichever one a [`FilterConfig`] selects.

pub mod fir;
pub mod fir_design;
pub mod lms;
pub mod wiener;

use crate::config::FilterConfig;
use crate::error::DenoiseError;
use crate::io::sample_buffer::SampleBuffer;

/// Run the filter selected by `config` over every channel of `buffer`
///
/// # Errors
///
/// Returns `DenoiseError::InvalidConfig` if the parameters are invalid for
/// the buffer's sample rate.
pub fn apply_filter(
    buffer: &SampleBuffer,
    config: &FilterConfig,
) -> Result<SampleBuffer, DenoiseError> {
    config.validate(buffer.sample_rate())?;

    match *config {
        FilterConfig::Bandpass {
            filter_length,
            low_freq_hz,
            high_freq_hz,
            mode,
        } => {
            let coefficients = fir_design::design_bandpass(
                filter_length,
                low_freq_hz,
                high_freq_hz,
                buffer.sample_rate(),
            )?;
            Ok(fir::apply_fir(buffer, &coefficients, mode))
        }
        FilterConfig::Adaptive {
            filter_length,
            step_size,
        } => lms::apply_lms(buffer, filter_length, step_size),
        FilterConfig::Wiener { variance } => Ok(wiener::apply_wiener(buffer, variance)),
    }
}
