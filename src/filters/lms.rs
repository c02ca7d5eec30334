//! Least-mean-squares adaptive filter
//!
//! The noisy signal serves as both the reference input and the desired
//! signal; there is no separate clean reference. For each
//! `i` in `0..len - L`:
//!
//! ```text
//! x = input[i .. i + L]
//! y = Σ w[j] · x[j]
//! e = input[i] - y
//! w[j] += μ · e · x[j]
//! output[i] = y
//! ```
//!
//! The last `L` outputs are never visited and stay at zero. A step size
//! that is large relative to the input power makes the weights diverge;
//! nothing clamps it here, the pipeline's finiteness check reports it.

use crate::error::DenoiseError;
use crate::io::sample_buffer::SampleBuffer;

/// Check LMS parameters
pub fn validate_lms(filter_length: usize, step_size: f32) -> Result<(), DenoiseError> {
    if filter_length == 0 {
        return Err(DenoiseError::config(
            "filterLength",
            "must be at least 1, got 0",
        ));
    }
    if !step_size.is_finite() || step_size <= 0.0 {
        return Err(DenoiseError::config(
            "stepSize",
            format!("must be a positive finite number, got {}", step_size),
        ));
    }
    Ok(())
}

/// Run the LMS filter over one channel
///
/// Weights are stored as f32 and start at zero; sums are accumulated in f64.
pub fn lms_filter(input: &[f32], filter_length: usize, step_size: f32) -> Vec<f32> {
    let mut output = vec![0.0f32; input.len()];
    let steps = input.len().saturating_sub(filter_length);
    if steps == 0 {
        return output;
    }

    let mu = f64::from(step_size);
    let mut weights = vec![0.0f32; filter_length];

    for i in 0..steps {
        let window = &input[i..i + filter_length];

        let y: f64 = weights
            .iter()
            .zip(window)
            .map(|(&w, &x)| f64::from(w) * f64::from(x))
            .sum();
        let e = f64::from(input[i]) - y;

        for (w, &x) in weights.iter_mut().zip(window) {
            *w = (f64::from(*w) + mu * e * f64::from(x)) as f32;
        }

        output[i] = y as f32;
    }

    output
}

/// Run the LMS filter over every channel of `buffer`
pub fn apply_lms(
    buffer: &SampleBuffer,
    filter_length: usize,
    step_size: f32,
) -> Result<SampleBuffer, DenoiseError> {
    validate_lms(filter_length, step_size)?;

    log::debug!(
        "Applying LMS: {} taps, step={:e}, {} samples x {} channels",
        filter_length,
        step_size,
        buffer.len(),
        buffer.num_channels()
    );

    if buffer.len() <= filter_length {
        log::warn!(
            "Signal ({} samples) is not longer than the LMS filter ({} taps); output is silent",
            buffer.len(),
            filter_length
        );
    }

    Ok(buffer.map_channels(|channel| lms_filter(channel, filter_length, step_size)))
}
