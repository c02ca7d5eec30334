//! Causal FIR filtering
//!
//! `y[i] = Σ_j h[j] · x[i - j]` for `i - j >= 0`; samples before index 0 are
//! treated as zero and the output has the same length as the input.
//!
//! Two evaluation strategies produce the same result:
//! - [`ConvolutionMode::Direct`]: O(N·L) loop, same summation order every run
//! - [`ConvolutionMode::Fft`]: zero-padded FFT product, O((N+L) log(N+L)),
//!   equal to the direct form up to floating-point rounding

use super::fir_design::FilterCoefficients;
use crate::io::sample_buffer::SampleBuffer;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

/// How the convolution is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionMode {
    /// Direct-form loop
    #[default]
    Direct,
    /// FFT fast convolution
    Fft,
}

/// Filter every channel of `buffer` with `coefficients`
pub fn apply_fir(
    buffer: &SampleBuffer,
    coefficients: &FilterCoefficients,
    mode: ConvolutionMode,
) -> SampleBuffer {
    log::debug!(
        "Applying {}-tap FIR ({:?}) to {} samples x {} channels",
        coefficients.len(),
        mode,
        buffer.len(),
        buffer.num_channels()
    );

    let taps = coefficients.taps();
    match mode {
        ConvolutionMode::Direct => buffer.map_channels(|channel| convolve_causal(channel, taps)),
        ConvolutionMode::Fft => buffer.map_channels(|channel| convolve_fft(channel, taps)),
    }
}

/// Direct-form causal convolution
pub fn convolve_causal(input: &[f32], taps: &[f32]) -> Vec<f32> {
    (0..input.len())
        .map(|i| {
            let reach = taps.len().min(i + 1);
            let sum: f64 = taps[..reach]
                .iter()
                .enumerate()
                .map(|(j, &h)| f64::from(input[i - j]) * f64::from(h))
                .sum();
            sum as f32
        })
        .collect()
}

/// FFT-based causal convolution, truncated to the input length
pub fn convolve_fft(input: &[f32], taps: &[f32]) -> Vec<f32> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }
    if taps.is_empty() {
        return vec![0.0; n];
    }

    // Linear (not circular) convolution needs room for n + L - 1 outputs
    let fft_size = (n + taps.len() - 1).next_power_of_two();

    let mut signal: Vec<Complex<f64>> = input
        .iter()
        .map(|&x| Complex::new(f64::from(x), 0.0))
        .collect();
    signal.resize(fft_size, Complex::new(0.0, 0.0));

    let mut kernel: Vec<Complex<f64>> = taps
        .iter()
        .map(|&h| Complex::new(f64::from(h), 0.0))
        .collect();
    kernel.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut signal);
    fft.process(&mut kernel);

    for (s, k) in signal.iter_mut().zip(&kernel) {
        *s *= *k;
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut signal);

    let scale = 1.0 / fft_size as f64;
    signal[..n].iter().map(|c| (c.re * scale) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fir_design::design_bandpass;

    #[test]
    fn test_zero_input_gives_zero_output() {
        let coefficients = design_bandpass(31, 300.0, 3400.0, 16000).unwrap();
        let zeros = vec![0.0f32; 500];
        assert!(convolve_causal(&zeros, coefficients.taps())
            .iter()
            .all(|&y| y == 0.0));
        assert!(convolve_fft(&zeros, coefficients.taps())
            .iter()
            .all(|&y| y == 0.0));
    }

    #[test]
    fn test_impulse_reproduces_taps() {
        let coefficients = design_bandpass(31, 300.0, 3400.0, 16000).unwrap();
        let mut impulse = vec![0.0f32; 100];
        impulse[0] = 1.0;

        let output = convolve_causal(&impulse, coefficients.taps());
        assert_eq!(output.len(), 100);
        assert_eq!(&output[..31], coefficients.taps());
        assert!(output[31..].iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_impulse_shorter_than_filter() {
        let taps = [0.5f32, 0.25, 0.125, 0.0625];
        let output = convolve_causal(&[1.0, 0.0], &taps);
        assert_eq!(output, vec![0.5, 0.25]);
    }

    #[test]
    fn test_causal_no_wraparound() {
        // A late impulse must not leak into earlier outputs
        let taps = [1.0f32, 2.0, 3.0];
        let output = convolve_causal(&[0.0, 0.0, 0.0, 1.0], &taps);
        assert_eq!(output, vec![0.0, 0.0, 0.0, 1.0]);

        let fft_output = convolve_fft(&[0.0, 0.0, 0.0, 1.0], &taps);
        for (a, b) in output.iter().zip(&fft_output) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fft_matches_direct() {
        let coefficients = design_bandpass(127, 300.0, 3400.0, 16000).unwrap();
        let input: Vec<f32> = (0..4000)
            .map(|i| {
                let t = i as f32 / 16000.0;
                0.5 * (2.0 * std::f32::consts::PI * 1000.0 * t).sin()
                    + 0.3 * (2.0 * std::f32::consts::PI * 6000.0 * t).sin()
            })
            .collect();

        let direct = convolve_causal(&input, coefficients.taps());
        let fast = convolve_fft(&input, coefficients.taps());
        assert_eq!(direct.len(), fast.len());

        let max_diff = direct
            .iter()
            .zip(&fast)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_diff < 1e-5, "FFT and direct differ by {}", max_diff);
    }

    #[test]
    fn test_empty_input() {
        assert!(convolve_causal(&[], &[1.0, 2.0]).is_empty());
        assert!(convolve_fft(&[], &[1.0, 2.0]).is_empty());
    }

    #[test]
    fn test_apply_fir_filters_each_channel() {
        let taps = FilterCoefficients::new(vec![0.5, 0.5]);
        let buffer =
            SampleBuffer::new(8000, vec![vec![1.0, 1.0, 1.0], vec![2.0, 0.0, 2.0]]).unwrap();

        let filtered = apply_fir(&buffer, &taps, ConvolutionMode::Direct);
        assert_eq!(filtered.channel(0), Some(&[0.5, 1.0, 1.0][..]));
        assert_eq!(filtered.channel(1), Some(&[1.0, 1.0, 1.0][..]));
    }
}
