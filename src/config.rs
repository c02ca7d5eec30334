//! Configuration parameters for the denoising pipeline
//!
//! [`PipelineConfig`] is the typed form used by the library. Callers that
//! receive settings as a flat key/value form (`snrDb`, `filterKind`,
//! `filterLength`, ...) deserialize a [`PipelineSettings`] and convert it
//! with `TryFrom`.

use crate::error::DenoiseError;
use crate::filters::fir::ConvolutionMode;
use crate::filters::fir_design::validate_band;
use crate::filters::lms::validate_lms;
use crate::filters::wiener::LocalVariance;
use crate::noise::NoiseDistribution;
use serde::{Deserialize, Serialize};

/// Default number of taps for the bandpass and adaptive filters
pub const DEFAULT_FILTER_LENGTH: usize = 127;
/// Default requested lower edge in Hz
pub const DEFAULT_LOW_FREQ_HZ: f32 = 300.0;
/// Default requested upper edge in Hz
pub const DEFAULT_HIGH_FREQ_HZ: f32 = 3400.0;
/// Default LMS step size
pub const DEFAULT_STEP_SIZE: f32 = 1e-4;
/// Default target SNR in dB
pub const DEFAULT_SNR_DB: f32 = 20.0;

/// Which denoising filter to run, with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterConfig {
    /// Windowed-sinc bandpass FIR
    ///
    /// The designed passband is `2 * low_freq_hz ..= 2 * high_freq_hz` Hz;
    /// see [`crate::filters::fir_design`].
    Bandpass {
        /// Number of taps (odd, >= 3)
        filter_length: usize,
        /// Requested lower edge in Hz (below Nyquist; passes from twice this)
        low_freq_hz: f32,
        /// Requested upper edge in Hz (below Nyquist; passes up to twice this)
        high_freq_hz: f32,
        /// Convolution strategy (default: direct)
        #[serde(default)]
        mode: ConvolutionMode,
    },
    /// LMS adaptive filter
    Adaptive {
        /// Number of weights (>= 1)
        filter_length: usize,
        /// Adaptation step size (> 0)
        step_size: f32,
    },
    /// Local-statistics Wiener filter
    Wiener {
        /// Local variance estimator (default: reference)
        #[serde(default)]
        variance: LocalVariance,
    },
}

impl FilterConfig {
    /// Short name of the filter kind
    pub fn name(&self) -> &'static str {
        match self {
            FilterConfig::Bandpass { .. } => "bandpass",
            FilterConfig::Adaptive { .. } => "adaptive",
            FilterConfig::Wiener { .. } => "wiener",
        }
    }

    /// Check the filter parameters against a sample rate
    pub fn validate(&self, sample_rate: u32) -> Result<(), DenoiseError> {
        match *self {
            FilterConfig::Bandpass {
                filter_length,
                low_freq_hz,
                high_freq_hz,
                ..
            } => {
                if filter_length < 3 || filter_length % 2 == 0 {
                    return Err(DenoiseError::config(
                        "filterLength",
                        format!("must be an odd number >= 3, got {}", filter_length),
                    ));
                }
                validate_band(low_freq_hz, high_freq_hz, sample_rate)
            }
            FilterConfig::Adaptive {
                filter_length,
                step_size,
            } => validate_lms(filter_length, step_size),
            FilterConfig::Wiener { .. } => Ok(()),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig::Bandpass {
            filter_length: DEFAULT_FILTER_LENGTH,
            low_freq_hz: DEFAULT_LOW_FREQ_HZ,
            high_freq_hz: DEFAULT_HIGH_FREQ_HZ,
            mode: ConvolutionMode::Direct,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Target signal-to-noise ratio in dB for noise injection (may be negative)
    pub snr_db: f32,

    /// Denoising filter
    pub filter: FilterConfig,

    /// Noise distribution (default: Uniform)
    #[serde(default)]
    pub noise: NoiseDistribution,
}

impl PipelineConfig {
    /// Check every parameter against `sample_rate`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `sample_rate` is 0
    /// - `InvalidConfig` naming the first offending field
    pub fn validate(&self, sample_rate: u32) -> Result<(), DenoiseError> {
        if sample_rate == 0 {
            return Err(DenoiseError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        if !self.snr_db.is_finite() {
            return Err(DenoiseError::config(
                "snrDb",
                format!("must be finite, got {}", self.snr_db),
            ));
        }
        self.filter.validate(sample_rate)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            snr_db: DEFAULT_SNR_DB,
            filter: FilterConfig::default(),
            noise: NoiseDistribution::Uniform,
        }
    }
}

/// Filter kind selector of the flat settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Bandpass FIR
    Bandpass,
    /// LMS adaptive
    Adaptive,
    /// Wiener
    Wiener,
}

/// Flat settings form, as submitted by a parameter form
///
/// Parameters that do not apply to the chosen kind are ignored; missing
/// ones take the defaults (127 taps, 300-3400 Hz, step 1e-4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSettings {
    /// Target SNR in dB
    pub snr_db: f32,
    /// Filter kind
    pub filter_kind: FilterKind,
    /// Number of taps / weights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_length: Option<usize>,
    /// Requested lower edge in Hz (bandpass)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_freq_hz: Option<f32>,
    /// Requested upper edge in Hz (bandpass)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_freq_hz: Option<f32>,
    /// LMS step size (adaptive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f32>,
    /// Noise distribution
    #[serde(default)]
    pub noise: NoiseDistribution,
}

impl TryFrom<PipelineSettings> for PipelineConfig {
    type Error = DenoiseError;

    /// Convert the flat form into the typed form
    ///
    /// Only rate-independent checks happen here; band edges against Nyquist
    /// are checked by [`PipelineConfig::validate`] once the sample rate is known.
    fn try_from(settings: PipelineSettings) -> Result<Self, Self::Error> {
        let filter_length = settings.filter_length.unwrap_or(DEFAULT_FILTER_LENGTH);
        let filter = match settings.filter_kind {
            FilterKind::Bandpass => FilterConfig::Bandpass {
                filter_length,
                low_freq_hz: settings.low_freq_hz.unwrap_or(DEFAULT_LOW_FREQ_HZ),
                high_freq_hz: settings.high_freq_hz.unwrap_or(DEFAULT_HIGH_FREQ_HZ),
                mode: ConvolutionMode::Direct,
            },
            FilterKind::Adaptive => {
                let step_size = settings.step_size.unwrap_or(DEFAULT_STEP_SIZE);
                validate_lms(filter_length, step_size)?;
                FilterConfig::Adaptive {
                    filter_length,
                    step_size,
                }
            }
            FilterKind::Wiener => FilterConfig::Wiener {
                variance: LocalVariance::Reference,
            },
        };

        if !settings.snr_db.is_finite() {
            return Err(DenoiseError::config(
                "snrDb",
                format!("must be finite, got {}", settings.snr_db),
            ));
        }

        Ok(PipelineConfig {
            snr_db: settings.snr_db,
            filter,
            noise: settings.noise,
        })
    }
}
