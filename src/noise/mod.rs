//! Synthetic noise corruption
//!
//! - Signal power measurement and SNR-to-noise-power conversion
//! - White noise injection at a target SNR (uniform or Gaussian)

pub mod injector;
pub mod power;

pub use injector::{add_noise, inject_noise, NoiseDistribution};
