//! Pipeline result types
//!
//! - The noisy and filtered buffers with their encoded WAV bytes
//! - Run metadata (powers, timing, warnings)

pub mod result;
