//! Audio I/O modules
//!
//! Sample buffers, Symphonia-based decoding and PCM WAV encoding.

pub mod decoder;
pub mod sample_buffer;
pub mod wav;
