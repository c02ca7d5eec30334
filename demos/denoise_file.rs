//! Example: Corrupt and denoise a single audio file
//!
//! Usage:
//!   cargo run --example denoise_file -- <input> [out_dir] [settings-json]
//!
//! `settings-json` uses the flat settings form, e.g.
//! `{"snrDb": 10, "filterKind": "adaptive", "filterLength": 32, "stepSize": 0.0005}`.
//! Writes `<out_dir>/noisy.wav` and `<out_dir>/filtered.wav`.

use std::env;
use std::path::PathBuf;
use stratum_denoise::io::decoder::decode_audio_file;
use stratum_denoise::{process_audio, PipelineConfig, PipelineSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let input = args
        .first()
        .ok_or("usage: denoise_file <input> [out_dir] [settings-json]")?;
    let out_dir = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("."));
    let config = match args.get(2) {
        Some(json) => {
            let settings: PipelineSettings = serde_json::from_str(json)?;
            PipelineConfig::try_from(settings)?
        }
        None => PipelineConfig::default(),
    };

    let buffer = decode_audio_file(input)?;
    let result = process_audio(&buffer, &config)?;

    std::fs::create_dir_all(&out_dir)?;
    std::fs::write(out_dir.join("noisy.wav"), &result.noisy_wav)?;
    std::fs::write(out_dir.join("filtered.wav"), &result.filtered_wav)?;

    println!("{}", serde_json::to_string_pretty(&result.metadata)?);

    Ok(())
}
