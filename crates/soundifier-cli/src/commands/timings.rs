//! Timings command implementation
//!
//! Prints the blip instants extracted from an animation without loading any
//! voices or writing audio.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use soundifier_backend_gif::{decode_file, extract_timings};
use std::path::PathBuf;
use std::process::ExitCode;

use super::{exit_code_for, print_json, report_failure, JsonError};
use crate::pipeline::PipelineError;
use crate::settings_args::SettingsArgs;
use soundifier_spec::BackendError;

/// Arguments of `soundifier timings`.
#[derive(Args, Debug, Clone, Default)]
pub struct TimingsArgs {
    /// Path to the typing animation (GIF)
    #[arg(short, long)]
    pub gif: PathBuf,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Timings in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct TimingsOutput {
    /// Whether extraction succeeded.
    pub success: bool,
    /// Number of decoded frames.
    pub frames: usize,
    /// Total animation length in milliseconds.
    pub duration_ms: u64,
    /// Blip instants in milliseconds.
    pub timings: Vec<f64>,
    /// The failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Run the timings command
///
/// # Returns
/// Exit code: 0 success, 1 invalid input, 2 decode failure
pub fn run(args: &TimingsArgs) -> Result<ExitCode> {
    let (frames, duration_ms, result) = match collect(args) {
        Ok((frames, duration_ms, timings)) => (frames, duration_ms, Ok(timings)),
        Err(e) => (0, 0, Err(e)),
    };

    if args.json {
        let (timings, error) = match &result {
            Ok(timings) => (timings.clone(), None),
            Err(e) => (Vec::new(), Some(JsonError::from_backend(e))),
        };
        print_json(&TimingsOutput {
            success: error.is_none(),
            frames,
            duration_ms,
            timings,
            error,
        })?;
        return Ok(match &result {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => exit_code_for(e.kind()),
        });
    }

    let timings = match result {
        Ok(timings) => timings,
        Err(e) => return Ok(report_failure(&e)),
    };

    println!("{} {}", "Timings for:".cyan().bold(), args.gif.display());
    println!(
        "{} {} frames, {} ms",
        "Animation:".dimmed(),
        frames,
        duration_ms
    );
    for (index, moment) in timings.iter().enumerate() {
        println!("  {:>4}  {:>9.2} ms", index, moment);
    }
    println!("{} {}", "Blips:".cyan().bold(), timings.len());
    Ok(ExitCode::SUCCESS)
}

fn collect(args: &TimingsArgs) -> Result<(usize, u64, Vec<f64>), PipelineError> {
    let settings = args.settings.resolve(None, None, None, None)?;
    settings.validate()?;

    let sequence = decode_file(&args.gif)?;
    let timings = extract_timings(&sequence, &settings)?;
    Ok((sequence.len(), sequence.total_duration_ms(), timings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_gif(path: &std::path::Path, frames: &[[u8; 2]]) {
        let mut bytes = Vec::new();
        {
            let palette = [0u8, 0, 0, 255, 255, 255];
            let mut encoder = gif::Encoder::new(&mut bytes, 2, 1, &palette).unwrap();
            for pixels in frames {
                let frame = gif::Frame {
                    width: 2,
                    height: 1,
                    delay: 4,
                    buffer: std::borrow::Cow::Owned(pixels.to_vec()),
                    ..Default::default()
                };
                encoder.write_frame(&frame).unwrap();
            }
        }
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn timings_prints_json() {
        let tmp = tempfile::tempdir().unwrap();
        let gif_path = tmp.path().join("talk.gif");
        write_gif(&gif_path, &[[0, 0], [1, 0], [1, 1]]);

        let args = TimingsArgs {
            gif: gif_path,
            json: true,
            settings: SettingsArgs {
                no_easy_align: true,
                ..Default::default()
            },
        };
        assert_eq!(run(&args).unwrap(), ExitCode::SUCCESS);

        let (frames, duration, timings) = collect(&args).unwrap();
        assert_eq!(frames, 3);
        assert_eq!(duration, 120);
        assert_eq!(timings, vec![40.0, 80.0, 120.0]);
    }

    #[test]
    fn timings_rejects_bad_settings() {
        let args = TimingsArgs {
            gif: PathBuf::from("unused.gif"),
            settings: SettingsArgs {
                speed: Some(0.0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(run(&args).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn timings_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let args = TimingsArgs {
            gif: tmp.path().join("missing.gif"),
            ..Default::default()
        };
        assert_ne!(run(&args).unwrap(), ExitCode::SUCCESS);
    }
}
