//! Generate command implementation
//!
//! Renders the blip track for a typing animation and, when asked, a re-timed
//! copy of the animation.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use soundifier_backend_audio::rng::rng_for;
use soundifier_spec::{BackendError, Settings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::{exit_code_for, print_json, report_failure, JsonError, DEFAULT_VOICES_DIR};
use crate::library::VoiceLibrary;
use crate::pipeline::{export, soundify, ExportSummary, PipelineError};
use crate::settings_args::{SettingsArgs, VoiceArgs};

/// Arguments of `soundifier generate`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Path to the typing animation (GIF)
    #[arg(short, long)]
    pub gif: PathBuf,

    /// Voice clip, repeatable; a single path may use `#` as a number placeholder
    #[arg(short = 'v', long = "voice", conflicts_with = "character")]
    pub voices: Vec<PathBuf>,

    /// Character from the voice library to speak with
    #[arg(short, long)]
    pub character: Option<String>,

    /// Use the character's variant voice
    #[arg(long, requires = "character")]
    pub variant: bool,

    /// Voice library directory
    #[arg(long, default_value = DEFAULT_VOICES_DIR)]
    pub voices_dir: PathBuf,

    /// Output WAV path (default: the GIF path with a .wav extension)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also write the re-timed animation to this path
    #[arg(long)]
    pub out_gif: Option<PathBuf>,

    /// Seed for voice and pitch choices (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output machine-readable JSON diagnostics (no colored output)
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub voice: VoiceArgs,
}

/// Summary of a generate run in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Whether both outputs were written.
    pub success: bool,
    /// Number of blip instants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blips: Option<usize>,
    /// Written WAV file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,
    /// BLAKE3 hash of the PCM data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcm_hash: Option<String>,
    /// Track length in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    /// Written GIF file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gif_path: Option<PathBuf>,
    /// Non-fatal notices.
    pub warnings: Vec<String>,
    /// The failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 success, 1 invalid input, 2 decode failure, 3 export failure
pub fn run(args: &GenerateArgs) -> Result<ExitCode> {
    let start = Instant::now();
    let (voices, defaults) = select_voices(args)?;

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| args.gif.with_extension("wav"));

    let settings = match args.settings.resolve(
        Some(&args.voice),
        defaults,
        Some(&out),
        args.out_gif.as_deref(),
    ) {
        Ok(settings) => settings,
        Err(e) => return Ok(fail(args.json, &PipelineError::from(e), Vec::new())),
    };

    let mut warnings = Vec::new();
    if args.settings.preview && args.out_gif.is_some() {
        warnings.push("preview renders never write a GIF".to_string());
    }
    if let Some(warning) = reencode_warning(&settings) {
        warnings.push(warning);
    }

    if !args.json {
        println!("{} {}", "Generating from:".cyan().bold(), args.gif.display());
        println!("{} {}", "Voices:".cyan().bold(), describe_voices(args, &voices));
        if let Some(seed) = args.seed {
            println!("{} {}", "Seed:".dimmed(), seed);
        }
        for warning in &warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
    }

    let mut rng = rng_for(args.seed);
    let summary = soundify(&args.gif, &voices, &settings, &mut rng)
        .and_then(|output| export(&output, &settings).map(|summary| (output, summary)));

    let (output, summary) = match summary {
        Ok(done) => done,
        Err(e) => return Ok(fail(args.json, &e, warnings)),
    };

    if args.json {
        print_json(&success_output(output.timings.len(), summary, warnings))?;
    } else {
        print_summary(output.timings.len(), &summary);
        println!(
            "\n{} in {:.2}s",
            "Done".green().bold(),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Picks the clips to render with and the character defaults, if any.
fn select_voices(args: &GenerateArgs) -> Result<(Vec<PathBuf>, Option<serde_json::Value>)> {
    let Some(name) = &args.character else {
        return Ok((args.voices.clone(), None));
    };

    let library = VoiceLibrary::scan(&args.voices_dir).with_context(|| {
        format!(
            "Failed to read voice library: {}",
            args.voices_dir.display()
        )
    })?;
    let Some(entry) = library.get(name) else {
        bail!(
            "unknown character '{}' (run `soundifier characters` to list them)",
            name
        );
    };

    if args.variant && entry.character.variant_name().is_none() {
        tracing::warn!(character = %name, "character has no variant, using base voices");
    }

    Ok((
        entry.character.voices(args.variant).to_vec(),
        entry.load_defaults(),
    ))
}

/// Warns when a GIF output would just replay the source timing.
fn reencode_warning(settings: &Settings) -> Option<String> {
    (settings.output_gif_path.is_some() && !settings.alters_animation()).then(|| {
        "speed is 1 and frames are not grouped; the GIF will keep its original timing"
            .to_string()
    })
}

fn describe_voices(args: &GenerateArgs, voices: &[PathBuf]) -> String {
    match &args.character {
        Some(name) if args.variant => format!("{} (variant, {} clips)", name, voices.len()),
        Some(name) => format!("{} ({} clips)", name, voices.len()),
        None => format!("{} clip path(s)", voices.len()),
    }
}

fn fail(json: bool, error: &PipelineError, warnings: Vec<String>) -> ExitCode {
    if json {
        let output = GenerateOutput {
            success: false,
            blips: None,
            audio_path: None,
            pcm_hash: None,
            duration_ms: None,
            gif_path: None,
            warnings,
            error: Some(JsonError::from_backend(error)),
        };
        if let Err(e) = print_json(&output) {
            eprintln!("{}", e);
        }
        exit_code_for(error.kind())
    } else {
        report_failure(error)
    }
}

fn success_output(blips: usize, summary: ExportSummary, warnings: Vec<String>) -> GenerateOutput {
    GenerateOutput {
        success: true,
        blips: Some(blips),
        audio_path: Some(summary.audio_path),
        pcm_hash: Some(summary.pcm_hash),
        duration_ms: Some(summary.duration_ms),
        gif_path: summary.gif.map(|(path, _)| path),
        warnings,
        error: None,
    }
}

fn print_summary(blips: usize, summary: &ExportSummary) {
    println!("{} {}", "Blips:".cyan().bold(), blips);
    println!(
        "  {} {} ({:.0} ms, {})",
        "+".green(),
        display(&summary.audio_path),
        summary.duration_ms,
        &summary.pcm_hash[..16.min(summary.pcm_hash.len())]
    );
    if let Some((path, frames)) = &summary.gif {
        println!("  {} {} ({} frames)", "+".green(), display(path), frames);
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
