//! The render pipeline.
//!
//! [`soundify`] runs every fallible step that does not touch the output
//! paths: voice resolution, animation decoding, timing extraction, the
//! punctuation check, clip decoding, and synthesis. [`export`] then encodes
//! both outputs and stages them beside their destinations, so a failed write
//! leaves no partial output behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::Rng;
use soundifier_backend_audio::{
    load_voices, resolve_voice_paths, skip_set_for, synthesize, AudioError, BlipTrack,
};
use soundifier_backend_gif::{
    decode_file, encode_plan, extract, FrameSequence, GifError, ReencodePlan,
};
use soundifier_spec::{BackendError, ErrorKind, Settings, SettingsError};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Any failure of a render.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Settings failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The animation could not be decoded, analysed, or re-encoded.
    #[error(transparent)]
    Gif(#[from] GifError),
    /// Voices could not be loaded or the track could not be built.
    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl BackendError for PipelineError {
    fn code(&self) -> &'static str {
        match self {
            PipelineError::Settings(e) => e.code(),
            PipelineError::Gif(e) => e.code(),
            PipelineError::Audio(e) => e.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            PipelineError::Settings(e) => e.category(),
            PipelineError::Gif(e) => e.category(),
            PipelineError::Audio(e) => e.category(),
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Settings(e) => e.kind(),
            PipelineError::Gif(e) => e.kind(),
            PipelineError::Audio(e) => e.kind(),
        }
    }
}

/// A re-timed animation ready to encode.
#[derive(Debug, Clone)]
pub struct Reencoded {
    /// Decoded source frames.
    pub sequence: FrameSequence,
    /// Which frames to keep, and for how long.
    pub plan: ReencodePlan,
}

/// Everything a render produced.
#[derive(Debug, Clone)]
pub struct SoundifyOutput {
    /// Blip instants in milliseconds.
    pub timings: Vec<f64>,
    /// The voice clips that were used.
    pub voice_paths: Vec<PathBuf>,
    /// The synthesized track.
    pub track: BlipTrack,
    /// The re-timed animation, when `output_gif_path` is set.
    pub reencoded: Option<Reencoded>,
}

/// What [`export`] wrote.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Path of the WAV file.
    pub audio_path: PathBuf,
    /// BLAKE3 hash of the PCM data.
    pub pcm_hash: String,
    /// Track length in milliseconds.
    pub duration_ms: f64,
    /// Path and frame count of the re-encoded GIF, if one was written.
    pub gif: Option<(PathBuf, usize)>,
}

/// Renders a blip track for the animation at `gif_path`.
///
/// `voice_paths` is either a list of clips or a single `#` pattern. Voice
/// resolution runs before anything is decoded, so an empty voice set fails
/// without touching the animation.
pub fn soundify<R: Rng + ?Sized>(
    gif_path: &Path,
    voice_paths: &[PathBuf],
    settings: &Settings,
    rng: &mut R,
) -> PipelineResult<SoundifyOutput> {
    settings.validate_for_render()?;

    let voice_paths = resolve_voice_paths(voice_paths)?;

    let sequence = decode_file(gif_path)?;
    let extraction = extract(&sequence, settings, settings.output_gif_path.is_some())?;
    let skip = skip_set_for(settings, extraction.timings.len())?;

    let voices = load_voices(&voice_paths)?;
    let track = synthesize(&extraction.timings, &skip, &voices, settings, rng)?;

    tracing::info!(
        gif = %gif_path.display(),
        blips = extraction.timings.len(),
        skipped = skip.len(),
        voices = voice_paths.len(),
        "rendered blip track"
    );

    let reencoded = extraction.reencode.map(|plan| Reencoded { sequence, plan });

    Ok(SoundifyOutput {
        timings: extraction.timings,
        voice_paths,
        track,
        reencoded,
    })
}

/// Writes the track and, if present, the re-timed animation.
///
/// Both files are encoded and staged next to their destinations before
/// either one is moved into place. A failed write leaves neither output.
pub fn export(output: &SoundifyOutput, settings: &Settings) -> PipelineResult<ExportSummary> {
    let wav = output.track.to_wav()?;

    let gif = match (&output.reencoded, &settings.output_gif_path) {
        (Some(reencoded), Some(path)) => Some((
            path.clone(),
            encode_plan(&reencoded.sequence, &reencoded.plan)?,
            reencoded.plan.len(),
        )),
        _ => None,
    };

    let audio_path = settings.output_audio_path.clone();
    let staged_audio = stage(&audio_path, &wav.wav_data).map_err(|source| AudioError::Write {
        path: audio_path.clone(),
        source,
    })?;
    let staged_gif = match &gif {
        Some((path, bytes, _)) => Some(stage(path, bytes).map_err(|source| GifError::Write {
            path: path.clone(),
            source,
        })?),
        None => None,
    };

    staged_audio
        .persist(&audio_path)
        .map_err(|err| AudioError::Write {
            path: audio_path.clone(),
            source: err.error,
        })?;
    tracing::info!(path = %audio_path.display(), "saved audio");

    let gif = match (gif, staged_gif) {
        (Some((path, _, frames)), Some(staged)) => {
            if let Err(err) = staged.persist(&path) {
                if let Err(cleanup) = fs::remove_file(&audio_path) {
                    tracing::warn!(path = %audio_path.display(), error = %cleanup, "could not remove audio");
                }
                return Err(GifError::Write {
                    path,
                    source: err.error,
                }
                .into());
            }
            tracing::info!(path = %path.display(), frames, "saved re-timed animation");
            Some((path, frames))
        }
        _ => None,
    };

    Ok(ExportSummary {
        audio_path,
        pcm_hash: wav.pcm_hash,
        duration_ms: output.track.duration_ms(),
        gif,
    })
}

/// Writes `bytes` to a temporary file in the same directory as `path`.
fn stage(path: &Path, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
