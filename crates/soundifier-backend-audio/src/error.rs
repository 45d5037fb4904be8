//! Error types for the audio backend.

use soundifier_spec::{BackendError, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while loading voices or building a blip track.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Voice resolution produced no clips.
    #[error("no voice clips were found")]
    NoVoices,

    /// A voice clip does not exist or cannot be opened.
    #[error("voice clip '{path}' could not be opened: {source}")]
    ClipUnreadable {
        /// Clip path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A voice clip is not valid WAV data.
    #[error("failed to decode voice clip '{path}': {source}")]
    ClipDecode {
        /// Clip path.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: hound::Error,
    },

    /// A voice clip uses a sample layout the loader does not handle.
    #[error("unsupported voice clip format in '{path}': {message}")]
    UnsupportedFormat {
        /// Clip path.
        path: PathBuf,
        /// Description of the format.
        message: String,
    },

    /// Synthesis was asked to place zero blips.
    #[error("no blip timings to synthesize")]
    NoTimings,

    /// The transcript does not have one visible character per blip.
    #[error(
        "transcript has {letters} non-whitespace characters but the animation has {blips} blips"
    )]
    TranscriptMismatch {
        /// Non-whitespace characters in the transcript.
        letters: usize,
        /// Extracted blips.
        blips: usize,
    },

    /// The audio track could not be encoded.
    #[error("failed to encode audio: {0}")]
    Encode(#[source] hound::Error),

    /// The audio track could not be written.
    #[error("failed to write audio '{path}': {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl AudioError {
    /// Classifies a `hound` open/read failure for `path`.
    pub(crate) fn from_hound(path: impl Into<PathBuf>, err: hound::Error) -> Self {
        let path = path.into();
        match err {
            hound::Error::IoError(source) => AudioError::ClipUnreadable { path, source },
            other => AudioError::ClipDecode {
                path,
                source: other,
            },
        }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::NoVoices => "AUDIO_001",
            AudioError::ClipUnreadable { .. } => "AUDIO_002",
            AudioError::ClipDecode { .. } => "AUDIO_003",
            AudioError::UnsupportedFormat { .. } => "AUDIO_004",
            AudioError::NoTimings => "AUDIO_005",
            AudioError::TranscriptMismatch { .. } => "AUDIO_006",
            AudioError::Write { .. } => "AUDIO_007",
            AudioError::Encode(_) => "AUDIO_008",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }

    fn kind(&self) -> ErrorKind {
        match self {
            AudioError::NoVoices
            | AudioError::ClipUnreadable { .. }
            | AudioError::NoTimings
            | AudioError::TranscriptMismatch { .. } => ErrorKind::InvalidInput,
            AudioError::ClipDecode { .. } | AudioError::UnsupportedFormat { .. } => {
                ErrorKind::Decode
            }
            AudioError::Encode(_) | AudioError::Write { .. } => ErrorKind::Export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_failures_are_invalid_input() {
        let err = AudioError::from_hound(
            "missing.wav",
            hound::Error::IoError(std::io::Error::from(std::io::ErrorKind::NotFound)),
        );
        assert!(matches!(err, AudioError::ClipUnreadable { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_format_failures_are_decode_errors() {
        let err = AudioError::from_hound("bad.wav", hound::Error::FormatError("no RIFF tag"));
        assert_eq!(err.code(), "AUDIO_003");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_mismatch_message() {
        let err = AudioError::TranscriptMismatch {
            letters: 4,
            blips: 6,
        };
        assert!(err.to_string().contains("4 non-whitespace"));
        assert!(err.to_string().contains("6 blips"));
    }
}
