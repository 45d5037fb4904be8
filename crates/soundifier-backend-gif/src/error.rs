//! Error types for the GIF backend.

use soundifier_spec::{BackendError, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for GIF operations.
pub type GifResult<T> = Result<T, GifError>;

/// Errors that can occur while decoding, analysing, or re-encoding a GIF.
#[derive(Debug, Error)]
pub enum GifError {
    /// The animation file could not be opened.
    #[error("failed to open animation '{path}': {source}")]
    Open {
        /// Path of the animation.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The animation data is corrupt or unsupported.
    #[error("failed to decode animation: {0}")]
    Decode(#[from] gif::DecodingError),

    /// The animation has no frames or an empty canvas.
    #[error("animation contains no frames")]
    NoFrames,

    /// No blip survived extraction.
    #[error("no blip timings could be extracted from the animation")]
    NoTimings,

    /// A re-encode plan points past the end of the frame sequence.
    #[error("re-encode plan references frame {index}, but the animation has {count} frames")]
    PlanOutOfRange {
        /// Offending source frame index.
        index: usize,
        /// Number of frames available.
        count: usize,
    },

    /// The GIF encoder failed.
    #[error("failed to encode animation: {0}")]
    Encode(#[from] gif::EncodingError),

    /// The re-encoded animation could not be written.
    #[error("failed to write animation '{path}': {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl BackendError for GifError {
    fn code(&self) -> &'static str {
        match self {
            GifError::Open { .. } => "GIF_001",
            GifError::Decode(_) => "GIF_002",
            GifError::NoFrames => "GIF_003",
            GifError::NoTimings => "GIF_004",
            GifError::PlanOutOfRange { .. } => "GIF_005",
            GifError::Encode(_) => "GIF_006",
            GifError::Write { .. } => "GIF_007",
        }
    }

    fn category(&self) -> &'static str {
        "gif"
    }

    fn kind(&self) -> ErrorKind {
        match self {
            GifError::Open { .. }
            | GifError::NoFrames
            | GifError::NoTimings
            | GifError::PlanOutOfRange { .. } => ErrorKind::InvalidInput,
            GifError::Decode(_) => ErrorKind::Decode,
            GifError::Encode(_) | GifError::Write { .. } => ErrorKind::Export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(GifError::NoTimings.kind(), ErrorKind::InvalidInput);
        assert_eq!(GifError::NoFrames.code(), "GIF_003");

        let write = GifError::Write {
            path: PathBuf::from("/nope/out.gif"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(write.kind(), ErrorKind::Export);
        assert!(write.to_string().contains("/nope/out.gif"));
    }
}
