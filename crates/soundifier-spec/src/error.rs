//! Error taxonomy shared by every backend.

use std::fmt;

/// Broad failure classes a render can end in.
///
/// Every backend error maps onto exactly one kind, which the CLI turns into
/// an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or unusable input: unreadable media, an empty voice set, no
    /// extracted timings, a transcript that does not line up with the blips,
    /// or invalid settings.
    InvalidInput,
    /// Corrupt animation or audio data.
    Decode,
    /// An output file could not be written.
    Export,
}

impl ErrorKind {
    /// Returns the stable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Decode => "decode_error",
            ErrorKind::Export => "export_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for backend-specific errors.
///
/// All backend error enums implement this so callers can report them
/// uniformly without knowing which backend produced them.
///
/// ```ignore
/// use soundifier_spec::BackendError;
///
/// fn report<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "GIF_001" or "AUDIO_004".
    fn code(&self) -> &'static str;

    /// Human-readable message, normally the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Category for grouping related errors ("gif", "audio", "settings").
    fn category(&self) -> &'static str;

    /// The failure class of this error.
    fn kind(&self) -> ErrorKind;
}
