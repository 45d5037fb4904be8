//! CLI command implementations

pub mod characters;
pub mod generate;
pub mod timings;

use colored::Colorize;
use serde::Serialize;
use soundifier_spec::{BackendError, ErrorKind};
use std::process::ExitCode;

/// Default location of the bundled character voices.
pub const DEFAULT_VOICES_DIR: &str = "assets/builtin_voices";

/// Exit code for a failure of the given kind.
///
/// 1 = invalid input or settings, 2 = decode or synthesis, 3 = export.
pub fn exit_code_for(kind: ErrorKind) -> ExitCode {
    ExitCode::from(match kind {
        ErrorKind::InvalidInput => 1,
        ErrorKind::Decode => 2,
        ErrorKind::Export => 3,
    })
}

/// A backend failure in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code, e.g. `GIF_002`.
    pub code: String,
    /// Error category, e.g. `gif`.
    pub category: String,
    /// Human-readable message.
    pub message: String,
}

impl JsonError {
    /// Captures a backend error.
    pub fn from_backend(error: &dyn BackendError) -> Self {
        Self {
            code: error.code().to_string(),
            category: error.category().to_string(),
            message: error.message(),
        }
    }
}

/// Prints a backend failure and returns the matching exit code.
pub(crate) fn report_failure(error: &dyn BackendError) -> ExitCode {
    eprintln!(
        "{} [{}] {}",
        "error".red().bold(),
        error.code().yellow(),
        error.message()
    );
    exit_code_for(error.kind())
}

/// Prints a JSON document to stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundifier_spec::SettingsError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(ErrorKind::InvalidInput), ExitCode::from(1));
        assert_eq!(exit_code_for(ErrorKind::Decode), ExitCode::from(2));
        assert_eq!(exit_code_for(ErrorKind::Export), ExitCode::from(3));
    }

    #[test]
    fn test_json_error() {
        let error = SettingsError::Unsupported {
            name: "do_extra_noise",
        };
        let json = JsonError::from_backend(&error);
        assert_eq!(json.code, "SETTINGS_005");
        assert_eq!(json.category, "settings");
        assert!(json.message.contains("do_extra_noise"));
    }
}
