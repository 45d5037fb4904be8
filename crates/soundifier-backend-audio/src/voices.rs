//! Voice path resolution.
//!
//! A single path like `voices/sans#.wav` stands for the numbered family
//! `sans0.wav` (or `sans1.wav`), `sans2.wav`, ... up to the first gap.

use std::path::{Path, PathBuf};

use crate::error::{AudioError, AudioResult};

/// Placeholder replaced by sequential indices.
pub const PLACEHOLDER: char = '#';

/// Resolves the voice clip paths to load.
///
/// If exactly one path is given, it contains [`PLACEHOLDER`], and no file
/// exists under that literal name, indices are substituted starting at 0
/// (when the `0` file exists) or 1, until a substitution names a missing
/// file. Any other input is returned as is.
///
/// # Errors
///
/// Returns [`AudioError::NoVoices`] if the result is empty.
pub fn resolve_voice_paths(paths: &[PathBuf]) -> AudioResult<Vec<PathBuf>> {
    let resolved = match paths {
        [pattern] if is_pattern(pattern) => expand_pattern(pattern),
        _ => paths.to_vec(),
    };

    if resolved.is_empty() {
        return Err(AudioError::NoVoices);
    }

    tracing::debug!(count = resolved.len(), "resolved voice clips");
    Ok(resolved)
}

fn is_pattern(path: &Path) -> bool {
    path.to_string_lossy().contains(PLACEHOLDER) && !path.is_file()
}

fn substitute(pattern: &str, index: usize) -> PathBuf {
    PathBuf::from(pattern.replace(PLACEHOLDER, &index.to_string()))
}

fn expand_pattern(pattern: &Path) -> Vec<PathBuf> {
    let pattern = pattern.to_string_lossy();
    let mut index = if substitute(&pattern, 0).is_file() { 0 } else { 1 };

    let mut matches = Vec::new();
    loop {
        let candidate = substitute(&pattern, index);
        if !candidate.is_file() {
            break;
        }
        matches.push(candidate);
        index += 1;
    }
    matches
}
