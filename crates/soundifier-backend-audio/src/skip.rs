//! Punctuation-based blip suppression.
//!
//! Every visible (non-whitespace) character of the transcript is assumed to
//! be revealed by exactly one blip, so the n-th visible character numbers
//! the n-th blip.

use std::collections::BTreeSet;

use soundifier_spec::Settings;

use crate::error::{AudioError, AudioResult};

/// 1-based indices of blips to suppress.
pub type SkipSet = BTreeSet<usize>;

/// Numbers the visible characters of `text` that should not get a blip.
///
/// Whitespace inside `skip_characters` is ignored.
pub fn skip_indices(text: &str, skip_non_alphanumeric: bool, skip_characters: &str) -> SkipSet {
    let skip_characters: Vec<char> = skip_characters
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    text.chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .filter(|(_, c)| {
            (skip_non_alphanumeric && !c.is_alphanumeric()) || skip_characters.contains(c)
        })
        .map(|(index, _)| index + 1)
        .collect()
}

/// Builds the skip set for a render with `blip_count` blips.
///
/// Returns an empty set when punctuation filtering is off or no transcript
/// was given.
///
/// # Errors
///
/// Returns [`AudioError::TranscriptMismatch`] when the transcript's visible
/// character count differs from `blip_count`.
pub fn skip_set_for(settings: &Settings, blip_count: usize) -> AudioResult<SkipSet> {
    if !settings.filters_punctuation() {
        return Ok(SkipSet::new());
    }

    let letters = settings
        .full_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();
    if letters != blip_count {
        return Err(AudioError::TranscriptMismatch {
            letters,
            blips: blip_count,
        });
    }

    let skips = skip_indices(
        &settings.full_text,
        settings.skip_non_alphanumeric,
        &settings.skip_characters,
    );
    tracing::debug!(skipped = skips.len(), letters, "punctuation skip set");
    Ok(skips)
}
