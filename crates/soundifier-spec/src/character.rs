//! Voice sets for library characters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A character's voice clips, with an optional alternate voice set.
///
/// The renderer never sees this type: callers flatten it to a path list with
/// [`Character::voices`] before handing voices to the backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Character {
    /// A single voice set.
    NoVariant {
        /// Clip paths.
        voices: Vec<PathBuf>,
    },
    /// A base voice set plus a named alternate.
    HasVariant {
        /// Clip paths of the base voice.
        voices: Vec<PathBuf>,
        /// Display name of the alternate voice.
        variant_name: String,
        /// Clip paths of the alternate voice.
        variant_voices: Vec<PathBuf>,
    },
}

impl Character {
    /// Returns the base voice clips.
    pub fn base_voices(&self) -> &[PathBuf] {
        match self {
            Character::NoVariant { voices } | Character::HasVariant { voices, .. } => voices,
        }
    }

    /// Returns the variant name, if this character has one.
    pub fn variant_name(&self) -> Option<&str> {
        match self {
            Character::NoVariant { .. } => None,
            Character::HasVariant { variant_name, .. } => Some(variant_name),
        }
    }

    /// Returns the clips to render with.
    ///
    /// Asking for the variant of a character without one yields the base
    /// voices.
    pub fn voices(&self, use_variant: bool) -> &[PathBuf] {
        match self {
            Character::HasVariant { variant_voices, .. } if use_variant => variant_voices,
            _ => self.base_voices(),
        }
    }
}
