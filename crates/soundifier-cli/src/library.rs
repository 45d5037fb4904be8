//! Character voice library.
//!
//! A voices directory maps to characters like this:
//!
//! - `name.wav` is a character `name` with one clip.
//! - `name/` is a character `name` with every `.wav` inside.
//! - `group/` holding a `.multi` marker is a namespace; its entries become
//!   characters named `group/entry`.
//! - `name/` holding a `.variant` marker splits its clips: a clip whose name
//!   without digits is `name` (case-insensitively) or empty belongs to the
//!   base voice, every other clip to the variant, which is named after it.
//!
//! A character may ship render defaults as `defaults.json` inside its
//! directory, or as `name.json` beside a single-clip character.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use soundifier_spec::{Character, Settings};

/// Marker file turning a directory into a namespace of characters.
pub const MULTI_MARKER: &str = ".multi";
/// Marker file enabling the base/variant split.
pub const VARIANT_MARKER: &str = ".variant";
/// Defaults file inside a character directory.
pub const DEFAULTS_FILE: &str = "defaults.json";
/// Variant name used when no variant clip names one.
pub const DEFAULT_VARIANT_NAME: &str = "Variant";

/// One character found in the library.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    /// Voice sets.
    pub character: Character,
    /// Where render defaults would live; the file may not exist.
    pub defaults_path: PathBuf,
}

impl LibraryEntry {
    /// Loads the character's render defaults as a settings layer.
    ///
    /// A missing file yields `None`. A file that cannot be parsed is logged
    /// and also yields `None`, so the render falls back to neutral defaults.
    pub fn load_defaults(&self) -> Option<Value> {
        if !self.defaults_path.is_file() {
            return None;
        }
        match Settings::read_layer(&self.defaults_path) {
            Ok(layer) => Some(layer),
            Err(e) => {
                tracing::warn!(
                    path = %self.defaults_path.display(),
                    "ignoring character defaults: {}",
                    e
                );
                None
            }
        }
    }
}

/// All characters under a voices directory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct VoiceLibrary {
    entries: BTreeMap<String, LibraryEntry>,
}

impl VoiceLibrary {
    /// Scans `root` for characters.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let mut library = Self::default();
        library.scan_dir(root, "")?;
        tracing::debug!(
            root = %root.display(),
            characters = library.entries.len(),
            "scanned voice library"
        );
        Ok(library)
    }

    /// Looks up a character by its full name.
    pub fn get(&self, name: &str) -> Option<&LibraryEntry> {
        self.entries.get(name)
    }

    /// Iterates characters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LibraryEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library has no characters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn scan_dir(&mut self, dir: &Path, prefix: &str) -> io::Result<()> {
        for path in sorted_entries(dir)? {
            let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };

            if path.is_file() {
                if let Some(stem) = file_name.strip_suffix(".wav") {
                    self.entries.insert(
                        format!("{}{}", prefix, stem),
                        LibraryEntry {
                            character: Character::NoVariant {
                                voices: vec![path.clone()],
                            },
                            defaults_path: path.with_extension("json"),
                        },
                    );
                }
            } else if path.is_dir() {
                if path.join(MULTI_MARKER).is_file() {
                    self.scan_dir(&path, &format!("{}{}/", prefix, file_name))?;
                } else {
                    let character = read_character(&path, &file_name)?;
                    self.entries.insert(
                        format!("{}{}", prefix, file_name),
                        LibraryEntry {
                            character,
                            defaults_path: path.join(DEFAULTS_FILE),
                        },
                    );
                }
            }
        }
        Ok(())
    }
}

fn read_character(dir: &Path, name: &str) -> io::Result<Character> {
    let clips: Vec<PathBuf> = sorted_entries(dir)?
        .into_iter()
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "wav"))
        .collect();

    if !dir.join(VARIANT_MARKER).is_file() {
        return Ok(Character::NoVariant { voices: clips });
    }

    let mut voices = Vec::new();
    let mut variant_voices = Vec::new();
    let mut variant_name = DEFAULT_VARIANT_NAME.to_string();

    for clip in clips {
        let clean = clean_name(&clip);
        if clean.is_empty() || clean.eq_ignore_ascii_case(name) {
            voices.push(clip);
        } else {
            variant_name = clean;
            variant_voices.push(clip);
        }
    }

    if voices.is_empty() {
        tracing::warn!(
            character = name,
            "variant marker without base voices, using variant clips as the base"
        );
        return Ok(Character::NoVariant {
            voices: variant_voices,
        });
    }

    Ok(Character::HasVariant {
        voices,
        variant_name,
        variant_voices,
    })
}

/// File stem with digits removed: `Sans2.wav` becomes `Sans`.
fn clean_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect()
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_scan_layouts() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        touch(&root.join("toriel.wav"));
        touch(&root.join("papyrus/papyrus1.wav"));
        touch(&root.join("papyrus/papyrus2.wav"));
        touch(&root.join("au/.multi"));
        touch(&root.join("au/swap.wav"));
        touch(&root.join("au/fell/fell.wav"));
        touch(&root.join("notes.txt"));

        let library = VoiceLibrary::scan(root).unwrap();
        let names: Vec<&str> = library.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["au/fell", "au/swap", "papyrus", "toriel"]);

        let papyrus = library.get("papyrus").unwrap();
        assert_eq!(papyrus.character.voices(false).len(), 2);
        assert_eq!(papyrus.defaults_path, root.join("papyrus/defaults.json"));

        let toriel = library.get("toriel").unwrap();
        assert_eq!(toriel.defaults_path, root.join("toriel.json"));
    }

    #[test]
    fn test_variant_split() {
        let dir = tempdir().unwrap();
        let sans = dir.path().join("Sans");
        touch(&sans.join(".variant"));
        touch(&sans.join("sans1.wav"));
        touch(&sans.join("sans2.wav"));
        touch(&sans.join("3.wav"));
        touch(&sans.join("Serious1.wav"));

        let library = VoiceLibrary::scan(dir.path()).unwrap();
        let character = &library.get("Sans").unwrap().character;

        assert_eq!(character.variant_name(), Some("Serious"));
        assert_eq!(character.voices(false).len(), 3);
        assert_eq!(character.voices(true), &[sans.join("Serious1.wav")]);
    }

    #[test]
    fn test_variant_without_base_voices() {
        let dir = tempdir().unwrap();
        let odd = dir.path().join("odd");
        touch(&odd.join(".variant"));
        touch(&odd.join("other.wav"));

        let library = VoiceLibrary::scan(dir.path()).unwrap();
        let character = &library.get("odd").unwrap().character;
        assert_eq!(character.variant_name(), None);
        assert_eq!(character.voices(false), &[odd.join("other.wav")]);
    }

    #[test]
    fn test_defaults_fallback() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a/a.wav"));
        touch(&dir.path().join("b/b.wav"));
        fs::write(dir.path().join("a/defaults.json"), r#"{"interval": 2}"#).unwrap();
        fs::write(dir.path().join("b/defaults.json"), "not json").unwrap();

        let library = VoiceLibrary::scan(dir.path()).unwrap();
        let a = library.get("a").unwrap().load_defaults().unwrap();
        assert_eq!(a["interval"], 2);
        assert!(library.get("b").unwrap().load_defaults().is_none());
    }

    #[test]
    fn test_missing_root() {
        assert!(VoiceLibrary::scan(Path::new("/nonexistent/voices")).is_err());
    }
}
