//! Characters command implementation
//!
//! Lists the characters found in a voice library.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{print_json, DEFAULT_VOICES_DIR};
use crate::library::VoiceLibrary;

/// Arguments of `soundifier characters`.
#[derive(Args, Debug, Clone)]
pub struct CharactersArgs {
    /// Voice library directory
    #[arg(long, default_value = DEFAULT_VOICES_DIR)]
    pub voices_dir: PathBuf,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    pub json: bool,
}

/// One character in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CharacterListing {
    /// Full character name, including any namespace.
    pub name: String,
    /// Number of base clips.
    pub voices: usize,
    /// Variant name, if the character has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Number of variant clips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_voices: Option<usize>,
    /// Whether the character ships render defaults.
    pub has_defaults: bool,
}

/// Run the characters command
///
/// # Returns
/// Exit code: 0 success
pub fn run(args: &CharactersArgs) -> Result<ExitCode> {
    let library = VoiceLibrary::scan(&args.voices_dir).with_context(|| {
        format!(
            "Failed to read voice library: {}",
            args.voices_dir.display()
        )
    })?;
    let listings = list(&library);

    if args.json {
        print_json(&listings)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}",
        "Voice library:".cyan().bold(),
        args.voices_dir.display()
    );
    for listing in &listings {
        let variant = match (&listing.variant, listing.variant_voices) {
            (Some(name), Some(count)) => format!(", variant {} ({})", name.yellow(), count),
            _ => String::new(),
        };
        println!(
            "  {} {} ({} clips{})",
            "-".dimmed(),
            listing.name.bold(),
            listing.voices,
            variant
        );
    }
    println!("{} {}", "Characters:".cyan().bold(), listings.len());
    Ok(ExitCode::SUCCESS)
}

/// Summarizes every character in name order.
pub fn list(library: &VoiceLibrary) -> Vec<CharacterListing> {
    library
        .iter()
        .map(|(name, entry)| {
            let variant = entry.character.variant_name().map(str::to_string);
            CharacterListing {
                name: name.to_string(),
                voices: entry.character.voices(false).len(),
                variant_voices: variant
                    .as_ref()
                    .map(|_| entry.character.voices(true).len()),
                variant,
                has_defaults: entry.defaults_path.is_file(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn lists_characters_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("toriel.wav"), b"").unwrap();
        fs::write(root.join("toriel.json"), "{}").unwrap();
        fs::create_dir(root.join("sans")).unwrap();
        fs::write(root.join("sans/.variant"), b"").unwrap();
        fs::write(root.join("sans/sans.wav"), b"").unwrap();
        fs::write(root.join("sans/serious.wav"), b"").unwrap();

        let library = VoiceLibrary::scan(root).unwrap();
        assert_eq!(
            list(&library),
            vec![
                CharacterListing {
                    name: "sans".into(),
                    voices: 1,
                    variant: Some("serious".into()),
                    variant_voices: Some(1),
                    has_defaults: false,
                },
                CharacterListing {
                    name: "toriel".into(),
                    voices: 1,
                    variant: None,
                    variant_voices: None,
                    has_defaults: true,
                },
            ]
        );
    }

    #[test]
    fn missing_library_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let args = CharactersArgs {
            voices_dir: tmp.path().join("nope"),
            json: true,
        };
        assert!(run(&args).is_err());
    }
}
