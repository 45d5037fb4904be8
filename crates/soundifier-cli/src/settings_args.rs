//! Render settings as command-line flags.
//!
//! Settings are assembled from up to three JSON layers, later layers
//! winning: the character's defaults, the `--settings` file, and the flags
//! given on the command line.

use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::{Map, Value};
use soundifier_spec::{Settings, SettingsResult};

/// Flags shared by every command that extracts timings.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SettingsArgs {
    /// JSON settings file applied before the flags below
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Playback speed multiplier
    #[arg(long)]
    pub speed: Option<f64>,

    /// Emit one blip every N frame changes
    #[arg(long)]
    pub interval: Option<u32>,

    /// Group the re-encoded GIF into one frame per blip
    #[arg(long)]
    pub mettatonize: bool,

    /// Ease the audio 45 ms ahead of the text (on by default)
    #[arg(long)]
    pub no_easy_align: bool,

    /// Drop the very first blip
    #[arg(long)]
    pub skip_first_blip: bool,

    /// Silence blips after a pause longer than this many milliseconds (0 disables)
    #[arg(long)]
    pub cutoff: Option<u32>,

    /// Render for the live preview: 30 ms lead, no GIF export
    #[arg(long)]
    pub preview: bool,
}

/// Flags that only affect the synthesized track.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct VoiceArgs {
    /// Lowest pitch factor
    #[arg(long)]
    pub min_pitch: Option<f64>,

    /// Highest pitch factor
    #[arg(long)]
    pub max_pitch: Option<f64>,

    /// Probability in [0, 1] that a blip is pitch shifted
    #[arg(long)]
    pub pitch_chance: Option<f64>,

    /// Shorten and fade blips that would run into the next one
    #[arg(long)]
    pub overlap_prevention: bool,

    /// Milliseconds a blip may run past the next blip before being cut
    #[arg(long, allow_hyphen_values = true)]
    pub olp_leniency: Option<i32>,

    /// Fade length in milliseconds applied to shortened blips
    #[arg(long)]
    pub olp_fade: Option<u32>,

    /// Transcript of the typed text, used to silence punctuation
    #[arg(long)]
    pub text: Option<String>,

    /// Extra characters to treat as silent
    #[arg(long)]
    pub skip_characters: Option<String>,

    /// Give punctuation its own blips
    #[arg(long)]
    pub keep_punctuation: bool,

    /// Only silence `skip_characters`, not every symbol
    #[arg(long)]
    pub keep_symbols: bool,
}

impl SettingsArgs {
    /// Builds settings from character defaults, the settings file, and flags.
    pub fn resolve(
        &self,
        voice: Option<&VoiceArgs>,
        character_defaults: Option<Value>,
        output_audio: Option<&Path>,
        output_gif: Option<&Path>,
    ) -> SettingsResult<Settings> {
        let mut layers = Vec::with_capacity(3);
        if let Some(defaults) = character_defaults {
            layers.push(defaults);
        }
        if let Some(path) = &self.settings {
            layers.push(Settings::read_layer(path)?);
        }

        let mut flags = self.to_layer();
        if let Some(voice) = voice {
            flags.extend(voice.to_layer());
        }
        if let Some(path) = output_audio {
            flags.insert("output_audio_path".into(), path_value(path));
        }
        if let Some(path) = output_gif {
            flags.insert("output_gif_path".into(), path_value(path));
        }
        layers.push(Value::Object(flags));

        let mut settings = Settings::from_layers(&layers)?;
        if settings.making_for_preview {
            settings.output_gif_path = None;
        }
        Ok(settings)
    }

    fn to_layer(&self) -> Map<String, Value> {
        let mut layer = Map::new();
        set(&mut layer, "speed", self.speed);
        set(&mut layer, "interval", self.interval);
        set(&mut layer, "cutoff_distance", self.cutoff);
        flag(&mut layer, "mettatonize", self.mettatonize, true);
        flag(&mut layer, "easy_align", self.no_easy_align, false);
        flag(&mut layer, "skip_first_blip", self.skip_first_blip, true);
        flag(&mut layer, "making_for_preview", self.preview, true);
        layer
    }
}

impl VoiceArgs {
    fn to_layer(&self) -> Map<String, Value> {
        let mut layer = Map::new();
        set(&mut layer, "min_pitch", self.min_pitch);
        set(&mut layer, "max_pitch", self.max_pitch);
        set(&mut layer, "random_pitch_chance", self.pitch_chance);
        set(&mut layer, "olp_hard_cutoff_leniency", self.olp_leniency);
        set(&mut layer, "olp_fade_duration", self.olp_fade);
        set(&mut layer, "full_text", self.text.clone());
        set(&mut layer, "skip_characters", self.skip_characters.clone());
        flag(&mut layer, "do_overlap_prevention", self.overlap_prevention, true);
        flag(&mut layer, "skip_punctuation", self.keep_punctuation, false);
        flag(&mut layer, "skip_non_alphanumeric", self.keep_symbols, false);
        layer
    }
}

fn set<T: Into<Value>>(layer: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        layer.insert(key.to_string(), value.into());
    }
}

/// Flags only override when given; an absent switch leaves lower layers alone.
fn flag(layer: &mut Map<String, Value>, key: &str, given: bool, value: bool) {
    if given {
        layer.insert(key.to_string(), Value::Bool(value));
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_flags() {
        let settings = SettingsArgs::default()
            .resolve(None, None, Some(Path::new("out.wav")), None)
            .unwrap();
        assert_eq!(settings, Settings::new("out.wav"));
    }

    #[test]
    fn test_layer_precedence() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, r#"{"interval": 3, "speed": 2.0, "min_pitch": 0.8}"#).unwrap();

        let args = SettingsArgs {
            settings: Some(file),
            speed: Some(1.5),
            ..Default::default()
        };
        let defaults = json!({"interval": 2, "max_pitch": 1.3, "easy_align": false});

        let settings = args
            .resolve(None, Some(defaults), Some(Path::new("a.wav")), None)
            .unwrap();

        assert_eq!(settings.speed, 1.5);
        assert_eq!(settings.interval, 3);
        assert_eq!(settings.min_pitch, 0.8);
        assert_eq!(settings.max_pitch, 1.3);
        assert!(!settings.easy_align);
    }

    #[test]
    fn test_switches_only_override_when_given() {
        let defaults = json!({"do_overlap_prevention": true, "skip_punctuation": false});
        let settings = SettingsArgs::default()
            .resolve(
                Some(&VoiceArgs::default()),
                Some(defaults),
                Some(Path::new("a.wav")),
                None,
            )
            .unwrap();
        assert!(settings.do_overlap_prevention);
        assert!(!settings.skip_punctuation);

        let voice = VoiceArgs {
            keep_symbols: true,
            text: Some("Hi!".into()),
            ..Default::default()
        };
        let settings = SettingsArgs::default()
            .resolve(Some(&voice), None, Some(Path::new("a.wav")), None)
            .unwrap();
        assert!(!settings.skip_non_alphanumeric);
        assert_eq!(settings.full_text, "Hi!");
    }

    #[test]
    fn test_preview_drops_gif_output() {
        let args = SettingsArgs {
            preview: true,
            ..Default::default()
        };
        let settings = args
            .resolve(
                None,
                None,
                Some(Path::new("a.wav")),
                Some(Path::new("a.gif")),
            )
            .unwrap();
        assert!(settings.making_for_preview);
        assert_eq!(settings.output_gif_path, None);
    }

    #[test]
    fn test_bad_settings_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, "[1, 2]").unwrap();

        let args = SettingsArgs {
            settings: Some(file),
            ..Default::default()
        };
        assert!(args.resolve(None, None, None, None).is_err());
    }
}
