//! Render settings for a blip track.
//!
//! Settings are plain data: they are loaded from JSON (optionally layered on
//! top of per-character defaults), adjusted by the caller, validated once,
//! and then only borrowed by the backends.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::{BackendError, ErrorKind};

/// Padding added after the last blip and the longest clip, in milliseconds.
pub const TAIL_PADDING_MS: f64 = 150.0;

/// Audio lead applied to preview renders, in milliseconds at speed 1.
pub const PREVIEW_LEAD_MS: f64 = 30.0;

/// Audio lead applied when easy-align is on, in milliseconds at speed 1.
pub const EASY_ALIGN_LEAD_MS: f64 = 45.0;

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings JSON is malformed or has wrongly typed fields.
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings layer is not a JSON object.
    #[error("settings layer must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A field holds a value outside its accepted range.
    #[error("invalid setting '{name}': {message}")]
    InvalidValue {
        /// Field name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A recognized option whose behavior is not defined by the engine.
    #[error("setting '{name}' is recognized but not supported by the renderer")]
    Unsupported {
        /// Field name.
        name: &'static str,
    },
}

impl SettingsError {
    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            message: message.into(),
        }
    }
}

impl BackendError for SettingsError {
    fn code(&self) -> &'static str {
        match self {
            SettingsError::Read { .. } => "SETTINGS_001",
            SettingsError::Json(_) => "SETTINGS_002",
            SettingsError::NotAnObject { .. } => "SETTINGS_003",
            SettingsError::InvalidValue { .. } => "SETTINGS_004",
            SettingsError::Unsupported { .. } => "SETTINGS_005",
        }
    }

    fn category(&self) -> &'static str {
        "settings"
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Every option recognized by the renderer.
///
/// Missing JSON fields take the values from [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the WAV track is written.
    pub output_audio_path: PathBuf,
    /// Where the re-encoded GIF is written; `None` disables re-encoding.
    pub output_gif_path: Option<PathBuf>,

    /// Playback speed multiplier; durations are divided by it.
    pub speed: f64,
    /// Letter reveals per blip.
    pub interval: u32,
    /// Group every `interval` letter reveals into a single displayed frame.
    pub mettatonize: bool,

    /// Chance in [0, 1] that a blip gets a random pitch.
    pub random_pitch_chance: f64,
    /// Lowest playback-rate factor.
    pub min_pitch: f64,
    /// Highest playback-rate factor.
    pub max_pitch: f64,

    /// Fit each blip into the gap before the next one.
    pub do_overlap_prevention: bool,
    /// Extra milliseconds a blip may run past the next blip.
    pub olp_hard_cutoff_leniency: i32,
    /// Fade-out length at the end of a fitted blip, in milliseconds.
    pub olp_fade_duration: u32,

    /// Shift every blip 45ms earlier so audio does not trail the text.
    pub easy_align: bool,
    /// Drop the second blip of the track.
    pub skip_first_blip: bool,
    /// Gap in milliseconds after which the dialogue is treated as silent
    /// until the next pause ends; 0 disables the cutoff.
    pub cutoff_distance: u32,

    /// Suppress blips for punctuation found in `full_text`.
    pub skip_punctuation: bool,
    /// Treat every character that is neither a letter nor a digit as
    /// punctuation.
    pub skip_non_alphanumeric: bool,
    /// Additional characters to suppress.
    pub skip_characters: String,
    /// Transcript of the text revealed by the animation.
    pub full_text: String,

    /// Apply the preview lead instead of the easy-align lead.
    pub making_for_preview: bool,

    /// Extra noise insertion (recognized, not supported).
    pub do_extra_noise: bool,
    /// Moment of the extra noise in milliseconds (recognized, not supported).
    pub extra_noise_moment: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_audio_path: PathBuf::new(),
            output_gif_path: None,
            speed: 1.0,
            interval: 1,
            mettatonize: false,
            random_pitch_chance: 1.0,
            min_pitch: 1.0,
            max_pitch: 1.0,
            do_overlap_prevention: false,
            olp_hard_cutoff_leniency: 20,
            olp_fade_duration: 16,
            easy_align: true,
            skip_first_blip: false,
            cutoff_distance: 1500,
            skip_punctuation: true,
            skip_non_alphanumeric: true,
            skip_characters: String::new(),
            full_text: String::new(),
            making_for_preview: false,
            do_extra_noise: false,
            extra_noise_moment: 0,
        }
    }
}

impl Settings {
    /// Creates default settings writing audio to `output_audio_path`.
    pub fn new(output_audio_path: impl Into<PathBuf>) -> Self {
        Self {
            output_audio_path: output_audio_path.into(),
            ..Self::default()
        }
    }

    /// Parses settings from a JSON string.
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a settings file as a raw JSON layer.
    ///
    /// Layers are merged with [`Settings::from_layers`].
    pub fn read_layer(path: &Path) -> SettingsResult<Value> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content)?;
        ensure_object(&value)?;
        Ok(value)
    }

    /// Builds settings from JSON object layers, later layers winning.
    ///
    /// Fields absent from every layer keep their defaults.
    pub fn from_layers(layers: &[Value]) -> SettingsResult<Self> {
        let mut merged = serde_json::Map::new();
        for layer in layers {
            ensure_object(layer)?;
            if let Value::Object(fields) = layer {
                for (key, value) in fields {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// Time bias applied to every blip instant, in milliseconds.
    pub fn moment_offset(&self) -> f64 {
        if self.making_for_preview {
            -PREVIEW_LEAD_MS / self.speed
        } else if self.easy_align {
            -EASY_ALIGN_LEAD_MS / self.speed
        } else {
            0.0
        }
    }

    /// Whether blips may be pitch shifted at all.
    pub fn has_pitch_variation(&self) -> bool {
        self.min_pitch != 1.0 || self.max_pitch != 1.0
    }

    /// Whether re-encoding merges letter reveals into grouped frames.
    pub fn groups_frames(&self) -> bool {
        self.mettatonize && self.interval != 1
    }

    /// Whether a re-encoded GIF would differ from the source in timing.
    pub fn alters_animation(&self) -> bool {
        self.speed != 1.0 || self.groups_frames()
    }

    /// Whether the punctuation filter takes part in the render.
    ///
    /// An empty transcript means no transcript was supplied.
    pub fn filters_punctuation(&self) -> bool {
        self.skip_punctuation && !self.full_text.trim().is_empty()
    }

    /// Gap after which the silence cutoff engages, scaled by speed.
    pub fn scaled_cutoff(&self) -> Option<f64> {
        (self.cutoff_distance > 0).then(|| self.cutoff_distance as f64 / self.speed)
    }

    /// Checks settings for a full render: [`Settings::validate`] plus a
    /// required output audio path.
    pub fn validate_for_render(&self) -> SettingsResult<()> {
        if self.output_audio_path.as_os_str().is_empty() {
            return Err(SettingsError::invalid(
                "output_audio_path",
                "an output audio path is required",
            ));
        }
        self.validate()
    }

    /// Checks every numeric field against its accepted range.
    pub fn validate(&self) -> SettingsResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SettingsError::invalid(
                "speed",
                format!("must be a positive number, got {}", self.speed),
            ));
        }

        if self.interval == 0 {
            return Err(SettingsError::invalid("interval", "must be at least 1"));
        }

        for (name, value) in [("min_pitch", self.min_pitch), ("max_pitch", self.max_pitch)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::invalid(
                    name,
                    format!("must be a positive number, got {}", value),
                ));
            }
        }

        if self.min_pitch > self.max_pitch {
            return Err(SettingsError::invalid(
                "min_pitch",
                format!(
                    "must not exceed max_pitch ({} > {})",
                    self.min_pitch, self.max_pitch
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.random_pitch_chance) {
            return Err(SettingsError::invalid(
                "random_pitch_chance",
                format!("must be within [0, 1], got {}", self.random_pitch_chance),
            ));
        }

        if self.do_extra_noise {
            return Err(SettingsError::Unsupported {
                name: "do_extra_noise",
            });
        }

        Ok(())
    }
}

fn ensure_object(value: &Value) -> SettingsResult<()> {
    let found = match value {
        Value::Object(_) => return Ok(()),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
    };
    Err(SettingsError::NotAnObject { found })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.speed, 1.0);
        assert_eq!(settings.interval, 1);
        assert_eq!(settings.olp_hard_cutoff_leniency, 20);
        assert_eq!(settings.olp_fade_duration, 16);
        assert_eq!(settings.cutoff_distance, 1500);
        assert!(settings.easy_align);
        assert!(!settings.has_pitch_variation());
        assert!(settings.output_gif_path.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings =
            Settings::from_json(r#"{"output_audio_path": "a.wav", "speed": 2.0}"#).unwrap();
        assert_eq!(settings.output_audio_path, PathBuf::from("a.wav"));
        assert_eq!(settings.speed, 2.0);
        assert_eq!(settings.interval, 1);
        assert!(settings.skip_non_alphanumeric);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = Settings::from_json(r#"{"interval": "two"}"#).unwrap_err();
        assert_eq!(err.code(), "SETTINGS_002");
    }

    #[test]
    fn test_layers_later_wins() {
        let defaults = json!({"interval": 3, "min_pitch": 0.9, "max_pitch": 1.1});
        let user = json!({"output_audio_path": "out.wav", "interval": 2});

        let settings = Settings::from_layers(&[defaults, user]).unwrap();
        assert_eq!(settings.interval, 2);
        assert_eq!(settings.min_pitch, 0.9);
        assert_eq!(settings.max_pitch, 1.1);
        assert_eq!(settings.output_audio_path, PathBuf::from("out.wav"));
    }

    #[test]
    fn test_layer_must_be_object() {
        let err = Settings::from_layers(&[json!([1, 2])]).unwrap_err();
        assert!(matches!(err, SettingsError::NotAnObject { found: "array" }));
    }

    #[test]
    fn test_moment_offset() {
        let mut settings = Settings::new("a.wav");
        settings.speed = 2.0;
        assert_eq!(settings.moment_offset(), -22.5);

        settings.making_for_preview = true;
        assert_eq!(settings.moment_offset(), -15.0);

        settings.making_for_preview = false;
        settings.easy_align = false;
        assert_eq!(settings.moment_offset(), 0.0);
    }

    #[test]
    fn test_filters_punctuation_needs_transcript() {
        let mut settings = Settings::new("a.wav");
        assert!(!settings.filters_punctuation());

        settings.full_text = "Hi!".to_string();
        assert!(settings.filters_punctuation());

        settings.skip_punctuation = false;
        assert!(!settings.filters_punctuation());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = Settings::new("a.wav");
        assert!(base.validate().is_ok());

        let mut s = base.clone();
        s.speed = 0.0;
        assert!(s.validate().unwrap_err().to_string().contains("speed"));

        let mut s = base.clone();
        s.interval = 0;
        assert!(s.validate().unwrap_err().to_string().contains("interval"));

        let mut s = base.clone();
        s.min_pitch = 1.2;
        s.max_pitch = 1.1;
        assert!(s.validate().unwrap_err().to_string().contains("min_pitch"));

        let mut s = base.clone();
        s.random_pitch_chance = 1.5;
        assert!(s.validate().is_err());

        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert!(s
            .validate_for_render()
            .unwrap_err()
            .to_string()
            .contains("output_audio_path"));
    }

    #[test]
    fn test_extra_noise_is_unsupported() {
        let mut settings = Settings::new("a.wav");
        settings.do_extra_noise = true;
        let err = settings.validate().unwrap_err();
        assert_eq!(err.code(), "SETTINGS_005");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_alters_animation() {
        let mut settings = Settings::new("a.wav");
        assert!(!settings.alters_animation());

        settings.mettatonize = true;
        assert!(!settings.alters_animation());

        settings.interval = 2;
        assert!(settings.alters_animation());

        settings.mettatonize = false;
        settings.speed = 0.5;
        assert!(settings.alters_animation());
    }
}
