//! Soundifier Settings Library
//!
//! This crate holds the types shared by every Soundifier crate: the
//! [`Settings`] record that parameterizes a blip-track render, the error
//! taxonomy every backend reports through, and the [`Character`] voice sets
//! produced by the voice library.
//!
//! # Example
//!
//! ```
//! use soundifier_spec::Settings;
//!
//! let mut settings = Settings::new("out/blips.wav");
//! settings.speed = 1.5;
//! settings.interval = 2;
//! settings.mettatonize = true;
//!
//! assert!(settings.validate_for_render().is_ok());
//! // Easy-align is on by default: a fixed 45ms lead, scaled by speed.
//! assert!((settings.moment_offset() - (-30.0)).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! - [`character`]: Voice sets with optional alternate variants
//! - [`error`]: Error kinds and the [`BackendError`] trait
//! - [`settings`]: Render settings, JSON loading, and validation

pub mod character;
pub mod error;
pub mod settings;

pub use character::Character;
pub use error::{BackendError, ErrorKind};
pub use settings::{Settings, SettingsError, SettingsResult};
