//! Soundifier CLI library.
//!
//! This crate ties the backends together: the [`pipeline`] module is the
//! single entry point that turns a GIF and a set of voice clips into a blip
//! track, [`library`] finds character voices on disk, and [`commands`]
//! implements the `soundifier` subcommands.

pub mod commands;
pub mod library;
pub mod pipeline;
pub mod settings_args;

pub use pipeline::{export, soundify, ExportSummary, PipelineError, Reencoded, SoundifyOutput};
