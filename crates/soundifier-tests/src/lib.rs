//! Soundifier End-to-End Test Infrastructure
//!
//! This crate drives the whole pipeline (animation in, WAV and GIF out)
//! against fixtures authored on the fly:
//!
//! - [`fixtures`] writes typing animations and voice clips into a temp dir
//! - [`determinism`] checks that a render is byte-identical across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p soundifier-tests
//! ```

pub mod determinism;
pub mod fixtures;
