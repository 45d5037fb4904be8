//! Soundifier GIF Backend
//!
//! Turns a "typing" text-box animation into blip instants, and optionally
//! into a re-timed copy of the animation.
//!
//! # Overview
//!
//! - [`frames`] decodes a GIF into fully composited, byte-comparable canvases
//!   with their display durations and the file's loop count.
//! - [`timing`] walks those canvases twice: once to find where the reveal
//!   pauses, and once to place blips and plan the re-encoded frame stream.
//! - [`encode`] writes a planned frame stream back out as a GIF.
//!
//! Nothing here is random. Given the same frames and settings, extraction
//! always yields the same timings and the same re-encode plan.
//!
//! # Example
//!
//! ```ignore
//! use soundifier_backend_gif::{decode_file, extract};
//! use soundifier_spec::Settings;
//!
//! let frames = decode_file("dialogue.gif".as_ref())?;
//! let settings = Settings::new("dialogue.wav");
//! let extraction = extract(&frames, &settings, false)?;
//! println!("{} blips", extraction.timings.len());
//! ```

pub mod encode;
pub mod error;
pub mod frames;
pub mod timing;

pub use encode::{centisecond_delays, encode_plan};
pub use error::{GifError, GifResult};
pub use frames::{decode, decode_file, Frame, FrameSequence, LoopCount};
pub use timing::{extract, extract_timings, Extraction, ReencodePlan, ReencodedFrame};
