//! Soundifier Audio Backend
//!
//! Builds the blip track for a typing animation:
//!
//! - [`voices`] expands a `#` placeholder pattern into concrete clip paths
//! - [`clip`] decodes WAV clips into a common-rate mono [`VoiceBank`]
//! - [`skip`] maps a transcript to the blips that land on punctuation
//! - [`synth`] overlays randomly chosen clips at the blip instants
//! - [`wav`] writes the result as 16-bit PCM
//!
//! # Determinism
//!
//! Voice choice and pitch jitter are the only random draws, and both come
//! from the generator the caller passes in. Seed it with
//! [`rng::create_rng`] and the PCM output is byte-identical across runs.
//!
//! # Example
//!
//! ```ignore
//! use soundifier_backend_audio::{load_voices, resolve_voice_paths, rng, synthesize, SkipSet};
//! use soundifier_spec::Settings;
//!
//! let paths = resolve_voice_paths(&["voices/sans#.wav".into()])?;
//! let bank = load_voices(&paths)?;
//! let settings = Settings::new("out.wav");
//! let mut rng = rng::create_rng(42);
//! let track = synthesize(&[120.0, 240.0], &SkipSet::new(), &bank, &settings, &mut rng)?;
//! std::fs::write("out.wav", track.to_wav()?.wav_data)?;
//! ```

pub mod clip;
pub mod error;
pub mod resample;
pub mod rng;
pub mod skip;
pub mod synth;
pub mod voices;
pub mod wav;

pub use clip::{load_clip, load_voices, VoiceBank, VoiceClip};
pub use error::{AudioError, AudioResult};
pub use skip::{skip_indices, skip_set_for, SkipSet};
pub use synth::{synthesize, BlipTrack};
pub use voices::{resolve_voice_paths, PLACEHOLDER};
pub use wav::WavResult;
