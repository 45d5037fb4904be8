//! Test fixture utilities for authoring animations and voice clips.

use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Two-color palette: index 0 is the box background, index 1 is text.
const PALETTE: [u8; 6] = [0, 0, 0, 255, 255, 255];

/// One frame of a fixture animation: palette indices and a delay in
/// centiseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifFrame {
    /// One palette index per pixel, row-major.
    pub pixels: Vec<u8>,
    /// Display time in centiseconds.
    pub delay_cs: u16,
}

/// Frames of a one-row text box revealing `letters` letters, one per frame.
pub fn typing_frames(letters: usize, delay_cs: u16) -> Vec<GifFrame> {
    (0..letters)
        .map(|shown| GifFrame {
            pixels: (0..letters).map(|i| u8::from(i <= shown)).collect(),
            delay_cs,
        })
        .collect()
}

/// A temp directory holding the inputs and outputs of one render.
pub struct DialogueFixture {
    root: TempDir,
}

impl Default for DialogueFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueFixture {
    /// Create an empty fixture directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path of `name` inside the fixture.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write a typing animation revealing `letters` letters.
    pub fn typing_gif(&self, name: &str, letters: usize, delay_cs: u16) -> PathBuf {
        self.write_gif(name, letters as u16, &typing_frames(letters, delay_cs))
    }

    /// Write a looping one-row animation of the given frames.
    pub fn write_gif(&self, name: &str, width: u16, frames: &[GifFrame]) -> PathBuf {
        let path = self.file(name);
        let file = File::create(&path).expect("Failed to create GIF");
        let mut encoder =
            gif::Encoder::new(file, width, 1, &PALETTE).expect("Failed to start GIF");
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .expect("Failed to set loop count");

        for frame in frames {
            assert_eq!(frame.pixels.len(), width as usize, "frame width mismatch");
            let frame = gif::Frame {
                width,
                height: 1,
                delay: frame.delay_cs,
                dispose: gif::DisposalMethod::Keep,
                buffer: Cow::Borrowed(frame.pixels.as_slice()),
                ..Default::default()
            };
            encoder.write_frame(&frame).expect("Failed to write GIF frame");
        }
        path
    }

    /// Write a mono 16-bit voice clip: a square wave of the given period.
    pub fn voice(&self, name: &str, sample_rate: u32, duration_ms: u32, period: u32) -> PathBuf {
        let path = self.file(name);
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
        let samples = sample_rate * duration_ms / 1000;
        let period = period.max(2);
        for i in 0..samples {
            let value = if (i % period) < period / 2 { 16000 } else { -16000 };
            writer.write_sample(value as i16).expect("Failed to write sample");
        }
        writer.finalize().expect("Failed to finalize WAV");
        path
    }

    /// Read back a WAV written by a render.
    pub fn read_wav(&self, path: &Path) -> (hound::WavSpec, Vec<i16>) {
        let mut reader = hound::WavReader::open(path).expect("Failed to open WAV");
        let spec = reader.spec();
        let samples = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to read samples");
        (spec, samples)
    }
}
