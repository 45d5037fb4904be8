//! GIF decoding into composited frames.
//!
//! GIF frames are usually deltas: a sub-rectangle drawn over whatever the
//! previous frames left behind. Comparing raw frame buffers would therefore
//! report changes that are invisible, so every frame is composited onto a
//! persistent canvas and the full canvas is what gets compared.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use gif::{ColorOutput, DecodeOptions, DisposalMethod, Repeat};

use crate::error::{GifError, GifResult};

/// How many times an animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCount {
    /// Loops forever.
    Infinite,
    /// Repeats the given number of extra times.
    Finite(u16),
}

impl From<Repeat> for LoopCount {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Infinite => LoopCount::Infinite,
            Repeat::Finite(n) => LoopCount::Finite(n),
        }
    }
}

impl From<LoopCount> for Repeat {
    fn from(count: LoopCount) -> Self {
        match count {
            LoopCount::Infinite => Repeat::Infinite,
            LoopCount::Finite(n) => Repeat::Finite(n),
        }
    }
}

/// One fully composited animation frame.
#[derive(Debug, Clone)]
pub struct Frame {
    rgba: Vec<u8>,
    digest: blake3::Hash,
    /// Display duration in milliseconds.
    pub duration_ms: u32,
}

impl Frame {
    /// Creates a frame from a composited RGBA canvas.
    pub fn new(rgba: Vec<u8>, duration_ms: u32) -> Self {
        let digest = blake3::hash(&rgba);
        Self {
            rgba,
            digest,
            duration_ms,
        }
    }

    /// RGBA pixels of the canvas, row major.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Whether two frames show exactly the same pixels.
    pub fn same_content(&self, other: &Frame) -> bool {
        self.digest == other.digest
    }
}

/// A decoded animation.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    /// Canvas width in pixels.
    pub width: u16,
    /// Canvas height in pixels.
    pub height: u16,
    /// Loop count of the source file.
    pub loop_count: LoopCount,
    /// Frames in display order.
    pub frames: Vec<Frame>,
}

impl FrameSequence {
    /// Creates a sequence from already composited frames.
    pub fn new(width: u16, height: u16, loop_count: LoopCount, frames: Vec<Frame>) -> Self {
        Self {
            width,
            height,
            loop_count,
            frames,
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of every frame's display duration in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_ms as u64).sum()
    }
}

/// Decodes a GIF file from disk.
pub fn decode_file(path: &Path) -> GifResult<FrameSequence> {
    let file = File::open(path).map_err(|source| GifError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let sequence = decode(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        frames = sequence.len(),
        width = sequence.width,
        height = sequence.height,
        "decoded animation"
    );
    Ok(sequence)
}

/// Decodes a GIF stream into composited frames.
pub fn decode<R: Read>(reader: R) -> GifResult<FrameSequence> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);
    let mut decoder = options.read_info(reader)?;

    let width = decoder.width();
    let height = decoder.height();
    if width == 0 || height == 0 {
        return Err(GifError::NoFrames);
    }

    let mut canvas = Canvas::new(width, height);
    let mut frames = Vec::new();

    while let Some(frame) = decoder.read_next_frame()? {
        let rect = Rect {
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
        };
        let restore = (frame.dispose == DisposalMethod::Previous).then(|| canvas.pixels.clone());

        canvas.draw(rect, &frame.buffer);
        frames.push(Frame::new(
            canvas.pixels.clone(),
            u32::from(frame.delay) * 10,
        ));

        match frame.dispose {
            DisposalMethod::Background => canvas.clear(rect),
            DisposalMethod::Previous => {
                if let Some(previous) = restore {
                    canvas.pixels = previous;
                }
            }
            DisposalMethod::Any | DisposalMethod::Keep => {}
        }
    }

    if frames.is_empty() {
        return Err(GifError::NoFrames);
    }

    // The loop extension may follow the first frame, so read it last.
    let loop_count = LoopCount::from(decoder.repeat());

    Ok(FrameSequence::new(width, height, loop_count, frames))
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
}

struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u16, height: u16) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// Blits an RGBA sub-image; fully transparent pixels leave the canvas as is.
    fn draw(&mut self, rect: Rect, buffer: &[u8]) {
        let src_width = rect.width as usize;
        for row in 0..rect.height as usize {
            let y = rect.top as usize + row;
            if y >= self.height {
                break;
            }
            for col in 0..src_width {
                let x = rect.left as usize + col;
                if x >= self.width {
                    break;
                }
                let src = (row * src_width + col) * 4;
                let Some(pixel) = buffer.get(src..src + 4) else {
                    return;
                };
                if pixel[3] == 0 {
                    continue;
                }
                let dst = (y * self.width + x) * 4;
                self.pixels[dst..dst + 4].copy_from_slice(pixel);
            }
        }
    }

    fn clear(&mut self, rect: Rect) {
        let bottom = (rect.top as usize + rect.height as usize).min(self.height);
        let right = (rect.left as usize + rect.width as usize).min(self.width);
        for y in rect.top as usize..bottom {
            for x in rect.left as usize..right {
                let dst = (y * self.width + x) * 4;
                self.pixels[dst..dst + 4].fill(0);
            }
        }
    }
}
