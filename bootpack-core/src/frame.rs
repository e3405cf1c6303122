//! Frame data structures shared by every conversion path

use crate::{Error, Result};
use image::{Rgb, RgbImage, RgbaImage};

/// A single decoded raster frame plus its display duration
#[derive(Debug, Clone, PartialEq)]
pub struct PixelFrame {
    /// RGB pixel buffer
    pub image: RgbImage,
    /// Display duration in milliseconds (always at least 1)
    pub duration_ms: u32,
}

impl PixelFrame {
    /// Creates a new frame, clamping the duration to at least 1ms
    pub fn new(image: RgbImage, duration_ms: u32) -> Self {
        Self {
            image,
            duration_ms: duration_ms.max(1),
        }
    }

    /// Creates a frame from an RGBA buffer by compositing it over black
    pub fn from_rgba(image: &RgbaImage, duration_ms: u32) -> Self {
        Self::new(flatten_rgba(image), duration_ms)
    }

    /// Width of the frame in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the frame in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// An ordered list of frames sharing one canvas size
///
/// Order is playback order. Every frame must match the canvas dimensions,
/// which `push` enforces.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    width: u32,
    height: u32,
    frames: Vec<PixelFrame>,
}

impl FrameSequence {
    /// Creates an empty sequence for the given canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }

    /// Builds a sequence from frames, taking the canvas from the first frame
    pub fn from_frames(frames: Vec<PixelFrame>) -> Result<Self> {
        let first = frames.first().ok_or(Error::EmptySequence)?;
        let mut sequence = Self::new(first.width(), first.height());
        sequence.frames.reserve(frames.len());
        for frame in frames {
            sequence.push(frame)?;
        }
        Ok(sequence)
    }

    /// Appends a frame, rejecting frames that do not match the canvas
    pub fn push(&mut self, frame: PixelFrame) -> Result<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(Error::InvalidDimensions(format!(
                "frame is {}x{} but canvas is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frames(&self) -> &[PixelFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&PixelFrame> {
        self.frames.last()
    }

    /// Sequence-level frame duration: the first frame's duration
    pub fn reference_duration_ms(&self) -> Option<u32> {
        self.frames.first().map(|f| f.duration_ms)
    }

    /// Total playback time of one pass in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_ms as u64).sum()
    }
}

/// Composites an RGBA image over an opaque black background
pub fn flatten_rgba(image: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(out.pixels_mut()) {
        let alpha = src[3] as u32;
        *dst = Rgb([
            ((src[0] as u32 * alpha + 127) / 255) as u8,
            ((src[1] as u32 * alpha + 127) / 255) as u8,
            ((src[2] as u32 * alpha + 127) / 255) as u8,
        ]);
    }
    out
}
