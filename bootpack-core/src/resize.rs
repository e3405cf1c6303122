//! Aspect-preserving resize with centered letterboxing

use crate::{Error, FrameSequence, PixelFrame, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::fmt;
use std::str::FromStr;

/// Target canvas size, parsed from a `WIDTHxHEIGHT` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Creates dimensions, rejecting zero-sized targets
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "{}x{} must be positive",
                width, height
            )));
        }
        Ok(Self { width, height })
    }
}

impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::InvalidDimensions(format!(
                "'{}' does not match WIDTHxHEIGHT (e.g. '1920x1200')",
                s
            ))
        };

        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: i64 = width.trim().parse().map_err(|_| invalid())?;
        let height: i64 = height.trim().parse().map_err(|_| invalid())?;
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDimensions(format!(
                "{}x{} must be positive",
                width, height
            )));
        }

        let width = u32::try_from(width).map_err(|_| invalid())?;
        let height = u32::try_from(height).map_err(|_| invalid())?;
        Self::new(width, height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Size a source image takes inside the target once scaled to fit
fn scaled_size(src_width: u32, src_height: u32, width: u32, height: u32) -> (u32, u32) {
    let scale = f64::min(
        width as f64 / src_width as f64,
        height as f64 / src_height as f64,
    );
    let scaled_width = (src_width as f64 * scale).round() as u32;
    let scaled_height = (src_height as f64 * scale).round() as u32;
    (scaled_width.clamp(1, width), scaled_height.clamp(1, height))
}

/// Scales a frame to fit `width` x `height` and centers it on a black canvas
///
/// The result is always exactly `width` x `height`. The frame's duration is
/// kept.
pub fn fit(frame: &PixelFrame, width: u32, height: u32) -> Result<PixelFrame> {
    let target = Dimensions::new(width, height)?;
    if frame.width() == 0 || frame.height() == 0 {
        return Err(Error::InvalidDimensions("source frame is empty".to_string()));
    }

    let (scaled_width, scaled_height) =
        scaled_size(frame.width(), frame.height(), target.width, target.height);

    let scaled = if (scaled_width, scaled_height) == (frame.width(), frame.height()) {
        frame.image.clone()
    } else {
        imageops::resize(&frame.image, scaled_width, scaled_height, FilterType::Triangle)
    };

    if (scaled_width, scaled_height) == (target.width, target.height) {
        return Ok(PixelFrame::new(scaled, frame.duration_ms));
    }

    let x = (target.width - scaled_width) / 2;
    let y = (target.height - scaled_height) / 2;
    let mut canvas = RgbImage::from_pixel(target.width, target.height, Rgb([0, 0, 0]));
    imageops::replace(&mut canvas, &scaled, x as i64, y as i64);

    Ok(PixelFrame::new(canvas, frame.duration_ms))
}

/// Fits every frame of a sequence onto a new canvas, preserving order
pub fn fit_sequence(sequence: &FrameSequence, target: Dimensions) -> Result<FrameSequence> {
    let mut resized = FrameSequence::new(target.width, target.height);
    for frame in sequence.frames() {
        resized.push(fit(frame, target.width, target.height)?)?;
    }
    tracing::debug!(
        frames = resized.len(),
        from = %format!("{}x{}", sequence.width(), sequence.height()),
        to = %target,
        "resized sequence"
    );
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 40 % 256) as u8, (y * 40 % 256) as u8, 200])
        })
    }

    #[test]
    fn test_parse_dimensions() {
        let dims: Dimensions = "1920x1200".parse().unwrap();
        assert_eq!(dims, Dimensions { width: 1920, height: 1200 });
        assert_eq!(" 640X480 ".parse::<Dimensions>().unwrap().to_string(), "640x480");
    }

    #[test]
    fn test_parse_malformed_dimensions() {
        for input in ["abc", "1920", "x1200", "1920x", "0x100", "-5x10", "12.5x3"] {
            let err = input.parse::<Dimensions>().unwrap_err();
            assert!(matches!(err, Error::InvalidDimensions(_)), "{input}");
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_fit_rejects_zero_target() {
        let frame = PixelFrame::new(gradient(4, 4), 100);
        assert!(matches!(fit(&frame, 0, 10), Err(Error::InvalidDimensions(_))));
    }

    #[test]
    fn test_fit_output_size() {
        let frame = PixelFrame::new(gradient(7, 3), 50);
        for (w, h) in [(20, 20), (3, 9), (1, 1), (100, 13)] {
            let out = fit(&frame, w, h).unwrap();
            assert_eq!((out.width(), out.height()), (w, h));
            assert_eq!(out.duration_ms, 50);
        }
    }

    #[test]
    fn test_fit_same_aspect_has_no_border() {
        let frame = PixelFrame::new(RgbImage::from_pixel(4, 2, Rgb([255, 255, 255])), 100);
        let out = fit(&frame, 8, 4).unwrap();
        assert!(out.image.pixels().all(|p| p.0 != [0, 0, 0]));
    }

    #[test]
    fn test_fit_letterboxes_centered() {
        let frame = PixelFrame::new(RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])), 100);
        let out = fit(&frame, 6, 4).unwrap();

        // 2x2 scales to 4x4, offset 1 column on each side
        for y in 0..4 {
            assert_eq!(out.image.get_pixel(0, y), &Rgb([0, 0, 0]));
            assert_eq!(out.image.get_pixel(5, y), &Rgb([0, 0, 0]));
            for x in 1..5 {
                assert_eq!(out.image.get_pixel(x, y), &Rgb([255, 255, 255]));
            }
        }
    }

    #[test]
    fn test_fit_odd_gap_puts_extra_column_right() {
        let frame = PixelFrame::new(RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])), 100);
        let out = fit(&frame, 4, 1).unwrap();
        let row: Vec<_> = (0..4).map(|x| out.image.get_pixel(x, 0).0[0]).collect();
        assert_eq!(row, vec![0, 255, 0, 0]);
    }

    #[test]
    fn test_fit_same_size_is_identity() {
        let frame = PixelFrame::new(gradient(5, 3), 70);
        assert_eq!(fit(&frame, 5, 3).unwrap(), frame);
    }

    #[test]
    fn test_fit_sequence_preserves_order() {
        let sequence = FrameSequence::from_frames(vec![
            PixelFrame::new(RgbImage::from_pixel(2, 2, Rgb([10, 10, 10])), 10),
            PixelFrame::new(RgbImage::from_pixel(2, 2, Rgb([20, 20, 20])), 20),
        ])
        .unwrap();

        let out = fit_sequence(&sequence, Dimensions::new(4, 4).unwrap()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.frames()[0].image.get_pixel(1, 1), &Rgb([10, 10, 10]));
        assert_eq!(out.frames()[1].image.get_pixel(1, 1), &Rgb([20, 20, 20]));
        assert_eq!(out.frames()[1].duration_ms, 20);
    }
}
