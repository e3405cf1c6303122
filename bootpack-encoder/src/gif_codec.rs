//! Animated GIF decoding and encoding

use crate::CodecConfig;
use bootpack_core::{Error, FrameSequence, PixelFrame, Result, SequenceCodec};
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay, DynamicImage, Frame};
use std::io::Cursor;

/// GIF implementation of [`SequenceCodec`]
#[derive(Debug, Clone, Default)]
pub struct GifCodec {
    config: CodecConfig,
}

impl GifCodec {
    /// Creates a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    fn frame_duration(&self, delay: Delay) -> u32 {
        let (numer, denom) = delay.numer_denom_ms();
        let duration_ms = if denom == 0 {
            0
        } else {
            (numer as f64 / denom as f64).round() as u32
        };
        if duration_ms == 0 {
            self.config.default_frame_duration_ms
        } else {
            duration_ms
        }
    }
}

impl SequenceCodec for GifCodec {
    fn extension(&self) -> &'static str {
        "gif"
    }

    fn decode(&self, bytes: &[u8]) -> Result<FrameSequence> {
        if bytes.is_empty() {
            return Err(Error::Decode("GIF input is empty".to_string()));
        }

        let decoder = GifDecoder::new(Cursor::new(bytes))
            .map_err(|e| Error::Decode(format!("GIF header: {}", e)))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| Error::Decode(format!("GIF frame: {}", e)))?;

        let frames: Vec<PixelFrame> = frames
            .iter()
            .map(|frame| PixelFrame::from_rgba(frame.buffer(), self.frame_duration(frame.delay())))
            .collect();

        let sequence = FrameSequence::from_frames(frames).map_err(|e| match e {
            Error::EmptySequence => Error::Decode("GIF contains no frames".to_string()),
            other => other,
        })?;

        tracing::debug!(
            frames = sequence.len(),
            width = sequence.width(),
            height = sequence.height(),
            "decoded GIF"
        );
        Ok(sequence)
    }

    fn encode(
        &self,
        sequence: &FrameSequence,
        duration_override_ms: Option<u32>,
    ) -> Result<Vec<u8>> {
        if sequence.is_empty() {
            return Err(Error::EmptySequence);
        }

        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, self.config.quantize_speed);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| Error::Encode(e.to_string()))?;

            for frame in sequence.frames() {
                let duration_ms = duration_override_ms.unwrap_or(frame.duration_ms).max(1);
                let rgba = DynamicImage::ImageRgb8(frame.image.clone()).into_rgba8();
                let delay = Delay::from_numer_denom_ms(duration_ms, 1);
                encoder
                    .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                    .map_err(|e| Error::Encode(e.to_string()))?;
            }
        }

        tracing::debug!(frames = sequence.len(), bytes = bytes.len(), "encoded GIF");
        Ok(bytes)
    }
}
