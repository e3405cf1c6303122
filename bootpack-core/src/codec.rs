//! Animated image codec boundary

use crate::{FrameSequence, Result};

/// Decodes and encodes a single-file animated image
///
/// Implementations fail with `Error::Decode` on corrupt or empty input and
/// with `Error::EmptySequence` when asked to encode no frames.
pub trait SequenceCodec {
    /// File extension of the encoded format, without the dot
    fn extension(&self) -> &'static str;

    /// Decodes every frame in playback order with its own duration
    fn decode(&self, bytes: &[u8]) -> Result<FrameSequence>;

    /// Encodes frames in order, looping forever
    ///
    /// `duration_override_ms` replaces every frame's duration when given.
    fn encode(&self, sequence: &FrameSequence, duration_override_ms: Option<u32>)
        -> Result<Vec<u8>>;
}
