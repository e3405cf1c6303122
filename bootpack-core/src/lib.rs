//! Bootpack Core Library
//!
//! This library provides the frame model, letterbox resizing, frame timing
//! rules and the `desc.txt` playback descriptor shared by the encoder and
//! decoder halves of bootpack.

pub mod bundle;
pub mod codec;
pub mod descriptor;
pub mod frame;
pub mod naming;
pub mod resize;
pub mod timing;

pub use bundle::{AnimationBundle, FrameFile, PartFolder};
pub use codec::SequenceCodec;
pub use descriptor::{PartDirective, PartKind, PlaybackDescriptor};
pub use frame::{FrameSequence, PixelFrame};
pub use naming::{BundleMode, InputKind};
pub use resize::{fit, fit_sequence, Dimensions};

/// Result type for bootpack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification shared by every bootpack crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input: paths, dimension strings, mode selectors
    InvalidInput,
    /// Corrupt or empty animated image or archive content
    Decode,
    /// Encoding failed, including empty sequences
    Encode,
    /// Archive cannot be opened, written or holds no recoverable frames
    Archive,
    /// Descriptor text that cannot be defaulted
    Format,
}

/// Error types for bootpack-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid animation mode: {0}")]
    InvalidMode(String),

    #[error("Frame sequence is empty")]
    EmptySequence,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Descriptor format error: {0}")]
    Format(String),
}

impl Error {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDimensions(_) | Error::InvalidMode(_) => ErrorKind::InvalidInput,
            Error::Decode(_) => ErrorKind::Decode,
            Error::EmptySequence | Error::Encode(_) => ErrorKind::Encode,
            Error::Format(_) => ErrorKind::Format,
        }
    }
}
