//! Bootpack Decoder Library
//!
//! This library reads boot animation bundles back into a single playback
//! ordered frame sequence.

pub mod archive_source;
pub mod bundle_reader;
pub mod frame_decoder;

pub use archive_source::{ArchiveEntry, ArchiveSource, ZipSource};
pub use bundle_reader::{BundleReader, UnpackedBundle};

use bootpack_core::timing::DEFAULT_FRAME_DURATION_MS;
use bootpack_core::ErrorKind;

/// Result type for bootpack-decoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bootpack-decoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bootpack core error: {0}")]
    Core(#[from] bootpack_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive contains no usable frames")]
    NoFrames,
}

impl Error {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(err) => err.kind(),
            Error::Image(_) => ErrorKind::Decode,
            Error::Io(_) | Error::Zip(_) | Error::NoFrames => ErrorKind::Archive,
        }
    }
}

/// Bundle reader configuration
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Frame rate applied to every frame instead of the descriptor's
    pub fps_override: Option<u32>,
    /// Frame duration when neither an override nor a descriptor rate exists
    pub default_frame_duration_ms: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fps_override: None,
            default_frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
        }
    }
}
