//! Bootpack Encoder Library
//!
//! This library decodes and encodes animated GIFs and packs frame sequences
//! into boot animation bundles (stored zip archives).

pub mod archive_sink;
pub mod bundle_builder;
pub mod gif_codec;
pub mod staging;

pub use archive_sink::{ArchiveSink, StoredZipSink};
pub use bundle_builder::BundleBuilder;
pub use gif_codec::GifCodec;
pub use staging::StagingArea;

use bootpack_core::timing::DEFAULT_FRAME_DURATION_MS;
use bootpack_core::ErrorKind;

/// Result type for bootpack-encoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bootpack-encoder operations
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
}

impl Error {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(err) => err.kind(),
            Error::Io(_) | Error::Zip(_) => ErrorKind::Archive,
            Error::Image(_) => ErrorKind::Encode,
        }
    }
}

/// GIF codec configuration
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Duration given to frames whose delay is missing or zero
    pub default_frame_duration_ms: u32,
    /// Color quantization speed (1-30, lower is slower and better)
    pub quantize_speed: i32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            quantize_speed: 10,
        }
    }
}

/// Bundle layout configuration
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Prefix of every frame file name
    pub frame_prefix: String,
    /// Minimum number of digits in frame file names
    pub min_index_width: usize,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            frame_prefix: "b".to_string(),
            min_index_width: 3,
        }
    }
}
