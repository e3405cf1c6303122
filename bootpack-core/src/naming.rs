//! Input classification, packaging modes and file naming conventions

use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Extensions recognised as still frame images inside a bundle
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Kind of file handed to the converter, decided once from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    AnimatedImage,
    Archive,
    Unknown,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Self {
        match extension_lowercase(path).as_deref() {
            Some("gif") => InputKind::AnimatedImage,
            Some("zip") => InputKind::Archive,
            _ => InputKind::Unknown,
        }
    }
}

/// How a frame sequence is laid out into part folders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleMode {
    /// One part looping forever
    Loop,
    /// Play once, then hold the last frame
    Fixed,
}

impl BundleMode {
    /// Suffix used in the archive file name
    pub fn suffix(self) -> &'static str {
        match self {
            BundleMode::Loop => "loop",
            BundleMode::Fixed => "fixed",
        }
    }
}

impl FromStr for BundleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "loop" => Ok(BundleMode::Loop),
            "2" | "fixed" => Ok(BundleMode::Fixed),
            other => Err(Error::InvalidMode(format!(
                "'{}' (use 'loop' or 1, 'fixed' or 2)",
                other
            ))),
        }
    }
}

impl fmt::Display for BundleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Whether a bundle entry name looks like a still frame image
pub fn is_frame_file(name: &str) -> bool {
    extension_lowercase(Path::new(name))
        .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.as_str()))
}

/// Digits needed so that `count` frame names sort lexicographically
pub fn index_width(count: usize, min_width: usize) -> usize {
    count.max(1).to_string().len().max(min_width)
}

/// Frame file name such as `b001.png`; `index` starts at 1
pub fn frame_file_name(prefix: &str, index: usize, width: usize, extension: &str) -> String {
    format!("{}{:0width$}.{}", prefix, index, extension, width = width)
}

/// `<stem>_<width>x<height>.<ext>`
pub fn resized_name(stem: &str, width: u32, height: u32, extension: &str) -> String {
    format!("{}_{}x{}.{}", stem, width, height, extension)
}

/// `<stem>-loop.zip` or `<stem>-fixed.zip`
pub fn bundle_name(stem: &str, mode: BundleMode) -> String {
    format!("{}-{}.zip", stem, mode.suffix())
}

/// `<stem>-fps<rate>.<ext>`
pub fn recovered_name(stem: &str, rate: u32, extension: &str) -> String {
    format!("{}-fps{}.{}", stem, rate, extension)
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
