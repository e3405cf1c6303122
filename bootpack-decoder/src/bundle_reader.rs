//! Boot animation bundle reader

use crate::archive_source::{ArchiveEntry, ArchiveSource, ZipSource};
use crate::frame_decoder::decode_frame;
use crate::{Error, ReaderConfig, Result};
use bootpack_core::bundle::is_descriptor_path;
use bootpack_core::naming::is_frame_file;
use bootpack_core::timing::{rate_from_duration, resolve_duration};
use bootpack_core::{fit, AnimationBundle, FrameFile, FrameSequence, PixelFrame, PlaybackDescriptor};

/// Result of unpacking a bundle
#[derive(Debug, Clone)]
pub struct UnpackedBundle {
    /// Parsed `desc.txt`, `None` when absent or unreadable
    pub descriptor: Option<PlaybackDescriptor>,
    /// Every frame in folder then file name order
    pub sequence: FrameSequence,
    /// Frame rate the uniform frame duration was derived from
    pub rate: u32,
}

/// Reads boot animation bundles back into frame sequences
///
/// Frames are concatenated folder by folder in lexicographic folder name
/// order, then file by file in lexicographic file name order. The order of
/// directives in `desc.txt` plays no part.
#[derive(Debug, Clone, Default)]
pub struct BundleReader {
    config: ReaderConfig,
}

impl BundleReader {
    /// Creates a reader with the given configuration
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Reads a zip archive from memory
    pub fn read(&self, bytes: &[u8]) -> Result<UnpackedBundle> {
        self.read_from(ZipSource::from_bytes(bytes)?)
    }

    /// Reads bundle entries from any archive source
    pub fn read_from<S: ArchiveSource>(&self, mut source: S) -> Result<UnpackedBundle> {
        let bundle = self.collect(source.entries()?);
        self.unpack(bundle)
    }

    /// Groups archive entries into a bundle
    ///
    /// Only `<folder>/<file>` entries with an image extension become frames.
    pub fn collect(&self, entries: Vec<ArchiveEntry>) -> AnimationBundle {
        let mut bundle = AnimationBundle::new(None);

        for entry in entries {
            if is_descriptor_path(&entry.path) {
                let text = String::from_utf8_lossy(&entry.data);
                match PlaybackDescriptor::parse(&text) {
                    Ok(descriptor) => bundle.descriptor = Some(descriptor),
                    Err(err) => tracing::warn!(%err, "ignoring unreadable desc.txt"),
                }
                continue;
            }

            let Some((folder, file)) = entry.path.split_once('/') else {
                tracing::debug!(path = %entry.path, "ignoring root entry");
                continue;
            };
            if folder.is_empty() || file.is_empty() || file.contains('/') {
                tracing::debug!(path = %entry.path, "ignoring nested entry");
                continue;
            }
            if !is_frame_file(file) {
                tracing::debug!(path = %entry.path, "ignoring non-image entry");
                continue;
            }

            let file = FrameFile::new(file, entry.data);
            bundle.part_mut(folder).insert(file);
        }

        for name in bundle.unreferenced_parts() {
            tracing::warn!(part = name, "folder is not named in desc.txt");
        }
        for name in bundle.missing_parts() {
            tracing::warn!(part = name, "desc.txt names a missing folder");
        }

        bundle
    }

    /// Decodes every frame of a collected bundle with a uniform duration
    ///
    /// The canvas is the first recovered frame's size; the size declared in
    /// `desc.txt` is never allocated. Unreadable frame files are skipped.
    /// Frames whose size differs from the canvas are letterboxed onto it.
    pub fn unpack(&self, bundle: AnimationBundle) -> Result<UnpackedBundle> {
        let descriptor_rate = bundle.descriptor.as_ref().and_then(|d| d.rate);
        let duration_ms = resolve_duration(
            self.config.fps_override,
            descriptor_rate,
            self.config.default_frame_duration_ms,
        );
        let rate = self
            .config
            .fps_override
            .filter(|fps| *fps > 0)
            .or(descriptor_rate)
            .unwrap_or_else(|| rate_from_duration(duration_ms));

        let mut sequence: Option<FrameSequence> = None;

        let mut skipped = 0usize;
        for part in bundle.parts() {
            for file in part.files() {
                let image = match decode_frame(&file.data) {
                    Ok(image) => image,
                    Err(err) => {
                        tracing::warn!(path = %part.entry_path(file), %err, "skipping unreadable frame");
                        skipped += 1;
                        continue;
                    }
                };

                let frame = PixelFrame::new(image, duration_ms);
                let sequence = sequence.get_or_insert_with(|| {
                    if let Some(d) = &bundle.descriptor {
                        if (d.width, d.height) != (frame.width(), frame.height()) {
                            tracing::warn!(
                                declared = %format!("{}x{}", d.width, d.height),
                                actual = %format!("{}x{}", frame.width(), frame.height()),
                                "desc.txt size differs from first frame, using the frame size"
                            );
                        }
                    }
                    FrameSequence::new(frame.width(), frame.height())
                });
                let (width, height) = (sequence.width(), sequence.height());
                if (frame.width(), frame.height()) == (width, height) {
                    sequence.push(frame)?;
                } else {
                    tracing::debug!(path = %part.entry_path(file), "letterboxing frame onto canvas");
                    sequence.push(fit(&frame, width, height)?)?;
                }
            }
        }

        let sequence = sequence.filter(|s| !s.is_empty()).ok_or(Error::NoFrames)?;

        tracing::info!(
            frames = sequence.len(),
            parts = bundle.parts().len(),
            skipped,
            rate,
            duration_ms,
            "unpacked boot animation bundle"
        );

        Ok(UnpackedBundle {
            descriptor: bundle.descriptor,
            sequence,
            rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootpack_core::ErrorKind;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, value: u8) -> Vec<u8> {
        let mut data = Vec::new();
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
            .write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
            .unwrap();
        data
    }

    fn entry(path: &str, data: Vec<u8>) -> ArchiveEntry {
        ArchiveEntry {
            path: path.to_string(),
            data,
        }
    }

    struct Entries(Vec<ArchiveEntry>);

    impl ArchiveSource for Entries {
        fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
            Ok(std::mem::take(&mut self.0))
        }
    }

    fn first_values(unpacked: &UnpackedBundle) -> Vec<u8> {
        unpacked
            .sequence
            .frames()
            .iter()
            .map(|f| f.image.get_pixel(0, 0).0[0])
            .collect()
    }

    #[test]
    fn test_order_ignores_directive_order() {
        let source = Entries(vec![
            entry("desc.txt", b"2 2 20\np 0 0 part1\np 1 0 part0\n".to_vec()),
            entry("part1/b002.png", png(2, 2, 4)),
            entry("part1/b001.png", png(2, 2, 3)),
            entry("part0/b010.png", png(2, 2, 2)),
            entry("part0/b009.png", png(2, 2, 1)),
        ]);

        let unpacked = BundleReader::default().read_from(source).unwrap();
        assert_eq!(first_values(&unpacked), vec![1, 2, 3, 4]);
        assert_eq!(unpacked.rate, 20);
        assert!(unpacked.sequence.frames().iter().all(|f| f.duration_ms == 50));
    }

    #[test]
    fn test_skips_noise_and_corrupt_frames() {
        let source = Entries(vec![
            entry("readme.png", png(2, 2, 9)),
            entry("part0/b001.png", png(2, 2, 1)),
            entry("part0/b002.png", b"corrupt".to_vec()),
            entry("part0/trim.txt", b"2x2+0+0".to_vec()),
            entry("part0/deep/b003.png", png(2, 2, 9)),
            entry("part0/b004.PNG", png(2, 2, 4)),
        ]);

        let unpacked = BundleReader::default().read_from(source).unwrap();
        assert!(unpacked.descriptor.is_none());
        assert_eq!(first_values(&unpacked), vec![1, 4]);
        assert_eq!(unpacked.rate, 10);
        assert_eq!(unpacked.sequence.frames()[0].duration_ms, 100);
    }

    #[test]
    fn test_fps_override_wins() {
        let reader = BundleReader::new(ReaderConfig {
            fps_override: Some(25),
            ..ReaderConfig::default()
        });
        let source = Entries(vec![
            entry("desc.txt", b"2 2 10\np 0 0 part0\n".to_vec()),
            entry("part0/b001.png", png(2, 2, 1)),
        ]);

        let unpacked = reader.read_from(source).unwrap();
        assert_eq!(unpacked.rate, 25);
        assert_eq!(unpacked.sequence.frames()[0].duration_ms, 40);
    }

    #[test]
    fn test_malformed_descriptor_is_tolerated() {
        let source = Entries(vec![
            entry("desc.txt", b"wide tall fast\n".to_vec()),
            entry("part0/b001.png", png(2, 2, 1)),
        ]);

        let unpacked = BundleReader::default().read_from(source).unwrap();
        assert!(unpacked.descriptor.is_none());
        assert_eq!(unpacked.sequence.len(), 1);
    }

    #[test]
    fn test_mismatched_frames_are_letterboxed() {
        let source = Entries(vec![
            entry("desc.txt", b"4 2 10\np 0 0 part0\n".to_vec()),
            entry("part0/b001.png", png(4, 2, 200)),
            entry("part0/b002.png", png(2, 2, 200)),
        ]);

        let unpacked = BundleReader::default().read_from(source).unwrap();
        let second = &unpacked.sequence.frames()[1].image;
        assert_eq!(second.dimensions(), (4, 2));
        assert_eq!(second.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(second.get_pixel(1, 0).0, [200, 200, 200]);
    }

    #[test]
    fn test_canvas_comes_from_first_frame() {
        let source = Entries(vec![
            entry("desc.txt", b"60000 60000 10\np 0 0 part0\n".to_vec()),
            entry("part0/b001.png", png(1, 1, 7)),
            entry("part0/b002.png", png(1, 1, 8)),
        ]);

        let unpacked = BundleReader::default().read_from(source).unwrap();
        assert_eq!((unpacked.sequence.width(), unpacked.sequence.height()), (1, 1));
        assert_eq!(first_values(&unpacked), vec![7, 8]);
        assert_eq!(unpacked.descriptor.unwrap().width, 60000);
    }

    #[test]
    fn test_no_frames() {
        let source = Entries(vec![
            entry("desc.txt", b"2 2 10\np 0 0 part0\n".to_vec()),
            entry("part0/b001.png", b"corrupt".to_vec()),
        ]);

        let err = BundleReader::default().read_from(source).unwrap_err();
        assert!(matches!(err, Error::NoFrames));
        assert_eq!(err.kind(), ErrorKind::Archive);
    }

    #[test]
    fn test_read_rejects_non_zip() {
        let err = BundleReader::default().read(b"nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Archive);
    }
}
