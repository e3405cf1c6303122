//! Packs a frame sequence into a boot animation bundle

use crate::archive_sink::{ArchiveSink, StoredZipSink};
use crate::staging::StagingArea;
use crate::{BundleConfig, Result};
use bootpack_core::naming::{frame_file_name, index_width};
use bootpack_core::timing::{rate_from_duration, DEFAULT_FRAME_DURATION_MS};
use bootpack_core::{
    AnimationBundle, BundleMode, Error as CoreError, FrameFile, FrameSequence, PartDirective,
    PixelFrame, PlaybackDescriptor,
};
use image::ImageFormat;
use std::fs;
use std::io::Cursor;

/// Folder holding every frame of the sequence
pub const MAIN_PART: &str = "part0";

/// Folder holding the single held frame in [`BundleMode::Fixed`]
pub const HOLD_PART: &str = "part1";

const FRAME_EXTENSION: &str = "png";

/// Builds bundle layouts and archives from frame sequences
#[derive(Debug, Clone, Default)]
pub struct BundleBuilder {
    config: BundleConfig,
}

impl BundleBuilder {
    /// Creates a builder with the given configuration
    pub fn new(config: BundleConfig) -> Self {
        Self { config }
    }

    /// Packs `sequence` into a stored zip archive
    pub fn build(&self, sequence: &FrameSequence, mode: BundleMode) -> Result<Vec<u8>> {
        self.build_into(sequence, mode, StoredZipSink::new())
    }

    /// Packs `sequence` into the given archive sink
    pub fn build_into<A: ArchiveSink>(
        &self,
        sequence: &FrameSequence,
        mode: BundleMode,
        sink: A,
    ) -> Result<Vec<u8>> {
        let bundle = self.layout(sequence, mode)?;
        let bytes = self.pack(&bundle, sink)?;
        tracing::info!(
            mode = %mode,
            frames = sequence.len(),
            parts = bundle.parts().len(),
            bytes = bytes.len(),
            "built boot animation bundle"
        );
        Ok(bytes)
    }

    /// Lays out part folders and the descriptor for `sequence`
    pub fn layout(&self, sequence: &FrameSequence, mode: BundleMode) -> Result<AnimationBundle> {
        let last = sequence.last().ok_or(CoreError::EmptySequence)?;

        let reference_ms = sequence
            .reference_duration_ms()
            .unwrap_or(DEFAULT_FRAME_DURATION_MS);
        let mut descriptor = PlaybackDescriptor::new(
            sequence.width(),
            sequence.height(),
            rate_from_duration(reference_ms),
        );

        let file_count = match mode {
            BundleMode::Loop => sequence.len(),
            BundleMode::Fixed => sequence.len() + 1,
        };
        let width = index_width(file_count, self.config.min_index_width);

        let mut bundle = AnimationBundle::new(None);
        let main = bundle.part_mut(MAIN_PART);
        for (i, frame) in sequence.frames().iter().enumerate() {
            main.insert(self.frame_file(frame, i + 1, width)?);
        }

        match mode {
            BundleMode::Loop => {
                descriptor.push_part(PartDirective::new(0, 0, MAIN_PART))?;
            }
            BundleMode::Fixed => {
                bundle
                    .part_mut(HOLD_PART)
                    .insert(self.frame_file(last, sequence.len() + 1, width)?);
                descriptor.push_part(PartDirective::new(1, 0, MAIN_PART))?;
                descriptor.push_part(PartDirective::new(0, 0, HOLD_PART))?;
            }
        }

        bundle.descriptor = Some(descriptor);
        Ok(bundle)
    }

    /// Stages `bundle` on disk and writes it into `sink` in archive order
    ///
    /// The staging area is removed whether or not packing succeeds.
    pub fn pack<A: ArchiveSink>(&self, bundle: &AnimationBundle, mut sink: A) -> Result<Vec<u8>> {
        let staging = StagingArea::new()?;
        staging.stage(bundle)?;

        for entry in staging.entries()? {
            let data = fs::read(&entry.path)?;
            tracing::debug!(path = %entry.archive_path, bytes = data.len(), "adding entry");
            sink.add_file(&entry.archive_path, &data)?;
        }

        let bytes = sink.finish()?;
        staging.close()?;
        Ok(bytes)
    }

    fn frame_file(&self, frame: &PixelFrame, index: usize, width: usize) -> Result<FrameFile> {
        let mut data = Vec::new();
        frame
            .image
            .write_to(&mut Cursor::new(&mut data), ImageFormat::Png)?;
        let name = frame_file_name(&self.config.frame_prefix, index, width, FRAME_EXTENSION);
        Ok(FrameFile::new(name, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootpack_core::ErrorKind;
    use image::{Rgb, RgbImage};
    use std::io::Read;
    use zip::{CompressionMethod, ZipArchive};

    fn sequence(count: usize, duration_ms: u32) -> FrameSequence {
        FrameSequence::from_frames(
            (0..count)
                .map(|i| {
                    PixelFrame::new(RgbImage::from_pixel(2, 2, Rgb([i as u8, 0, 0])), duration_ms)
                })
                .collect(),
        )
        .unwrap()
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let file = archive.by_index(i).unwrap();
                assert_eq!(file.compression(), CompressionMethod::Stored);
                file.name().to_string()
            })
            .collect()
    }

    fn descriptor_text(bytes: Vec<u8>) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut text = String::new();
        archive
            .by_name("desc.txt")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_loop_layout() {
        let bytes = BundleBuilder::default()
            .build(&sequence(3, 100), BundleMode::Loop)
            .unwrap();

        assert_eq!(descriptor_text(bytes.clone()), "2 2 10\np 0 0 part0\n");
        assert_eq!(
            entry_names(bytes),
            vec!["desc.txt", "part0/b001.png", "part0/b002.png", "part0/b003.png"]
        );
    }

    #[test]
    fn test_fixed_layout() {
        let builder = BundleBuilder::default();
        let frames = sequence(3, 40);
        let bundle = builder.layout(&frames, BundleMode::Fixed).unwrap();

        assert_eq!(bundle.parts().len(), 2);
        let hold = bundle.part(HOLD_PART).unwrap();
        assert_eq!(hold.files().len(), 1);
        assert_eq!(hold.files()[0].name, "b004.png");
        assert_eq!(
            hold.files()[0].data,
            bundle.part(MAIN_PART).unwrap().files()[2].data
        );

        let bytes = builder.build(&frames, BundleMode::Fixed).unwrap();
        assert_eq!(descriptor_text(bytes.clone()), "2 2 25\np 1 0 part0\np 0 0 part1\n");
        assert_eq!(entry_names(bytes).last().unwrap(), "part1/b004.png");
    }

    #[test]
    fn test_rate_derivation() {
        let bundle = BundleBuilder::default()
            .layout(&sequence(2, 100), BundleMode::Loop)
            .unwrap();
        assert_eq!(bundle.descriptor.unwrap().rate, Some(10));
    }

    #[test]
    fn test_wide_sequences_keep_sort_order() {
        let bundle = BundleBuilder::default()
            .layout(&sequence(1000, 100), BundleMode::Fixed)
            .unwrap();

        let main = bundle.part(MAIN_PART).unwrap();
        assert_eq!(main.files()[0].name, "b0001.png");
        assert_eq!(main.files()[999].name, "b1000.png");
        assert_eq!(bundle.part(HOLD_PART).unwrap().files()[0].name, "b1001.png");
    }

    #[test]
    fn test_empty_sequence() {
        let err = BundleBuilder::default()
            .build(&FrameSequence::new(2, 2), BundleMode::Loop)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Core(CoreError::EmptySequence)));
        assert_eq!(err.kind(), ErrorKind::Encode);
    }

    #[test]
    fn test_custom_prefix() {
        let builder = BundleBuilder::new(BundleConfig {
            frame_prefix: "frame".to_string(),
            min_index_width: 5,
        });
        let bundle = builder.layout(&sequence(1, 100), BundleMode::Loop).unwrap();
        assert_eq!(bundle.part(MAIN_PART).unwrap().files()[0].name, "frame00001.png");
    }
}
