//! Archive writing boundary and its stored-zip implementation

use crate::Result;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Destination for bundle entries, written in the order they are added
pub trait ArchiveSink {
    /// Adds one file entry at `path` (forward-slash separated)
    fn add_file(&mut self, path: &str, data: &[u8]) -> Result<()>;

    /// Finalizes the archive and returns its bytes
    fn finish(self) -> Result<Vec<u8>>;
}

/// In-memory zip archive whose entries are all stored uncompressed
///
/// Boot animation players map frames straight out of the archive, so
/// entries must not be deflated.
pub struct StoredZipSink {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl StoredZipSink {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        }
    }
}

impl Default for StoredZipSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSink for StoredZipSink {
    fn add_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        self.writer.start_file(path, self.options)?;
        self.writer.write_all(data)?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}
