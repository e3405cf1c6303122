//! Archive reading boundary and its zip implementation

use crate::Result;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// One file entry pulled out of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Forward-slash separated path relative to the archive root
    pub path: String,
    pub data: Vec<u8>,
}

/// Source of bundle entries
pub trait ArchiveSource {
    /// Returns every readable file entry; directories are left out
    fn entries(&mut self) -> Result<Vec<ArchiveEntry>>;
}

/// Zip archive source, stored or deflated
pub struct ZipSource<R> {
    archive: ZipArchive<R>,
}

impl<'a> ZipSource<Cursor<&'a [u8]>> {
    /// Opens an in-memory zip archive
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        Self::new(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> ArchiveSource for ZipSource<R> {
    fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let mut file = match self.archive.by_index(i) {
                Ok(file) => file,
                Err(err) => {
                    tracing::warn!(index = i, %err, "skipping unreadable archive entry");
                    continue;
                }
            };
            if file.is_dir() {
                continue;
            }

            let path = normalize_path(file.name());
            // declared sizes come from the archive and may lie
            let mut data = Vec::new();
            if let Err(err) = file.read_to_end(&mut data) {
                tracing::warn!(%path, %err, "skipping unreadable archive entry");
                continue;
            }
            entries.push(ArchiveEntry { path, data });
        }
        Ok(entries)
    }
}

/// Uses forward slashes and drops leading `/` and `./`
fn normalize_path(name: &str) -> String {
    let name = name.replace('\\', "/");
    let mut trimmed = name.as_str();
    loop {
        if let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            trimmed = rest;
        } else {
            break;
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("part0/b001.png"), "part0/b001.png");
        assert_eq!(normalize_path("./part0/b001.png"), "part0/b001.png");
        assert_eq!(normalize_path("/desc.txt"), "desc.txt");
        assert_eq!(normalize_path("part0\\b001.png"), "part0/b001.png");
    }

    #[test]
    fn test_entries_skip_directories() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.add_directory("part0/", options).unwrap();
        writer.start_file("part0/b001.png", options).unwrap();
        writer.write_all(b"frame").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let mut source = ZipSource::from_bytes(&bytes).unwrap();
        assert_eq!(source.len(), 2);
        let entries = source.entries().unwrap();
        assert_eq!(
            entries,
            vec![ArchiveEntry {
                path: "part0/b001.png".to_string(),
                data: b"frame".to_vec(),
            }]
        );
    }

    /// Rewrites the central directory uncompressed size of `name`
    fn patch_declared_size(bytes: &mut [u8], name: &str, size: u32) {
        let mut offset = 0;
        while offset + 46 <= bytes.len() {
            if bytes[offset..offset + 4] == [0x50, 0x4b, 0x01, 0x02] {
                let name_len = u16::from_le_bytes([bytes[offset + 28], bytes[offset + 29]]) as usize;
                let end = offset + 46 + name_len;
                if end <= bytes.len() && &bytes[offset + 46..end] == name.as_bytes() {
                    bytes[offset + 24..offset + 28].copy_from_slice(&size.to_le_bytes());
                    return;
                }
            }
            offset += 1;
        }
        panic!("no central directory entry for {name}");
    }

    #[test]
    fn test_lying_declared_size_is_not_trusted() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file("desc.txt", options).unwrap();
        writer.write_all(b"1 1 10\n").unwrap();
        writer.start_file("part0/b001.png", options).unwrap();
        writer.write_all(b"tiny").unwrap();
        let mut bytes = writer.finish().unwrap().into_inner();
        patch_declared_size(&mut bytes, "part0/b001.png", 0xFFFF_FFF0);

        // either the archive or the entry is rejected; nothing is sized from the header
        if let Ok(mut source) = ZipSource::from_bytes(&bytes) {
            let entries = source.entries().unwrap();
            assert!(entries.iter().all(|e| e.data.len() < 1024));
        }
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(ZipSource::from_bytes(b"definitely not a zip").is_err());
    }
}
