//! Scoped on-disk staging area used while assembling a bundle

use crate::Result;
use bootpack_core::descriptor::DESCRIPTOR_NAME;
use bootpack_core::{AnimationBundle, PartFolder};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A staged file and the archive path it will be stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    pub archive_path: String,
    pub path: PathBuf,
}

/// Temporary directory mirroring the archive layout
///
/// The directory and everything staged in it is removed when the value is
/// dropped, including on early error returns.
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Creates an empty staging directory under the system temp dir
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("bootpack-").tempdir()?;
        tracing::debug!(path = %dir.path().display(), "created staging area");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes the descriptor and every part folder of `bundle`
    pub fn stage(&self, bundle: &AnimationBundle) -> Result<()> {
        if let Some(descriptor) = &bundle.descriptor {
            fs::write(self.path().join(DESCRIPTOR_NAME), descriptor.to_text())?;
        }
        for part in bundle.parts() {
            self.stage_part(part)?;
        }
        Ok(())
    }

    fn stage_part(&self, part: &PartFolder) -> Result<()> {
        let folder = self.path().join(&part.name);
        fs::create_dir_all(&folder)?;
        for file in part.files() {
            fs::write(folder.join(&file.name), &file.data)?;
        }
        tracing::debug!(part = %part.name, files = part.len(), "staged part folder");
        Ok(())
    }

    /// Lists staged files in archive order
    ///
    /// `desc.txt` comes first, then folders in lexicographic order with their
    /// files in lexicographic order. Directory listing order is never trusted.
    pub fn entries(&self) -> Result<Vec<StagedEntry>> {
        let mut entries = Vec::new();

        let descriptor = self.path().join(DESCRIPTOR_NAME);
        if descriptor.is_file() {
            entries.push(StagedEntry {
                archive_path: DESCRIPTOR_NAME.to_string(),
                path: descriptor,
            });
        }

        for folder in sorted_children(self.path(), |p| p.is_dir())? {
            for file in sorted_children(&self.path().join(&folder), |p| p.is_file())? {
                entries.push(StagedEntry {
                    archive_path: format!("{}/{}", folder, file),
                    path: self.path().join(&folder).join(&file),
                });
            }
        }

        Ok(entries)
    }

    /// Removes the staging directory, reporting any failure
    pub fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}

fn sorted_children(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !keep(&entry.path()) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    Ok(names)
}
