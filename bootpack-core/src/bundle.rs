//! Part folders and the bundle they form inside an archive

use crate::descriptor::{PlaybackDescriptor, DESCRIPTOR_NAME};

/// One encoded frame image inside a part folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFile {
    /// File name inside the folder, e.g. `b001.png`
    pub name: String,
    /// Encoded image bytes
    pub data: Vec<u8>,
}

impl FrameFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A named group of frame files, kept in lexicographic file name order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartFolder {
    pub name: String,
    files: Vec<FrameFile>,
}

impl PartFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    /// Inserts a file at its sorted position; a file with the same name is replaced
    pub fn insert(&mut self, file: FrameFile) {
        match self
            .files
            .binary_search_by(|f| f.name.as_bytes().cmp(file.name.as_bytes()))
        {
            Ok(index) => self.files[index] = file,
            Err(index) => self.files.insert(index, file),
        }
    }

    /// Files in lexicographic name order
    pub fn files(&self) -> &[FrameFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Archive path of a file in this folder: `<folder>/<file>`
    pub fn entry_path(&self, file: &FrameFile) -> String {
        format!("{}/{}", self.name, file.name)
    }
}

/// Descriptor plus part folders, with folders kept in lexicographic name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationBundle {
    pub descriptor: Option<PlaybackDescriptor>,
    parts: Vec<PartFolder>,
}

impl AnimationBundle {
    pub fn new(descriptor: Option<PlaybackDescriptor>) -> Self {
        Self {
            descriptor,
            parts: Vec::new(),
        }
    }

    /// Returns the folder with the given name, creating it in sorted position
    pub fn part_mut(&mut self, name: &str) -> &mut PartFolder {
        let index = match self
            .parts
            .binary_search_by(|p| p.name.as_bytes().cmp(name.as_bytes()))
        {
            Ok(index) => index,
            Err(index) => {
                self.parts.insert(index, PartFolder::new(name));
                index
            }
        };
        &mut self.parts[index]
    }

    /// Folders in lexicographic name order
    pub fn parts(&self) -> &[PartFolder] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&PartFolder> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Total number of frame files across all folders
    pub fn frame_count(&self) -> usize {
        self.parts.iter().map(PartFolder::len).sum()
    }

    /// Folders present in the bundle but not named by any directive
    pub fn unreferenced_parts(&self) -> Vec<&str> {
        let Some(descriptor) = &self.descriptor else {
            return Vec::new();
        };
        self.parts
            .iter()
            .filter(|p| descriptor.part(&p.name).is_none())
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Directives whose folder is missing from the bundle
    pub fn missing_parts(&self) -> Vec<&str> {
        let Some(descriptor) = &self.descriptor else {
            return Vec::new();
        };
        descriptor
            .parts()
            .iter()
            .filter(|d| self.part(&d.folder_name).is_none())
            .map(|d| d.folder_name.as_str())
            .collect()
    }
}

/// Whether an archive path is the root descriptor
pub fn is_descriptor_path(path: &str) -> bool {
    path == DESCRIPTOR_NAME
}
