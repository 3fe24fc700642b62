//! Container (ZIP) access
//!
//! Office documents are ZIP archives. Entries are read strictly one at a
//! time in archive order, and only entries accepted by the caller's
//! filter are buffered.

use std::io::{Cursor, Read, Seek};

use tracing::debug;
use zip::read::ZipArchive;

use crate::error::Result;

/// One selected container entry, decoded as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Entry path inside the container
    pub path: String,
    /// Entry content (lossy UTF-8)
    pub content: String,
}

impl ExtractedFile {
    /// Create a new extracted file
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Read every entry accepted by `filter`, in container order
pub fn extract_files<F>(bytes: &[u8], filter: F) -> Result<Vec<ExtractedFile>>
where
    F: Fn(&str) -> bool,
{
    extract_files_from_reader(Cursor::new(bytes), filter)
}

/// Read every entry accepted by `filter` from any seekable reader
pub fn extract_files_from_reader<R, F>(reader: R, filter: F) -> Result<Vec<ExtractedFile>>
where
    R: Read + Seek,
    F: Fn(&str) -> bool,
{
    let mut archive = ZipArchive::new(reader)?;
    let mut files = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();

        if name.ends_with('/') || !filter(&name) {
            continue;
        }

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        debug!(entry = %name, bytes = contents.len(), "buffered container entry");
        files.push(ExtractedFile {
            path: name,
            content: String::from_utf8_lossy(&contents).into_owned(),
        });
    }

    Ok(files)
}

/// List entry names without buffering their content
pub fn entry_names(bytes: &[u8]) -> Result<Vec<String>> {
    let archive = ZipArchive::new(Cursor::new(bytes))?;
    Ok(archive.file_names().map(str::to_string).collect())
}
