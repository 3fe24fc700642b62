//! The seam between container formats and Markdown output

use tracing::debug;

use crate::config::Config;
use crate::container::{extract_files, ExtractedFile};
use crate::error::Result;
use crate::filter::Format;

/// Turns the selected entries of one container format into Markdown
pub trait Synthesizer {
    /// Format handled by this synthesizer
    fn format(&self) -> Format;

    /// Render the selected entries, given in container order
    fn synthesize(&self, files: &[ExtractedFile], config: &Config) -> Result<String>;

    /// Read the container, keep the entries this format needs, and render them
    fn synthesize_bytes(&self, bytes: &[u8], config: &Config) -> Result<String> {
        let format = self.format();
        let files = extract_files(bytes, |path| format.accepts(path))?;
        debug!(%format, entries = files.len(), "selected container entries");
        self.synthesize(&files, config)
    }
}

/// Find an entry by exact path
pub fn find_entry<'a>(files: &'a [ExtractedFile], path: &str) -> Option<&'a ExtractedFile> {
    files.iter().find(|f| f.path == path)
}
