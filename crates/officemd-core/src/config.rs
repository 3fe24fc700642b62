//! Extraction configuration
//!
//! A [`Config`] is immutable for the duration of one extraction call.
//! Unset keys fall back to their documented defaults, both when built in
//! code and when loaded from TOML.

use serde::{Deserialize, Serialize};

/// Default separator used when joining Markdown blocks
pub const DEFAULT_NEWLINE_DELIMITER: &str = "\n";

/// Options recognized by every synthesizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log the error through `tracing` before returning it
    pub output_error_to_console: bool,
    /// Separator used when joining blocks
    pub newline_delimiter: String,
    /// Drop speaker notes entirely
    pub ignore_notes: bool,
    /// Defer notes to a trailing section instead of placing them inline
    pub put_notes_at_last: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_error_to_console: false,
            newline_delimiter: DEFAULT_NEWLINE_DELIMITER.to_string(),
            ignore_notes: false,
            put_notes_at_last: false,
        }
    }
}

impl Config {
    /// Create a config with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Set whether notes are dropped
    pub fn with_ignore_notes(mut self, ignore_notes: bool) -> Self {
        self.ignore_notes = ignore_notes;
        self
    }

    /// Set whether notes are deferred to the end of the document
    pub fn with_notes_at_last(mut self, put_notes_at_last: bool) -> Self {
        self.put_notes_at_last = put_notes_at_last;
        self
    }

    /// Set the block separator
    pub fn with_newline_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.newline_delimiter = delimiter.into();
        self
    }

    /// Set whether failures are logged before being returned
    pub fn with_error_output(mut self, output_error_to_console: bool) -> Self {
        self.output_error_to_console = output_error_to_console;
        self
    }

    /// Fill options that were left unusable with their defaults
    pub fn normalized(mut self) -> Self {
        if self.newline_delimiter.is_empty() {
            self.newline_delimiter = DEFAULT_NEWLINE_DELIMITER.to_string();
        }
        self
    }

    /// Notes are rendered in place, next to their slide
    pub fn notes_inline(&self) -> bool {
        !self.ignore_notes && !self.put_notes_at_last
    }
}
