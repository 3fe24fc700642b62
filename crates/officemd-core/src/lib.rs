//! # officemd-core
//!
//! Building blocks shared by every officemd format pipeline:
//!
//! - [`Config`]: extraction options with documented defaults
//! - [`OfficeError`]: the single error channel, classified by [`ErrorKind`]
//! - [`container`]: sequential ZIP entry reading into [`ExtractedFile`]s
//! - [`Format`]: per-format entry filtering
//! - [`GridTable`] / [`SparseGrid`]: Markdown pipe-table reconstruction
//! - [`MarkdownBlocks`]: the ordered block sequence synthesizers emit
//! - [`Synthesizer`]: the trait every container format implements
//! - [`structure_text`]: heuristic structuring of flat text
//!
//! ## Example
//!
//! ```
//! use officemd_core::{GridTable, MarkdownBlocks};
//!
//! let mut table = GridTable::new();
//! table.push_row(vec!["Name".into(), "Age".into()]);
//! table.push_row(vec!["Ann".into()]);
//!
//! let mut blocks = MarkdownBlocks::new();
//! blocks.push_heading(1, "People");
//! blocks.push_block(table.to_markdown());
//! assert!(blocks.render("\n").starts_with("# People"));
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod filter;
pub mod markdown;
pub mod structure;
pub mod synth;
pub mod table;
pub mod xml;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Config, DEFAULT_NEWLINE_DELIMITER};
pub use container::{extract_files, ExtractedFile};
pub use error::{ErrorKind, OfficeError, Result};
pub use filter::{entry_index, Format};
pub use markdown::{collapse_blank_lines, MarkdownBlocks};
pub use structure::{classify_lines, structure_text, Heuristic, LineKind};
pub use synth::{find_entry, Synthesizer};
pub use table::{
    column_index, column_letters, escape_cell, CellPosition, ColumnHeader, GridTable, SparseGrid,
    EMPTY_SHEET, MAX_DENSE_CELLS,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
