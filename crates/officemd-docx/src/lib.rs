//! # officemd-docx
//!
//! Word-processing (DOCX) to Markdown synthesis.
//!
//! - [`StyleSheet`]: heading classification from `word/styles.xml`
//! - [`Document`]: the body model parsed from `word/document.xml`
//! - [`DocxSynthesizer`]: renders paragraphs, headings, lists and tables
//!
//! ## Example
//!
//! ```no_run
//! use officemd_core::{Config, Synthesizer};
//! use officemd_docx::DocxSynthesizer;
//!
//! let bytes = std::fs::read("report.docx")?;
//! let markdown = DocxSynthesizer::new().synthesize_bytes(&bytes, &Config::default())?;
//! println!("{markdown}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
pub mod extract;
pub mod styles;

pub use document::{
    Block, Document, Formatting, NumberingRef, Paragraph, Run, Table, TableCell, TableRow,
};
pub use extract::{render_runs, DocxSynthesizer};
pub use styles::{StyleInfo, StyleSheet, StyleType};
