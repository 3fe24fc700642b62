//! # officemd-xlsx
//!
//! Spreadsheet (XLSX) to Markdown synthesis.
//!
//! Every worksheet becomes a `## Sheet N` section holding one pipe table
//! whose header row is the column letters. Shape and chart text follows
//! the sheets as bulleted lists.
//!
//! ## Example
//!
//! ```no_run
//! use officemd_core::{Config, Synthesizer};
//! use officemd_xlsx::XlsxSynthesizer;
//!
//! let bytes = std::fs::read("budget.xlsx")?;
//! let markdown = XlsxSynthesizer::new().synthesize_bytes(&bytes, &Config::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod drawing;
pub mod extract;
pub mod shared_strings;
pub mod worksheet;

pub use drawing::{chart_texts, drawing_texts};
pub use extract::XlsxSynthesizer;
pub use shared_strings::SharedStrings;
pub use worksheet::{scan_worksheet, CellType};
