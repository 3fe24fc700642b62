//! # officemd-pdf
//!
//! PDF text extraction for officemd.
//!
//! Pages are laid out concurrently on the blocking pool into positioned
//! [`TextRun`]s, joined into a flat transcript and then structured into
//! Markdown with [`officemd_core::structure_text`].
//!
//! ## Example
//!
//! ```no_run
//! use officemd_core::Config;
//! use officemd_pdf::PdfEngine;
//!
//! # async fn run() -> officemd_core::Result<()> {
//! let bytes = std::fs::read("paper.pdf")?;
//! let markdown = PdfEngine::global()
//!     .extract_markdown(bytes, &Config::default())
//!     .await?;
//! println!("{markdown}");
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod layout;

pub use engine::PdfEngine;
pub use layout::{transcript, LayoutSettings, RunCollector, TextRun};
