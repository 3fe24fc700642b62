//! # officemd-odf
//!
//! OpenDocument (ODT, ODP, ODS) to Markdown synthesis.
//!
//! `content.xml` is parsed into a navigable tree and walked in document
//! order. Headings become `##` lines, paragraphs plain lines, tables pipe
//! tables. Presentation pages open `## Slide N` sections and spreadsheet
//! tables open a section named after the sheet.

pub mod extract;
pub mod node;
pub mod table;

pub use extract::{object_index, OdfSynthesizer};
pub use node::{gather_text, OdfNode};
pub use table::build_table;
