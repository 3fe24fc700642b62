//! officemd CLI - Command-line interface library
//!
//! # Binary Usage
//!
//! ```bash
//! # Word document to Markdown
//! officemd report.docx > report.md
//!
//! # Slides with notes collected at the end, CRLF output
//! officemd deck.pptx --putNotesAtLast=true --newlineDelimiter='\r\n'
//!
//! # Options from a file, overridden on the command line
//! officemd data.xlsx --config officemd.toml --outputErrorToConsole=true
//! ```

pub mod app;

pub use app::{convert_command, decode_escapes, init_logging, log_filter, run_cli, Args};
