//! # officemd-pptx
//!
//! Presentation (PPTX) to Markdown synthesis.
//!
//! Slides render as `## Slide N` sections of bulleted paragraphs and
//! tables. Speaker notes are placed inline under `### Notes`, collected
//! in a trailing `## Notes` section, or dropped, depending on
//! [`officemd_core::Config`].

pub mod extract;
pub mod slide;

pub use extract::PptxSynthesizer;
pub use slide::{parse_content, PartKind, SlideContent, SlidePart};
