//! Container entry selection
//!
//! Each format only needs a handful of the entries stored in its
//! container. [`Format::accepts`] is the pure predicate deciding which
//! ones are buffered and handed to the synthesizer.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static DOCX_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^word/(document|footnotes|endnotes|styles)\.xml$").unwrap());
static PPTX_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ppt/(slides/slide\d+|notesSlides/notesSlide\d+)\.xml$").unwrap()
});
static XLSX_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^xl/(worksheets/sheet\d+|sharedStrings|drawings/drawing\d+|charts/chart\d+)\.xml$",
    )
    .unwrap()
});
static ODF_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Object \d+/)?content\.xml$").unwrap());

/// Document formats with a synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Word-processing (OOXML)
    Docx,
    /// Presentation (OOXML)
    Pptx,
    /// Spreadsheet (OOXML)
    Xlsx,
    /// OpenDocument text
    Odt,
    /// OpenDocument presentation
    Odp,
    /// OpenDocument spreadsheet
    Ods,
    /// Portable Document Format
    Pdf,
}

impl Format {
    /// All supported formats
    pub const ALL: [Format; 7] = [
        Format::Docx,
        Format::Pptx,
        Format::Xlsx,
        Format::Odt,
        Format::Odp,
        Format::Ods,
        Format::Pdf,
    ];

    /// Look up a format by file extension, case-insensitively
    pub fn from_extension(extension: &str) -> Option<Self> {
        let lower = extension.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == lower)
    }

    /// Canonical lower-case extension
    pub fn extension(self) -> &'static str {
        match self {
            Format::Docx => "docx",
            Format::Pptx => "pptx",
            Format::Xlsx => "xlsx",
            Format::Odt => "odt",
            Format::Odp => "odp",
            Format::Ods => "ods",
            Format::Pdf => "pdf",
        }
    }

    /// Whether the format is an OpenDocument flavour
    pub fn is_open_document(self) -> bool {
        matches!(self, Format::Odt | Format::Odp | Format::Ods)
    }

    /// Entry that must be present for the container to be usable
    pub fn anchor(self) -> Option<&'static str> {
        match self {
            Format::Docx => Some("word/document.xml"),
            Format::Pptx => Some("ppt/slides/slideN.xml"),
            Format::Xlsx => Some("xl/worksheets/sheetN.xml"),
            Format::Odt | Format::Odp | Format::Ods => Some("content.xml"),
            Format::Pdf => None,
        }
    }

    /// Whether a container entry is relevant to this format
    pub fn accepts(self, path: &str) -> bool {
        match self {
            Format::Docx => DOCX_ENTRY.is_match(path),
            Format::Pptx => PPTX_ENTRY.is_match(path),
            Format::Xlsx => XLSX_ENTRY.is_match(path),
            Format::Odt | Format::Odp | Format::Ods => ODF_ENTRY.is_match(path),
            Format::Pdf => false,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Parse the trailing number of an entry's file name.
///
/// `ppt/slides/slide12.xml` yields `12`; names without a trailing number
/// yield `None`.
pub fn entry_index(path: &str) -> Option<u32> {
    let file_name = path.rsplit('/').next()?;
    let stem = file_name.split('.').next()?;
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[digits_start..].parse().ok()
}
