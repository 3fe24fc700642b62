//! Slide and notes-slide parsing.
//!
//! Both part types share the DrawingML text model: shapes (`p:sp`) hold a
//! text body of paragraphs (`a:p`) made of runs (`a:r`, `a:fld`) whose
//! text lives in `a:t`. Tables sit in graphic frames as `a:tbl`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use officemd_core::xml::get_attr;
use officemd_core::{entry_index, GridTable, Result};

/// Notes placeholders that carry slide furniture rather than notes text
const FURNITURE_PLACEHOLDERS: &[&str] = &["sldNum", "dt", "hdr", "ftr"];

/// Kind of presentation part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PartKind {
    /// `ppt/slides/slideN.xml`
    Slide,
    /// `ppt/notesSlides/notesSlideN.xml`
    Notes,
}

impl PartKind {
    /// Classify an entry path
    pub fn from_path(path: &str) -> Option<Self> {
        if path.starts_with("ppt/slides/") {
            Some(PartKind::Slide)
        } else if path.starts_with("ppt/notesSlides/") {
            Some(PartKind::Notes)
        } else {
            None
        }
    }
}

/// Content element of a slide or notes slide, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideContent {
    /// Text of one paragraph; line breaks are kept as `\n`
    Paragraph(String),
    /// A table
    Table(GridTable),
}

/// A parsed slide or notes slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePart {
    /// Slide number from the file name, `None` when it has none
    pub index: Option<u32>,
    /// Slide or notes
    pub kind: PartKind,
    /// Content in document order
    pub content: Vec<SlideContent>,
}

impl SlidePart {
    /// Parse an entry, classifying it by path
    pub fn parse(path: &str, kind: PartKind, xml: &[u8]) -> Result<Self> {
        let skip_furniture = kind == PartKind::Notes;
        Ok(Self {
            index: entry_index(path),
            kind,
            content: parse_content(xml, skip_furniture)?,
        })
    }

    /// Sort key: numeric index (missing sorts last), slide before notes
    pub fn order_key(&self) -> (u32, PartKind) {
        (self.index.unwrap_or(u32::MAX), self.kind)
    }

    /// True when the part contributes nothing
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Parse the content of a slide part.
///
/// With `skip_furniture`, shapes whose placeholder type is slide number,
/// date, header or footer are dropped.
pub fn parse_content(xml: &[u8], skip_furniture: bool) -> Result<Vec<SlideContent>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut state = ParseState {
        skip_furniture,
        ..ParseState::default()
    };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => state.start(e),
            Event::Empty(ref e) => state.empty(e),
            Event::End(ref e) => state.end(e.local_name().as_ref()),
            Event::Text(ref e) if state.in_text => {
                let text = e.unescape()?;
                state.push_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(state.content)
}

#[derive(Default)]
struct ParseState {
    content: Vec<SlideContent>,
    skip_furniture: bool,
    skip_shape: bool,
    table_depth: usize,
    table: Option<GridTable>,
    row: Option<Vec<String>>,
    cell: Option<Vec<String>>,
    paragraph: Option<ParagraphText>,
    in_text: bool,
}

#[derive(Default)]
struct ParagraphText {
    text: String,
    has_run: bool,
}

impl ParseState {
    fn start(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"sp" => self.skip_shape = false,
            b"ph" => self.placeholder(e),
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Some(GridTable::new());
                }
            }
            b"tr" if self.table_depth == 1 => self.row = Some(Vec::new()),
            b"tc" if self.table_depth == 1 => self.cell = Some(Vec::new()),
            b"p" => self.paragraph = Some(ParagraphText::default()),
            b"r" | b"fld" => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.has_run = true;
                }
            }
            b"t" => self.in_text = self.paragraph.is_some(),
            _ => {}
        }
    }

    fn empty(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"ph" => self.placeholder(e),
            b"br" => self.push_text("\n"),
            b"tc" if self.table_depth == 1 => {
                if let Some(row) = self.row.as_mut() {
                    row.push(String::new());
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"p" => self.finish_paragraph(),
            b"sp" => self.skip_shape = false,
            b"tc" if self.table_depth == 1 => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.push(cell.join("\n"));
                }
            }
            b"tr" if self.table_depth == 1 => {
                if let (Some(row), Some(table)) = (self.row.take(), self.table.as_mut()) {
                    table.push_row(row);
                }
            }
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    if let Some(table) = self.table.take().filter(|t| !t.is_empty()) {
                        self.content.push(SlideContent::Table(table));
                    }
                }
            }
            _ => {}
        }
    }

    fn placeholder(&mut self, e: &BytesStart) {
        if !self.skip_furniture {
            return;
        }
        if let Some(kind) = get_attr(e, b"type") {
            if FURNITURE_PLACEHOLDERS.contains(&kind.as_str()) {
                self.skip_shape = true;
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(para) = self.paragraph.as_mut() {
            para.text.push_str(text);
        }
    }

    fn finish_paragraph(&mut self) {
        self.in_text = false;
        let Some(para) = self.paragraph.take() else {
            return;
        };
        if !para.has_run || para.text.trim().is_empty() {
            return;
        }
        let text = para.text.trim().to_string();

        if self.table_depth > 0 {
            if let Some(cell) = self.cell.as_mut() {
                cell.push(text);
            }
        } else if !self.skip_shape {
            self.content.push(SlideContent::Paragraph(text));
        }
    }
}
