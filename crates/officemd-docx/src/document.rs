//! Document content parsing (word/document.xml)
//!
//! Parses the body into a flat list of [`Block`]s. Footnote and endnote
//! parts share the same paragraph and table vocabulary, so they are parsed
//! with the same walker.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use officemd_core::xml::{get_attr, toggle_on};
use officemd_core::Result;

/// A parsed word-processing part
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Top-level blocks in document order
    pub blocks: Vec<Block>,
}

/// A block-level element
#[derive(Debug, Clone)]
pub enum Block {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
}

/// A paragraph
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Style ID reference
    pub style_id: Option<String>,
    /// Text runs in order
    pub runs: Vec<Run>,
    /// Numbering (for lists)
    pub numbering: Option<NumberingRef>,
}

/// A text run with uniform formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// The text content
    pub text: String,
    /// Inline formatting
    pub formatting: Formatting,
}

/// Inline formatting of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatting {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Struck-through text
    pub strike: bool,
}

impl Formatting {
    /// Whether the formatting has a Markdown rendering.
    ///
    /// Underline has none.
    pub fn has_emphasis(&self) -> bool {
        self.bold || self.italic || self.strike
    }
}

/// Reference to numbering definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingRef {
    /// Numbering ID
    pub num_id: u32,
    /// Indent level (0-based)
    pub ilvl: u32,
}

/// A table
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Table rows
    pub rows: Vec<TableRow>,
}

/// A table row
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    /// Cells in this row
    pub cells: Vec<TableCell>,
}

/// A table cell
#[derive(Debug, Clone, Default)]
pub struct TableCell {
    /// Paragraphs in this cell, including those of nested tables
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Whitespace inside <w:t> is significant
        reader.config_mut().trim_text(false);

        let mut state = ParseState::default();
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

        Ok(Document {
            blocks: state.blocks,
        })
    }

    /// Get all paragraphs (flattening tables)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Paragraph(p) => vec![p].into_iter(),
            Block::Table(t) => t
                .rows
                .iter()
                .flat_map(|r| r.cells.iter())
                .flat_map(|c| c.paragraphs.iter())
                .collect::<Vec<_>>()
                .into_iter(),
        })
    }
}

impl Paragraph {
    /// Get plain text of this paragraph
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if this paragraph has no visible text
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

impl TableCell {
    /// Plain text of the cell, one line per non-empty paragraph
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .filter(|p| !p.is_empty())
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Streaming parse state.
///
/// Only the outermost paragraph and table are materialized. Paragraphs
/// nested in text boxes merge into their host paragraph; nested tables
/// contribute their paragraphs to the enclosing cell.
#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,
    fallback_depth: u32,
    table_depth: u32,
    table: Option<TableBuilder>,
    para_depth: u32,
    paragraph: Option<ParagraphBuilder>,
    runs: Vec<RunBuilder>,
    in_para_props: bool,
    in_run_props: bool,
    in_text: bool,
}

impl ParseState {
    fn start(&mut self, e: &BytesStart) {
        let name = e.local_name();
        if self.fallback_depth > 0 {
            if name.as_ref() == b"Fallback" {
                self.fallback_depth += 1;
            }
            return;
        }

        match name.as_ref() {
            // mc:Fallback repeats the content of the preceding mc:Choice
            b"Fallback" => self.fallback_depth = 1,
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Some(TableBuilder::default());
                }
            }
            b"tr" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    table.current_row = Some(TableRowBuilder::default());
                }
            }
            b"tc" if self.table_depth == 1 => {
                if let Some(row) = self.table.as_mut().and_then(|t| t.current_row.as_mut()) {
                    row.current_cell = Some(TableCellBuilder::default());
                }
            }
            b"p" => {
                self.para_depth += 1;
                if self.para_depth == 1 {
                    self.paragraph = Some(ParagraphBuilder::default());
                }
            }
            b"pPr" => self.in_para_props = true,
            b"r" if self.paragraph.is_some() => self.runs.push(RunBuilder::default()),
            b"rPr" if !self.runs.is_empty() && !self.in_para_props => self.in_run_props = true,
            b"t" if !self.runs.is_empty() => self.in_text = true,
            _ => self.property(e),
        }
    }

    fn empty(&mut self, e: &BytesStart) {
        if self.fallback_depth == 0 {
            self.property(e);
        }
    }

    /// Handle elements that carry data in attributes only
    fn property(&mut self, e: &BytesStart) {
        let name = e.local_name();
        match name.as_ref() {
            b"pStyle" if self.in_para_props && self.para_depth == 1 => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.style_id = get_attr(e, b"w:val");
                }
            }
            b"numId" | b"ilvl" if self.in_para_props && self.para_depth == 1 => {
                let value = get_attr(e, b"w:val").and_then(|v| v.parse::<u32>().ok());
                if let (Some(para), Some(value)) = (self.paragraph.as_mut(), value) {
                    let numbering = para.numbering.get_or_insert(NumberingRef {
                        num_id: 0,
                        ilvl: 0,
                    });
                    if name.as_ref() == b"numId" {
                        numbering.num_id = value;
                    } else {
                        numbering.ilvl = value;
                    }
                }
            }
            b"b" | b"i" | b"u" | b"strike" | b"dstrike" if self.in_run_props => {
                let on = toggle_on(e);
                if let Some(run) = self.runs.last_mut() {
                    match name.as_ref() {
                        b"b" => run.formatting.bold = on,
                        b"i" => run.formatting.italic = on,
                        b"u" => run.formatting.underline = on,
                        _ => run.formatting.strike = on,
                    }
                }
            }
            b"tab" if !self.in_para_props && !self.in_run_props => self.push_text("\t"),
            b"br" | b"cr" if !self.in_run_props => self.push_text("\n"),
            b"noBreakHyphen" => self.push_text("-"),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        if self.fallback_depth > 0 {
            if name == b"Fallback" {
                self.fallback_depth -= 1;
            }
            return;
        }

        match name {
            b"t" => self.in_text = false,
            b"rPr" => self.in_run_props = false,
            b"pPr" => self.in_para_props = false,
            b"r" => {
                if let Some(run) = self.runs.pop() {
                    let run = run.build();
                    if !run.text.is_empty() {
                        if let Some(para) = self.paragraph.as_mut() {
                            para.runs.push(run);
                        }
                    }
                }
            }
            b"p" if self.para_depth > 0 => {
                self.para_depth -= 1;
                if self.para_depth == 0 {
                    if let Some(para) = self.paragraph.take() {
                        self.finish_paragraph(para.build());
                    }
                } else if let Some(para) = self.paragraph.as_mut() {
                    // Keep text of consecutive text-box paragraphs apart
                    para.runs.push(Run {
                        text: " ".to_string(),
                        formatting: Formatting::default(),
                    });
                }
            }
            b"tc" if self.table_depth == 1 => {
                if let Some(row) = self.table.as_mut().and_then(|t| t.current_row.as_mut()) {
                    if let Some(cell) = row.current_cell.take() {
                        row.cells.push(cell.build());
                    }
                }
            }
            b"tr" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    if let Some(row) = table.current_row.take() {
                        table.rows.push(row.build());
                    }
                }
            }
            b"tbl" if self.table_depth > 0 => {
                if self.table_depth == 1 {
                    if let Some(table) = self.table.take() {
                        self.blocks.push(Block::Table(table.build()));
                    }
                }
                self.table_depth -= 1;
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.runs.last_mut() {
            run.text.push_str(text);
        }
    }

    fn finish_paragraph(&mut self, para: Paragraph) {
        match self.table.as_mut() {
            Some(table) => {
                if let Some(cell) = table
                    .current_row
                    .as_mut()
                    .and_then(|row| row.current_cell.as_mut())
                {
                    cell.paragraphs.push(para);
                }
            }
            None => self.blocks.push(Block::Paragraph(para)),
        }
    }
}

// Builder types for constructing elements during parsing

#[derive(Default)]
struct ParagraphBuilder {
    style_id: Option<String>,
    runs: Vec<Run>,
    numbering: Option<NumberingRef>,
}

impl ParagraphBuilder {
    fn build(self) -> Paragraph {
        Paragraph {
            style_id: self.style_id,
            runs: self.runs,
            // numId 0 explicitly removes numbering
            numbering: self.numbering.filter(|n| n.num_id != 0),
        }
    }
}

#[derive(Default)]
struct RunBuilder {
    text: String,
    formatting: Formatting,
}

impl RunBuilder {
    fn build(self) -> Run {
        Run {
            text: self.text,
            formatting: self.formatting,
        }
    }
}

#[derive(Default)]
struct TableBuilder {
    rows: Vec<TableRow>,
    current_row: Option<TableRowBuilder>,
}

impl TableBuilder {
    fn build(self) -> Table {
        Table { rows: self.rows }
    }
}

#[derive(Default)]
struct TableRowBuilder {
    cells: Vec<TableCell>,
    current_cell: Option<TableCellBuilder>,
}

impl TableRowBuilder {
    fn build(self) -> TableRow {
        TableRow { cells: self.cells }
    }
}

#[derive(Default)]
struct TableCellBuilder {
    paragraphs: Vec<Paragraph>,
}

impl TableCellBuilder {
    fn build(self) -> TableCell {
        TableCell {
            paragraphs: self.paragraphs,
        }
    }
}
