//! Word-processing synthesis (docx -> Markdown)
//!
//! Walks the body of `word/document.xml` in order. Tables go through the
//! grid table builder; paragraphs are rendered with inline emphasis and,
//! when their style resolves to a heading, a `#` prefix. Footnote and
//! endnote parts follow the main body in container order.

use tracing::{debug, warn};

use officemd_core::{
    find_entry, Config, ExtractedFile, Format, GridTable, MarkdownBlocks, OfficeError, Result,
    Synthesizer,
};

use crate::document::{Block, Document, Formatting, Paragraph, Run, Table};
use crate::styles::StyleSheet;

/// Main body part
pub const DOCUMENT_PATH: &str = "word/document.xml";
/// Style definitions part
pub const STYLES_PATH: &str = "word/styles.xml";
/// Footnotes part
pub const FOOTNOTES_PATH: &str = "word/footnotes.xml";
/// Endnotes part
pub const ENDNOTES_PATH: &str = "word/endnotes.xml";

/// Renders word-processing documents as Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxSynthesizer;

impl DocxSynthesizer {
    /// Create a new synthesizer
    pub fn new() -> Self {
        Self
    }

    /// Append the blocks of one parsed part
    fn append_document(&self, document: &Document, styles: &StyleSheet, out: &mut MarkdownBlocks) {
        for block in &document.blocks {
            match block {
                Block::Paragraph(para) => self.append_paragraph(para, styles, out),
                Block::Table(table) => out.push_block(render_table(table).to_markdown()),
            }
        }
    }

    fn append_paragraph(&self, para: &Paragraph, styles: &StyleSheet, out: &mut MarkdownBlocks) {
        if para.is_empty() {
            return;
        }

        let heading = para
            .style_id
            .as_deref()
            .and_then(|id| styles.heading_level(id));
        if let Some(level) = heading {
            let text = para.plain_text().replace(['\n', '\t'], " ");
            out.push_heading(level, &text);
            return;
        }

        let text = render_runs(&para.runs);
        match para.numbering {
            Some(numbering) => {
                let indent = "  ".repeat(numbering.ilvl as usize);
                out.push_line(format!("{indent}- {}", text.trim()));
            }
            None => out.push_block(text.trim()),
        }
    }
}

impl Synthesizer for DocxSynthesizer {
    fn format(&self) -> Format {
        Format::Docx
    }

    fn synthesize(&self, files: &[ExtractedFile], config: &Config) -> Result<String> {
        let document = find_entry(files, DOCUMENT_PATH)
            .ok_or_else(|| OfficeError::corrupted(format!("{DOCUMENT_PATH} not found")))?;

        let styles = match find_entry(files, STYLES_PATH) {
            Some(file) => StyleSheet::parse(file.content.as_bytes())?,
            None => {
                warn!("{STYLES_PATH} not found, paragraphs render without heading styles");
                StyleSheet::default()
            }
        };
        debug!(styles = styles.len(), "resolved paragraph styles");

        let mut out = MarkdownBlocks::new();
        let body = Document::parse(document.content.as_bytes())?;
        self.append_document(&body, &styles, &mut out);

        for notes in files
            .iter()
            .filter(|f| f.path == FOOTNOTES_PATH || f.path == ENDNOTES_PATH)
        {
            let part = Document::parse(notes.content.as_bytes())?;
            debug!(part = %notes.path, blocks = part.blocks.len(), "appending notes part");
            self.append_document(&part, &styles, &mut out);
        }

        Ok(out.render(&config.newline_delimiter))
    }
}

fn render_table(table: &Table) -> GridTable {
    let mut grid = GridTable::new();
    for row in &table.rows {
        grid.push_row(
            row.cells
                .iter()
                .map(|cell| {
                    cell.paragraphs
                        .iter()
                        .filter(|p| !p.is_empty())
                        .map(|p| render_runs(&p.runs).trim().to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect(),
        );
    }
    grid
}

/// Render runs with Markdown emphasis.
///
/// Adjacent runs with the same formatting are merged first, and
/// whitespace-only runs join the preceding run, so a bold phrase split
/// across runs renders as one emphasized span.
pub fn render_runs(runs: &[Run]) -> String {
    let mut spans: Vec<(Formatting, String)> = Vec::new();
    for run in runs {
        match spans.last_mut() {
            Some((formatting, text))
                if *formatting == run.formatting || run.text.trim().is_empty() =>
            {
                text.push_str(&run.text);
            }
            _ => spans.push((run.formatting, run.text.clone())),
        }
    }

    spans
        .iter()
        .map(|(formatting, text)| emphasize(text, *formatting))
        .collect()
}

/// Wrap text in emphasis markers, keeping surrounding whitespace outside
pub fn emphasize(text: &str, formatting: Formatting) -> String {
    let core = text.trim();
    if core.is_empty() || !formatting.has_emphasis() {
        return text.to_string();
    }
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];

    let mut wrapped = match (formatting.bold, formatting.italic) {
        (true, true) => format!("***{core}***"),
        (true, false) => format!("**{core}**"),
        (false, true) => format!("*{core}*"),
        (false, false) => core.to_string(),
    };
    if formatting.strike {
        wrapped = format!("~~{wrapped}~~");
    }
    format!("{leading}{wrapped}{trailing}")
}
