//! Spreadsheet synthesis (xlsx -> Markdown)

use tracing::{debug, warn};

use officemd_core::{
    entry_index, find_entry, ColumnHeader, Config, ExtractedFile, Format, MarkdownBlocks,
    OfficeError, Result, Synthesizer, EMPTY_SHEET,
};

use crate::drawing::{chart_texts, drawing_texts};
use crate::shared_strings::SharedStrings;
use crate::worksheet::scan_worksheet;

/// Shared string table part
pub const SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

/// Renders spreadsheets as Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSynthesizer;

impl XlsxSynthesizer {
    /// Create a new synthesizer
    pub fn new() -> Self {
        Self
    }
}

impl Synthesizer for XlsxSynthesizer {
    fn format(&self) -> Format {
        Format::Xlsx
    }

    fn synthesize(&self, files: &[ExtractedFile], config: &Config) -> Result<String> {
        let sheets = parts_in_order(files, "xl/worksheets/");
        if sheets.is_empty() {
            return Err(OfficeError::corrupted("no worksheets found in workbook"));
        }

        let shared = match find_entry(files, SHARED_STRINGS_PATH) {
            Some(file) => SharedStrings::parse(file.content.as_bytes())?,
            None => SharedStrings::default(),
        };
        debug!(sheets = sheets.len(), strings = shared.len(), "rendering workbook");

        let mut out = MarkdownBlocks::new();
        for (index, sheet) in &sheets {
            out.push_heading(2, &format!("Sheet {index}"));
            let grid = scan_worksheet(sheet.content.as_bytes(), &shared)?;
            if grid.is_empty() {
                out.push_block(EMPTY_SHEET);
            } else {
                out.push_block(grid.into_table(ColumnHeader::Letters)?.to_markdown());
            }
        }

        for (index, drawing) in parts_in_order(files, "xl/drawings/") {
            push_text_section(&mut out, "Drawing", index, drawing_texts(drawing.content.as_bytes())?);
        }
        for (index, chart) in parts_in_order(files, "xl/charts/") {
            push_text_section(&mut out, "Chart", index, chart_texts(chart.content.as_bytes())?);
        }

        Ok(out.render(&config.newline_delimiter))
    }
}

/// Entries under `prefix`, ordered by the number in their file name
fn parts_in_order<'a>(files: &'a [ExtractedFile], prefix: &str) -> Vec<(u32, &'a ExtractedFile)> {
    let mut parts: Vec<(u32, &ExtractedFile)> = files
        .iter()
        .filter(|f| f.path.starts_with(prefix))
        .filter_map(|f| match entry_index(&f.path) {
            Some(index) => Some((index, f)),
            None => {
                warn!(part = %f.path, "skipping part without index");
                None
            }
        })
        .collect();
    parts.sort_by_key(|(index, _)| *index);
    parts
}

fn push_text_section(out: &mut MarkdownBlocks, label: &str, index: u32, texts: Vec<String>) {
    if texts.is_empty() {
        return;
    }
    out.push_heading(2, &format!("{label} {index}"));
    for text in &texts {
        out.push_item(text);
    }
}
