//! OpenDocument synthesis (odt, odp, ods -> Markdown)
//!
//! The three flavours share one walk over `office:body` in document
//! order. Headings and paragraphs are emitted where they stand, unless an
//! enclosing paragraph or table already accounts for their text. Tables
//! are rendered at their outermost `table:table`.

use roxmltree::{Document, Node, NodeId};
use tracing::debug;

use officemd_core::{
    collapse_blank_lines, find_entry, Config, ExtractedFile, Format, MarkdownBlocks, OfficeError,
    Result, Synthesizer, EMPTY_SHEET,
};

use crate::node::{gather_text, has_ancestor, notes_ancestor, OdfNode, OFFICE_NS};
use crate::table::{build_table, table_name};

/// Main content part
pub const CONTENT_PATH: &str = "content.xml";

/// Renders OpenDocument text, presentation and spreadsheet files
#[derive(Debug, Clone, Copy)]
pub struct OdfSynthesizer {
    format: Format,
}

impl OdfSynthesizer {
    /// Synthesizer for one of the OpenDocument formats.
    ///
    /// Any other format falls back to `odt`.
    pub fn new(format: Format) -> Self {
        let format = if format.is_open_document() {
            format
        } else {
            Format::Odt
        };
        Self { format }
    }

    /// Text documents
    pub fn odt() -> Self {
        Self::new(Format::Odt)
    }

    /// Presentations
    pub fn odp() -> Self {
        Self::new(Format::Odp)
    }

    /// Spreadsheets
    pub fn ods() -> Self {
        Self::new(Format::Ods)
    }
}

impl Synthesizer for OdfSynthesizer {
    fn format(&self) -> Format {
        self.format
    }

    fn synthesize(&self, files: &[ExtractedFile], config: &Config) -> Result<String> {
        let content = find_entry(files, CONTENT_PATH)
            .ok_or_else(|| OfficeError::corrupted(format!("{CONTENT_PATH} not found")))?;

        let mut objects: Vec<(u32, &ExtractedFile)> = files
            .iter()
            .filter_map(|f| object_index(&f.path).map(|n| (n, f)))
            .collect();
        objects.sort_by_key(|(n, _)| *n);
        debug!(format = %self.format, objects = objects.len(), "rendering open document");

        let mut walker = Walker::new(config);
        walker.render(&content.content)?;
        for (_, object) in objects {
            walker.render(&object.content)?;
        }

        let delimiter = &config.newline_delimiter;
        Ok(collapse_blank_lines(&walker.finish().render(delimiter), delimiter))
    }
}

/// Number of an embedded object part (`Object 3/content.xml` -> 3)
pub fn object_index(path: &str) -> Option<u32> {
    let rest = path.strip_prefix("Object ")?;
    let (number, file) = rest.split_once('/')?;
    if file != CONTENT_PATH {
        return None;
    }
    number.trim().parse().ok()
}

struct Walker<'c> {
    config: &'c Config,
    out: MarkdownBlocks,
    deferred: MarkdownBlocks,
    slide: u32,
    sheet: u32,
    notes_owner: Option<NodeId>,
}

impl<'c> Walker<'c> {
    fn new(config: &'c Config) -> Self {
        Self {
            config,
            out: MarkdownBlocks::new(),
            deferred: MarkdownBlocks::new(),
            slide: 0,
            sheet: 0,
            notes_owner: None,
        }
    }

    fn render(&mut self, xml: &str) -> Result<()> {
        let doc = Document::parse(xml)?;
        let Some(body) = doc
            .descendants()
            .find(|n| n.has_tag_name((OFFICE_NS, "body")))
        else {
            debug!("content without office:body");
            return Ok(());
        };
        // Notes containers are tracked per document
        self.notes_owner = None;

        for node in body.descendants() {
            self.visit(node)?;
        }
        Ok(())
    }

    fn visit(&mut self, node: Node) -> Result<()> {
        let kind = OdfNode::of(node);
        if matches!(kind, OdfNode::Other | OdfNode::Annotation) {
            return Ok(());
        }
        if has_ancestor(node, OdfNode::Annotation)
            || has_ancestor(node, OdfNode::Table)
            || has_ancestor(node, OdfNode::Paragraph)
            || has_ancestor(node, OdfNode::Heading)
        {
            return Ok(());
        }

        if kind == OdfNode::Page {
            self.slide += 1;
            self.out.push_heading(2, &format!("Slide {}", self.slide));
            return Ok(());
        }

        let mut blocks = MarkdownBlocks::new();
        match kind {
            OdfNode::Heading => {
                let text = gather_text(node).replace('\n', " ");
                if !text.trim().is_empty() {
                    blocks.push_heading(2, &text);
                }
            }
            OdfNode::Paragraph => blocks.push_block(gather_text(node).trim()),
            OdfNode::Table if is_spreadsheet_table(node) => {
                self.sheet += 1;
                let label = table_name(node)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Sheet {}", self.sheet));
                blocks.push_heading(2, &label);
                let table = build_table(node)?;
                if table.is_empty() {
                    blocks.push_block(EMPTY_SHEET);
                } else {
                    blocks.push_block(table.to_markdown());
                }
            }
            OdfNode::Table => blocks.push_block(build_table(node)?.to_markdown()),
            OdfNode::Page | OdfNode::Annotation | OdfNode::Other => {}
        }

        if blocks.has_content() {
            if let Some(target) = self.target(node) {
                target.append(&mut blocks);
            }
        }
        Ok(())
    }

    /// Block sequence the node belongs to; `None` drops it.
    ///
    /// The first block routed from a notes container opens a notes group.
    fn target(&mut self, node: Node) -> Option<&mut MarkdownBlocks> {
        let Some(notes) = notes_ancestor(node) else {
            return Some(&mut self.out);
        };
        if self.config.ignore_notes {
            return None;
        }

        let first_in_container = self.notes_owner != Some(notes.id());
        self.notes_owner = Some(notes.id());
        if self.config.put_notes_at_last {
            if first_in_container {
                self.deferred
                    .push_heading(3, &format!("Slide {}", self.slide));
            }
            Some(&mut self.deferred)
        } else {
            if first_in_container {
                self.out.push_heading(3, "Notes");
            }
            Some(&mut self.out)
        }
    }

    fn finish(mut self) -> MarkdownBlocks {
        if self.deferred.has_content() {
            self.out.push_heading(2, "Notes");
            self.out.append(&mut self.deferred);
        }
        self.out
    }
}

fn is_spreadsheet_table(node: Node) -> bool {
    node.parent()
        .is_some_and(|p| p.has_tag_name((OFFICE_NS, "spreadsheet")))
}
