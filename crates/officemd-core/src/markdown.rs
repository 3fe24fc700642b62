//! Ordered Markdown block sequence
//!
//! Synthesizers append blocks in rendering order. Blocks that need to
//! stand alone (headings, paragraphs, tables) are separated from their
//! neighbours by a blank line; list items and plain lines are appended
//! as-is so consecutive items stay one list.

/// Ordered list of Markdown blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownBlocks {
    blocks: Vec<String>,
}

impl MarkdownBlocks {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a standalone block, separated from its neighbours by blank lines
    pub fn push_block(&mut self, block: impl Into<String>) {
        let block = block.into();
        if block.trim().is_empty() {
            return;
        }
        if self.blocks.last().is_some_and(|last| !last.is_empty()) {
            self.blocks.push(String::new());
        }
        self.blocks.push(block);
        self.blocks.push(String::new());
    }

    /// Append a heading of the given level (clamped to 1..=6)
    pub fn push_heading(&mut self, level: u8, text: &str) {
        let level = level.clamp(1, 6) as usize;
        self.push_block(format!("{} {}", "#".repeat(level), text.trim()));
    }

    /// Append a single line without separation
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.blocks.push(line.into());
    }

    /// Append a `- ` list item
    pub fn push_item(&mut self, text: &str) {
        self.push_line(format!("- {}", text.trim()));
    }

    /// Append a blank line
    pub fn push_blank(&mut self) {
        self.blocks.push(String::new());
    }

    /// Move every block of `other` to the end of this sequence
    pub fn append(&mut self, other: &mut MarkdownBlocks) {
        if other.has_content() && self.blocks.last().is_some_and(|last| !last.is_empty()) {
            self.blocks.push(String::new());
        }
        self.blocks.append(&mut other.blocks);
    }

    /// True when no non-blank block has been added
    pub fn has_content(&self) -> bool {
        self.blocks.iter().any(|b| !b.trim().is_empty())
    }

    /// Number of blocks, blank separators included
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when the sequence holds no block at all
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the blocks
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(String::as_str)
    }

    /// Join blocks with `delimiter`, dropping trailing blank blocks
    pub fn render(&self, delimiter: &str) -> String {
        let end = self
            .blocks
            .iter()
            .rposition(|b| !b.trim().is_empty())
            .map_or(0, |i| i + 1);
        let start = self.blocks[..end]
            .iter()
            .position(|b| !b.trim().is_empty())
            .unwrap_or(end);
        let body = self.blocks[start..end].join("\n");
        if delimiter == "\n" {
            body
        } else {
            body.replace('\n', delimiter)
        }
    }
}

/// Collapse every run of three or more blank lines into one blank line.
///
/// Lines are split on `delimiter`; runs of one or two blank lines are kept.
pub fn collapse_blank_lines(text: &str, delimiter: &str) -> String {
    let delimiter = if delimiter.is_empty() { "\n" } else { delimiter };
    let mut output: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;

    for line in text.split(delimiter) {
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        flush_blank_run(&mut output, blank_run);
        blank_run = 0;
        output.push(line);
    }
    flush_blank_run(&mut output, blank_run);

    output.join(delimiter)
}

fn flush_blank_run(output: &mut Vec<&str>, run: usize) {
    let kept = if run >= 3 { 1 } else { run };
    output.extend(std::iter::repeat("").take(kept));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_are_separated() {
        let mut blocks = MarkdownBlocks::new();
        blocks.push_heading(1, "Intro");
        blocks.push_block("First paragraph");
        blocks.push_block("Second paragraph");

        assert_eq!(
            blocks.render("\n"),
            "# Intro\n\nFirst paragraph\n\nSecond paragraph"
        );
    }

    #[test]
    fn test_items_stay_together() {
        let mut blocks = MarkdownBlocks::new();
        blocks.push_heading(2, "Slide 1");
        blocks.push_item("one");
        blocks.push_item("two");
        blocks.push_block("after");

        assert_eq!(blocks.render("\n"), "## Slide 1\n\n- one\n- two\n\nafter");
    }

    #[test]
    fn test_heading_level_is_clamped() {
        let mut blocks = MarkdownBlocks::new();
        blocks.push_heading(9, "Deep");
        blocks.push_heading(0, "Shallow");
        assert_eq!(blocks.render("\n"), "###### Deep\n\n# Shallow");
    }

    #[test]
    fn test_blank_blocks_are_ignored() {
        let mut blocks = MarkdownBlocks::new();
        blocks.push_block("   ");
        assert!(!blocks.has_content());
        assert_eq!(blocks.render("\n"), "");
    }

    #[test]
    fn test_custom_delimiter() {
        let mut blocks = MarkdownBlocks::new();
        blocks.push_block("a");
        blocks.push_block("b");
        assert_eq!(blocks.render("\r\n"), "a\r\n\r\nb");
    }

    #[test]
    fn test_append() {
        let mut main = MarkdownBlocks::new();
        main.push_item("slide");
        let mut notes = MarkdownBlocks::new();
        notes.push_heading(2, "Notes");
        main.append(&mut notes);

        assert!(notes.is_empty());
        assert_eq!(main.render("\n"), "- slide\n\n## Notes");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb", "\n"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\n\nb", "\n"), "a\n\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb", "\n"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n \n\t\n \nb", "\n"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\r\n\r\n\r\n\r\nb", "\r\n"), "a\r\n\r\nb");
    }
}
