//! Presentation synthesis (pptx -> Markdown)

use tracing::debug;

use officemd_core::{
    collapse_blank_lines, Config, ExtractedFile, Format, MarkdownBlocks, OfficeError, Result,
    Synthesizer,
};

use crate::slide::{PartKind, SlideContent, SlidePart};

/// Renders presentations as Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxSynthesizer;

impl PptxSynthesizer {
    /// Create a new synthesizer
    pub fn new() -> Self {
        Self
    }

    /// Parse the selected parts and order them by slide number
    pub fn parts(&self, files: &[ExtractedFile], config: &Config) -> Result<Vec<SlidePart>> {
        let mut parts = Vec::new();
        for file in files {
            let Some(kind) = PartKind::from_path(&file.path) else {
                continue;
            };
            if kind == PartKind::Notes && config.ignore_notes {
                debug!(part = %file.path, "skipping notes");
                continue;
            }
            parts.push(SlidePart::parse(&file.path, kind, file.content.as_bytes())?);
        }
        // Stable: parts sharing a key keep container order
        parts.sort_by_key(SlidePart::order_key);
        Ok(parts)
    }
}

impl Synthesizer for PptxSynthesizer {
    fn format(&self) -> Format {
        Format::Pptx
    }

    fn synthesize(&self, files: &[ExtractedFile], config: &Config) -> Result<String> {
        let parts = self.parts(files, config)?;
        let slide_count = parts.iter().filter(|p| p.kind == PartKind::Slide).count();
        if slide_count == 0 {
            return Err(OfficeError::corrupted("no slides found in presentation"));
        }
        debug!(
            slides = slide_count,
            notes = parts.len() - slide_count,
            "rendering presentation"
        );

        let mut out = MarkdownBlocks::new();
        let mut deferred = MarkdownBlocks::new();
        let mut current: Option<Option<u32>> = None;

        for part in &parts {
            let label = slide_label(part.index);
            match part.kind {
                PartKind::Slide => {
                    if current != Some(part.index) {
                        out.push_heading(2, &format!("Slide {label}"));
                        current = Some(part.index);
                    }
                    for content in &part.content {
                        match content {
                            SlideContent::Paragraph(text) => out.push_item(&text.replace('\n', " ")),
                            SlideContent::Table(table) => out.push_block(table.to_markdown()),
                        }
                    }
                }
                PartKind::Notes if part.is_empty() => {}
                PartKind::Notes if config.put_notes_at_last => {
                    deferred.push_heading(3, &format!("Slide {label}"));
                    push_notes(&mut deferred, &part.content);
                }
                PartKind::Notes => {
                    if current != Some(part.index) {
                        out.push_heading(2, &format!("Slide {label}"));
                        current = Some(part.index);
                    }
                    out.push_heading(3, "Notes");
                    push_notes(&mut out, &part.content);
                }
            }
        }

        if deferred.has_content() {
            out.push_heading(2, "Notes");
            out.append(&mut deferred);
        }

        let delimiter = &config.newline_delimiter;
        Ok(collapse_blank_lines(&out.render(delimiter), delimiter))
    }
}

fn slide_label(index: Option<u32>) -> String {
    index.map_or_else(|| "?".to_string(), |n| n.to_string())
}

fn push_notes(out: &mut MarkdownBlocks, content: &[SlideContent]) {
    for item in content {
        match item {
            SlideContent::Paragraph(text) => out.push_line(text.as_str()),
            SlideContent::Table(table) => out.push_block(table.to_markdown()),
        }
    }
    out.push_blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use officemd_core::test_utils::{pptx_slide, zip_fixture};

    fn notes(text: &str) -> String {
        format!(
            r#"<p:notes xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>
                <p:sp><p:nvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>
                <p:sp><p:nvSpPr><p:nvPr><p:ph type="sldNum" idx="5"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:fld type="slidenum"><a:t>9</a:t></a:fld></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:notes>"#
        )
    }

    fn deck() -> Vec<u8> {
        zip_fixture(&[
            ("ppt/slides/slide10.xml", &pptx_slide(&["Tenth"])),
            ("ppt/notesSlides/notesSlide1.xml", &notes("Welcome everyone")),
            ("ppt/slides/slide2.xml", &pptx_slide(&["Second", "More"])),
            ("ppt/slides/slide1.xml", &pptx_slide(&["First"])),
            ("ppt/presentation.xml", "<p:presentation/>"),
        ])
    }

    fn render(config: &Config) -> String {
        PptxSynthesizer::new()
            .synthesize_bytes(&deck(), config)
            .unwrap()
    }

    #[test]
    fn test_slides_in_numeric_order_with_inline_notes() {
        assert_eq!(
            render(&Config::default()),
            "## Slide 1\n\n- First\n\n### Notes\n\nWelcome everyone\n\n\
             ## Slide 2\n\n- Second\n- More\n\n\
             ## Slide 10\n\n- Tenth"
        );
    }

    #[test]
    fn test_ignore_notes() {
        let markdown = render(&Config::default().with_ignore_notes(true));
        assert!(!markdown.contains("Welcome"));
        assert!(!markdown.contains("Notes"));
        assert!(markdown.starts_with("## Slide 1\n\n- First\n\n## Slide 2"));
    }

    #[test]
    fn test_notes_at_last() {
        let markdown = render(&Config::default().with_notes_at_last(true));
        assert_eq!(
            markdown,
            "## Slide 1\n\n- First\n\n\
             ## Slide 2\n\n- Second\n- More\n\n\
             ## Slide 10\n\n- Tenth\n\n\
             ## Notes\n\n### Slide 1\n\nWelcome everyone"
        );
    }

    #[test]
    fn test_notes_without_slide() {
        let bytes = zip_fixture(&[
            ("ppt/slides/slide1.xml", &pptx_slide(&["Only"])),
            ("ppt/notesSlides/notesSlide3.xml", &notes("Orphan")),
        ]);
        let markdown = PptxSynthesizer::new()
            .synthesize_bytes(&bytes, &Config::default())
            .unwrap();
        assert_eq!(
            markdown,
            "## Slide 1\n\n- Only\n\n## Slide 3\n\n### Notes\n\nOrphan"
        );
    }

    #[test]
    fn test_no_slides_is_corrupted() {
        let bytes = zip_fixture(&[("ppt/notesSlides/notesSlide1.xml", &notes("x"))]);
        let err = PptxSynthesizer::new()
            .synthesize_bytes(&bytes, &Config::default())
            .unwrap_err();
        assert_eq!(err.kind(), officemd_core::ErrorKind::FileCorrupted);
    }

    #[test]
    fn test_custom_delimiter() {
        let bytes = zip_fixture(&[("ppt/slides/slide1.xml", &pptx_slide(&["a", "b"]))]);
        let config = Config::default().with_newline_delimiter("\r\n");
        let markdown = PptxSynthesizer::new()
            .synthesize_bytes(&bytes, &config)
            .unwrap();
        assert_eq!(markdown, "## Slide 1\r\n\r\n- a\r\n- b");
    }
}
