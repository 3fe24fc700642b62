//! Style definitions parsing (word/styles.xml)
//!
//! Paragraphs reference styles by id. Only the heading classification of
//! a style matters for Markdown output: a style is a heading when its
//! display name reads `heading <n>` (any case, optional whitespace) or is
//! `Title`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use officemd_core::xml::get_attr;
use officemd_core::Result;

static HEADING_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^heading\s*(\d+)$").unwrap());

/// Deepest heading level Markdown can express
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Collection of styles from a document, keyed by style id
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, StyleInfo>,
}

/// A Word style definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleInfo {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    /// Style type
    pub style_type: StyleType,
    /// Whether paragraphs with this style are headings
    pub is_heading: bool,
    /// Heading level, 1..=6
    pub heading_level: Option<u8>,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleType {
    fn from_attr(value: &str) -> Self {
        match value {
            "character" => StyleType::Character,
            "table" => StyleType::Table,
            "numbering" => StyleType::Numbering,
            _ => StyleType::Paragraph,
        }
    }
}

/// Heading level implied by a style's display name
pub fn heading_level_for_name(name: &str) -> Option<u8> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("title") {
        return Some(1);
    }
    let caps = HEADING_NAME.captures(name)?;
    let level: u32 = caps[1].parse().ok()?;
    if level == 0 {
        return None;
    }
    Some(level.min(MAX_HEADING_LEVEL as u32) as u8)
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current_style: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(ref e) if e.local_name().as_ref() == b"style" => {
                    if let Some(style) = StyleBuilder::from_element(e).build() {
                        stylesheet.styles.insert(style.id.clone(), style);
                    }
                }
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"style" => current_style = Some(StyleBuilder::from_element(e)),
                    b"name" => {
                        if let Some(style) = current_style.as_mut() {
                            style.name = get_attr(e, b"w:val");
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) if e.local_name().as_ref() == b"style" => {
                    if let Some(style) = current_style.take().and_then(StyleBuilder::build) {
                        stylesheet.styles.insert(style.id.clone(), style);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(stylesheet)
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&StyleInfo> {
        self.styles.get(id)
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True when the document declared no styles
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Get all heading styles
    pub fn heading_styles(&self) -> impl Iterator<Item = &StyleInfo> {
        self.styles.values().filter(|s| s.is_heading)
    }

    /// Get the heading level for a style, if it's a heading
    pub fn heading_level(&self, style_id: &str) -> Option<u8> {
        self.get(style_id).and_then(|s| s.heading_level)
    }
}

struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: StyleType,
}

impl StyleBuilder {
    fn from_element(e: &BytesStart) -> Self {
        Self {
            id: get_attr(e, b"w:styleId"),
            style_type: get_attr(e, b"w:type")
                .map(|t| StyleType::from_attr(&t))
                .unwrap_or(StyleType::Paragraph),
            name: None,
        }
    }

    fn build(self) -> Option<StyleInfo> {
        let id = self.id?;
        let name = self.name.unwrap_or_else(|| id.clone());
        let heading_level = heading_level_for_name(&name);
        Some(StyleInfo {
            id,
            name,
            style_type: self.style_type,
            is_heading: heading_level.is_some(),
            heading_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_names() {
        assert_eq!(heading_level_for_name("heading 1"), Some(1));
        assert_eq!(heading_level_for_name("Heading 3"), Some(3));
        assert_eq!(heading_level_for_name("HEADING2"), Some(2));
        assert_eq!(heading_level_for_name("heading   4"), Some(4));
        assert_eq!(heading_level_for_name("Title"), Some(1));
        assert_eq!(heading_level_for_name("heading 9"), Some(6));
        assert_eq!(heading_level_for_name("heading 0"), None);
        assert_eq!(heading_level_for_name("Subtitle"), None);
        assert_eq!(heading_level_for_name("Heading 1 Char"), None);
    }

    #[test]
    fn test_parse_heading_style() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
        <w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:style w:type="paragraph" w:styleId="Heading1">
                <w:name w:val="heading 1"/>
                <w:basedOn w:val="Normal"/>
                <w:pPr>
                    <w:outlineLvl w:val="0"/>
                </w:pPr>
            </w:style>
            <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
                <w:name w:val="Normal"/>
            </w:style>
            <w:style w:type="character" w:styleId="Heading1Char">
                <w:name w:val="Heading 1 Char"/>
            </w:style>
        </w:styles>"#;

        let styles = StyleSheet::parse(xml).unwrap();
        assert_eq!(styles.len(), 3);

        let h1 = styles.get("Heading1").unwrap();
        assert_eq!(h1.name, "heading 1");
        assert_eq!(h1.style_type, StyleType::Paragraph);
        assert!(h1.is_heading);
        assert_eq!(styles.heading_level("Heading1"), Some(1));

        assert!(!styles.get("Normal").unwrap().is_heading);
        assert_eq!(
            styles.get("Heading1Char").unwrap().style_type,
            StyleType::Character
        );
        assert_eq!(styles.heading_styles().count(), 1);
    }

    #[test]
    fn test_localized_ids_use_display_name() {
        let xml = br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:style w:type="paragraph" w:styleId="berschrift2"><w:name w:val="heading 2"/></w:style>
            <w:style w:type="paragraph" w:styleId="Titel"><w:name w:val="Title"/></w:style>
        </w:styles>"#;

        let styles = StyleSheet::parse(xml).unwrap();
        assert_eq!(styles.heading_level("berschrift2"), Some(2));
        assert_eq!(styles.heading_level("Titel"), Some(1));
    }

    #[test]
    fn test_style_without_name_falls_back_to_id() {
        let xml = br#"<w:styles xmlns:w="x"><w:style w:styleId="Heading5"/></w:styles>"#;
        let styles = StyleSheet::parse(xml).unwrap();
        assert_eq!(styles.heading_level("Heading5"), Some(5));
    }

    #[test]
    fn test_self_closing_styles_between_full_ones() {
        let xml = br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:style w:type="paragraph" w:styleId="Heading3"/>
            <w:style w:type="paragraph" w:styleId="Quote"><w:name w:val="Quote"/></w:style>
            <w:style w:type="character" w:styleId="Strong"/>
        </w:styles>"#;

        let styles = StyleSheet::parse(xml).unwrap();
        assert_eq!(styles.len(), 3);
        assert_eq!(styles.heading_level("Heading3"), Some(3));
        assert_eq!(styles.get("Quote").unwrap().name, "Quote");
        assert_eq!(styles.get("Strong").unwrap().style_type, StyleType::Character);
    }

    #[test]
    fn test_empty_stylesheet() {
        let styles = StyleSheet::default();
        assert!(styles.is_empty());
        assert_eq!(styles.heading_level("Heading1"), None);
    }
}
