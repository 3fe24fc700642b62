//! Element classification and text gathering for OpenDocument trees

use roxmltree::Node;

/// `text:` namespace
pub const TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";
/// `table:` namespace
pub const TABLE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";
/// `draw:` namespace
pub const DRAW_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";
/// `office:` namespace
pub const OFFICE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// Element kinds the synthesizer acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdfNode {
    /// `text:h`
    Heading,
    /// `text:p`
    Paragraph,
    /// `table:table`
    Table,
    /// `draw:page`
    Page,
    /// `office:annotation`
    Annotation,
    /// Anything else
    Other,
}

impl OdfNode {
    /// Classify an element by namespace and local name
    pub fn of(node: Node) -> Self {
        if !node.is_element() {
            return OdfNode::Other;
        }
        let tag = node.tag_name();
        match (tag.namespace(), tag.name()) {
            (Some(TEXT_NS), "h") => OdfNode::Heading,
            (Some(TEXT_NS), "p") => OdfNode::Paragraph,
            (Some(TABLE_NS), "table") => OdfNode::Table,
            (Some(DRAW_NS), "page") => OdfNode::Page,
            (Some(OFFICE_NS), "annotation") => OdfNode::Annotation,
            _ => OdfNode::Other,
        }
    }

    /// Heading or paragraph
    pub fn is_text_block(self) -> bool {
        matches!(self, OdfNode::Heading | OdfNode::Paragraph)
    }
}

/// Nearest strict ancestor matching `pred`
pub fn find_ancestor<'a, 'input>(
    node: Node<'a, 'input>,
    pred: impl Fn(Node<'a, 'input>) -> bool,
) -> Option<Node<'a, 'input>> {
    node.ancestors().skip(1).find(|a| pred(*a))
}

/// Whether any strict ancestor is of the given kind
pub fn has_ancestor(node: Node, kind: OdfNode) -> bool {
    find_ancestor(node, |a| OdfNode::of(a) == kind).is_some()
}

/// Nearest notes container (`presentation:notes`) above the node
pub fn notes_ancestor<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    find_ancestor(node, |a| a.is_element() && a.tag_name().name() == "notes")
}

/// Plain text of an element.
///
/// `text:s` expands to `text:c` spaces (default one), `text:tab` to a tab
/// and `text:line-break` to a newline. Annotations are left out. Nested
/// paragraphs contribute their text in place.
pub fn gather_text(node: Node) -> String {
    let mut out = String::new();
    let mut stack: Vec<Node> = node.children().rev().collect();

    while let Some(current) = stack.pop() {
        if current.is_text() {
            out.push_str(current.text().unwrap_or_default());
            continue;
        }
        if !current.is_element() {
            continue;
        }
        let tag = current.tag_name();
        match (tag.namespace(), tag.name()) {
            (Some(TEXT_NS), "s") => {
                let count = current
                    .attribute((TEXT_NS, "c"))
                    .and_then(|c| c.parse::<usize>().ok())
                    .unwrap_or(1);
                out.extend(std::iter::repeat(' ').take(count));
            }
            (Some(TEXT_NS), "tab") => out.push('\t'),
            (Some(TEXT_NS), "line-break") => out.push('\n'),
            (Some(OFFICE_NS), "annotation") | (Some(OFFICE_NS), "annotation-end") => {}
            _ => stack.extend(current.children().rev()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn first<'a, 'input>(doc: &'a Document<'input>, kind: OdfNode) -> Node<'a, 'input> {
        doc.descendants()
            .find(|n| OdfNode::of(*n) == kind)
            .unwrap()
    }

    const NS: &str = r#"xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:dc="http://purl.org/dc/elements/1.1/""#;

    #[test]
    fn test_spacing_elements() {
        let xml = format!(
            r#"<text:p {NS}>a<text:s/>b<text:s text:c="3"/>c<text:tab/>d<text:line-break/>e</text:p>"#
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(gather_text(first(&doc, OdfNode::Paragraph)), "a b   c\td\ne");
    }

    #[test]
    fn test_spans_and_annotations() {
        let xml = format!(
            r#"<text:p {NS}>Hello <text:span>bold</text:span><office:annotation><dc:creator>Ann</dc:creator><text:p>review</text:p></office:annotation> world</text:p>"#
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(gather_text(first(&doc, OdfNode::Paragraph)), "Hello bold world");
    }

    #[test]
    fn test_ancestor_checks() {
        let xml = format!(
            r#"<office:annotation {NS}><text:p>outer<text:p>inner</text:p></text:p></office:annotation>"#
        );
        let doc = Document::parse(&xml).unwrap();
        let paragraphs: Vec<Node> = doc
            .descendants()
            .filter(|n| OdfNode::of(*n) == OdfNode::Paragraph)
            .collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(!has_ancestor(paragraphs[0], OdfNode::Paragraph));
        assert!(has_ancestor(paragraphs[1], OdfNode::Paragraph));
        assert!(has_ancestor(paragraphs[0], OdfNode::Annotation));
        assert!(notes_ancestor(paragraphs[0]).is_none());
    }

    #[test]
    fn test_unprefixed_elements_are_other() {
        let doc = Document::parse("<p>text</p>").unwrap();
        assert_eq!(OdfNode::of(doc.root_element()), OdfNode::Other);
    }
}
