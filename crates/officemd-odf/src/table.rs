//! OpenDocument table expansion
//!
//! Spreadsheets compress runs of identical cells and rows with
//! `table:number-columns-repeated` and `table:number-rows-repeated`.
//! Runs are expanded into literal cells, except that empty runs are held
//! back until something non-empty follows them: a row never ends in
//! empty cells and a table never ends in empty rows. Expansion beyond
//! [`MAX_DENSE_CELLS`] is reported as a corrupted file.

use roxmltree::Node;

use officemd_core::{GridTable, OfficeError, Result, MAX_DENSE_CELLS};

use crate::node::{gather_text, OdfNode, TABLE_NS, TEXT_NS};

/// Build a grid table from a `table:table` element.
///
/// Rows of nested tables belong to those tables and are not included.
pub fn build_table(table: Node) -> Result<GridTable> {
    let mut grid = GridTable::new();
    let mut pending_rows = 0usize;
    let mut width = 0usize;

    for row in table_rows(table) {
        let cells = expand_cells(row)?;
        let repeat = repeat_count(row, "number-rows-repeated");
        if cells.is_empty() {
            pending_rows = pending_rows.saturating_add(repeat);
            continue;
        }

        width = width.max(cells.len());
        let height = grid
            .row_count()
            .saturating_add(pending_rows)
            .saturating_add(repeat);
        check_area(height, width)?;

        for _ in 0..pending_rows {
            grid.push_row(Vec::new());
        }
        pending_rows = 0;
        for _ in 0..repeat {
            grid.push_row(cells.clone());
        }
    }

    Ok(grid)
}

fn check_area(rows: usize, cols: usize) -> Result<()> {
    let area = (rows as u64).saturating_mul(cols as u64);
    if area > MAX_DENSE_CELLS {
        return Err(OfficeError::corrupted(format!(
            "table expands to {rows} rows x {cols} columns"
        )));
    }
    Ok(())
}

/// Table name (`table:name`), if any
pub fn table_name<'a>(table: Node<'a, '_>) -> Option<&'a str> {
    table.attribute((TABLE_NS, "name"))
}

fn table_rows<'a, 'input>(table: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    table.descendants().filter(move |n| {
        n.is_element()
            && n.tag_name().namespace() == Some(TABLE_NS)
            && n.tag_name().name() == "table-row"
            && n
                .ancestors()
                .skip(1)
                .find(|a| OdfNode::of(*a) == OdfNode::Table)
                .is_some_and(|owner| owner == table)
    })
}

fn expand_cells(row: Node) -> Result<Vec<String>> {
    let mut cells = Vec::new();
    let mut pending_empty = 0usize;

    for cell in row.children().filter(|c| is_cell(*c)) {
        let text = cell_text(cell);
        let repeat = repeat_count(cell, "number-columns-repeated");
        if text.trim().is_empty() {
            pending_empty = pending_empty.saturating_add(repeat);
            continue;
        }
        let width = cells
            .len()
            .saturating_add(pending_empty)
            .saturating_add(repeat);
        check_area(1, width)?;

        cells.extend(std::iter::repeat(String::new()).take(pending_empty));
        pending_empty = 0;
        cells.extend(std::iter::repeat(text).take(repeat));
    }

    Ok(cells)
}

fn is_cell(node: Node) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(TABLE_NS)
        && matches!(node.tag_name().name(), "table-cell" | "covered-table-cell")
}

/// Cell text: its paragraphs, then those of nested tables, joined by newlines
fn cell_text(cell: Node) -> String {
    let mut paragraphs = Vec::new();
    let mut stack: Vec<Node> = cell.children().rev().collect();

    while let Some(node) = stack.pop() {
        if !node.is_element() {
            continue;
        }
        match (node.tag_name().namespace(), node.tag_name().name()) {
            (Some(TEXT_NS), "p" | "h") => {
                let text = gather_text(node);
                if !text.trim().is_empty() {
                    paragraphs.push(text);
                }
            }
            (Some(TABLE_NS), _) => stack.extend(node.children().rev()),
            _ => {}
        }
    }

    paragraphs.join("\n")
}

fn repeat_count(node: Node, attribute: &str) -> usize {
    node.attribute((TABLE_NS, attribute))
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn table_markdown(body: &str) -> String {
        let xml = format!(
            r#"<table:table xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" table:name="Sheet1">{body}</table:table>"#
        );
        let doc = Document::parse(&xml).unwrap();
        build_table(doc.root_element()).unwrap().to_markdown()
    }

    #[test]
    fn test_simple_table() {
        let markdown = table_markdown(
            r#"<table:table-column table:number-columns-repeated="2"/>
               <table:table-header-rows><table:table-row>
                 <table:table-cell><text:p>Name</text:p></table:table-cell>
                 <table:table-cell><text:p>Age</text:p></table:table-cell>
               </table:table-row></table:table-header-rows>
               <table:table-row>
                 <table:table-cell><text:p>Ann</text:p></table:table-cell>
                 <table:table-cell office:value-type="float" xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"><text:p>30</text:p></table:table-cell>
               </table:table-row>"#,
        );
        assert_eq!(markdown, "| Name | Age |\n| --- | --- |\n| Ann | 30 |");
    }

    #[test]
    fn test_repeated_cells_and_rows() {
        let markdown = table_markdown(
            r#"<table:table-row>
                 <table:table-cell table:number-columns-repeated="2"><text:p>x</text:p></table:table-cell>
                 <table:table-cell table:number-columns-repeated="3"/>
                 <table:table-cell><text:p>y</text:p></table:table-cell>
                 <table:table-cell table:number-columns-repeated="16378"/>
               </table:table-row>
               <table:table-row table:number-rows-repeated="2">
                 <table:table-cell><text:p>r</text:p></table:table-cell>
               </table:table-row>
               <table:table-row table:number-rows-repeated="1048570">
                 <table:table-cell table:number-columns-repeated="16384"/>
               </table:table-row>"#,
        );
        assert_eq!(
            markdown,
            "| x | x |  |  |  | y |\n| --- | --- | --- | --- | --- | --- |\n\
             | r |   |   |   |   |   |\n| r |   |   |   |   |   |"
        );
    }

    #[test]
    fn test_empty_rows_between_content_are_kept() {
        let markdown = table_markdown(
            r#"<table:table-row><table:table-cell><text:p>top</text:p></table:table-cell></table:table-row>
               <table:table-row table:number-rows-repeated="2"><table:table-cell/></table:table-row>
               <table:table-row><table:table-cell><text:p>bottom</text:p></table:table-cell></table:table-row>"#,
        );
        assert_eq!(
            markdown,
            "| top |\n| --- |\n|   |\n|   |\n| bottom |"
        );
    }

    #[test]
    fn test_multi_paragraph_cell_and_nested_table() {
        let markdown = table_markdown(
            r#"<table:table-row><table:table-cell>
                 <text:p>one</text:p><text:p>two</text:p>
                 <table:table><table:table-row><table:table-cell><text:p>inner</text:p></table:table-cell></table:table-row></table:table>
               </table:table-cell></table:table-row>"#,
        );
        assert_eq!(markdown, "| one<br>two<br>inner |\n| --- |");
    }

    #[test]
    fn test_nested_table_cells_keep_their_order() {
        let markdown = table_markdown(
            r#"<table:table-row><table:table-cell>
                 <table:table>
                   <table:table-row>
                     <table:table-cell><text:p>a</text:p></table:table-cell>
                     <table:table-cell><text:p>b</text:p></table:table-cell>
                   </table:table-row>
                   <table:table-row><table:table-cell><text:p>c</text:p></table:table-cell></table:table-row>
                 </table:table>
               </table:table-cell>
               <table:table-cell><text:p>after</text:p></table:table-cell></table:table-row>"#,
        );
        assert_eq!(markdown, "| a<br>b<br>c | after |\n| --- | --- |");
    }

    fn table_error(body: &str) -> officemd_core::ErrorKind {
        let xml = format!(
            r#"<table:table xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">{body}</table:table>"#
        );
        let doc = Document::parse(&xml).unwrap();
        build_table(doc.root_element()).unwrap_err().kind()
    }

    #[test]
    fn test_huge_repeat_of_filled_cell_is_corrupted() {
        let kind = table_error(
            r#"<table:table-row><table:table-cell table:number-columns-repeated="2000000000"><text:p>x</text:p></table:table-cell></table:table-row>"#,
        );
        assert_eq!(kind, officemd_core::ErrorKind::FileCorrupted);
    }

    #[test]
    fn test_huge_repeat_of_filled_row_is_corrupted() {
        let kind = table_error(
            r#"<table:table-row table:number-rows-repeated="1048576">
                 <table:table-cell table:number-columns-repeated="64"><text:p>x</text:p></table:table-cell>
               </table:table-row>"#,
        );
        assert_eq!(kind, officemd_core::ErrorKind::FileCorrupted);
    }

    #[test]
    fn test_all_empty_table() {
        let markdown = table_markdown(
            r#"<table:table-row table:number-rows-repeated="5"><table:table-cell table:number-columns-repeated="3"/></table:table-row>"#,
        );
        assert_eq!(markdown, "");
    }

    #[test]
    fn test_table_name() {
        let xml = r#"<table:table xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" table:name="Budget"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(table_name(doc.root_element()), Some("Budget"));
    }
}
