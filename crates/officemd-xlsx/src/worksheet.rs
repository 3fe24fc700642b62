//! Worksheet scanning (xl/worksheets/sheetN.xml)
//!
//! Cells are collected into a [`SparseGrid`] keyed by their A1 reference.
//! Writers may omit `r` on cells; such a cell sits in the enclosing
//! row, one column after the previous cell.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use officemd_core::xml::get_attr;
use officemd_core::{CellPosition, OfficeError, Result, SparseGrid};

use crate::shared_strings::SharedStrings;

/// Value type declared by a cell's `t` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    /// Number, or no `t` attribute
    #[default]
    Number,
    /// Index into the shared string table (`s`)
    SharedString,
    /// Text held in the cell (`inlineStr`)
    InlineString,
    /// Formula result string (`str`)
    FormulaString,
    /// `0` or `1` (`b`)
    Boolean,
    /// Error literal such as `#DIV/0!` (`e`)
    Error,
}

impl CellType {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("s") => CellType::SharedString,
            Some("inlineStr") => CellType::InlineString,
            Some("str") => CellType::FormulaString,
            Some("b") => CellType::Boolean,
            Some("e") => CellType::Error,
            _ => CellType::Number,
        }
    }
}

/// Scan a worksheet into a sparse grid, resolving shared strings
pub fn scan_worksheet(xml: &[u8], shared: &SharedStrings) -> Result<SparseGrid> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut scanner = Scanner::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => scanner.start(e),
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"row" => scanner.start(e),
                b"c" => {
                    scanner.start(e);
                    scanner.cell = None;
                }
                _ => {}
            },
            Event::Text(ref e) => {
                if let Some(cell) = scanner.cell.as_mut() {
                    if cell.in_value || cell.in_inline_text {
                        let text = e.unescape()?;
                        if cell.in_value {
                            cell.value.push_str(&text);
                        } else {
                            cell.inline.push_str(&text);
                        }
                    }
                }
            }
            Event::End(ref e) => scanner.end(e.local_name().as_ref(), shared)?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(scanner.grid)
}

#[derive(Default)]
struct Scanner {
    grid: SparseGrid,
    row: u32,
    last_col: u32,
    cell: Option<PendingCell>,
}

#[derive(Default)]
struct PendingCell {
    position: Option<CellPosition>,
    cell_type: CellType,
    value: String,
    inline: String,
    in_value: bool,
    in_inline: bool,
    in_inline_text: bool,
    phonetic_depth: usize,
}

impl Scanner {
    fn start(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"row" => {
                self.row = get_attr(e, b"r")
                    .and_then(|r| r.parse().ok())
                    .unwrap_or(self.row.saturating_add(1));
                self.last_col = 0;
            }
            b"c" => {
                let position = get_attr(e, b"r")
                    .and_then(|r| CellPosition::parse(&r))
                    .unwrap_or_else(|| {
                        CellPosition::new(self.row.max(1), self.last_col.saturating_add(1))
                    });
                self.last_col = position.col;
                self.cell = Some(PendingCell {
                    position: Some(position),
                    cell_type: CellType::from_attr(get_attr(e, b"t").as_deref()),
                    ..PendingCell::default()
                });
            }
            name => {
                if let Some(cell) = self.cell.as_mut() {
                    match name {
                        b"v" => cell.in_value = true,
                        b"is" => cell.in_inline = true,
                        b"rPh" => cell.phonetic_depth += 1,
                        b"t" => cell.in_inline_text = cell.in_inline && cell.phonetic_depth == 0,
                        _ => {}
                    }
                }
            }
        }
    }

    fn end(&mut self, name: &[u8], shared: &SharedStrings) -> Result<()> {
        if name == b"c" {
            if let Some(cell) = self.cell.take() {
                self.finish_cell(cell, shared)?;
            }
            return Ok(());
        }
        if let Some(cell) = self.cell.as_mut() {
            match name {
                b"v" => cell.in_value = false,
                b"is" => cell.in_inline = false,
                b"rPh" => cell.phonetic_depth = cell.phonetic_depth.saturating_sub(1),
                b"t" => cell.in_inline_text = false,
                _ => {}
            }
        }
        Ok(())
    }

    fn finish_cell(&mut self, cell: PendingCell, shared: &SharedStrings) -> Result<()> {
        let Some(position) = cell.position else {
            return Ok(());
        };
        let Some(text) = resolve_value(&cell, shared)? else {
            return Ok(());
        };
        trace!(cell = %position.reference(), "cell value");
        self.grid.insert(position, text);
        Ok(())
    }
}

/// Resolve a cell's display text; `None` when the cell holds no value
fn resolve_value(cell: &PendingCell, shared: &SharedStrings) -> Result<Option<String>> {
    if cell.cell_type == CellType::InlineString {
        return Ok(Some(cell.inline.clone()).filter(|s| !s.is_empty()));
    }

    let raw = cell.value.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let text = match cell.cell_type {
        CellType::SharedString => {
            let index: usize = raw
                .parse()
                .map_err(|_| OfficeError::corrupted(format!("invalid shared string index '{raw}'")))?;
            shared
                .get(index)
                .ok_or_else(|| {
                    OfficeError::corrupted(format!(
                        "shared string index {index} out of range ({} strings)",
                        shared.len()
                    ))
                })?
                .to_string()
        }
        CellType::Boolean => match raw {
            "1" | "true" => "TRUE".to_string(),
            "0" | "false" => "FALSE".to_string(),
            other => other.to_string(),
        },
        CellType::Number | CellType::FormulaString | CellType::Error | CellType::InlineString => {
            cell.value.clone()
        }
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use officemd_core::test_utils::{xlsx_shared_strings, xlsx_sheet};
    use officemd_core::ErrorKind;

    fn shared(strings: &[&str]) -> SharedStrings {
        SharedStrings::parse(xlsx_shared_strings(strings).as_bytes()).unwrap()
    }

    fn at(grid: &SparseGrid, reference: &str) -> Option<String> {
        grid.get(CellPosition::parse(reference).unwrap())
            .map(str::to_string)
    }

    #[test]
    fn test_shared_and_numeric_cells() {
        let xml = xlsx_sheet(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
               <row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>30</v></c></row>"#,
        );
        let grid = scan_worksheet(xml.as_bytes(), &shared(&["Name", "Age", "Ann"])).unwrap();
        assert_eq!(grid.max_row(), 2);
        assert_eq!(grid.max_col(), 2);
        assert_eq!(at(&grid, "A1").as_deref(), Some("Name"));
        assert_eq!(at(&grid, "B2").as_deref(), Some("30"));
    }

    #[test]
    fn test_typed_cells() {
        let xml = xlsx_sheet(
            r#"<row r="1">
                <c r="A1" t="b"><v>1</v></c>
                <c r="B1" t="b"><v>0</v></c>
                <c r="C1" t="inlineStr"><is><t>inline</t></is></c>
                <c r="D1" t="str"><f>CONCAT("a","b")</f><v>ab</v></c>
                <c r="E1" t="e"><v>#DIV/0!</v></c>
                <c r="F1" s="3"/>
                <c r="G1"><f>SUM(A1:B1)</f></c>
            </row>"#,
        );
        let grid = scan_worksheet(xml.as_bytes(), &SharedStrings::default()).unwrap();
        assert_eq!(at(&grid, "A1").as_deref(), Some("TRUE"));
        assert_eq!(at(&grid, "B1").as_deref(), Some("FALSE"));
        assert_eq!(at(&grid, "C1").as_deref(), Some("inline"));
        assert_eq!(at(&grid, "D1").as_deref(), Some("ab"));
        assert_eq!(at(&grid, "E1").as_deref(), Some("#DIV/0!"));
        assert_eq!(at(&grid, "F1"), None);
        assert_eq!(at(&grid, "G1"), None);
        assert_eq!(grid.max_col(), 5);
    }

    #[test]
    fn test_cells_without_reference() {
        let xml = xlsx_sheet(
            r#"<row r="3"><c><v>1</v></c><c/><c><v>3</v></c></row>
               <row><c><v>4</v></c></row>"#,
        );
        let grid = scan_worksheet(xml.as_bytes(), &SharedStrings::default()).unwrap();
        assert_eq!(at(&grid, "A3").as_deref(), Some("1"));
        assert_eq!(at(&grid, "B3"), None);
        assert_eq!(at(&grid, "C3").as_deref(), Some("3"));
        assert_eq!(at(&grid, "A4").as_deref(), Some("4"));
    }

    #[test]
    fn test_absolute_reference_and_gaps() {
        let xml = xlsx_sheet(r#"<row r="5"><c r="$D$5"><v>x</v></c></row>"#);
        let grid = scan_worksheet(xml.as_bytes(), &SharedStrings::default()).unwrap();
        assert_eq!(grid.max_row(), 5);
        assert_eq!(grid.max_col(), 4);
        assert_eq!(at(&grid, "D5").as_deref(), Some("x"));
    }

    #[test]
    fn test_implicit_positions_after_last_row_and_column() {
        let xml = xlsx_sheet(
            r#"<row r="4294967295"><c r="MWLQKWU4294967295"><v>edge</v></c><c><v>next</v></c></row>
               <row><c><v>below</v></c></row>"#,
        );
        let grid = scan_worksheet(xml.as_bytes(), &SharedStrings::default()).unwrap();
        assert_eq!(grid.max_row(), u32::MAX);
        assert_eq!(grid.max_col(), u32::MAX);
        assert_eq!(at(&grid, "MWLQKWU4294967295").as_deref(), Some("next"));
        assert_eq!(at(&grid, "A4294967295").as_deref(), Some("below"));
    }

    #[test]
    fn test_unknown_entity_in_value() {
        let xml = xlsx_sheet(r#"<row r="1"><c r="A1" t="str"><v>&undefined;</v></c></row>"#);
        let err = scan_worksheet(xml.as_bytes(), &SharedStrings::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileCorrupted);
    }

    #[test]
    fn test_shared_string_out_of_range() {
        let xml = xlsx_sheet(r#"<row r="1"><c r="A1" t="s"><v>7</v></c></row>"#);
        let err = scan_worksheet(xml.as_bytes(), &shared(&["only"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileCorrupted);
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_empty_sheet() {
        let xml = xlsx_sheet("");
        let grid = scan_worksheet(xml.as_bytes(), &SharedStrings::default()).unwrap();
        assert!(grid.is_empty());
    }
}
