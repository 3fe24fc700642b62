//! Grid table reconstruction and Markdown pipe-table rendering
//!
//! Word-processing, spreadsheet and OpenDocument tables all end up as a
//! [`GridTable`]: rows of cell text in document order. Rendering pads
//! ragged rows so every emitted row has the same number of cells.
//!
//! Spreadsheets address cells by reference (`B7`) rather than by position
//! in a row, so they are collected into a [`SparseGrid`] first and
//! densified once the sheet has been scanned.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{OfficeError, Result};

/// Placeholder used to pad short rows
pub const PAD_CELL: &str = " ";

/// Marker rendered for a spreadsheet with no populated cell
pub const EMPTY_SHEET: &str = "*(empty sheet)*";

/// Most cells a densified grid may hold
pub const MAX_DENSE_CELLS: u64 = 1 << 22;

/// A table as rows of cell text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridTable {
    rows: Vec<Vec<String>>,
    max_cols: usize,
}

impl GridTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, tracking the widest row seen so far
    pub fn push_row(&mut self, row: Vec<String>) {
        self.max_cols = self.max_cols.max(row.len());
        self.rows.push(row);
    }

    /// Number of rows collected
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn max_cols(&self) -> usize {
        self.max_cols
    }

    /// True when rendering would produce no output
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.max_cols == 0
    }

    /// Render as a Markdown pipe table, rows separated by `\n`.
    ///
    /// Row 0 is the header. Returns an empty string for a table with no
    /// rows or no columns.
    pub fn to_markdown(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        let mut rows = self.rows.iter();

        if let Some(header) = rows.next() {
            lines.push(self.render_row(header));
        }
        lines.push(render_cells(
            std::iter::repeat("---".to_string()).take(self.max_cols),
        ));
        for row in rows {
            lines.push(self.render_row(row));
        }

        lines.join("\n")
    }

    fn render_row(&self, row: &[String]) -> String {
        let padding = self.max_cols - row.len();
        render_cells(
            row.iter()
                .map(|cell| escape_cell(cell))
                .chain(std::iter::repeat(PAD_CELL.to_string()).take(padding)),
        )
    }
}

fn render_cells(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.collect();
    format!("| {} |", cells.join(" | "))
}

/// Escape a cell value so it stays on one physical table row
pub fn escape_cell(value: &str) -> String {
    value
        .trim()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

/// A 1-based cell position decoded from an A1-style reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPosition {
    /// Row number, starting at 1
    pub row: u32,
    /// Column number, starting at 1 (`A`)
    pub col: u32,
}

impl CellPosition {
    /// Create a position
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a reference such as `AA12` or `$B$3`
    pub fn parse(reference: &str) -> Option<Self> {
        let cleaned: String = reference.chars().filter(|c| *c != '$').collect();
        let split = cleaned.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = cleaned.split_at(split);

        let col = column_index(letters)?;
        let row: u32 = digits.parse().ok()?;
        if row == 0 {
            return None;
        }
        Some(Self { row, col })
    }

    /// Format back to an A1-style reference
    pub fn reference(&self) -> String {
        format!("{}{}", column_letters(self.col), self.row)
    }
}

/// Decode column letters into a 1-based index (`A` = 1, `AA` = 27)
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index)
}

/// Encode a 1-based column index as letters. Column 0 has no letters.
pub fn column_letters(index: u32) -> String {
    let mut remaining = index;
    let mut letters = Vec::new();
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// How a densified [`SparseGrid`] labels its columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnHeader {
    /// Prepend a row of column letters (`A`, `B`, ...)
    Letters,
    /// Use the first populated row as the header
    FirstRow,
}

/// Cells keyed by position, with running bounds
#[derive(Debug, Clone, Default)]
pub struct SparseGrid {
    cells: BTreeMap<(u32, u32), String>,
    max_row: u32,
    max_col: u32,
}

impl SparseGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value at that position
    pub fn insert(&mut self, position: CellPosition, value: impl Into<String>) {
        self.max_row = self.max_row.max(position.row);
        self.max_col = self.max_col.max(position.col);
        self.cells.insert((position.row, position.col), value.into());
    }

    /// Look up a value
    pub fn get(&self, position: CellPosition) -> Option<&str> {
        self.cells
            .get(&(position.row, position.col))
            .map(String::as_str)
    }

    /// Highest row seen
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// Highest column seen
    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    /// True when no cell was inserted
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Densify into a table covering `1..=max_row` x `1..=max_col`.
    ///
    /// When that area exceeds [`MAX_DENSE_CELLS`], rows and columns holding
    /// no cell are left out; letter headers still name the real columns.
    /// A grid that is too large even then is reported as corrupted.
    pub fn into_table(mut self, header: ColumnHeader) -> Result<GridTable> {
        let mut table = GridTable::new();
        if self.is_empty() {
            return Ok(table);
        }

        let area = u64::from(self.max_row) * u64::from(self.max_col);
        let (rows, cols): (Vec<u32>, Vec<u32>) = if area <= MAX_DENSE_CELLS {
            ((1..=self.max_row).collect(), (1..=self.max_col).collect())
        } else {
            let rows: BTreeSet<u32> = self.cells.keys().map(|&(row, _)| row).collect();
            let cols: BTreeSet<u32> = self.cells.keys().map(|&(_, col)| col).collect();
            debug!(area, rows = rows.len(), cols = cols.len(), "dropping empty rows and columns");
            (rows.into_iter().collect(), cols.into_iter().collect())
        };

        let kept = rows.len() as u64 * cols.len() as u64;
        if kept > MAX_DENSE_CELLS {
            return Err(OfficeError::corrupted(format!(
                "grid of {} rows x {} columns exceeds {MAX_DENSE_CELLS} cells",
                rows.len(),
                cols.len()
            )));
        }

        if header == ColumnHeader::Letters {
            table.push_row(cols.iter().map(|&col| column_letters(col)).collect());
        }

        for row in rows {
            let cells = cols
                .iter()
                .map(|&col| self.cells.remove(&(row, col)).unwrap_or_default())
                .collect();
            table.push_row(cells);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_column_letters_roundtrip() {
        for index in 1..=20_000 {
            let letters = column_letters(index);
            assert_eq!(column_index(&letters), Some(index), "{letters}");
        }
    }

    #[test]
    fn test_column_letters_known_values() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(0), "");
        assert_eq!(column_index("xfd"), Some(16384));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
    }

    #[test]
    fn test_cell_position_parse() {
        assert_eq!(CellPosition::parse("A1"), Some(CellPosition::new(1, 1)));
        assert_eq!(CellPosition::parse("AA12"), Some(CellPosition::new(12, 27)));
        assert_eq!(CellPosition::parse("$C$5"), Some(CellPosition::new(5, 3)));
        assert_eq!(CellPosition::parse("A0"), None);
        assert_eq!(CellPosition::parse("12"), None);
        assert_eq!(CellPosition::parse("B"), None);
        assert_eq!(CellPosition::new(12, 27).reference(), "AA12");
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let mut table = GridTable::new();
        table.push_row(row(&["a"]));
        table.push_row(row(&["b", "c", "d"]));
        table.push_row(row(&[]));

        let markdown = table.to_markdown();
        let lines: Vec<&str> = markdown.lines().collect();
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert_eq!(line.matches(" | ").count() + 1, 3, "{line}");
        }
        assert_eq!(lines[0], "| a |   |   |");
        assert_eq!(lines[1], "| --- | --- | --- |");
        assert_eq!(lines[2], "| b | c | d |");
    }

    #[test]
    fn test_empty_tables_render_nothing() {
        assert_eq!(GridTable::new().to_markdown(), "");

        let mut no_columns = GridTable::new();
        no_columns.push_row(Vec::new());
        no_columns.push_row(Vec::new());
        assert!(no_columns.is_empty());
        assert_eq!(no_columns.to_markdown(), "");
    }

    #[test]
    fn test_cell_escaping() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("line1\nline2"), "line1<br>line2");
        assert_eq!(escape_cell("line1\r\nline2\rline3"), "line1<br>line2<br>line3");

        let mut table = GridTable::new();
        table.push_row(row(&["Key", "Value"]));
        table.push_row(row(&["pipe", "x | y"]));
        table.push_row(row(&["multi", "first\nsecond"]));
        let markdown = table.to_markdown();
        assert_eq!(markdown.lines().count(), 4);
        assert!(markdown.contains("| pipe | x \\| y |"));
        assert!(markdown.contains("| multi | first<br>second |"));
    }

    #[test]
    fn test_sparse_grid_with_letter_header() {
        let mut grid = SparseGrid::new();
        grid.insert(CellPosition::new(1, 1), "Name");
        grid.insert(CellPosition::new(1, 2), "Age");
        grid.insert(CellPosition::new(2, 1), "Ann");
        grid.insert(CellPosition::new(2, 2), "30");

        let markdown = grid.into_table(ColumnHeader::Letters).unwrap().to_markdown();
        assert_eq!(
            markdown,
            "| A | B |\n| --- | --- |\n| Name | Age |\n| Ann | 30 |"
        );
    }

    #[test]
    fn test_sparse_grid_fills_gaps() {
        let mut grid = SparseGrid::new();
        grid.insert(CellPosition::new(3, 2), "x");
        assert_eq!(grid.max_row(), 3);
        assert_eq!(grid.max_col(), 2);

        let table = grid.into_table(ColumnHeader::FirstRow).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.to_markdown().lines().last(), Some("|  | x |"));
    }

    #[test]
    fn test_far_cell_keeps_only_occupied_lines() {
        let mut grid = SparseGrid::new();
        grid.insert(CellPosition::new(1, 1), "first");
        grid.insert(CellPosition::parse("XFD1048576").unwrap(), "last");

        let markdown = grid.into_table(ColumnHeader::Letters).unwrap().to_markdown();
        assert_eq!(
            markdown,
            "| A | XFD |\n| --- | --- |\n| first |  |\n|  | last |"
        );
    }

    #[test]
    fn test_oversized_scattered_grid_is_rejected() {
        let mut grid = SparseGrid::new();
        for i in 1..=2100 {
            grid.insert(CellPosition::new(i * 1000, i * 3), "x");
        }
        let err = grid.into_table(ColumnHeader::Letters).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::FileCorrupted);
    }

    #[test]
    fn test_empty_sparse_grid() {
        let grid = SparseGrid::new();
        assert!(grid.into_table(ColumnHeader::Letters).unwrap().is_empty());
    }
}
