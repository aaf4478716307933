// Licensed under the Apache-2.0 license

//! The tabular-reader seam.
//!
//! The extractor only needs positional cell access. [`Sheet`] is that
//! contract; [`Grid`] is the in-memory implementation that both the workbook
//! loader and the tests produce.

use std::borrow::Cow;
use std::fmt;

/// The value of one cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    /// Text, already trimmed of surrounding whitespace.
    Text(String),
}

impl CellValue {
    /// Build a text cell, trimming it. Blank text is an empty cell.
    pub fn text(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The cell rendered as text. Integral numbers print without a fraction.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s),
            CellValue::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    /// Integer conversion: numbers truncate toward zero, text must be a
    /// plain (optionally signed) decimal integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            CellValue::Number(_) => None,
            CellValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Spreadsheet-style name of a zero-based cell position, e.g. `(4, 27)` is `AB5`.
pub fn cell_name(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut c = col + 1;
    while c > 0 {
        let rem = (c - 1) % 26;
        letters.push(b'A' + rem as u8);
        c = (c - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}

/// Positional read access to one worksheet.
pub trait Sheet {
    fn num_rows(&self) -> usize;

    fn num_cols(&self) -> usize;

    /// Value at `(row, col)`. Positions outside the sheet are empty.
    fn cell(&self, row: usize, col: usize) -> &CellValue;

    fn is_empty(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_empty()
    }

    fn cell_name(&self, row: usize, col: usize) -> String {
        cell_name(row, col)
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// A dense, in-memory worksheet.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    cols: usize,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, cols }
    }

    /// Store `value` at `(row, col)`, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<CellValue>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value.into();
        self.cols = self.cols.max(col + 1);
    }
}

impl Sheet for Grid {
    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn num_cols(&self) -> usize {
        self.cols
    }

    fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_name() {
        assert_eq!(cell_name(0, 0), "A1");
        assert_eq!(cell_name(9, 25), "Z10");
        assert_eq!(cell_name(4, 27), "AB5");
        assert_eq!(cell_name(0, 701), "ZZ1");
        assert_eq!(cell_name(0, 702), "AAA1");
    }

    #[test]
    fn test_as_int() {
        assert_eq!(CellValue::Number(31.0).as_int(), Some(31));
        assert_eq!(CellValue::Number(1.9).as_int(), Some(1));
        assert_eq!(CellValue::text(" 15 ").as_int(), Some(15));
        assert_eq!(CellValue::text("-2").as_int(), Some(-2));
        assert_eq!(CellValue::text("1.0").as_int(), None);
        assert_eq!(CellValue::text("x").as_int(), None);
        assert_eq!(CellValue::Empty.as_int(), None);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Number(10.0).as_text(), "10");
        assert_eq!(CellValue::Number(0.5).as_text(), "0.5");
        assert_eq!(CellValue::text("  CTRL "), CellValue::Text("CTRL".into()));
        assert_eq!(CellValue::text("   "), CellValue::Empty);
    }

    #[test]
    fn test_grid() {
        let mut grid = Grid::new();
        grid.set(2, 4, "A");
        grid.set(0, 1, 7i64);
        assert_eq!(grid.num_rows(), 3);
        assert_eq!(grid.num_cols(), 5);
        assert_eq!(grid.cell(2, 4), &CellValue::Text("A".into()));
        assert_eq!(grid.cell(0, 1).as_int(), Some(7));
        assert!(grid.is_empty(1, 0));
        assert!(grid.is_empty(100, 100));
        assert_eq!(grid.cell_name(2, 4), "E3");
    }
}
