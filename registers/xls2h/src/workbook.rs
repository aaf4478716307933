// Licensed under the Apache-2.0 license

//! Workbook loading through `calamine`.
//!
//! Any format `calamine` detects from the file extension is accepted (`.xls`,
//! `.xlsx`, `.xlsb`, `.ods`). The selected worksheet is copied into a [`Grid`]
//! at its absolute cell positions, so row and column offsets in the sheet
//! layout are unaffected by leading empty rows.

use crate::error::{Error, Result};
use crate::extract::{extract_all, RegisterSheet};
use crate::grid::{CellValue, Grid, Sheet};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Convert one worksheet cell.
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::from(*i),
        Data::Float(f) => CellValue::from(*f),
        Data::String(s) => CellValue::text(s),
        Data::Bool(b) => CellValue::from(i64::from(*b)),
        Data::DateTime(d) => CellValue::from(d.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
        Data::Error(e) => CellValue::text(&e.to_string()),
    }
}

/// Load worksheet `sheet` of the workbook at `path`.
pub fn open_sheet(path: &Path, sheet: &str) -> Result<Grid> {
    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(Error::MissingSheet {
            sheet: sheet.to_string(),
            file: path.display().to_string(),
        });
    }
    let range = workbook.worksheet_range(sheet)?;

    let mut grid = Grid::new();
    let (row0, col0) = range.start().unwrap_or((0, 0));
    for (row, col, data) in range.used_cells() {
        let value = cell_value(data);
        if !value.is_empty() {
            grid.set(row0 as usize + row, col0 as usize + col, value);
        }
    }
    log::debug!(
        "loaded sheet \"{sheet}\" from {}: {} rows",
        path.display(),
        grid.num_rows()
    );
    Ok(grid)
}

/// Load worksheet `sheet` of the workbook at `path` and extract its registers.
pub fn extract_file(path: &Path, sheet: &str) -> Result<RegisterSheet> {
    let grid = open_sheet(path, sheet)?;
    let workbook = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    extract_all(&grid, &workbook, sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_value(&Data::Int(31)), CellValue::Number(31.0));
        assert_eq!(cell_value(&Data::Float(24.0)).as_text(), "24");
        assert_eq!(
            cell_value(&Data::String("  R/W ".to_string())),
            CellValue::Text("R/W".to_string())
        );
        assert_eq!(cell_value(&Data::String("   ".to_string())), CellValue::Empty);
        assert_eq!(cell_value(&Data::Bool(true)).as_int(), Some(1));
    }

    #[test]
    fn test_missing_file() {
        let dir = std::env::temp_dir().join("registers-xls2h-missing");
        let err = open_sheet(&dir.join("nope.xlsx"), "regs").unwrap_err();
        assert!(matches!(err, Error::Workbook(_)), "{err}");
    }

    #[test]
    fn test_grid_positions() {
        let mut grid = Grid::new();
        grid.set(4, 2, cell_value(&Data::String("Address".into())));
        assert_eq!(grid.cell(4, 2).as_text(), "Address");
        assert!(grid.cell(0, 0).is_empty());
    }
}
