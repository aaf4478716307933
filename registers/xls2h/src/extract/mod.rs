// Licensed under the Apache-2.0 license

//! Walks a register sheet and builds the block/register/field model.
//!
//! Each register occupies a fixed run of rows, anchored on a header row whose
//! first cell reads `Address`:
//!
//! ```text
//!        col 0      col 1   col 2   col 3       col 4       ...
//! r    | Address  |       |       | <name>    |           |
//! r+1  |          |       |       | <msb>     | <msb - 1> | ...   bit index
//! r+2  | <offset> | <hw>  | <sw>  | bit name  | bit name  | ...
//! r+3  |          |       |       | reset     | reset     | ...
//! r+4  |          |       |       |           |           |
//! r+5  |          |       |       | bit hw    | bit hw    | ...
//! r+6  |          |       |       | bit sw    | bit sw    | ...
//! r+7  |          |       |       |           |           |
//! ```
//!
//! Bit columns run from column 3 until the first empty bit-index cell.

use crate::block::{Block, BlockBuilder};
use crate::error::{Diagnostic, DiagnosticKind, Diagnostics, Result};
use crate::grid::{CellValue, Sheet};
use crate::register::Register;

/// Text of column 0 on a register header row.
pub const ADDRESS_MARKER: &str = "Address";

/// Address of the single block that wraps the whole sheet.
pub const SHEET_BLOCK_ADDRESS: &str = "+0000.0000'H";

const NAME_COL: usize = 3;
const MSB_ROW: usize = 1;
const MSB_COL: usize = 3;
const ADDR_ROW: usize = 2;
const ADDR_COL: usize = 0;
const HW_COL: usize = 1;
const SW_COL: usize = 2;

const FIRST_BIT_COL: usize = 3;
const BIT_INDEX_ROW: usize = 1;
const BIT_NAME_ROW: usize = 2;
const BIT_RESET_ROW: usize = 3;
const BIT_HW_ROW: usize = 5;
const BIT_SW_ROW: usize = 6;

/// Rows consumed by one register, header included.
const REGISTER_ROWS: usize = 8;

/// The model extracted from one worksheet.
#[derive(Clone, Debug)]
pub struct RegisterSheet {
    pub workbook: String,
    pub sheet: String,
    /// Always exactly one block named after the sheet. Renderers rely on the
    /// wrapper being present.
    pub blocks: Vec<Block>,
    /// Non-fatal findings, in the order they were reported.
    pub diagnostics: Vec<Diagnostic>,
}

impl RegisterSheet {
    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.blocks.iter().flat_map(|block| block.registers.iter())
    }

    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers().find(|reg| reg.name == name)
    }
}

/// Extract every register of `sheet`.
///
/// `workbook` and `sheet_name` only label the result; the sheet name also
/// names the block.
pub fn extract_all<S: Sheet + ?Sized>(
    sheet: &S,
    workbook: &str,
    sheet_name: &str,
) -> Result<RegisterSheet> {
    let mut diagnostics = Diagnostics::new();
    // One block for the entire sheet
    let mut block = BlockBuilder::new(sheet_name, SHEET_BLOCK_ADDRESS)?;

    let mut row = 0;
    while row < sheet.num_rows() {
        if sheet.is_empty(row, 0) {
            row += 1;
            continue;
        }

        let marker = sheet.cell(row, 0);
        if marker.as_text() != ADDRESS_MARKER {
            diagnostics.report(
                DiagnosticKind::UnexpectedValue,
                format!(
                    "cell \"{}\", unexpected value \"{}\"",
                    sheet.cell_name(row, 0),
                    marker
                ),
            );
            row += 1;
            continue;
        }

        extract_register(sheet, row, &mut block, &mut diagnostics)?;
        row += REGISTER_ROWS;
    }

    Ok(RegisterSheet {
        workbook: workbook.to_string(),
        sheet: sheet_name.to_string(),
        blocks: vec![block.end()],
        diagnostics: diagnostics.into_vec(),
    })
}

fn extract_register<S: Sheet + ?Sized>(
    sheet: &S,
    row: usize,
    block: &mut BlockBuilder,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let text = move |r: usize, c: usize| sheet.cell(row + r, c).as_text();

    block.start_register(
        &text(0, NAME_COL),
        &text(ADDR_ROW, ADDR_COL),
        &text(MSB_ROW, MSB_COL),
        &text(ADDR_ROW, HW_COL),
        &text(ADDR_ROW, SW_COL),
        diagnostics,
    )?;
    let msb = block.current().map_or(0, |reg| reg.msb());

    let mut col = FIRST_BIT_COL;
    while !sheet.is_empty(row + BIT_INDEX_ROW, col) {
        let bitpos = match sheet.cell(row + BIT_INDEX_ROW, col).as_int() {
            Some(bitpos) => bitpos,
            None => {
                diagnostics.report(
                    DiagnosticKind::UnparsableBitIndex,
                    format!(
                        "cell \"{}\", unparsable bit value",
                        sheet.cell_name(row + BIT_INDEX_ROW, col)
                    ),
                );
                0
            }
        };

        let expected = i64::from(msb) + FIRST_BIT_COL as i64 - col as i64;
        if bitpos == expected && bitpos >= 0 {
            block.add_bit(
                &text(BIT_NAME_ROW, col),
                bitpos as u32,
                &text(BIT_RESET_ROW, col),
                &text(BIT_HW_ROW, col),
                &text(BIT_SW_ROW, col),
                diagnostics,
            )?;
        } else {
            diagnostics.report(
                DiagnosticKind::UnexpectedBitIndex,
                format!(
                    "cell \"{}\", unexpected bit value \"{}\"",
                    sheet.cell_name(row + BIT_INDEX_ROW, col),
                    bitpos
                ),
            );
        }
        col += 1;
    }

    block.end_register(diagnostics)
}

/// Every non-empty cell of `sheet` as `(cell name, value)`, row by row.
pub fn dump_cells<S: Sheet + ?Sized>(sheet: &S) -> Vec<(String, CellValue)> {
    let mut cells = Vec::new();
    for row in 0..sheet.num_rows() {
        for col in 0..sheet.num_cols() {
            if !sheet.is_empty(row, col) {
                cells.push((sheet.cell_name(row, col), sheet.cell(row, col).clone()));
            }
        }
    }
    cells
}
