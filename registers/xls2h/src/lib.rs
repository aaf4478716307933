// Licensed under the Apache-2.0 license

//! Register-sheet extractor and C header generator.
//!
//! This crate reads a spreadsheet that describes hardware registers one bit
//! per column, builds a block/register/field model from it and renders that
//! model as a C header.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use registers_xls2h::{extract_file, generate_header, HeaderConfig};
//!
//! let sheet = extract_file(Path::new("timer.xls"), "timer_regs").unwrap();
//! for diagnostic in &sheet.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//!
//! let config = HeaderConfig::with_defaults().prefix("SOC_");
//! let header = generate_header(&sheet, &config);
//! ```
//!
//! Sheets can also be built in memory through [`Grid`] and passed to
//! [`extract_all`].
//!
//! ## Module Organization
//!
//! - [`grid`]: Cell values and the [`Sheet`] trait the extractor reads from
//! - [`workbook`]: Loading a worksheet from a workbook file
//! - [`access`]: Access rights and their compatibility rules
//! - [`field`], [`register`], [`block`]: The model and its builders
//! - [`extract`]: The sheet walk ([`extract_all`], [`dump_cells`])
//! - [`error`]: Fatal errors and non-fatal diagnostics
//! - [`config`]: Header naming options ([`HeaderConfig`])
//! - [`output`]: C header rendering
//! - [`util`]: Name conversion and hex formatting

pub mod access;
pub mod block;
pub mod config;
pub mod error;
pub mod extract;
pub mod field;
pub mod grid;
pub mod output;
pub mod register;
pub mod util;
pub mod workbook;

mod token;

pub use access::{AccessRight, Rights};
pub use block::Block;
pub use config::HeaderConfig;
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use extract::{dump_cells, extract_all, RegisterSheet};
pub use field::{Field, StorageType};
pub use grid::{cell_name, CellValue, Grid, Sheet};
pub use output::{generate_header, Header};
pub use register::{Register, RegisterArray};
pub use workbook::{extract_file, open_sheet};
