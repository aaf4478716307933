// Licensed under the Apache-2.0 license

//! Generate C register headers from register spreadsheets.

use anyhow::{bail, Result};
use registers_xls2h::{
    dump_cells, extract_file, generate_header, open_sheet, HeaderConfig, RegisterSheet,
};
use std::path::Path;

/// Header naming options from the command line.
#[derive(Clone, Debug, Default)]
pub struct Options {
    pub prefix: String,
    pub strip_suffixes: Vec<String>,
    pub no_default_strip: bool,
    pub guard: Option<String>,
    pub no_types: bool,
}

impl Options {
    fn header_config(&self) -> HeaderConfig {
        let mut config = if self.no_default_strip {
            HeaderConfig::none()
        } else {
            HeaderConfig::with_defaults()
        };
        for suffix in &self.strip_suffixes {
            config = config.add_suffix(suffix);
        }
        if let Some(guard) = &self.guard {
            config = config.guard(guard);
        }
        config.prefix(&self.prefix).emit_types(!self.no_types)
    }
}

/// Print every non-empty cell of `sheet`.
pub fn dump(file: &Path, sheet: &str) -> Result<()> {
    let grid = open_sheet(file, sheet)?;
    for (name, value) in dump_cells(&grid) {
        println!("{name}: {value}");
    }
    Ok(())
}

/// Extract `sheet` from `file` and write its C header.
pub fn generate(file: &Path, sheet: &str, output: Option<&Path>, options: &Options) -> Result<()> {
    println!("Generating registers from: {}", file.display());
    println!("Sheet: {sheet}");

    let extracted = extract_file(file, sheet)?;
    write_header(&extracted, output, options)
}

fn write_header(sheet: &RegisterSheet, output: Option<&Path>, options: &Options) -> Result<()> {
    let num_registers = sheet.registers().filter(|reg| !reg.reserved).count();
    if num_registers == 0 {
        bail!("no registers found in sheet {:?}", sheet.sheet);
    }
    println!(
        "Extracted {} registers, {} warnings",
        num_registers,
        sheet.diagnostics.len()
    );

    let code = generate_header(sheet, &options.header_config());
    if let Some(output_path) = output {
        std::fs::write(output_path, &code)?;
        println!("Output written to: {}", output_path.display());
    } else {
        println!("\n--- Generated Header ---\n");
        println!("{}", code);
    }
    Ok(())
}
