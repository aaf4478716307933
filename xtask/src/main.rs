// Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

mod xls_gen;

#[derive(Parser)]
#[command(author, version, about, long_about = None, name = "xtask")]
struct Xtask {
    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a C register header from a register spreadsheet
    XlsGen {
        /// Workbook to read (.xls, .xlsx, .xlsb or .ods)
        file: PathBuf,

        /// Worksheet holding the register descriptions
        sheet: String,

        /// Log every block, register and field as it is extracted
        #[arg(short, long, default_value_t = false)]
        verbose: bool,

        /// Write the header here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every non-empty cell of the sheet and exit
        #[arg(long, default_value_t = false)]
        dump: bool,

        /// Prefix for all generated macro names
        #[arg(long, default_value = "")]
        prefix: String,

        /// Additional suffixes to strip from the block name
        #[arg(long, value_delimiter = ',')]
        strip_suffix: Vec<String>,

        /// Do not strip the default suffixes (_regs, _reg, _csr)
        #[arg(long, default_value_t = false)]
        no_default_strip: bool,

        /// Override the include guard
        #[arg(long)]
        guard: Option<String>,

        /// Emit only defines, no register typedefs
        #[arg(long, default_value_t = false)]
        no_types: bool,
    },
}

fn main() {
    let cli = Xtask::parse();
    let result = match &cli.xtask {
        Commands::XlsGen {
            file,
            sheet,
            verbose,
            output,
            dump,
            prefix,
            strip_suffix,
            no_default_strip,
            guard,
            no_types,
        } => {
            let level = if *verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            };
            let _ = SimpleLogger::new().with_level(level).init();
            let options = xls_gen::Options {
                prefix: prefix.clone(),
                strip_suffixes: strip_suffix.clone(),
                no_default_strip: *no_default_strip,
                guard: guard.clone(),
                no_types: *no_types,
            };
            if *dump {
                xls_gen::dump(file, sheet)
            } else {
                xls_gen::generate(file, sheet, output.as_deref(), &options)
            }
        }
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        std::process::exit(-1);
    });
}
