// Licensed under the Apache-2.0 license

//! C header rendering.
//!
//! [`Header`] renders an extracted [`RegisterSheet`] as a C header. For a
//! sheet named "timer" holding a register `CTRL` the output looks like:
//!
//! ```text
//! #ifndef TIMER_H
//! #define TIMER_H
//!
//! #include <stdint.h>
//!
//! /* Block "timer" */
//! #define TIMER_BASE_ADDR 0x00000000u
//! #define TIMER_DECODE_MASK 0x00000001u
//! #define TIMER_NUM_REGS 1u
//!
//! /* Register "CTRL" (sw R/W, hw R/W) */
//! #define CTRL_OFFSET 0x00000000u
//! #define CTRL_MASK 0x80000000u
//! #define CTRL_INVMASK 0x7FFFFFFFu
//! #define CTRL_RESET 0x80000000u
//! #define CTRL_WRITABLE_MASK 0x80000000u
//! #define CTRL_EN_POS 31u
//! ...
//! typedef union {
//!     uint32_t reg;
//!     struct {
//!         uint32_t _rsvd0 : 31;
//!         uint8_t EN : 1;
//!     } bits;
//! } ctrl_t;
//!
//! #endif /* TIMER_H */
//! ```

use crate::block::Block;
use crate::config::HeaderConfig;
use crate::extract::RegisterSheet;
use crate::register::Register;
use crate::util::{hex_const, macro_case, type_case};
use std::fmt;

/// A renderable C header for one extracted sheet.
pub struct Header<'a> {
    sheet: &'a RegisterSheet,
    config: &'a HeaderConfig,
}

impl<'a> Header<'a> {
    pub fn new(sheet: &'a RegisterSheet, config: &'a HeaderConfig) -> Self {
        Self { sheet, config }
    }

    fn guard(&self) -> String {
        match &self.config.guard {
            Some(guard) => guard.clone(),
            None => format!(
                "{}{}_H",
                self.config.macro_prefix(),
                macro_case(&self.config.block_name(&self.sheet.sheet))
            ),
        }
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, block: &Block) -> fmt::Result {
        let name = format!(
            "{}{}",
            self.config.macro_prefix(),
            macro_case(&self.config.block_name(&block.name))
        );
        writeln!(f, "/* Block \"{}\" */", block.name)?;
        writeln!(f, "#define {name}_BASE_ADDR {}", hex_const(block.addr, 32))?;
        writeln!(
            f,
            "#define {name}_DECODE_MASK {}",
            hex_const(block.decode_mask, 32)
        )?;
        writeln!(f, "#define {name}_NUM_REGS {}u", block.num_regs)?;

        for reg in block.registers.iter().filter(|reg| !reg.reserved) {
            writeln!(f)?;
            self.write_register(f, reg)?;
            if self.config.emit_types {
                writeln!(f)?;
                self.write_type(f, reg)?;
            }
        }
        Ok(())
    }

    fn write_register(&self, f: &mut fmt::Formatter<'_>, reg: &Register) -> fmt::Result {
        let name = format!("{}{}", self.config.macro_prefix(), macro_case(&reg.name));
        let width = reg.width;

        writeln!(
            f,
            "/* Register \"{}\" (sw {}, hw {}) */",
            reg.name, reg.rights.sw, reg.rights.hw
        )?;
        writeln!(f, "#define {name}_OFFSET {}", hex_const(reg.addr, 32))?;
        if let Some(array) = reg.array {
            writeln!(f, "#define {name}_COUNT {}u", array.count())?;
        }
        writeln!(f, "#define {name}_MASK {}", hex_const(reg.mask, width))?;
        writeln!(
            f,
            "#define {name}_INVMASK {}",
            hex_const(reg.inverted_mask, width)
        )?;
        writeln!(f, "#define {name}_RESET {}", hex_const(reg.reset, width))?;
        if reg.writable {
            let writable = reg.writable_fields().fold(0, |acc, field| acc | field.mask);
            writeln!(
                f,
                "#define {name}_WRITABLE_MASK {}",
                hex_const(writable, width)
            )?;
        }

        for field in &reg.fields {
            let field_name = format!("{name}_{}", macro_case(&field.name));
            writeln!(f, "#define {field_name}_POS {}u", field.low_bitpos)?;
            writeln!(f, "#define {field_name}_WIDTH {}u", field.width)?;
            writeln!(f, "#define {field_name}_MASK {}", hex_const(field.mask, width))?;
            writeln!(
                f,
                "#define {field_name}_RESET {}",
                hex_const(field.reset, field.width)
            )?;
            if reg.writable && field.writable {
                writeln!(f, "#define {field_name}_WRITABLE 1")?;
                if field.unique_writable {
                    writeln!(f, "#define {field_name}_UNIQUE_WRITABLE 1")?;
                }
            }
        }
        Ok(())
    }

    /// `typedef union` with a bit-field view, least significant bit first.
    fn write_type(&self, f: &mut fmt::Formatter<'_>, reg: &Register) -> fmt::Result {
        let reg_type = reg.ty.c_type();
        let mut fields: Vec<_> = reg.fields.iter().collect();
        fields.sort_by_key(|field| field.low_bitpos);

        writeln!(f, "typedef union {{")?;
        writeln!(f, "    {reg_type} reg;")?;
        writeln!(f, "    struct {{")?;
        let mut next = 0;
        for field in fields {
            if field.low_bitpos > next {
                writeln!(
                    f,
                    "        {reg_type} _rsvd{next} : {};",
                    field.low_bitpos - next
                )?;
            }
            writeln!(
                f,
                "        {} {} : {};",
                field.ty.c_type(),
                field.name,
                field.width
            )?;
            next = field.high_bitpos + 1;
        }
        if next < reg.width {
            writeln!(f, "        {reg_type} _rsvd{next} : {};", reg.width - next)?;
        }
        writeln!(f, "    }} bits;")?;
        writeln!(
            f,
            "}} {}{}_t;",
            self.config.macro_prefix().to_ascii_lowercase(),
            type_case(&reg.name)
        )
    }
}

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.guard();
        writeln!(
            f,
            "/* Generated from \"{}\", sheet \"{}\". Do not edit. */",
            self.sheet.workbook, self.sheet.sheet
        )?;
        writeln!(f, "#ifndef {guard}")?;
        writeln!(f, "#define {guard}")?;
        writeln!(f)?;
        writeln!(f, "#include <stdint.h>")?;
        for block in &self.sheet.blocks {
            writeln!(f)?;
            self.write_block(f, block)?;
        }
        writeln!(f)?;
        writeln!(f, "#endif /* {guard} */")
    }
}

/// Render `sheet` as a C header.
pub fn generate_header(sheet: &RegisterSheet, config: &HeaderConfig) -> String {
    Header::new(sheet, config).to_string()
}
