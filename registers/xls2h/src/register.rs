// Licensed under the Apache-2.0 license

//! Register construction.
//!
//! [`RegisterBuilder`] validates a register header and then receives the
//! register's bit columns from the most significant bit down. It merges runs
//! of same-named bits into fields; at most one field is open at a time.
//! [`RegisterBuilder::end`] derives masks, reset and writability and returns
//! the finished [`Register`].

use crate::access::{self, Rights, Side};
use crate::error::{DiagnosticKind, Diagnostics, Error, Result};
use crate::field::{Field, FieldBuilder, StorageType};
use crate::token::{parse_bit_name, parse_field_name, parse_register_address, parse_register_name};

/// Bounds of a register array declared as `NAME[a-b]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegisterArray {
    pub lower: u32,
    pub upper: u32,
}

impl RegisterArray {
    /// Number of elements.
    pub fn count(&self) -> u32 {
        self.upper - self.lower + 1
    }
}

/// A finished register.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Register {
    pub name: String,
    pub array: Option<RegisterArray>,
    /// Byte offset within the block.
    pub addr: u32,
    /// Index of the most significant bit: 15 or 31.
    pub msb: u32,
    pub width: u32,
    pub ty: StorageType,
    pub rights: Rights,
    /// Fields in column order, most significant first.
    pub fields: Vec<Field>,
    pub mask: u32,
    /// Complement of `mask` within the register width.
    pub inverted_mask: u32,
    pub reset: u32,
    pub writable: bool,
    /// Placeholder register holding an address.
    pub reserved: bool,
}

impl Register {
    /// Fields software may write. Empty when the register itself is not writable.
    pub fn writable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(move |field| self.writable && field.writable)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// All-ones value covering the register width.
    pub fn word_mask(&self) -> u32 {
        word_mask(self.width)
    }
}

fn word_mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// A register whose fields are still being collected.
#[derive(Clone, Debug)]
pub struct RegisterBuilder {
    name: String,
    array: Option<RegisterArray>,
    addr: u32,
    msb: u32,
    rights: Rights,
    fields: Vec<Field>,
    open: Option<FieldBuilder>,
    last_bitpos: Option<u32>,
}

impl RegisterBuilder {
    /// Parse and validate a register header.
    pub fn start(
        name: &str,
        addr: &str,
        msb: &str,
        hw: &str,
        sw: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let token = parse_register_name(name).ok_or_else(|| Error::RegisterName {
            name: name.to_string(),
        })?;

        let array = match token.range {
            Some((a, b)) => {
                let (lower, upper) = (a.min(b), a.max(b));
                if lower != 0 {
                    return Err(Error::ArrayLowerBound {
                        name: name.to_string(),
                    });
                }
                Some(RegisterArray { lower, upper })
            }
            None => None,
        };

        let addr = parse_register_address(addr).ok_or_else(|| Error::Address {
            name: name.to_string(),
            address: addr.to_string(),
        })?;

        let msb: i64 = msb.trim().parse().map_err(|_| Error::MsbFormat {
            name: name.to_string(),
            msb: msb.to_string(),
        })?;
        if msb != 15 && msb != 31 {
            return Err(Error::MsbValue {
                name: name.to_string(),
                msb,
            });
        }

        let owner = format!("register '{}'", token.name);
        let mut rights = Rights::default();
        for (side, value, slot) in [
            (Side::Hardware, hw, &mut rights.hw),
            (Side::Software, sw, &mut rights.sw),
        ] {
            let (right, complaint) = access::resolve(&owner, side, value);
            if let Some(message) = complaint {
                diagnostics.report(DiagnosticKind::UnknownAccessRight, message);
            }
            *slot = right;
        }

        log::debug!("  +-|-> register : {} {:#x}", name.trim(), addr);

        Ok(Self {
            name: token.name,
            array,
            addr,
            msb: msb as u32,
            rights,
            fields: Vec::new(),
            open: None,
            last_bitpos: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> u32 {
        self.addr
    }

    pub fn msb(&self) -> u32 {
        self.msb
    }

    fn close_open(&mut self, low_bitpos: u32) {
        if let Some(open) = self.open.take() {
            self.fields.push(open.finish(low_bitpos));
        }
    }

    fn check_unique(&self, name: &str) -> Result<()> {
        if self.fields.iter().any(|field| field.name == name) {
            return Err(Error::DuplicateField {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Add the bit at `bitpos`. Bits must arrive from the most significant
    /// down. An empty `name` marks an unused bit.
    pub fn add_bit(
        &mut self,
        name: &str,
        bitpos: u32,
        reset: &str,
        hw: &str,
        sw: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        self.last_bitpos = Some(bitpos);

        if name.trim().is_empty() {
            self.close_open(bitpos + 1);
            return Ok(());
        }

        let reset_bit = reset.trim().parse::<i64>().is_ok_and(|value| value != 0);
        let (base, index) = parse_bit_name(name).ok_or_else(|| Error::BitName {
            name: name.to_string(),
        })?;

        match self.open.take() {
            Some(mut open) if open.name() == base => {
                if open.low_index().checked_sub(1) != Some(index) {
                    return Err(Error::BitOrder {
                        name: name.trim().to_string(),
                        index,
                        previous: open.low_index(),
                    });
                }
                open.accumulate(index, reset_bit, hw, sw, diagnostics);
                self.open = Some(open);
            }
            previous => {
                if let Some(previous) = previous {
                    self.fields.push(previous.finish(bitpos + 1));
                }
                self.check_unique(&base)?;
                let mut field = FieldBuilder::start(&base, bitpos, index, hw, sw, diagnostics)?;
                field.accumulate(index, reset_bit, hw, sw, diagnostics);
                self.open = Some(field);
            }
        }

        // Last index of the field, or last bit of the register
        if index == 0 || bitpos == 0 {
            self.close_open(bitpos);
        }
        Ok(())
    }

    /// Add a whole field spanning `highbit..=lowbit` with reset value `reset`
    /// (right-aligned to the field).
    #[allow(clippy::too_many_arguments)]
    pub fn add_field(
        &mut self,
        name: &str,
        highbit: u32,
        lowbit: u32,
        reset: u32,
        hw: &str,
        sw: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if highbit < lowbit || highbit > self.msb {
            return Err(Error::FieldRange {
                name: name.to_string(),
                high: highbit,
                low: lowbit,
            });
        }
        self.close_open(highbit + 1);
        if let Some(trimmed) = parse_field_name(name) {
            self.check_unique(trimmed)?;
        }

        let span = highbit - lowbit;
        let mut field = FieldBuilder::start(name, highbit, span, hw, sw, diagnostics)?;
        for index in (0..=span).rev() {
            field.accumulate(index, (reset >> index) & 1 == 1, hw, sw, diagnostics);
        }
        self.fields.push(field.finish(lowbit));
        self.last_bitpos = Some(lowbit);
        Ok(())
    }

    /// Close the register and derive its masks, reset and writability.
    pub fn end(mut self, diagnostics: &mut Diagnostics) -> Register {
        if let Some(low) = self.last_bitpos {
            self.close_open(low);
        }

        let width = self.msb + 1;
        let mask = self.fields.iter().fold(0, |acc, field| acc | field.mask);
        let reset = self
            .fields
            .iter()
            .fold(0, |acc, field| acc | (field.reset << field.low_bitpos));

        for field in &self.fields {
            if !self.rights.sw.accepts_field(&field.rights.sw) {
                diagnostics.report(
                    DiagnosticKind::IncompatibleAccessRight,
                    format!(
                        "register '{}' and field '{}' have incompatible types ({} / {})",
                        self.name, field.name, self.rights.sw, field.rights.sw
                    ),
                );
            }
        }

        let writable_count = self
            .fields
            .iter()
            .filter(|field| field.rights.sw.is_writable())
            .count();
        for field in &mut self.fields {
            field.writable = field.rights.sw.is_writable();
            field.unique_writable = field.writable && writable_count == 1;
        }

        let writable = self.rights.sw.is_writable();
        Register {
            name: self.name,
            array: self.array,
            addr: self.addr,
            msb: self.msb,
            width,
            ty: if width == 16 {
                StorageType::U16
            } else {
                StorageType::U32
            },
            rights: self.rights,
            fields: self.fields,
            mask,
            inverted_mask: !mask & word_mask(width),
            reset,
            writable,
            reserved: false,
        }
    }
}
