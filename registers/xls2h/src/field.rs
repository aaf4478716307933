// Licensed under the Apache-2.0 license

//! Field accumulation.
//!
//! A field is assembled from a run of same-named bit cells. [`FieldBuilder`]
//! holds the run while it is open; [`FieldBuilder::finish`] closes it at its
//! lowest absolute bit and yields the immutable [`Field`].

use crate::access::{self, Rights, Side};
use crate::error::{DiagnosticKind, Diagnostics, Error, Result};
use crate::token::parse_field_name;
use std::fmt;

/// Smallest C integer type able to hold a field or register.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StorageType {
    U8,
    U16,
    U32,
}

impl StorageType {
    /// Storage for a field of `width` bits.
    pub fn for_width(width: u32) -> Self {
        if width <= 8 {
            StorageType::U8
        } else if width <= 16 {
            StorageType::U16
        } else {
            StorageType::U32
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            StorageType::U8 => 8,
            StorageType::U16 => 16,
            StorageType::U32 => 32,
        }
    }

    pub fn c_type(self) -> &'static str {
        match self {
            StorageType::U8 => "uint8_t",
            StorageType::U16 => "uint16_t",
            StorageType::U32 => "uint32_t",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_type())
    }
}

/// A finished bit field within a register.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub name: String,
    /// Sub-array index of the most significant bit (0 for plain fields).
    pub high_index: u32,
    /// Lowest sub-array index seen.
    pub low_index: u32,
    pub high_bitpos: u32,
    pub low_bitpos: u32,
    pub width: u32,
    /// Reset value, right-aligned to the field.
    pub reset: u32,
    pub rights: Rights,
    pub mask: u32,
    pub ty: StorageType,
    /// Set by the owning register once all fields are known.
    pub writable: bool,
    /// Only writable field of its register.
    pub unique_writable: bool,
}

impl Field {
    /// Human-readable placement, e.g. `"DATA"[3..0] at bit 4` or `"EN" at bit 31`.
    pub fn label(&self) -> String {
        if self.width == 1 {
            format!("\"{}\" at bit {}", self.name, self.low_bitpos)
        } else {
            format!(
                "\"{}\"[{}..{}] at bit {}",
                self.name, self.high_index, self.low_index, self.low_bitpos
            )
        }
    }
}

/// A field whose bits are still being collected.
#[derive(Clone, Debug)]
pub struct FieldBuilder {
    name: String,
    high_bitpos: u32,
    high_index: u32,
    low_index: u32,
    /// Reset bits keyed by distance below `high_index`.
    reset_from_top: u32,
    rights: Rights,
}

impl FieldBuilder {
    /// Open a field whose most significant bit sits at `high_bitpos` with
    /// sub-array index `high_index`.
    pub fn start(
        name: &str,
        high_bitpos: u32,
        high_index: u32,
        hw: &str,
        sw: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let name = parse_field_name(name).ok_or_else(|| Error::FieldName {
            name: name.to_string(),
        })?;

        let owner = format!("field '{name}'");
        let mut rights = Rights::default();
        for (side, token, slot) in [
            (Side::Hardware, hw, &mut rights.hw),
            (Side::Software, sw, &mut rights.sw),
        ] {
            let (right, complaint) = access::resolve(&owner, side, token);
            if let Some(message) = complaint {
                diagnostics.report(DiagnosticKind::UnknownAccessRight, message);
            }
            *slot = right;
        }

        Ok(Self {
            name: name.to_string(),
            high_bitpos,
            high_index,
            low_index: high_index,
            reset_from_top: 0,
            rights,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowest sub-array index folded in so far.
    pub fn low_index(&self) -> u32 {
        self.low_index
    }

    /// Fold one bit in at sub-array position `index`.
    pub fn accumulate(
        &mut self,
        index: u32,
        reset_bit: bool,
        hw: &str,
        sw: &str,
        diagnostics: &mut Diagnostics,
    ) {
        if reset_bit {
            if let Some(offset) = self.high_index.checked_sub(index) {
                self.reset_from_top |= 1u32.checked_shl(offset).unwrap_or(0);
            }
        }
        self.low_index = self.low_index.min(index);

        for (side, declared, token) in [
            (Side::Hardware, &self.rights.hw, hw),
            (Side::Software, &self.rights.sw, sw),
        ] {
            let seen = access::lenient(token);
            if seen != *declared {
                diagnostics.report(
                    DiagnosticKind::AccessRightMismatch,
                    format!(
                        "field '{}' all bits do not have same {} access rights ({} != {})",
                        self.name,
                        side.label(),
                        declared,
                        seen
                    ),
                );
            }
        }
    }

    /// Right-aligned reset value: index `low_index` lands on bit 0.
    fn reset(&self) -> u32 {
        let span = self.high_index - self.low_index;
        (0..32)
            .filter(|offset| self.reset_from_top & (1 << offset) != 0)
            .filter_map(|offset| span.checked_sub(offset))
            .fold(0, |acc, bit| acc | 1u32.checked_shl(bit).unwrap_or(0))
    }

    /// Close the field with its least significant bit at `low_bitpos`.
    pub fn finish(self, low_bitpos: u32) -> Field {
        let low_bitpos = low_bitpos.min(self.high_bitpos);
        let width = self.high_bitpos - low_bitpos + 1;
        let mask = (((1u64 << width) - 1) << low_bitpos) as u32;
        let reset = self.reset() & (mask >> low_bitpos);
        let field = Field {
            name: self.name,
            high_index: self.high_index,
            low_index: self.low_index,
            high_bitpos: self.high_bitpos,
            low_bitpos,
            width,
            reset,
            rights: self.rights,
            mask,
            ty: StorageType::for_width(width),
            writable: false,
            unique_writable: false,
        };
        log::debug!("  + +-> field : {}", field.label());
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessRight;

    #[test]
    fn test_single_bit() {
        let mut diag = Diagnostics::new();
        let mut builder = FieldBuilder::start("EN", 31, 0, "R/W", "R/W", &mut diag).unwrap();
        builder.accumulate(0, true, "R/W", "R/W", &mut diag);
        let field = builder.finish(31);
        assert_eq!(field.width, 1);
        assert_eq!(field.mask, 0x8000_0000);
        assert_eq!(field.reset, 1);
        assert_eq!(field.ty, StorageType::U8);
        assert_eq!(field.label(), "\"EN\" at bit 31");
        assert!(diag.is_empty());
    }

    #[test]
    fn test_multi_bit() {
        let mut diag = Diagnostics::new();
        let mut builder = FieldBuilder::start(" DATA ", 11, 3, "R", "R/W", &mut diag).unwrap();
        for (index, bit) in [(3, true), (2, false), (1, true), (0, true)] {
            builder.accumulate(index, bit, "R", "R/W", &mut diag);
        }
        assert_eq!(builder.low_index(), 0);
        let field = builder.finish(8);
        assert_eq!(field.name, "DATA");
        assert_eq!(field.width, 4);
        assert_eq!(field.mask, 0xf00);
        assert_eq!(field.reset, 0b1011);
        assert_eq!(field.rights.hw, AccessRight::Read);
        assert_eq!(field.label(), "\"DATA\"[3..0] at bit 8");
    }

    #[test]
    fn test_storage_type() {
        assert_eq!(StorageType::for_width(1), StorageType::U8);
        assert_eq!(StorageType::for_width(8), StorageType::U8);
        assert_eq!(StorageType::for_width(9), StorageType::U16);
        assert_eq!(StorageType::for_width(16), StorageType::U16);
        assert_eq!(StorageType::for_width(17), StorageType::U32);
        assert_eq!(StorageType::U16.to_string(), "uint16_t");
    }

    #[test]
    fn test_full_width_mask() {
        let mut diag = Diagnostics::new();
        let builder = FieldBuilder::start("ALL", 31, 31, "R", "R", &mut diag).unwrap();
        let field = builder.finish(0);
        assert_eq!(field.width, 32);
        assert_eq!(field.mask, 0xffff_ffff);
        assert_eq!(field.ty, StorageType::U32);
    }

    #[test]
    fn test_rights_mismatch() {
        let mut diag = Diagnostics::new();
        let mut builder = FieldBuilder::start("F", 1, 1, "R", "R", &mut diag).unwrap();
        builder.accumulate(1, false, "R", "R", &mut diag);
        builder.accumulate(0, false, "W", "C", &mut diag);
        assert_eq!(diag.count(DiagnosticKind::AccessRightMismatch), 2);
        assert_eq!(
            diag.entries()[0].message,
            "field 'F' all bits do not have same HW access rights (R != W)"
        );
    }

    #[test]
    fn test_unknown_rights() {
        let mut diag = Diagnostics::new();
        let builder = FieldBuilder::start("F", 0, 0, "S", "bogus", &mut diag).unwrap();
        assert_eq!(diag.count(DiagnosticKind::UnknownAccessRight), 2);
        let field = builder.finish(0);
        assert_eq!(field.rights.hw, AccessRight::Set);
        assert_eq!(field.rights.sw, AccessRight::Invalid("bogus".to_string()));
    }

    #[test]
    fn test_unknown_rights_mismatch() {
        let mut diag = Diagnostics::new();
        let mut builder = FieldBuilder::start("F", 1, 1, "R", "RO", &mut diag).unwrap();
        builder.accumulate(1, false, "R", "RO", &mut diag);
        builder.accumulate(0, false, "R", "X", &mut diag);
        assert_eq!(diag.count(DiagnosticKind::AccessRightMismatch), 1);
        assert_eq!(
            diag.entries()[1].message,
            "field 'F' all bits do not have same SW access rights (RO != X)"
        );
    }

    #[test]
    fn test_upper_indices_reset_is_right_aligned() {
        let mut diag = Diagnostics::new();
        let mut builder = FieldBuilder::start("ADDR", 7, 15, "R", "R", &mut diag).unwrap();
        for index in (8..=15).rev() {
            builder.accumulate(index, index != 9, "R", "R", &mut diag);
        }
        let field = builder.finish(0);
        assert_eq!((field.high_index, field.low_index), (15, 8));
        assert_eq!(field.mask, 0xff);
        assert_eq!(field.reset, 0xfd);
        assert_eq!(field.reset & (field.mask >> field.low_bitpos), field.reset);
    }

    #[test]
    fn test_partial_run_reset() {
        // Only A[3] seen before the field is closed
        let mut diag = Diagnostics::new();
        let mut builder = FieldBuilder::start("A", 31, 3, "R", "R", &mut diag).unwrap();
        builder.accumulate(3, true, "R", "R", &mut diag);
        let field = builder.finish(31);
        assert_eq!(field.width, 1);
        assert_eq!(field.reset, 1);
    }

    #[test]
    fn test_bad_name() {
        let mut diag = Diagnostics::new();
        assert!(matches!(
            FieldBuilder::start("TWO WORDS", 3, 0, "R", "R", &mut diag),
            Err(Error::FieldName { .. })
        ));
        assert!(matches!(
            FieldBuilder::start("", 3, 0, "R", "R", &mut diag),
            Err(Error::FieldName { .. })
        ));
    }
}
