// Licensed under the Apache-2.0 license

//! Block aggregation: registers sharing one address space.

use crate::error::{Diagnostics, Error, Result};
use crate::register::{Register, RegisterBuilder};
use crate::token::parse_block_address;

/// Bytes per register word.
pub const WORD_SIZE: u32 = 4;

/// Name of placeholder registers; each instance gets a numeric suffix.
pub const RESERVED_NAME: &str = "NOREGISTER";

/// A finished block of registers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub name: String,
    /// Base address.
    pub addr: u32,
    /// Registers in sheet order.
    pub registers: Vec<Register>,
    /// Words mapped from offset 0 up to the highest register.
    pub num_regs: u32,
    /// Smallest `2^n - 1` strictly greater than the highest register offset.
    pub decode_mask: u32,
}

impl Block {
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|reg| reg.name == name)
    }
}

fn decode_mask(highest: u32) -> u32 {
    let mut mask: u64 = 1;
    while mask <= u64::from(highest) {
        mask = (mask << 1) | 1;
    }
    mask.min(u64::from(u32::MAX)) as u32
}

/// Collects registers into a block, enforcing unique addresses and names.
#[derive(Debug)]
pub struct BlockBuilder {
    name: String,
    addr: u32,
    registers: Vec<Register>,
    current: Option<RegisterBuilder>,
    next_reserved: u32,
}

impl BlockBuilder {
    /// `addr` uses the dotted `+HHHH.HHHH'H` form.
    pub fn new(name: &str, addr: &str) -> Result<Self> {
        let addr = parse_block_address(addr).ok_or_else(|| Error::BlockAddress {
            address: addr.to_string(),
        })?;
        log::debug!(" -|---> block : \"{name}\" @ {addr:#x}");
        Ok(Self {
            name: name.to_string(),
            addr,
            registers: Vec::new(),
            current: None,
            next_reserved: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The register under construction, if any.
    pub fn current(&self) -> Option<&RegisterBuilder> {
        self.current.as_ref()
    }

    pub fn start_register(
        &mut self,
        name: &str,
        addr: &str,
        msb: &str,
        hw: &str,
        sw: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if self.current.is_some() {
            self.end_register(diagnostics)?;
        }
        self.current = Some(RegisterBuilder::start(
            name,
            addr,
            msb,
            hw,
            sw,
            diagnostics,
        )?);
        Ok(())
    }

    fn current_mut(&mut self) -> Result<&mut RegisterBuilder> {
        self.current.as_mut().ok_or_else(|| Error::NoRegister {
            block: self.name.clone(),
        })
    }

    pub fn add_bit(
        &mut self,
        name: &str,
        bitpos: u32,
        reset: &str,
        hw: &str,
        sw: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        self.current_mut()?
            .add_bit(name, bitpos, reset, hw, sw, diagnostics)
    }

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
        self.current_mut()?
            .add_field(name, highbit, lowbit, reset, hw, sw, diagnostics)
    }

    /// Finish the register under construction and append it to the block.
    pub fn end_register(&mut self, diagnostics: &mut Diagnostics) -> Result<()> {
        let builder = self.current.take().ok_or_else(|| Error::NoRegister {
            block: self.name.clone(),
        })?;
        let mut reg = builder.end(diagnostics);

        if self.registers.iter().any(|r| r.addr == reg.addr) {
            return Err(Error::DuplicateAddress { address: reg.addr });
        }

        if reg.name == RESERVED_NAME {
            reg.name = format!("{RESERVED_NAME}{}", self.next_reserved);
            reg.reserved = true;
            self.next_reserved += 1;
        } else if self.registers.iter().any(|r| r.name == reg.name) {
            return Err(Error::DuplicateRegister { name: reg.name });
        }

        self.registers.push(reg);
        Ok(())
    }

    /// Close the block and derive its address span.
    pub fn end(self) -> Block {
        let (num_regs, decode_mask) = match self.registers.iter().map(|r| r.addr).max() {
            Some(highest) => (highest / WORD_SIZE + 1, decode_mask(highest)),
            None => (0, 0),
        };
        Block {
            name: self.name,
            addr: self.addr,
            registers: self.registers,
            num_regs,
            decode_mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(block: &mut BlockBuilder, name: &str, addr: &str, diag: &mut Diagnostics) -> Result<()> {
        block.start_register(name, addr, "31", "R/W", "R/W", diag)?;
        block.add_bit("EN", 31, "0", "R/W", "R/W", diag)?;
        block.end_register(diag)
    }

    #[test]
    fn test_reserved_registers_are_numbered() {
        let mut diag = Diagnostics::new();
        let mut block = BlockBuilder::new("blk", "+0000.0000'H").unwrap();
        add(&mut block, "NOREGISTER", "0", &mut diag).unwrap();
        add(&mut block, "CTRL", "4", &mut diag).unwrap();
        add(&mut block, "NOREGISTER", "8", &mut diag).unwrap();
        add(&mut block, "NOREGISTER", "c", &mut diag).unwrap();
        let block = block.end();
        let names: Vec<_> = block.registers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["NOREGISTER0", "CTRL", "NOREGISTER1", "NOREGISTER2"]);
        assert!(block.registers[0].reserved && !block.registers[1].reserved);
    }

    #[test]
    fn test_duplicate_address() {
        let mut diag = Diagnostics::new();
        let mut block = BlockBuilder::new("blk", "+0000.0000'H").unwrap();
        add(&mut block, "A", "+0010'H", &mut diag).unwrap();
        let err = add(&mut block, "B", "10", &mut diag).unwrap_err();
        assert!(matches!(err, Error::DuplicateAddress { address: 0x10 }));
    }

    #[test]
    fn test_duplicate_name() {
        let mut diag = Diagnostics::new();
        let mut block = BlockBuilder::new("blk", "+0000.0000'H").unwrap();
        add(&mut block, "A", "0", &mut diag).unwrap();
        let err = add(&mut block, "A", "4", &mut diag).unwrap_err();
        assert!(matches!(err, Error::DuplicateRegister { name } if name == "A"));
    }

    #[test]
    fn test_span() {
        let mut diag = Diagnostics::new();
        let mut block = BlockBuilder::new("blk", "+0001.0000'H").unwrap();
        add(&mut block, "A", "0", &mut diag).unwrap();
        add(&mut block, "B", "10", &mut diag).unwrap();
        add(&mut block, "C", "4", &mut diag).unwrap();
        let block = block.end();
        assert_eq!(block.addr, 0x1_0000);
        assert_eq!(block.num_regs, 5);
        assert_eq!(block.decode_mask, 0x1f);
        assert_eq!(block.register("C").map(|r| r.addr), Some(4));
    }

    #[test]
    fn test_empty_block() {
        let block = BlockBuilder::new("blk", "+0000.0000'H").unwrap().end();
        assert_eq!(block.num_regs, 0);
        assert_eq!(block.decode_mask, 0);
    }

    #[test]
    fn test_decode_mask() {
        assert_eq!(decode_mask(0), 1);
        assert_eq!(decode_mask(4), 7);
        assert_eq!(decode_mask(7), 15);
        assert_eq!(decode_mask(8), 15);
        assert_eq!(decode_mask(0x100), 0x1ff);
        assert_eq!(decode_mask(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_bad_block_address() {
        assert!(matches!(
            BlockBuilder::new("blk", "0"),
            Err(Error::BlockAddress { .. })
        ));
    }

    #[test]
    fn test_no_register_open() {
        let mut diag = Diagnostics::new();
        let mut block = BlockBuilder::new("blk", "+0000.0000'H").unwrap();
        assert!(matches!(
            block.add_bit("A", 0, "0", "R", "R", &mut diag),
            Err(Error::NoRegister { .. })
        ));
        assert!(block.end_register(&mut diag).is_err());
    }
}
