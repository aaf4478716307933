// Licensed under the Apache-2.0 license

//! Small parsers for the textual tokens found in register headers and bit
//! cells: names with optional array suffixes and hexadecimal addresses.

use winnow::ascii::{digit1, hex_digit1, multispace0};
use winnow::combinator::{delimited, opt, preceded, terminated};
use winnow::token::take_while;
use winnow::{ModalResult, Parser};

fn word<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<u32> {
    digit1.try_map(|s: &str| s.parse::<u32>()).parse_next(input)
}

fn hex4(input: &mut &str) -> ModalResult<u32> {
    take_while(4, |c: char| c.is_ascii_hexdigit())
        .try_map(|s: &str| u32::from_str_radix(s, 16))
        .parse_next(input)
}

/// `NAME` or `NAME[a - b]`, surrounded by optional whitespace.
fn register_name<'s>(input: &mut &'s str) -> ModalResult<(&'s str, Option<(u32, u32)>)> {
    let base = delimited(multispace0, word, multispace0).parse_next(input)?;
    let range = terminated(
        opt(delimited(
            ('[', multispace0),
            (number, delimited(multispace0, '-', multispace0), number),
            (multispace0, ']'),
        )),
        multispace0,
    )
    .parse_next(input)?;
    Ok((base, range.map(|(a, _, b)| (a, b))))
}

/// `NAME` or `NAME[i]`.
fn bit_name<'s>(input: &mut &'s str) -> ModalResult<(&'s str, Option<u32>)> {
    preceded(
        multispace0,
        (
            terminated(word, multispace0),
            opt(terminated(delimited('[', number, ']'), multispace0)),
        ),
    )
    .parse_next(input)
}

/// `[+]HEX['H]`; anything after the hex digits is ignored.
fn register_address(input: &mut &str) -> ModalResult<u32> {
    preceded(
        (multispace0, opt('+'), multispace0),
        hex_digit1.try_map(|s: &str| u32::from_str_radix(s, 16)),
    )
    .parse_next(input)
}

/// `+HHHH.HHHH'H`
fn block_address(input: &mut &str) -> ModalResult<u32> {
    let (_, _, _, high, _, low, _, _) = (
        multispace0,
        '+',
        multispace0,
        hex4,
        '.',
        hex4,
        multispace0,
        "'H",
    )
        .parse_next(input)?;
    Ok(high * 0x10000 + low)
}

/// A parsed register name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RegisterToken {
    pub name: String,
    /// Array bounds exactly as written, `[first - second]`.
    pub range: Option<(u32, u32)>,
}

pub(crate) fn parse_register_name(s: &str) -> Option<RegisterToken> {
    register_name
        .parse(s)
        .ok()
        .map(|(name, range)| RegisterToken {
            name: name.to_string(),
            range,
        })
}

/// Base name and bracketed index of a bit cell. A missing index is 0.
pub(crate) fn parse_bit_name(s: &str) -> Option<(String, u32)> {
    bit_name
        .parse(s)
        .ok()
        .map(|(name, index)| (name.to_string(), index.unwrap_or(0)))
}

pub(crate) fn parse_register_address(s: &str) -> Option<u32> {
    let mut input = s;
    register_address.parse_next(&mut input).ok()
}

pub(crate) fn parse_block_address(s: &str) -> Option<u32> {
    let mut input = s;
    block_address.parse_next(&mut input).ok()
}

/// A field name must be one whitespace-free token once trimmed.
pub(crate) fn parse_field_name(s: &str) -> Option<&str> {
    let name = s.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        None
    } else {
        Some(name)
    }
}
