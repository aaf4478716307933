// Licensed under the Apache-2.0 license

//! Name conversion and constant formatting for C header output.

/// Converts a name to SCREAMING_SNAKE_CASE for use in macro names.
///
/// - Leading digits get an underscore prefix
/// - Punctuation and whitespace become single underscores
/// - CamelCase transitions get underscore separators
///
/// # Examples
/// ```
/// use registers_xls2h::util::macro_case;
/// assert_eq!(macro_case("TimerCtrl"), "TIMER_CTRL");
/// assert_eq!(macro_case("dma ch0/cfg"), "DMA_CH0_CFG");
/// ```
pub fn macro_case(name: &str) -> String {
    let mut result = String::new();
    if let Some(c) = name.chars().next() {
        if c.is_ascii_digit() {
            result.push('_');
        }
    }
    let mut prev = None;
    for c in name.chars() {
        if c.is_ascii_whitespace() || c.is_ascii_punctuation() {
            if prev != Some('_') {
                result.push('_');
            }
            prev = Some('_');
            continue;
        }
        if let Some(prev) = prev {
            if (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && c.is_ascii_uppercase() {
                result.push('_');
            }
        }
        prev = Some(c);
        result.push(c.to_ascii_uppercase());
    }
    result.trim_end_matches('_').to_string()
}

/// Lowercase variant of [`macro_case`], used for type names.
pub fn type_case(name: &str) -> String {
    macro_case(name).to_ascii_lowercase()
}

/// Formats `val` as an unsigned C hex constant padded to `bits` / 4 digits.
///
/// # Examples
/// ```
/// use registers_xls2h::util::hex_const;
/// assert_eq!(hex_const(0x8000_0000, 32), "0x80000000u");
/// assert_eq!(hex_const(0xff, 16), "0x00FFu");
/// ```
pub fn hex_const(val: u32, bits: u32) -> String {
    let digits = bits.div_ceil(4).max(1) as usize;
    format!("0x{val:0digits$X}u")
}
