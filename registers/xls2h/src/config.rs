// Licensed under the Apache-2.0 license

//! Configuration for header generation.
//!
//! [`HeaderConfig`] controls how names are turned into macro and type names
//! and which parts of the header are emitted.

/// Configuration for the generated C header.
///
/// # Example
///
/// ```
/// use registers_xls2h::config::HeaderConfig;
///
/// // Defaults strip `_regs`, `_reg` and `_csr` from the block name
/// let config = HeaderConfig::with_defaults();
/// assert_eq!(config.block_name("uart_regs"), "uart");
///
/// let config = HeaderConfig::none()
///     .prefix("SOC_")
///     .add_suffix("_map");
/// assert_eq!(config.block_name("timer_map"), "timer");
/// assert_eq!(config.macro_prefix(), "SOC_");
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeaderConfig {
    /// Prefix prepended to every generated macro name.
    pub prefix: String,

    /// Suffixes stripped from the block name (case-insensitive, checked in order).
    pub strip_suffixes: Vec<String>,

    /// Include guard; derived from the block name when unset.
    pub guard: Option<String>,

    /// Emit a `typedef union` per register.
    pub emit_types: bool,
}

impl HeaderConfig {
    /// Strips `_regs`, `_reg`, `_csr` and emits register types.
    pub fn with_defaults() -> Self {
        Self {
            prefix: String::new(),
            strip_suffixes: vec!["_regs".to_string(), "_reg".to_string(), "_csr".to_string()],
            guard: None,
            emit_types: true,
        }
    }

    /// No name transformations and no register types.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Add a suffix to strip from the block name (case-insensitive).
    pub fn add_suffix(mut self, suffix: &str) -> Self {
        self.strip_suffixes.push(suffix.to_string());
        self
    }

    pub fn guard(mut self, guard: &str) -> Self {
        self.guard = Some(guard.to_string());
        self
    }

    pub fn emit_types(mut self, emit: bool) -> Self {
        self.emit_types = emit;
        self
    }

    pub fn macro_prefix(&self) -> &str {
        &self.prefix
    }

    /// Apply suffix stripping to a block name, repeatedly until none match.
    pub fn block_name(&self, name: &str) -> String {
        let mut result = name.to_string();
        loop {
            let mut matched = false;
            for suffix in self.strip_suffixes.iter().filter(|s| !s.is_empty()) {
                let cut = match result.len().checked_sub(suffix.len()) {
                    Some(cut) if cut > 0 && result.is_char_boundary(cut) => cut,
                    _ => continue,
                };
                if result[cut..].to_lowercase() == suffix.to_lowercase() {
                    result.truncate(cut);
                    matched = true;
                    break;
                }
            }
            if !matched {
                break;
            }
        }
        result
    }
}
