// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Conditions that abort extraction. No partial model survives one of these.
#[derive(Error, Debug)]
pub enum Error {
    #[error("field \"{name}\", name format is not parsable")]
    FieldName { name: String },
    #[error("field \"{name}\", bit range {high}..{low} is inverted")]
    FieldRange { name: String, high: u32, low: u32 },
    #[error("bit name \"{name}\" not parsable")]
    BitName { name: String },
    #[error("index \"{index}\" of field \"{name}\" not in order with \"{previous}\"")]
    BitOrder {
        name: String,
        index: u32,
        previous: u32,
    },
    #[error("field with same name \"{name}\" already exists")]
    DuplicateField { name: String },
    #[error("register \"{name}\", name format is not parsable")]
    RegisterName { name: String },
    #[error("register array \"{name}\", first index is not 0")]
    ArrayLowerBound { name: String },
    #[error("register \"{name}\" address \"{address}\" not parsable")]
    Address { name: String, address: String },
    #[error("register \"{name}\" can not parse MSB index \"{msb}\"")]
    MsbFormat { name: String, msb: String },
    #[error("register \"{name}\" MSB index \"{msb}\" not 15 or 31")]
    MsbValue { name: String, msb: i64 },
    #[error("register with same address \"{address:#x}\" already exists")]
    DuplicateAddress { address: u32 },
    #[error("register with same name \"{name}\" already exists")]
    DuplicateRegister { name: String },
    #[error("no register is open in block \"{block}\"")]
    NoRegister { block: String },
    #[error("block address \"{address}\" not parsable")]
    BlockAddress { address: String },
    #[error("sheet \"{sheet}\" does not exist in file \"{file}\"")]
    MissingSheet { sheet: String, file: String },
    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Category of a non-fatal finding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiagnosticKind {
    /// Access right token outside the legal set for its side.
    UnknownAccessRight,
    /// Two bits of one field declare different rights.
    AccessRightMismatch,
    /// Field software right not accepted by its register.
    IncompatibleAccessRight,
    /// Bit index cell that is not an integer.
    UnparsableBitIndex,
    /// Bit index cell that does not match its column.
    UnexpectedBitIndex,
    /// Column 0 text that is not a register marker.
    UnexpectedValue,
}

/// A non-fatal finding reported while building the model.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sink for non-fatal findings. Every entry is also logged as a warning.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.entries.push(Diagnostic { kind, message });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
