// Licensed under the Apache-2.0 license

//! Access rights and the static policy tables built on them.
//!
//! Every bit, field and register in the sheet declares two rights: the
//! hardware side and the software side. The tables in this module decide
//! which tokens are legal on each side, which software rights make a field
//! writable, and which field rights may live inside a register.

use std::fmt;
use std::str::FromStr;

/// One access-right token as written in the sheet.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum AccessRight {
    /// `X`, the right is not known.
    #[default]
    Unknown,
    /// `R/W`
    ReadWrite,
    /// `R`
    Read,
    /// `W`
    Write,
    /// `S`, write one to set.
    Set,
    /// `C`, write one to clear.
    Clear,
    /// Any other token, kept verbatim (trimmed). Never writable.
    Invalid(String),
}

/// Rights legal on the hardware side.
pub static HW_RIGHTS: &[AccessRight] = &[
    AccessRight::Unknown,
    AccessRight::ReadWrite,
    AccessRight::Read,
    AccessRight::Write,
];

/// Rights legal on the software side.
pub static SW_RIGHTS: &[AccessRight] = &[
    AccessRight::Unknown,
    AccessRight::ReadWrite,
    AccessRight::Read,
    AccessRight::Write,
    AccessRight::Set,
    AccessRight::Clear,
];

/// Software rights that make a field or register writable.
pub static SW_WRITABLE: &[AccessRight] = &[
    AccessRight::Unknown,
    AccessRight::ReadWrite,
    AccessRight::Write,
    AccessRight::Set,
    AccessRight::Clear,
];

/// Register software right → field software rights allowed inside it.
///
/// A register right missing from the table (`X`) accepts every field.
pub static COMPATIBLE: &[(AccessRight, &[AccessRight])] = &[
    (
        AccessRight::Read,
        &[
            AccessRight::ReadWrite,
            AccessRight::Read,
            AccessRight::Set,
            AccessRight::Clear,
            AccessRight::Unknown,
        ],
    ),
    (
        AccessRight::ReadWrite,
        &[AccessRight::ReadWrite, AccessRight::Unknown],
    ),
    (AccessRight::Write, &[AccessRight::Write, AccessRight::Unknown]),
    (AccessRight::Set, &[AccessRight::Set, AccessRight::Unknown]),
    (AccessRight::Clear, &[AccessRight::Clear, AccessRight::Unknown]),
];

impl AccessRight {
    /// The token used in the sheet for this right.
    pub fn token(&self) -> &str {
        match self {
            AccessRight::Unknown => "X",
            AccessRight::ReadWrite => "R/W",
            AccessRight::Read => "R",
            AccessRight::Write => "W",
            AccessRight::Set => "S",
            AccessRight::Clear => "C",
            AccessRight::Invalid(token) => token,
        }
    }

    pub fn is_writable(&self) -> bool {
        SW_WRITABLE.contains(self)
    }

    /// Field software rights accepted inside a register with this software right.
    pub fn compatible_fields(&self) -> Option<&'static [AccessRight]> {
        COMPATIBLE
            .iter()
            .find(|(register, _)| register == self)
            .map(|(_, fields)| *fields)
    }

    /// Whether a field with software right `field` may live in a register
    /// whose software right is `self`.
    pub fn accepts_field(&self, field: &AccessRight) -> bool {
        self.compatible_fields()
            .map_or(true, |allowed| allowed.contains(field))
    }
}

impl fmt::Display for AccessRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Returned when a token is not one of the six known rights.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownRight(pub String);

impl FromStr for AccessRight {
    type Err = UnknownRight;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" => Ok(AccessRight::Unknown),
            "R/W" => Ok(AccessRight::ReadWrite),
            "R" => Ok(AccessRight::Read),
            "W" => Ok(AccessRight::Write),
            "S" => Ok(AccessRight::Set),
            "C" => Ok(AccessRight::Clear),
            other => Err(UnknownRight(other.to_string())),
        }
    }
}

/// Which side of the bus a right applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Hardware,
    Software,
}

impl Side {
    pub fn legal(self) -> &'static [AccessRight] {
        match self {
            Side::Hardware => HW_RIGHTS,
            Side::Software => SW_RIGHTS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Hardware => "HW",
            Side::Software => "SW",
        }
    }
}

/// The pair of rights declared for a bit, field or register.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Rights {
    pub hw: AccessRight,
    pub sw: AccessRight,
}

impl Rights {
    pub fn new(hw: AccessRight, sw: AccessRight) -> Self {
        Self { hw, sw }
    }
}

fn legal_list(side: Side) -> String {
    let tokens: Vec<&str> = side.legal().iter().map(|r| r.token()).collect();
    format!("({})", tokens.join(", "))
}

/// Resolve one right token for `owner`, returning a complaint when the token
/// is unknown or not legal on `side`. Unknown tokens resolve to
/// [`AccessRight::Invalid`].
pub(crate) fn resolve(owner: &str, side: Side, token: &str) -> (AccessRight, Option<String>) {
    let complaint = || {
        format!(
            "{owner} {} access right '{}' not in '{}'",
            side.label(),
            token.trim(),
            legal_list(side)
        )
    };
    match token.parse::<AccessRight>() {
        Ok(right) if side.legal().contains(&right) => (right, None),
        Ok(right) => (right, Some(complaint())),
        Err(UnknownRight(token)) => (AccessRight::Invalid(token), Some(complaint())),
    }
}

/// Parse a token without complaining.
pub(crate) fn lenient(token: &str) -> AccessRight {
    token
        .parse()
        .unwrap_or_else(|UnknownRight(token)| AccessRight::Invalid(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        for right in SW_RIGHTS {
            assert_eq!(right.token().parse::<AccessRight>(), Ok(right.clone()));
        }
        assert_eq!(" R/W ".parse::<AccessRight>(), Ok(AccessRight::ReadWrite));
        assert!("RW".parse::<AccessRight>().is_err());
        assert!("".parse::<AccessRight>().is_err());
    }

    #[test]
    fn test_writable() {
        assert!(AccessRight::ReadWrite.is_writable());
        assert!(AccessRight::Clear.is_writable());
        assert!(AccessRight::Unknown.is_writable());
        assert!(!AccessRight::Read.is_writable());
        assert!(!AccessRight::Invalid("RO".to_string()).is_writable());
        assert!(!AccessRight::Invalid(String::new()).is_writable());
    }

    #[test]
    fn test_compatibility_table() {
        let read = AccessRight::Read;
        for field in SW_RIGHTS {
            // A read-only register accepts anything but a write-only field
            assert_eq!(read.accepts_field(field), *field != AccessRight::Write);
        }
        assert!(AccessRight::Clear.accepts_field(&AccessRight::Clear));
        assert!(AccessRight::Clear.accepts_field(&AccessRight::Unknown));
        assert!(!AccessRight::Clear.accepts_field(&AccessRight::Read));
        assert!(!AccessRight::ReadWrite.accepts_field(&AccessRight::Read));
        assert!(AccessRight::Unknown.accepts_field(&AccessRight::Write));
        assert!(!AccessRight::Read.accepts_field(&AccessRight::Invalid("RO".to_string())));
        assert_eq!(AccessRight::Unknown.compatible_fields(), None);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("field 'A'", Side::Hardware, "R"),
            (AccessRight::Read, None)
        );
        let (right, complaint) = resolve("field 'A'", Side::Hardware, "S");
        assert_eq!(right, AccessRight::Set);
        assert_eq!(
            complaint.as_deref(),
            Some("field 'A' HW access right 'S' not in '(X, R/W, R, W)'")
        );
        let (right, complaint) = resolve("register 'B'", Side::Software, "RW");
        assert_eq!(right, AccessRight::Invalid("RW".to_string()));
        assert_eq!(right.to_string(), "RW");
        assert!(complaint.is_some());
        assert_eq!(lenient(" junk "), AccessRight::Invalid("junk".to_string()));
        assert_eq!(lenient(""), AccessRight::Invalid(String::new()));
        assert_ne!(lenient("RO"), lenient("RW"));
        assert_eq!(lenient("X"), AccessRight::Unknown);
    }
}
