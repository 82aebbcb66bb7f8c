//! Identifiers: what a batch looks up.

use std::fmt;

/// Which request field an identifier populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// An email address.
    Email,

    /// A phone number.
    Phone,

    /// A Twitter handle.
    Twitter,
}

impl LookupKind {
    /// The wire name: used as the query parameter and as the record column
    /// that echoes the identifier back.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Twitter => "twitter",
        }
    }

    /// Plural noun for human-readable summaries.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Email => "emails",
            Self::Phone => "phone numbers",
            Self::Twitter => "handles",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input value, tagged with the kind of lookup it drives.
///
/// Read once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    kind: LookupKind,
    value: String,
}

impl Identifier {
    pub fn new(kind: LookupKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.value)
    }
}
