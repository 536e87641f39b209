//! Atomic terms
//!
//! An atom is a bare name like `bird` or `animal`. Names are stored inline
//! for short identifiers via `SmartString`.

use smartstring::{LazyCompact, SmartString};
use std::fmt;

/// An atomic term: an opaque name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    name: SmartString<LazyCompact>,
}

impl Atom {
    pub(crate) fn new(name: &str) -> Self {
        Atom {
            name: SmartString::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
