//! Variable terms
//!
//! Variables are atomic terms that can be bound by unification. Three kinds
//! exist, distinguished by their surface prefix: independent (`$x`),
//! dependent (`#x`), and query (`?x`).

use smartstring::{LazyCompact, SmartString};
use std::fmt;

/// The kind of a variable, determining its prefix and binding role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// `$x` — universally scoped within a statement.
    Independent,
    /// `#x` — existentially scoped.
    Dependent,
    /// `?x` — stands for the sought term in a question.
    Query,
}

impl VarKind {
    pub fn prefix(&self) -> char {
        match self {
            VarKind::Independent => '$',
            VarKind::Dependent => '#',
            VarKind::Query => '?',
        }
    }

    pub fn from_prefix(c: char) -> Option<VarKind> {
        Some(match c {
            '$' => VarKind::Independent,
            '#' => VarKind::Dependent,
            '?' => VarKind::Query,
            _ => return None,
        })
    }
}

/// A variable term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    kind: VarKind,
    name: SmartString<LazyCompact>,
}

impl Variable {
    /// `name` is stored without the prefix character.
    pub(crate) fn new(kind: VarKind, name: &str) -> Self {
        let name = name.strip_prefix(kind.prefix()).unwrap_or(name);
        Variable {
            kind,
            name: SmartString::from(name),
        }
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// The name without its prefix.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.name)
    }
}
