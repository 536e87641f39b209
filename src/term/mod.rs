//! Term representation in NARS
//!
//! A term is the symbolic unit the reasoner operates on. Terms are either
//! atomic (a name), variables, or compounds built from an operator and an
//! ordered component list. Statements are compounds whose operator is one of
//! the four copulas. Terms are immutable and hash-consed by [`TermFactory`]:
//! structurally equal terms share one allocation, so equality is a pointer
//! comparison in the common case and hashing reads a precomputed value.

pub mod atom;
pub mod compound;
pub mod factory;
pub mod var;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use atom::Atom;
pub use compound::Compound;
pub use factory::{TermError, TermFactory};
pub use var::{VarKind, Variable};

/// Operators for compound terms. Atoms and variables carry no operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `-->` copula
    Inheritance,
    /// `<->` copula (symmetric)
    Similarity,
    /// `==>` copula
    Implication,
    /// `<=>` copula (symmetric)
    Equivalence,
    /// `&&`
    Conjunction,
    /// `*`
    Product,
    /// `&`
    IntersectionExt,
    /// `|`
    IntersectionInt,
    /// `-`
    DifferenceExt,
    /// `~`
    DifferenceInt,
    /// `--`
    Negation,
}

impl Op {
    /// The surface symbol used in Narsese.
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Inheritance => "-->",
            Op::Similarity => "<->",
            Op::Implication => "==>",
            Op::Equivalence => "<=>",
            Op::Conjunction => "&&",
            Op::Product => "*",
            Op::IntersectionExt => "&",
            Op::IntersectionInt => "|",
            Op::DifferenceExt => "-",
            Op::DifferenceInt => "~",
            Op::Negation => "--",
        }
    }

    /// Look an operator up by its surface symbol.
    pub fn from_symbol(s: &str) -> Option<Op> {
        Some(match s {
            "-->" => Op::Inheritance,
            "<->" => Op::Similarity,
            "==>" => Op::Implication,
            "<=>" => Op::Equivalence,
            "&&" => Op::Conjunction,
            "*" => Op::Product,
            "&" => Op::IntersectionExt,
            "|" => Op::IntersectionInt,
            "-" => Op::DifferenceExt,
            "~" => Op::DifferenceInt,
            "--" => Op::Negation,
            _ => return None,
        })
    }

    /// Copulas form statements: exactly two components, subject and predicate.
    pub fn is_copula(&self) -> bool {
        matches!(
            self,
            Op::Inheritance | Op::Similarity | Op::Implication | Op::Equivalence
        )
    }

    /// Commutative operators have their components sorted before interning.
    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            Op::Conjunction
                | Op::IntersectionExt
                | Op::IntersectionInt
                | Op::Similarity
                | Op::Equivalence
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The structural variants of a term.
#[derive(Debug)]
pub enum TermKind {
    Atom(Atom),
    Var(Variable),
    Compound(Compound),
}

#[derive(Debug)]
pub(crate) struct TermInner {
    kind: TermKind,
    /// Structural hash, computed once at interning time.
    hash: u64,
    /// Number of subterms plus one.
    complexity: u32,
}

impl TermInner {
    pub(crate) fn new(kind: TermKind, hash: u64, complexity: u32) -> Self {
        TermInner {
            kind,
            hash,
            complexity,
        }
    }
}

/// A shared, immutable handle to an interned term.
#[derive(Debug, Clone)]
pub struct Term {
    inner: Arc<TermInner>,
}

impl Term {
    pub(crate) fn from_inner(inner: TermInner) -> Self {
        Term {
            inner: Arc::new(inner),
        }
    }

    pub fn kind(&self) -> &TermKind {
        &self.inner.kind
    }

    /// The operator, or `None` for atoms and variables.
    pub fn op(&self) -> Option<Op> {
        match &self.inner.kind {
            TermKind::Compound(c) => Some(c.op()),
            _ => None,
        }
    }

    /// Number of subterms plus one.
    pub fn complexity(&self) -> u32 {
        self.inner.complexity
    }

    /// The precomputed structural hash.
    pub fn structural_hash(&self) -> u64 {
        self.inner.hash
    }

    pub fn is_atom(&self) -> bool {
        matches!(self.inner.kind, TermKind::Atom(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.inner.kind, TermKind::Var(_))
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.inner.kind, TermKind::Compound(_))
    }

    /// A statement is a compound whose operator is a copula.
    pub fn is_statement(&self) -> bool {
        self.op().map(|op| op.is_copula()).unwrap_or(false)
    }

    /// Ordered components; empty for atoms and variables.
    pub fn components(&self) -> &[Term] {
        match &self.inner.kind {
            TermKind::Compound(c) => c.components(),
            _ => &[],
        }
    }

    /// The subject of a statement.
    pub fn subject(&self) -> Option<&Term> {
        if self.is_statement() {
            self.components().first()
        } else {
            None
        }
    }

    /// The predicate of a statement.
    pub fn predicate(&self) -> Option<&Term> {
        if self.is_statement() {
            self.components().get(1)
        } else {
            None
        }
    }

    /// Whether `other` occurs in this term (including as the term itself).
    pub fn contains(&self, other: &Term) -> bool {
        if self == other {
            return true;
        }
        self.components().iter().any(|c| c.contains(other))
    }

    /// Whether any variable occurs anywhere in this term.
    pub fn has_variable(&self) -> bool {
        match &self.inner.kind {
            TermKind::Var(_) => true,
            TermKind::Atom(_) => false,
            TermKind::Compound(c) => c.components().iter().any(|t| t.has_variable()),
        }
    }

    /// Whether a query variable (`?x`) occurs anywhere in this term.
    pub fn has_query_var(&self) -> bool {
        match &self.inner.kind {
            TermKind::Var(v) => v.kind() == VarKind::Query,
            TermKind::Atom(_) => false,
            TermKind::Compound(c) => c.components().iter().any(|t| t.has_query_var()),
        }
    }

    fn structural_eq(&self, other: &Term) -> bool {
        match (&self.inner.kind, &other.inner.kind) {
            (TermKind::Atom(a), TermKind::Atom(b)) => a == b,
            (TermKind::Var(a), TermKind::Var(b)) => a == b,
            (TermKind::Compound(a), TermKind::Compound(b)) => {
                a.op() == b.op()
                    && a.components().len() == b.components().len()
                    && a.components()
                        .iter()
                        .zip(b.components())
                        .all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.hash == other.inner.hash && self.structural_eq(other))
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.hash);
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            TermKind::Atom(a) => write!(f, "{}", a),
            TermKind::Var(v) => write!(f, "{}", v),
            TermKind::Compound(c) => write!(f, "{}", c),
        }
    }
}
