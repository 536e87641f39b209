//! Term interning
//!
//! The factory is the only way to construct terms. It keeps a table from
//! structural hash to the canonical handles carrying that hash, so repeated
//! construction of the same structure yields the same allocation. The table
//! lives as long as the engine that owns the factory.

use super::{Atom, Compound, Op, Term, TermInner, TermKind, VarKind, Variable};
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors from term construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("operator {0} does not form statements")]
    NotACopula(Op),
    #[error("operator {op} cannot take {got} components")]
    Arity { op: Op, got: usize },
}

/// Hash-consing term factory.
pub struct TermFactory {
    table: RwLock<HashMap<u64, Vec<Term>>>,
}

impl TermFactory {
    pub fn new() -> Self {
        TermFactory {
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Intern an atomic term.
    pub fn atom(&self, name: &str) -> Term {
        let atom = Atom::new(name);
        let mut h = DefaultHasher::new();
        0u8.hash(&mut h);
        atom.name().hash(&mut h);
        self.intern(TermKind::Atom(atom), h.finish(), 1)
    }

    /// Intern a variable term.
    pub fn variable(&self, kind: VarKind, name: &str) -> Term {
        let var = Variable::new(kind, name);
        let mut h = DefaultHasher::new();
        1u8.hash(&mut h);
        var.kind().hash(&mut h);
        var.name().hash(&mut h);
        self.intern(TermKind::Var(var), h.finish(), 1)
    }

    /// Intern a compound term. Commutative operators have their components
    /// sorted into canonical order first.
    pub fn compound(&self, op: Op, mut components: Vec<Term>) -> Result<Term, TermError> {
        let arity_ok = match op {
            Op::Negation => components.len() == 1,
            _ if op.is_copula() => components.len() == 2,
            _ => components.len() >= 2,
        };
        if !arity_ok {
            return Err(TermError::Arity {
                op,
                got: components.len(),
            });
        }

        if op.is_commutative() {
            components.sort_by_cached_key(|t| (t.complexity(), t.to_string()));
        }

        let complexity = 1 + components.iter().map(|t| t.complexity()).sum::<u32>();
        let mut h = DefaultHasher::new();
        2u8.hash(&mut h);
        op.hash(&mut h);
        for c in &components {
            h.write_u64(c.structural_hash());
        }
        Ok(self.intern(
            TermKind::Compound(Compound::new(op, components)),
            h.finish(),
            complexity,
        ))
    }

    /// Intern a statement `<subject copula predicate>`.
    pub fn statement(&self, copula: Op, subject: Term, predicate: Term) -> Result<Term, TermError> {
        if !copula.is_copula() {
            return Err(TermError::NotACopula(copula));
        }
        self.compound(copula, vec![subject, predicate])
    }

    /// Number of distinct interned terms.
    pub fn len(&self) -> usize {
        self.table.read().values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    fn intern(&self, kind: TermKind, hash: u64, complexity: u32) -> Term {
        let candidate = Term::from_inner(TermInner::new(kind, hash, complexity));
        {
            let table = self.table.read();
            if let Some(bucket) = table.get(&hash) {
                if let Some(existing) = bucket.iter().find(|t| **t == candidate) {
                    return existing.clone();
                }
            }
        }
        let mut table = self.table.write();
        let bucket = table.entry(hash).or_default();
        // Re-probe under the write lock.
        if let Some(existing) = bucket.iter().find(|t| **t == candidate) {
            return existing.clone();
        }
        bucket.push(candidate.clone());
        candidate
    }
}

impl Default for TermFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_pointer_stable() {
        let f = TermFactory::new();
        let a1 = f.atom("cat");
        let a2 = f.atom("cat");
        assert_eq!(a1, a2);
        assert_eq!(f.len(), 1);

        let s1 = f
            .statement(Op::Inheritance, f.atom("cat"), f.atom("animal"))
            .unwrap();
        let s2 = f
            .statement(Op::Inheritance, f.atom("cat"), f.atom("animal"))
            .unwrap();
        assert_eq!(s1, s2);
        assert_eq!(s1.structural_hash(), s2.structural_hash());
    }

    #[test]
    fn test_commutative_canonicalization() {
        let f = TermFactory::new();
        let ab = f
            .compound(Op::Conjunction, vec![f.atom("a"), f.atom("b")])
            .unwrap();
        let ba = f
            .compound(Op::Conjunction, vec![f.atom("b"), f.atom("a")])
            .unwrap();
        assert_eq!(ab, ba);
        assert_eq!(format!("{}", ba), "(&&, a, b)");

        let sim1 = f
            .statement(Op::Similarity, f.atom("b"), f.atom("a"))
            .unwrap();
        let sim2 = f
            .statement(Op::Similarity, f.atom("a"), f.atom("b"))
            .unwrap();
        assert_eq!(sim1, sim2);
    }

    #[test]
    fn test_non_commutative_order_kept() {
        let f = TermFactory::new();
        let ab = f
            .statement(Op::Inheritance, f.atom("a"), f.atom("b"))
            .unwrap();
        let ba = f
            .statement(Op::Inheritance, f.atom("b"), f.atom("a"))
            .unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_arity_errors() {
        let f = TermFactory::new();
        assert!(matches!(
            f.compound(Op::Negation, vec![f.atom("a"), f.atom("b")]),
            Err(TermError::Arity { .. })
        ));
        assert!(matches!(
            f.compound(Op::Conjunction, vec![f.atom("a")]),
            Err(TermError::Arity { .. })
        ));
        assert_eq!(
            f.statement(Op::Conjunction, f.atom("a"), f.atom("b")),
            Err(TermError::NotACopula(Op::Conjunction))
        );
    }

    #[test]
    fn test_cross_factory_structural_equality() {
        let f1 = TermFactory::new();
        let f2 = TermFactory::new();
        let t1 = f1
            .statement(Op::Implication, f1.atom("p"), f1.atom("q"))
            .unwrap();
        let t2 = f2
            .statement(Op::Implication, f2.atom("p"), f2.atom("q"))
            .unwrap();
        // Different allocations, same structure.
        assert_eq!(t1, t2);
    }
}
