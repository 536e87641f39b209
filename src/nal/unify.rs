//! First-order unification
//!
//! Variables on either side may bind; bindings chain and are resolved on
//! the fly. Binding a variable to a term containing it is refused (occur
//! check), so substitution always terminates.

use crate::term::{Term, TermFactory};
use hashbrown::HashMap;

/// Variable term -> bound term.
pub type Bindings = HashMap<Term, Term>;

/// Follow binding chains until a non-variable or an unbound variable.
fn resolve(term: &Term, bindings: &Bindings) -> Term {
    let mut current = term.clone();
    while current.is_variable() {
        match bindings.get(&current) {
            Some(next) => current = next.clone(),
            None => break,
        }
    }
    current
}

fn occurs(var: &Term, term: &Term, bindings: &Bindings) -> bool {
    let term = resolve(term, bindings);
    if &term == var {
        return true;
    }
    term.components().iter().any(|c| occurs(var, c, bindings))
}

/// Unify two terms, extending `bindings`. On failure the bindings may hold
/// partial entries; callers that need rollback should clone first.
pub fn unify(a: &Term, b: &Term, bindings: &mut Bindings) -> bool {
    let a = resolve(a, bindings);
    let b = resolve(b, bindings);
    if a == b {
        return true;
    }
    if a.is_variable() {
        if occurs(&a, &b, bindings) {
            return false;
        }
        bindings.insert(a, b);
        return true;
    }
    if b.is_variable() {
        if occurs(&b, &a, bindings) {
            return false;
        }
        bindings.insert(b, a);
        return true;
    }
    match (a.op(), b.op()) {
        (Some(op_a), Some(op_b)) if op_a == op_b => {
            let (ca, cb) = (a.components(), b.components());
            ca.len() == cb.len()
                && ca
                    .iter()
                    .zip(cb.iter())
                    .all(|(x, y)| unify(x, y, bindings))
        }
        _ => false,
    }
}

/// Rebuild `term` with every bound variable replaced.
pub fn substitute(term: &Term, bindings: &Bindings, factory: &TermFactory) -> Term {
    let term = resolve(term, bindings);
    if !term.is_compound() {
        return term;
    }
    let components: Vec<Term> = term
        .components()
        .iter()
        .map(|c| substitute(c, bindings, factory))
        .collect();
    let op = term.op().expect("compound has an operator");
    // Arity is preserved, so reconstruction cannot fail.
    factory.compound(op, components).unwrap_or(term)
}
