//! Structural decomposition rules
//!
//! Single-premise derivations over compound structure: conjunction
//! elimination, and distribution of an intersection over the copula. Both
//! use the structural truth function, a deduction against analytic truth.

use super::{conclude_single, OpMask, Rule, RuleArity, RuleContext};
use crate::task::Task;
use crate::term::Op;
use crate::truth::Truth;

/// `(&&, p, q).` yields `p.` and `q.`.
pub struct ConjunctionElimination;

impl Rule for ConjunctionElimination {
    fn name(&self) -> &'static str {
        "conjunction-elimination"
    }

    fn arity(&self) -> RuleArity {
        RuleArity::Single
    }

    fn primary_mask(&self) -> OpMask {
        OpMask::CONJUNCTION
    }

    fn apply(&self, primary: &Task, _secondary: Option<&Task>, ctx: &RuleContext) -> Vec<Task> {
        let mut out = Vec::new();
        if !primary.is_belief() || primary.term().op() != Some(Op::Conjunction) {
            return out;
        }
        let Some(truth) = primary.truth() else {
            return out;
        };
        let derived = Truth::structural_deduction(truth);
        for component in primary.term().components() {
            out.extend(conclude_single(component.clone(), derived, primary, ctx));
        }
        out
    }
}

/// `<S --> (&, P1, P2)>.` yields `<S --> Pi>.`; dually,
/// `<(|, S1, S2) --> P>.` yields `<Si --> P>.`.
pub struct IntersectionDecomposition;

impl Rule for IntersectionDecomposition {
    fn name(&self) -> &'static str {
        "intersection-decomposition"
    }

    fn arity(&self) -> RuleArity {
        RuleArity::Single
    }

    fn primary_mask(&self) -> OpMask {
        OpMask::INHERITANCE
    }

    fn apply(&self, primary: &Task, _secondary: Option<&Task>, ctx: &RuleContext) -> Vec<Task> {
        let mut out = Vec::new();
        if !primary.is_belief() {
            return out;
        }
        let term = primary.term();
        let (Some(subject), Some(predicate)) = (term.subject(), term.predicate()) else {
            return out;
        };
        let Some(truth) = primary.truth() else {
            return out;
        };
        let derived = Truth::structural_deduction(truth);

        if predicate.op() == Some(Op::IntersectionExt) {
            for part in predicate.components() {
                if let Ok(t) = ctx
                    .factory
                    .statement(Op::Inheritance, subject.clone(), part.clone())
                {
                    out.extend(conclude_single(t, derived, primary, ctx));
                }
            }
        }
        if subject.op() == Some(Op::IntersectionInt) {
            for part in subject.components() {
                if let Ok(t) = ctx
                    .factory
                    .statement(Op::Inheritance, part.clone(), predicate.clone())
                {
                    out.extend(conclude_single(t, derived, primary, ctx));
                }
            }
        }
        out
    }
}
