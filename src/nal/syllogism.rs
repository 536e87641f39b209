//! Syllogistic rules
//!
//! Two statements sharing one term produce the classic NAL figures:
//! a shared middle yields deduction and exemplification, a shared subject
//! induction and comparison, a shared predicate abduction and comparison.
//! Analogy crosses an asymmetric statement with a symmetric one, and
//! detachment resolves an implication against a matching fact.

use super::unify::{substitute, unify, Bindings};
use super::{conclude, OpMask, Rule, RuleArity, RuleContext};
use crate::task::Task;
use crate::term::{Op, Term};
use crate::truth::Truth;

fn statement_parts(term: &Term, copula: Op) -> Option<(&Term, &Term)> {
    if term.op() == Some(copula) {
        Some((term.subject()?, term.predicate()?))
    } else {
        None
    }
}

/// First-figure syllogisms over one asymmetric copula.
pub struct SyllogismRule {
    copula: Op,
    /// The symmetric copula its comparisons conclude with.
    symmetric: Op,
}

impl SyllogismRule {
    pub fn new(copula: Op) -> Self {
        let symmetric = match copula {
            Op::Implication => Op::Equivalence,
            _ => Op::Similarity,
        };
        SyllogismRule { copula, symmetric }
    }

    fn mask(&self) -> OpMask {
        match self.copula {
            Op::Implication => OpMask::IMPLICATION,
            _ => OpMask::INHERITANCE,
        }
    }
}

impl Rule for SyllogismRule {
    fn name(&self) -> &'static str {
        match self.copula {
            Op::Implication => "syllogism-implication",
            _ => "syllogism-inheritance",
        }
    }

    fn arity(&self) -> RuleArity {
        RuleArity::Double
    }

    fn primary_mask(&self) -> OpMask {
        self.mask()
    }

    fn secondary_mask(&self) -> OpMask {
        self.mask()
    }

    fn apply(&self, primary: &Task, secondary: Option<&Task>, ctx: &RuleContext) -> Vec<Task> {
        let mut out = Vec::new();
        let Some(secondary) = secondary else {
            return out;
        };
        if !primary.is_belief() || !secondary.is_belief() {
            return out;
        }
        if primary.term() == secondary.term() {
            return out;
        }
        let (Some((s1, p1)), Some((s2, p2))) = (
            statement_parts(primary.term(), self.copula),
            statement_parts(secondary.term(), self.copula),
        ) else {
            return out;
        };
        let (Some(t1), Some(t2)) = (primary.truth(), secondary.truth()) else {
            return out;
        };
        let factory = ctx.factory;

        let mut push = |term: Result<Term, _>, truth: Truth| {
            if let Ok(term) = term {
                out.extend(conclude(term, truth, primary, secondary, ctx));
            }
        };

        if p1 == s2 {
            // <s1 --> m>, <m --> p2> |- <s1 --> p2> and its exemplification.
            push(
                factory.statement(self.copula, s1.clone(), p2.clone()),
                Truth::deduction(t1, t2),
            );
            push(
                factory.statement(self.copula, p2.clone(), s1.clone()),
                Truth::exemplification(t1, t2),
            );
        } else if p2 == s1 {
            push(
                factory.statement(self.copula, s2.clone(), p1.clone()),
                Truth::deduction(t2, t1),
            );
            push(
                factory.statement(self.copula, p1.clone(), s2.clone()),
                Truth::exemplification(t2, t1),
            );
        } else if s1 == s2 {
            // <m --> p1>, <m --> p2> |- induction and comparison.
            push(
                factory.statement(self.copula, p2.clone(), p1.clone()),
                Truth::induction(t1, t2),
            );
            push(
                factory.statement(self.symmetric, p1.clone(), p2.clone()),
                Truth::comparison(t1, t2),
            );
        } else if p1 == p2 {
            // <s1 --> m>, <s2 --> m> |- abduction and comparison.
            push(
                factory.statement(self.copula, s1.clone(), s2.clone()),
                Truth::abduction(t1, t2),
            );
            push(
                factory.statement(self.symmetric, s1.clone(), s2.clone()),
                Truth::comparison(t1, t2),
            );
        }
        out
    }
}

/// `<S --> M>` with `<M <-> P>` concludes `<S --> P>`.
pub struct AnalogyRule;

impl Rule for AnalogyRule {
    fn name(&self) -> &'static str {
        "analogy"
    }

    fn arity(&self) -> RuleArity {
        RuleArity::Double
    }

    fn primary_mask(&self) -> OpMask {
        OpMask::INHERITANCE | OpMask::SIMILARITY
    }

    fn secondary_mask(&self) -> OpMask {
        OpMask::INHERITANCE | OpMask::SIMILARITY
    }

    fn apply(&self, primary: &Task, secondary: Option<&Task>, ctx: &RuleContext) -> Vec<Task> {
        let mut out = Vec::new();
        let Some(secondary) = secondary else {
            return out;
        };
        if !primary.is_belief() || !secondary.is_belief() {
            return out;
        }
        // Orient the pair: one inheritance, one similarity.
        let (inh, sim) = match (primary.term().op(), secondary.term().op()) {
            (Some(Op::Inheritance), Some(Op::Similarity)) => (primary, secondary),
            (Some(Op::Similarity), Some(Op::Inheritance)) => (secondary, primary),
            _ => return out,
        };
        let (Some((s, p)), Some((x, y))) = (
            statement_parts(inh.term(), Op::Inheritance),
            statement_parts(sim.term(), Op::Similarity),
        ) else {
            return out;
        };
        let (Some(ti), Some(ts)) = (inh.truth(), sim.truth()) else {
            return out;
        };
        let truth = Truth::analogy(ti, ts);

        // Substitute the shared term through the similarity.
        let conclusion = if p == x {
            ctx.factory.statement(Op::Inheritance, s.clone(), y.clone())
        } else if p == y {
            ctx.factory.statement(Op::Inheritance, s.clone(), x.clone())
        } else if s == x {
            ctx.factory.statement(Op::Inheritance, y.clone(), p.clone())
        } else if s == y {
            ctx.factory.statement(Op::Inheritance, x.clone(), p.clone())
        } else {
            return out;
        };
        if let Ok(term) = conclusion {
            out.extend(conclude(term, truth, primary, secondary, ctx));
        }
        out
    }
}

/// `<A ==> B>` with a fact unifying against `A` concludes `B`.
pub struct DetachmentRule;

impl Rule for DetachmentRule {
    fn name(&self) -> &'static str {
        "detachment"
    }

    fn arity(&self) -> RuleArity {
        RuleArity::Double
    }

    fn primary_mask(&self) -> OpMask {
        OpMask::all()
    }

    fn secondary_mask(&self) -> OpMask {
        OpMask::all()
    }

    fn apply(&self, primary: &Task, secondary: Option<&Task>, ctx: &RuleContext) -> Vec<Task> {
        let mut out = Vec::new();
        let Some(secondary) = secondary else {
            return out;
        };
        if !primary.is_belief() || !secondary.is_belief() {
            return out;
        }
        // Orient: one side carries the implication, the other the fact.
        let (implication, fact) = match (
            primary.term().op() == Some(Op::Implication),
            secondary.term().op() == Some(Op::Implication),
        ) {
            (true, false) => (primary, secondary),
            (false, true) => (secondary, primary),
            _ => return out,
        };
        let Some((antecedent, consequent)) = statement_parts(implication.term(), Op::Implication)
        else {
            return out;
        };
        let mut bindings = Bindings::new();
        if !unify(antecedent, fact.term(), &mut bindings) {
            return out;
        }
        let conclusion = substitute(consequent, &bindings, ctx.factory);
        let (Some(ti), Some(tf)) = (implication.truth(), fact.truth()) else {
            return out;
        };
        let truth = Truth::deduction(ti, tf);
        out.extend(conclude(conclusion, truth, primary, secondary, ctx));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::OccurrenceTime;
    use crate::term::{TermFactory, VarKind};

    fn ctx<'a>(factory: &'a TermFactory) -> RuleContext<'a> {
        RuleContext { factory, now: 1 }
    }

    fn belief(_f: &TermFactory, term: Term, freq: f32, conf: f32) -> Task {
        Task::belief(term, Truth::new(freq, conf), OccurrenceTime::Eternal, 0)
    }

    #[test]
    fn test_deduction_figure() {
        let f = TermFactory::new();
        let t1 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("robin"), f.atom("bird"))
                .unwrap(),
            1.0,
            0.9,
        );
        let t2 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("bird"), f.atom("animal"))
                .unwrap(),
            1.0,
            0.9,
        );

        let rule = SyllogismRule::new(Op::Inheritance);
        let out = rule.apply(&t1, Some(&t2), &ctx(&f));
        let expected = f
            .statement(Op::Inheritance, f.atom("robin"), f.atom("animal"))
            .unwrap();
        let conclusion = out
            .iter()
            .find(|t| t.term() == &expected)
            .expect("deduction fired");
        let truth = conclusion.truth().unwrap();
        assert!((truth.frequency() - 1.0).abs() < 1.0e-4);
        assert!((truth.confidence() - 0.81).abs() < 1.0e-4);
    }

    #[test]
    fn test_shared_subject_figure() {
        let f = TermFactory::new();
        let t1 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("bird"), f.atom("flyer"))
                .unwrap(),
            0.9,
            0.9,
        );
        let t2 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("bird"), f.atom("animal"))
                .unwrap(),
            1.0,
            0.9,
        );

        let rule = SyllogismRule::new(Op::Inheritance);
        let out = rule.apply(&t1, Some(&t2), &ctx(&f));
        // Induction plus comparison.
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|t| t.term().op() == Some(Op::Similarity)));
        assert!(out.iter().any(|t| t.term().op() == Some(Op::Inheritance)));
    }

    #[test]
    fn test_shared_predicate_figure() {
        let f = TermFactory::new();
        let t1 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("robin"), f.atom("bird"))
                .unwrap(),
            1.0,
            0.9,
        );
        let t2 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("sparrow"), f.atom("bird"))
                .unwrap(),
            1.0,
            0.9,
        );

        let rule = SyllogismRule::new(Op::Inheritance);
        let out = rule.apply(&t1, Some(&t2), &ctx(&f));
        let abduction = f
            .statement(Op::Inheritance, f.atom("robin"), f.atom("sparrow"))
            .unwrap();
        assert!(out.iter().any(|t| t.term() == &abduction));
    }

    #[test]
    fn test_no_conclusion_without_shared_term() {
        let f = TermFactory::new();
        let t1 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("a"), f.atom("b")).unwrap(),
            1.0,
            0.9,
        );
        let t2 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("c"), f.atom("d")).unwrap(),
            1.0,
            0.9,
        );
        let rule = SyllogismRule::new(Op::Inheritance);
        assert!(rule.apply(&t1, Some(&t2), &ctx(&f)).is_empty());
    }

    #[test]
    fn test_overlapping_evidence_skipped() {
        let f = TermFactory::new();
        let t1 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("robin"), f.atom("bird"))
                .unwrap(),
            1.0,
            0.9,
        );
        let t2 = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("bird"), f.atom("animal"))
                .unwrap(),
            1.0,
            0.9,
        );
        let rule = SyllogismRule::new(Op::Inheritance);
        // A premise paired with itself shares all its evidence.
        assert!(rule.apply(&t1, Some(&t1), &ctx(&f)).is_empty());
        assert!(!rule.apply(&t1, Some(&t2), &ctx(&f)).is_empty());
    }

    #[test]
    fn test_implication_chaining() {
        let f = TermFactory::new();
        let t1 = belief(
            &f,
            f.statement(Op::Implication, f.atom("p"), f.atom("q")).unwrap(),
            0.9,
            0.9,
        );
        let t2 = belief(
            &f,
            f.statement(Op::Implication, f.atom("q"), f.atom("r")).unwrap(),
            0.9,
            0.9,
        );
        let rule = SyllogismRule::new(Op::Implication);
        let out = rule.apply(&t1, Some(&t2), &ctx(&f));
        let chained = f
            .statement(Op::Implication, f.atom("p"), f.atom("r"))
            .unwrap();
        assert!(out.iter().any(|t| t.term() == &chained));
    }

    #[test]
    fn test_analogy() {
        let f = TermFactory::new();
        let inh = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("robin"), f.atom("bird"))
                .unwrap(),
            1.0,
            0.9,
        );
        let sim = belief(
            &f,
            f.statement(Op::Similarity, f.atom("bird"), f.atom("avian"))
                .unwrap(),
            1.0,
            0.9,
        );
        let out = AnalogyRule.apply(&inh, Some(&sim), &ctx(&f));
        let expected = f
            .statement(Op::Inheritance, f.atom("robin"), f.atom("avian"))
            .unwrap();
        assert!(out.iter().any(|t| t.term() == &expected));

        // Symmetric order works too.
        let out = AnalogyRule.apply(&sim, Some(&inh), &ctx(&f));
        assert!(out.iter().any(|t| t.term() == &expected));
    }

    #[test]
    fn test_detachment_ground() {
        let f = TermFactory::new();
        let implication = belief(
            &f,
            f.statement(Op::Implication, f.atom("rain"), f.atom("wet"))
                .unwrap(),
            0.9,
            0.9,
        );
        let fact = belief(&f, f.atom("rain"), 1.0, 0.9);
        let out = DetachmentRule.apply(&implication, Some(&fact), &ctx(&f));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].term(), &f.atom("wet"));
        let truth = out[0].truth().unwrap();
        assert!((truth.frequency() - 0.9).abs() < 1.0e-4);
    }

    #[test]
    fn test_detachment_with_variables() {
        let f = TermFactory::new();
        let x = f.variable(VarKind::Independent, "x");
        let ante = f.statement(Op::Inheritance, x.clone(), f.atom("bird")).unwrap();
        let cons = f.statement(Op::Inheritance, x.clone(), f.atom("flyer")).unwrap();
        let implication = belief(
            &f,
            f.statement(Op::Implication, ante, cons).unwrap(),
            0.9,
            0.9,
        );
        let fact = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("robin"), f.atom("bird"))
                .unwrap(),
            1.0,
            0.9,
        );
        let out = DetachmentRule.apply(&fact, Some(&implication), &ctx(&f));
        let expected = f
            .statement(Op::Inheritance, f.atom("robin"), f.atom("flyer"))
            .unwrap();
        assert!(out.iter().any(|t| t.term() == &expected));
    }
}
