//! Non-Axiomatic Logic
//!
//! The rule layer and the reasoner built on it. Rules declare their premise
//! shapes as operator masks so dispatch only visits rules whose patterns can
//! match; they are pure, producing new tasks and never touching their
//! premises. Evidence overlap between premises yields no conclusion.

pub mod decompose;
pub mod nar;
pub mod revision;
pub mod syllogism;
pub mod unify;

use crate::budget::Budget;
use crate::stamp::Stamp;
use crate::task::{Punctuation, Task};
use crate::term::{Op, Term, TermFactory};
use crate::truth::Truth;
use bitflags::bitflags;

pub use nar::{StepReport, SubmitOutcome, NAR};

bitflags! {
    /// Operator pattern of a premise slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpMask: u16 {
        const INHERITANCE      = 1 << 0;
        const SIMILARITY       = 1 << 1;
        const IMPLICATION      = 1 << 2;
        const EQUIVALENCE      = 1 << 3;
        const CONJUNCTION      = 1 << 4;
        const PRODUCT          = 1 << 5;
        const INTERSECTION_EXT = 1 << 6;
        const INTERSECTION_INT = 1 << 7;
        const DIFFERENCE_EXT   = 1 << 8;
        const DIFFERENCE_INT   = 1 << 9;
        const NEGATION         = 1 << 10;
        /// Atoms and variables.
        const ATOMIC           = 1 << 11;
    }
}

impl OpMask {
    pub fn of(term: &Term) -> OpMask {
        match term.op() {
            Some(Op::Inheritance) => OpMask::INHERITANCE,
            Some(Op::Similarity) => OpMask::SIMILARITY,
            Some(Op::Implication) => OpMask::IMPLICATION,
            Some(Op::Equivalence) => OpMask::EQUIVALENCE,
            Some(Op::Conjunction) => OpMask::CONJUNCTION,
            Some(Op::Product) => OpMask::PRODUCT,
            Some(Op::IntersectionExt) => OpMask::INTERSECTION_EXT,
            Some(Op::IntersectionInt) => OpMask::INTERSECTION_INT,
            Some(Op::DifferenceExt) => OpMask::DIFFERENCE_EXT,
            Some(Op::DifferenceInt) => OpMask::DIFFERENCE_INT,
            Some(Op::Negation) => OpMask::NEGATION,
            None => OpMask::ATOMIC,
        }
    }

    /// The four copulas.
    pub fn statements() -> OpMask {
        OpMask::INHERITANCE | OpMask::SIMILARITY | OpMask::IMPLICATION | OpMask::EQUIVALENCE
    }
}

/// Shared state rules read while concluding.
pub struct RuleContext<'a> {
    pub factory: &'a TermFactory,
    pub now: i64,
}

/// How many premise slots a rule fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleArity {
    Single,
    Double,
}

/// An inference rule.
pub trait Rule {
    fn name(&self) -> &'static str;

    fn arity(&self) -> RuleArity;

    /// Operator pattern the primary premise must match.
    fn primary_mask(&self) -> OpMask;

    /// Operator pattern for the secondary premise of a double rule.
    fn secondary_mask(&self) -> OpMask {
        OpMask::empty()
    }

    /// Produce conclusions. `secondary` is `None` for single-premise rules.
    /// Overlapping evidence produces no conclusions.
    fn apply(&self, primary: &Task, secondary: Option<&Task>, ctx: &RuleContext) -> Vec<Task>;
}

/// Rules bucketed by arity, matched by operator mask intersection.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        RuleRegistry { rules: Vec::new() }
    }

    /// The core rule set: syllogisms over `-->` and `==>`, analogy,
    /// detachment, revision, and the structural decompositions.
    pub fn with_defaults() -> Self {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(syllogism::SyllogismRule::new(Op::Inheritance)));
        registry.register(Box::new(syllogism::SyllogismRule::new(Op::Implication)));
        registry.register(Box::new(syllogism::AnalogyRule));
        registry.register(Box::new(syllogism::DetachmentRule));
        registry.register(Box::new(revision::RevisionRule));
        registry.register(Box::new(decompose::ConjunctionElimination));
        registry.register(Box::new(decompose::IntersectionDecomposition));
        registry
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Double-premise rules whose patterns admit this operator pair.
    pub fn double_matching(
        &self,
        primary: OpMask,
        secondary: OpMask,
    ) -> impl Iterator<Item = &dyn Rule> {
        self.rules
            .iter()
            .filter(move |r| {
                r.arity() == RuleArity::Double
                    && r.primary_mask().intersects(primary)
                    && r.secondary_mask().intersects(secondary)
            })
            .map(|r| r.as_ref())
    }

    /// Single-premise rules admitting this operator.
    pub fn single_matching(&self, primary: OpMask) -> impl Iterator<Item = &dyn Rule> {
        self.rules
            .iter()
            .filter(move |r| r.arity() == RuleArity::Single && r.primary_mask().intersects(primary))
            .map(|r| r.as_ref())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Build a derived belief from two premises: merged stamp (or nothing, on
/// evidence overlap), derived budget, and no trivial `<a --> a>` output.
pub(crate) fn conclude(
    term: Term,
    truth: Truth,
    primary: &Task,
    secondary: &Task,
    ctx: &RuleContext,
) -> Option<Task> {
    if let (Some(s), Some(p)) = (term.subject(), term.predicate()) {
        if s == p {
            return None;
        }
    }
    let stamp = Stamp::merge(primary.stamp(), secondary.stamp(), ctx.now)?;
    let budget = Budget::derived(primary.budget(), secondary.budget(), truth.expectation());
    Task::new(term, Punctuation::Belief, Some(truth), stamp, budget).ok()
}

/// Build a derived belief from one premise.
pub(crate) fn conclude_single(
    term: Term,
    truth: Truth,
    primary: &Task,
    ctx: &RuleContext,
) -> Option<Task> {
    if let (Some(s), Some(p)) = (term.subject(), term.predicate()) {
        if s == p {
            return None;
        }
    }
    let stamp = Stamp::derived_single(primary.stamp(), ctx.now);
    let budget = Budget::derived_single(primary.budget(), truth.expectation());
    Task::new(term, Punctuation::Belief, Some(truth), stamp, budget).ok()
}
