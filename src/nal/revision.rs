//! Revision
//!
//! Two beliefs about the same statement with disjoint evidential bases
//! merge into one belief whose confidence exceeds either parent's. The
//! ingestion path applies this in place of insertion; the rule form here
//! serves dispatch and external callers.

use super::{OpMask, Rule, RuleArity, RuleContext};
use crate::budget::Budget;
use crate::stamp::Stamp;
use crate::task::{Punctuation, Task};
use crate::truth::Truth;

pub struct RevisionRule;

impl RevisionRule {
    /// The merged belief, or `None` when the premises do not qualify.
    pub fn revise(a: &Task, b: &Task, now: i64) -> Option<Task> {
        if !a.is_belief() || !b.is_belief() || a.term() != b.term() {
            return None;
        }
        let stamp = Stamp::merge(a.stamp(), b.stamp(), now)?;
        let truth = Truth::revision(a.truth()?, b.truth()?);
        let budget = Budget::new(
            a.budget().priority().max(b.budget().priority()),
            a.budget().durability().max(b.budget().durability()),
            truth.expectation(),
        );
        Task::new(a.term().clone(), Punctuation::Belief, Some(truth), stamp, budget).ok()
    }
}

impl Rule for RevisionRule {
    fn name(&self) -> &'static str {
        "revision"
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
        secondary
            .and_then(|s| Self::revise(primary, s, ctx.now))
            .into_iter()
            .collect()
    }
}
