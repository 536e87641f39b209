//! Decomposition strategy
//!
//! A compound primary term proposes its own parts: subject and predicate
//! for statements, components otherwise. Nothing is proposed for atomic
//! primaries.

use super::{CandidateTag, PremiseCandidate, PremiseStrategy, StrategyContext, StrategyStats};
use crate::task::Task;

pub struct DecompositionStrategy {
    stats: StrategyStats,
}

impl DecompositionStrategy {
    pub fn new() -> Self {
        DecompositionStrategy {
            stats: StrategyStats::default(),
        }
    }
}

impl Default for DecompositionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PremiseStrategy for DecompositionStrategy {
    fn name(&self) -> &'static str {
        "decomposition"
    }

    fn stats(&self) -> &StrategyStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut StrategyStats {
        &mut self.stats
    }

    fn propose(&self, primary: &Task, ctx: &StrategyContext) -> Vec<PremiseCandidate> {
        let term = primary.term();
        let cfg = ctx.config;
        let mut out = Vec::new();

        if term.is_statement() {
            if let (Some(subject), Some(predicate)) = (term.subject(), term.predicate()) {
                out.push(PremiseCandidate {
                    term: subject.clone(),
                    tag: CandidateTag::Subject,
                    priority: cfg.subject_priority,
                    source: None,
                });
                out.push(PremiseCandidate {
                    term: predicate.clone(),
                    tag: CandidateTag::Predicate,
                    priority: cfg.predicate_priority,
                    source: None,
                });
            }
        } else if term.is_compound() {
            for component in term.components() {
                out.push(PremiseCandidate {
                    term: component.clone(),
                    tag: CandidateTag::Component,
                    priority: cfg.component_priority,
                    source: None,
                });
            }
        }
        out
    }
}
