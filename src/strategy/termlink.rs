//! Term-link strategy
//!
//! Walks the term-link graph from the primary term, proposing linked terms
//! with the link weight as priority. Links below the configured floor are
//! ignored.

use super::{CandidateTag, PremiseCandidate, PremiseStrategy, StrategyContext, StrategyStats};
use crate::task::Task;

pub struct TermLinkStrategy {
    stats: StrategyStats,
}

impl TermLinkStrategy {
    pub fn new() -> Self {
        TermLinkStrategy {
            stats: StrategyStats::default(),
        }
    }
}

impl Default for TermLinkStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PremiseStrategy for TermLinkStrategy {
    fn name(&self) -> &'static str {
        "termlink"
    }

    fn stats(&self) -> &StrategyStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut StrategyStats {
        &mut self.stats
    }

    fn propose(&self, primary: &Task, ctx: &StrategyContext) -> Vec<PremiseCandidate> {
        ctx.links
            .neighbors(primary.term())
            .into_iter()
            .filter(|(_, weight)| *weight >= ctx.config.min_link_priority)
            .take(ctx.config.max_links)
            .map(|(term, weight)| PremiseCandidate {
                term,
                tag: CandidateTag::TermLink,
                priority: weight,
                source: None,
            })
            .collect()
    }
}
