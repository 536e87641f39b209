//! Premise formation
//!
//! Strategies propose secondary premises for a selected primary task. Each
//! one produces a bounded candidate list; the reasoner merges all enabled
//! strategies' candidates by effective priority and tries the best few.
//! Every strategy accounts for how many candidates it produced and how many
//! led to a derivation, so a controller can rescale the weak ones.

pub mod decompose;
pub mod taskmatch;
pub mod termlink;

use crate::config::StrategyConfig;
use crate::link::TermLinkGraph;
use crate::memory::Memory;
use crate::task::Task;
use crate::term::{Term, TermFactory};

pub use decompose::DecompositionStrategy;
pub use taskmatch::TaskMatchStrategy;
pub use termlink::TermLinkStrategy;

/// Why a candidate was proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateTag {
    Subject,
    Predicate,
    Component,
    TermLink,
    SharedMiddle,
    SharedSubject,
    SharedPredicate,
    Diagonal,
    Weak,
}

/// A proposed secondary premise.
#[derive(Debug, Clone)]
pub struct PremiseCandidate {
    pub term: Term,
    pub tag: CandidateTag,
    pub priority: f32,
    /// The concrete task behind the candidate, when the strategy had one.
    pub source: Option<Task>,
}

/// What strategies may read while generating.
pub struct StrategyContext<'a> {
    pub memory: &'a Memory,
    pub links: &'a TermLinkGraph,
    pub factory: &'a TermFactory,
    pub now: i64,
    pub config: &'a StrategyConfig,
}

/// Shared accounting for every strategy.
#[derive(Debug, Clone)]
pub struct StrategyStats {
    pub candidates_generated: u64,
    pub successful_pairs: u64,
    pub priority_scale: f32,
}

impl Default for StrategyStats {
    fn default() -> Self {
        StrategyStats {
            candidates_generated: 0,
            successful_pairs: 0,
            priority_scale: 1.0,
        }
    }
}

/// A generator of secondary premise candidates.
pub trait PremiseStrategy {
    fn name(&self) -> &'static str;

    fn stats(&self) -> &StrategyStats;

    fn stats_mut(&mut self) -> &mut StrategyStats;

    /// Produce raw candidates for the primary task. Bounded by the
    /// strategy's own limits; priorities before scaling.
    fn propose(&self, primary: &Task, ctx: &StrategyContext) -> Vec<PremiseCandidate>;

    /// Propose, scale by the runtime priority factor, and account.
    fn generate(&mut self, primary: &Task, ctx: &StrategyContext) -> Vec<PremiseCandidate> {
        let scale = self.stats().priority_scale;
        let mut out = self.propose(primary, ctx);
        for candidate in &mut out {
            candidate.priority *= scale;
        }
        self.stats_mut().candidates_generated += out.len() as u64;
        out
    }

    /// Called once per candidate that produced at least one derivation.
    fn record_success(&mut self) {
        self.stats_mut().successful_pairs += 1;
    }

    /// successes / candidates, zero when nothing was generated yet.
    fn effectiveness(&self) -> f32 {
        let stats = self.stats();
        if stats.candidates_generated == 0 {
            0.0
        } else {
            stats.successful_pairs as f32 / stats.candidates_generated as f32
        }
    }

    /// Runtime knob a controller may turn.
    fn set_priority_scale(&mut self, scale: f32) {
        self.stats_mut().priority_scale = scale.max(0.0);
    }
}
