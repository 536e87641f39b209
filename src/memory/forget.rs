//! Forgetting strategies
//!
//! When the concept table is full, a pluggable strategy picks the victim.
//! Strategies see the concept table and the running stats, and return the
//! term to evict, or `None` when nothing is evictable.

use crate::concept::Concept;
use crate::config::ForgetPolicy;
use crate::memory::MemoryStats;
use crate::term::Term;
use indexmap::IndexMap;

/// Picks which concept to evict.
pub trait ForgettingStrategy {
    fn name(&self) -> &'static str;

    fn select_victim(
        &self,
        concepts: &IndexMap<Term, Concept>,
        stats: &MemoryStats,
    ) -> Option<Term>;
}

/// Evict the concept with the lowest aggregate task priority; activation
/// breaks ties so an attended-to concept survives an idle one.
pub struct PriorityForgetting;

impl ForgettingStrategy for PriorityForgetting {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn select_victim(
        &self,
        concepts: &IndexMap<Term, Concept>,
        _stats: &MemoryStats,
    ) -> Option<Term> {
        concepts
            .values()
            .min_by(|a, b| {
                let ka = (a.aggregate_priority(), a.activation());
                let kb = (b.aggregate_priority(), b.activation());
                ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|c| c.term().clone())
    }
}

/// Evict the concept with the oldest access.
pub struct LruForgetting;

impl ForgettingStrategy for LruForgetting {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn select_victim(
        &self,
        concepts: &IndexMap<Term, Concept>,
        _stats: &MemoryStats,
    ) -> Option<Term> {
        concepts
            .values()
            .min_by_key(|c| c.last_accessed())
            .map(|c| c.term().clone())
    }
}

/// Evict the concept created earliest. The concept table keeps insertion
/// order, so the first entry is the victim.
pub struct FifoForgetting;

impl ForgettingStrategy for FifoForgetting {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn select_victim(
        &self,
        concepts: &IndexMap<Term, Concept>,
        _stats: &MemoryStats,
    ) -> Option<Term> {
        concepts.keys().next().cloned()
    }
}

pub fn strategy_for(policy: ForgetPolicy) -> Box<dyn ForgettingStrategy> {
    match policy {
        ForgetPolicy::Priority => Box::new(PriorityForgetting),
        ForgetPolicy::Lru => Box::new(LruForgetting),
        ForgetPolicy::Fifo => Box::new(FifoForgetting),
    }
}
