//! Task-match strategy
//!
//! Scans tasks held by other concepts — focus concepts first — and scores
//! their compatibility with the primary by shared statement structure. A
//! shared middle term in the same copula scores highest; shared subject or
//! predicate scores medium; a cross-copula diagonal overlap slightly less;
//! everything else gets the weak floor score. Non-positive scores drop.

use super::{CandidateTag, PremiseCandidate, PremiseStrategy, StrategyContext, StrategyStats};
use crate::config::StrategyConfig;
use crate::task::{Punctuation, Task};
use crate::term::Term;

pub struct TaskMatchStrategy {
    stats: StrategyStats,
}

impl TaskMatchStrategy {
    pub fn new() -> Self {
        TaskMatchStrategy {
            stats: StrategyStats::default(),
        }
    }

    fn compatibility(primary: &Term, other: &Term, cfg: &StrategyConfig) -> (f32, CandidateTag) {
        let parts = |t: &Term| -> Option<(Term, Term)> {
            Some((t.subject()?.clone(), t.predicate()?.clone()))
        };
        if let (Some((ps, pp)), Some((os, op))) = (parts(primary), parts(other)) {
            let same_copula = primary.op() == other.op();
            if same_copula && (pp == os || ps == op) {
                return (cfg.high_compatibility_score, CandidateTag::SharedMiddle);
            }
            if ps == os {
                return (cfg.medium_compatibility_score, CandidateTag::SharedSubject);
            }
            if pp == op {
                return (cfg.medium_compatibility_score, CandidateTag::SharedPredicate);
            }
            if pp == os || ps == op {
                return (
                    0.8 * cfg.medium_compatibility_score,
                    CandidateTag::Diagonal,
                );
            }
        }
        (cfg.low_compatibility_score, CandidateTag::Weak)
    }
}

impl Default for TaskMatchStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PremiseStrategy for TaskMatchStrategy {
    fn name(&self) -> &'static str {
        "taskmatch"
    }

    fn stats(&self) -> &StrategyStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut StrategyStats {
        &mut self.stats
    }

    fn propose(&self, primary: &Task, ctx: &StrategyContext) -> Vec<PremiseCandidate> {
        let cfg = ctx.config;
        let memory = ctx.memory;

        // Focus concepts first, then the rest of the table. Focus iteration
        // order is hash-dependent, so sort for a stable scan.
        let mut focus_terms: Vec<&Term> = memory.focus().iter().collect();
        focus_terms.sort_by_key(|t| (t.complexity(), t.to_string()));
        let pool = focus_terms
            .into_iter()
            .chain(memory.concept_terms().filter(|t| !memory.focus().contains(*t)));

        let mut out = Vec::new();
        let mut examined = 0usize;
        'concepts: for term in pool {
            if term == primary.term() {
                continue;
            }
            let Some(concept) = memory.get_concept(term) else {
                continue;
            };
            for kind in [Punctuation::Belief, Punctuation::Goal] {
                for task in concept.bag(kind).iter() {
                    if examined >= cfg.max_tasks {
                        break 'concepts;
                    }
                    examined += 1;
                    if task.id() == primary.id() || task.term() == primary.term() {
                        continue;
                    }
                    let (score, tag) = Self::compatibility(primary.term(), task.term(), cfg);
                    if score <= 0.0 {
                        continue;
                    }
                    out.push(PremiseCandidate {
                        term: task.term().clone(),
                        tag,
                        priority: score,
                        source: Some(task.clone()),
                    });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReasonerConfig;
    use crate::event::EventBus;
    use crate::link::TermLinkGraph;
    use crate::memory::Memory;
    use crate::stamp::OccurrenceTime;
    use crate::term::{Op, TermFactory};
    use crate::truth::Truth;

    fn belief(f: &TermFactory, term: Term) -> Task {
        Task::belief(term, Truth::default_judgment(), OccurrenceTime::Eternal, 0)
    }

    fn setup(_f: &TermFactory) -> (Memory, TermLinkGraph, ReasonerConfig) {
        let config = ReasonerConfig::default();
        let memory = Memory::new(config.clone(), EventBus::new());
        (memory, TermLinkGraph::new(8), config)
    }

    #[test]
    fn test_shared_middle_scores_high() {
        let f = TermFactory::new();
        let (mut memory, links, config) = setup(&f);
        let primary_term = f
            .statement(Op::Inheritance, f.atom("bird"), f.atom("animal"))
            .unwrap();
        let other_term = f
            .statement(Op::Inheritance, f.atom("robin"), f.atom("bird"))
            .unwrap();
        memory.add_task(belief(&f, other_term.clone()), 0);

        let ctx = StrategyContext {
            memory: &memory,
            links: &links,
            factory: &f,
            now: 0,
            config: &config.strategy,
        };
        let primary = belief(&f, primary_term);

        let mut s = TaskMatchStrategy::new();
        let out = s.generate(&primary, &ctx);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, CandidateTag::SharedMiddle);
        assert!((out[0].priority - 0.95).abs() < 1.0e-4);
        assert!(out[0].source.is_some());
    }

    #[test]
    fn test_shared_subject_scores_medium() {
        let f = TermFactory::new();
        let (mut memory, links, config) = setup(&f);
        memory.add_task(
            belief(
                &f,
                f.statement(Op::Inheritance, f.atom("bird"), f.atom("flyer"))
                    .unwrap(),
            ),
            0,
        );

        let ctx = StrategyContext {
            memory: &memory,
            links: &links,
            factory: &f,
            now: 0,
            config: &config.strategy,
        };
        let primary = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("bird"), f.atom("animal"))
                .unwrap(),
        );

        let mut s = TaskMatchStrategy::new();
        let out = s.generate(&primary, &ctx);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, CandidateTag::SharedSubject);
        assert!((out[0].priority - 0.7).abs() < 1.0e-4);
    }

    #[test]
    fn test_cross_copula_diagonal() {
        let f = TermFactory::new();
        let (mut memory, links, config) = setup(&f);
        // Primary <a --> m>; other <m ==> b>: overlap across copulas.
        memory.add_task(
            belief(
                &f,
                f.statement(Op::Implication, f.atom("m"), f.atom("b")).unwrap(),
            ),
            0,
        );

        let ctx = StrategyContext {
            memory: &memory,
            links: &links,
            factory: &f,
            now: 0,
            config: &config.strategy,
        };
        let primary = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("a"), f.atom("m")).unwrap(),
        );

        let mut s = TaskMatchStrategy::new();
        let out = s.generate(&primary, &ctx);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, CandidateTag::Diagonal);
        assert!((out[0].priority - 0.8 * 0.7).abs() < 1.0e-4);
    }

    #[test]
    fn test_unrelated_scores_low_and_zero_drops() {
        let f = TermFactory::new();
        let (mut memory, links, mut config) = setup(&f);
        memory.add_task(belief(&f, f.atom("unrelated")), 0);

        let primary = belief(
            &f,
            f.statement(Op::Inheritance, f.atom("a"), f.atom("b")).unwrap(),
        );

        {
            let ctx = StrategyContext {
                memory: &memory,
                links: &links,
                factory: &f,
                now: 0,
                config: &config.strategy,
            };
            let mut s = TaskMatchStrategy::new();
            let out = s.generate(&primary, &ctx);
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].tag, CandidateTag::Weak);
            assert!((out[0].priority - 0.3).abs() < 1.0e-4);
        }

        // With the floor score at zero, weak matches disappear.
        config.strategy.low_compatibility_score = 0.0;
        let ctx = StrategyContext {
            memory: &memory,
            links: &links,
            factory: &f,
            now: 0,
            config: &config.strategy,
        };
        let mut s = TaskMatchStrategy::new();
        assert!(s.generate(&primary, &ctx).is_empty());
    }

    #[test]
    fn test_bounded_by_max_tasks() {
        let f = TermFactory::new();
        let (mut memory, links, mut config) = setup(&f);
        for i in 0..50 {
            memory.add_task(belief(&f, f.atom(&format!("t{}", i))), 0);
        }
        config.strategy.max_tasks = 5;

        let ctx = StrategyContext {
            memory: &memory,
            links: &links,
            factory: &f,
            now: 0,
            config: &config.strategy,
        };
        let primary = belief(&f, f.atom("primary"));
        let mut s = TaskMatchStrategy::new();
        assert!(s.generate(&primary, &ctx).len() <= 5);
    }

    #[test]
    fn test_same_term_tasks_skipped() {
        let f = TermFactory::new();
        let (mut memory, links, config) = setup(&f);
        let term = f
            .statement(Op::Inheritance, f.atom("a"), f.atom("b"))
            .unwrap();
        memory.add_task(belief(&f, term.clone()), 0);

        let ctx = StrategyContext {
            memory: &memory,
            links: &links,
            factory: &f,
            now: 0,
            config: &config.strategy,
        };
        let primary = belief(&f, term);
        let mut s = TaskMatchStrategy::new();
        assert!(s.generate(&primary, &ctx).is_empty());
    }
}
