//! Concept scoring
//!
//! Ranks concepts by a weighted composite of their attention state. The
//! scorer owns the authoritative weights; memory holds a scorer rather than
//! a second weight table.

use crate::concept::Concept;
use crate::task::Punctuation;
use serde::{Deserialize, Serialize};

/// Weights over the scoring features. They need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase", default)]
pub struct ScoreWeights {
    pub activation: f32,
    pub use_count: f32,
    pub task_count: f32,
    pub quality: f32,
    pub complexity: f32,
    pub diversity: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            activation: 0.3,
            use_count: 0.2,
            task_count: 0.15,
            quality: 0.15,
            complexity: 0.1,
            diversity: 0.1,
        }
    }
}

/// Composite concept scorer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MemoryScorer {
    pub weights: ScoreWeights,
}

impl MemoryScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        MemoryScorer { weights }
    }

    /// Score in `[0, 1]`-ish range; higher is more active.
    pub fn score(&self, concept: &Concept) -> f32 {
        let w = &self.weights;
        // Saturating normalizations for the unbounded counters.
        let use_count = concept.use_count() as f32;
        let use_norm = use_count / (use_count + 10.0);
        let tasks = concept.total_tasks() as f32;
        let task_norm = tasks / (tasks + 10.0);
        // Simpler terms are more broadly applicable.
        let complexity_norm = 1.0 / concept.term().complexity() as f32;
        let kinds = [Punctuation::Belief, Punctuation::Goal, Punctuation::Question]
            .iter()
            .filter(|k| !concept.bag(**k).is_empty())
            .count();
        let diversity = kinds as f32 / 3.0;

        w.activation * concept.activation()
            + w.use_count * use_norm
            + w.task_count * task_norm
            + w.quality * concept.quality()
            + w.complexity * complexity_norm
            + w.diversity * diversity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::EvictionPolicy;
    use crate::stamp::OccurrenceTime;
    use crate::task::Task;
    use crate::term::TermFactory;
    use crate::truth::Truth;

    #[test]
    fn test_activation_dominates_with_default_weights() {
        let f = TermFactory::new();
        let scorer = MemoryScorer::default();

        let mut hot = Concept::new(f.atom("hot"), 10, EvictionPolicy::Priority, 0);
        hot.boost_activation(1.0, 1);
        let cold = Concept::new(f.atom("cold"), 10, EvictionPolicy::Priority, 0);

        assert!(scorer.score(&hot) > scorer.score(&cold));
    }

    #[test]
    fn test_tasks_and_diversity_contribute() {
        let f = TermFactory::new();
        let scorer = MemoryScorer::default();

        let empty = Concept::new(f.atom("empty"), 10, EvictionPolicy::Priority, 0);
        let mut busy = Concept::new(f.atom("busy"), 10, EvictionPolicy::Priority, 0);
        busy.add_task(
            Task::belief(
                f.atom("busy"),
                Truth::default_judgment(),
                OccurrenceTime::Eternal,
                0,
            ),
            1,
        );
        busy.add_task(Task::question(f.atom("busy"), 0), 2);

        assert!(scorer.score(&busy) > scorer.score(&empty));
    }

    #[test]
    fn test_zero_weights_zero_score() {
        let f = TermFactory::new();
        let scorer = MemoryScorer::new(ScoreWeights {
            activation: 0.0,
            use_count: 0.0,
            task_count: 0.0,
            quality: 0.0,
            complexity: 0.0,
            diversity: 0.0,
        });
        let mut c = Concept::new(f.atom("x"), 10, EvictionPolicy::Priority, 0);
        c.boost_activation(1.0, 1);
        assert_eq!(scorer.score(&c), 0.0);
    }
}
