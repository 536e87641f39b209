//! Concepts in NARS
//!
//! A concept gathers every task about one term. It owns exactly three
//! priority bags — beliefs, goals, questions — whose capacities partition
//! the per-concept total by a fixed distribution, plus the attention state
//! (activation, use count, quality) that memory-level scheduling reads.

use crate::bag::{BagAddResult, EvictionPolicy, PriorityBag};
use crate::task::{Punctuation, Task};
use crate::term::Term;
use std::fmt;

/// Fraction of the per-concept capacity given to each task kind.
pub const BELIEF_SHARE: f32 = 0.6;
pub const GOAL_SHARE: f32 = 0.3;
pub const QUESTION_SHARE: f32 = 0.1;

fn bag_cap(total: usize, share: f32) -> usize {
    ((total as f32 * share) as usize).max(1)
}

/// A concept: one term, three bags, attention state.
#[derive(Debug)]
pub struct Concept {
    term: Term,
    beliefs: PriorityBag,
    goals: PriorityBag,
    questions: PriorityBag,
    activation: f32,
    use_count: u64,
    quality: f32,
    created_at: i64,
    /// Monotonic access sequence assigned by memory, not wall time, so
    /// same-cycle accesses still order deterministically.
    last_accessed: u64,
}

impl Concept {
    pub fn new(term: Term, max_tasks: usize, policy: EvictionPolicy, created_at: i64) -> Self {
        Concept {
            term,
            beliefs: PriorityBag::new(bag_cap(max_tasks, BELIEF_SHARE), policy),
            goals: PriorityBag::new(bag_cap(max_tasks, GOAL_SHARE), policy),
            questions: PriorityBag::new(bag_cap(max_tasks, QUESTION_SHARE), policy),
            activation: 0.0,
            use_count: 0,
            quality: 0.5,
            created_at,
            last_accessed: 0,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn bag(&self, kind: Punctuation) -> &PriorityBag {
        match kind {
            Punctuation::Belief => &self.beliefs,
            Punctuation::Goal => &self.goals,
            Punctuation::Question => &self.questions,
        }
    }

    pub fn bag_mut(&mut self, kind: Punctuation) -> &mut PriorityBag {
        match kind {
            Punctuation::Belief => &mut self.beliefs,
            Punctuation::Goal => &mut self.goals,
            Punctuation::Question => &mut self.questions,
        }
    }

    /// Route a task into the bag matching its punctuation.
    pub fn add_task(&mut self, task: Task, access_seq: u64) -> BagAddResult {
        debug_assert_eq!(task.term(), &self.term);
        self.use_count += 1;
        self.last_accessed = access_seq;
        let kind = task.punctuation();
        self.bag_mut(kind).add(task)
    }

    /// Remove a task wherever it lives.
    pub fn remove_task(&mut self, id: u64) -> Option<Task> {
        self.beliefs
            .remove(id)
            .or_else(|| self.goals.remove(id))
            .or_else(|| self.questions.remove(id))
    }

    /// The highest-priority task of one kind.
    pub fn highest_priority_task(&self, kind: Punctuation) -> Option<&Task> {
        self.bag(kind).peek()
    }

    /// The belief with the strongest confidence, the answer a query wants.
    pub fn best_belief_by_confidence(&self) -> Option<&Task> {
        self.beliefs.iter().max_by(|a, b| {
            let ca = a.truth().map(|t| t.confidence()).unwrap_or(0.0);
            let cb = b.truth().map(|t| t.confidence()).unwrap_or(0.0);
            ca.partial_cmp(&cb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.id().cmp(&a.id()))
        })
    }

    /// A task lives in exactly one bag, keyed by its stamp serial.
    pub fn task_by_id(&self, id: u64) -> Option<&Task> {
        self.beliefs
            .get(id)
            .or_else(|| self.goals.get(id))
            .or_else(|| self.questions.get(id))
    }

    pub fn total_tasks(&self) -> usize {
        self.beliefs.len() + self.goals.len() + self.questions.len()
    }

    pub fn activation(&self) -> f32 {
        self.activation
    }

    pub fn use_count(&self) -> u64 {
        self.use_count
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn last_accessed(&self) -> u64 {
        self.last_accessed
    }

    /// Mark a read-with-access operation.
    pub fn touch(&mut self, access_seq: u64) {
        self.use_count += 1;
        self.last_accessed = access_seq;
    }

    /// Raise activation, clamped to `[0, 1]`, and mark access.
    pub fn boost_activation(&mut self, delta: f32, access_seq: u64) {
        self.activation = (self.activation + delta).clamp(0.0, 1.0);
        self.last_accessed = access_seq;
    }

    /// Adjust quality, clamped to `[0, 1]`.
    pub fn adjust_quality(&mut self, delta: f32) {
        self.quality = (self.quality + delta).clamp(0.0, 1.0);
    }

    /// Decay activation alone.
    pub fn decay_activation(&mut self, rate: f32) {
        self.activation = (self.activation * (1.0 - rate.clamp(0.0, 1.0))).max(0.0);
    }

    /// Decay activation and all three bags; returns tasks evicted by the
    /// bag priority floor.
    pub fn apply_decay(&mut self, activation_rate: f32, priority_rate: f32) -> Vec<Task> {
        self.decay_activation(activation_rate);
        let mut evicted = self.beliefs.apply_decay(priority_rate);
        evicted.extend(self.goals.apply_decay(priority_rate));
        evicted.extend(self.questions.apply_decay(priority_rate));
        evicted
    }

    /// Reapply the fixed capacity distribution for a new per-concept total.
    pub fn enforce_capacity(&mut self, max_total: usize) -> Vec<Task> {
        let mut evicted = self.beliefs.set_capacity(bag_cap(max_total, BELIEF_SHARE));
        evicted.extend(self.goals.set_capacity(bag_cap(max_total, GOAL_SHARE)));
        evicted.extend(
            self.questions
                .set_capacity(bag_cap(max_total, QUESTION_SHARE)),
        );
        evicted
    }

    /// Mean entry priority across all bags; what priority-based forgetting
    /// ranks concepts by.
    pub fn aggregate_priority(&self) -> f32 {
        let total = self.total_tasks();
        if total == 0 {
            return 0.0;
        }
        let sum = self.beliefs.average_priority() * self.beliefs.len() as f32
            + self.goals.average_priority() * self.goals.len() as f32
            + self.questions.average_priority() * self.questions.len() as f32;
        sum / total as f32
    }

    // Snapshot restore hooks.
    pub(crate) fn set_activation(&mut self, activation: f32) {
        self.activation = activation.clamp(0.0, 1.0);
    }

    pub(crate) fn set_quality(&mut self, quality: f32) {
        self.quality = quality.clamp(0.0, 1.0);
    }

    pub(crate) fn set_use_count(&mut self, use_count: u64) {
        self.use_count = use_count;
    }

    pub(crate) fn set_last_accessed(&mut self, seq: u64) {
        self.last_accessed = seq;
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [act {:.2}, q {:.2}, b/g/q {}/{}/{}]",
            self.term,
            self.activation,
            self.quality,
            self.beliefs.len(),
            self.goals.len(),
            self.questions.len()
        )
    }
}
