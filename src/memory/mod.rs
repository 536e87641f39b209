//! Memory
//!
//! The concept table and everything that keeps it honest: secondary indexes,
//! the focus set, forgetting, consolidation, and the aggregate counters.
//! Memory owns concepts by value; the focus set and indexes hold term keys
//! only and resolve through the table, so eviction can purge them
//! synchronously without back-pointers.

pub mod forget;
pub mod index;
pub mod scorer;
pub mod snapshot;

use crate::bag::EvictionPolicy;
use crate::budget::Budget;
use crate::concept::Concept;
use crate::config::{ForgetPolicy, ReasonerConfig};
use crate::event::{EventBus, EventKind, EventPayload};
use crate::stamp::Stamp;
use crate::task::{Punctuation, Task};
use crate::term::Term;
use crate::truth::Truth;
use hashbrown::HashSet;
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

pub use index::MemoryIndex;
pub use scorer::{MemoryScorer, ScoreWeights};
pub use snapshot::{MemorySnapshot, SnapshotError};

/// Fraction of a task's priority added to its concept's activation.
pub const ACTIVATION_BOOST: f32 = 0.5;

/// Fraction of activation passed to component concepts at consolidation.
pub const ACTIVATION_PROPAGATION: f32 = 0.1;

/// Activation below which an empty concept is pruned at consolidation.
const PRUNE_ACTIVATION: f32 = 0.05;

/// Aggregate counters. The live counts always equal the sum over concepts;
/// [`Memory::validate`] audits that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryStats {
    pub concepts_created: u64,
    pub concepts_forgotten: u64,
    pub tasks_added: u64,
    pub tasks_rejected: u64,
    pub tasks_evicted: u64,
    pub revisions: u64,
    pub total_tasks: usize,
    pub beliefs: usize,
    pub goals: usize,
    pub questions: usize,
}

/// Snapshot of resource occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTracker {
    pub concept_capacity: usize,
    pub task_capacity: usize,
    pub concepts_in_use: usize,
    pub tasks_in_use: usize,
}

impl ResourceTracker {
    /// Task-load pressure in `[0, 1]`. Concept count is governed by the
    /// hard cap, so only task fill drives adaptive forgetting.
    pub fn pressure(&self) -> f32 {
        if self.task_capacity == 0 {
            return 0.0;
        }
        self.tasks_in_use as f32 / self.task_capacity as f32
    }
}

fn bag_policy(policy: ForgetPolicy) -> EvictionPolicy {
    match policy {
        ForgetPolicy::Priority => EvictionPolicy::Priority,
        ForgetPolicy::Lru => EvictionPolicy::Lru,
        ForgetPolicy::Fifo => EvictionPolicy::Fifo,
    }
}

/// The concept table plus its upkeep machinery.
pub struct Memory {
    config: ReasonerConfig,
    concepts: IndexMap<Term, Concept>,
    focus: HashSet<Term>,
    index: MemoryIndex,
    scorer: MemoryScorer,
    stats: MemoryStats,
    bus: EventBus,
    access_seq: u64,
    cycles_since_consolidation: u64,
    last_consolidation_time: i64,
    index_dirty: bool,
    rebuild_failures: u8,
}

impl Memory {
    pub fn new(config: ReasonerConfig, bus: EventBus) -> Self {
        Memory {
            config,
            concepts: IndexMap::new(),
            focus: HashSet::new(),
            index: MemoryIndex::new(),
            scorer: MemoryScorer::default(),
            stats: MemoryStats::default(),
            bus,
            access_seq: 0,
            cycles_since_consolidation: 0,
            last_consolidation_time: 0,
            index_dirty: false,
            rebuild_failures: 0,
        }
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.concepts.contains_key(term)
    }

    pub fn stats(&self) -> &MemoryStats {
        &self.stats
    }

    pub fn focus(&self) -> &HashSet<Term> {
        &self.focus
    }

    pub fn index(&self) -> &MemoryIndex {
        &self.index
    }

    pub fn scorer(&self) -> &MemoryScorer {
        &self.scorer
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    pub fn concept_terms(&self) -> impl Iterator<Item = &Term> {
        self.concepts.keys()
    }

    pub fn resource_tracker(&self) -> ResourceTracker {
        ResourceTracker {
            concept_capacity: self.config.max_concepts,
            task_capacity: self.config.max_concepts * self.config.max_tasks_per_concept,
            concepts_in_use: self.concepts.len(),
            tasks_in_use: self.stats.total_tasks,
        }
    }

    /// Ingest a task: find or create its concept (evicting exactly one
    /// concept if the table is full), route it into the right bag, then
    /// update focus, index, and counters. Returns whether it was stored.
    pub fn add_task(&mut self, task: Task, now: i64) -> bool {
        let term = task.term().clone();

        if !self.concepts.contains_key(&term) {
            if self.concepts.len() >= self.config.max_concepts && !self.evict_one(now) {
                self.stats.tasks_rejected += 1;
                self.bus
                    .emit(EventKind::TaskRejected, now, EventPayload::Task(task));
                return false;
            }
            let concept = Concept::new(
                term.clone(),
                self.config.max_tasks_per_concept,
                bag_policy(self.config.forget_policy),
                now,
            );
            self.index.insert(&term, concept.activation(), now);
            self.concepts.insert(term.clone(), concept);
            self.stats.concepts_created += 1;
            self.bus.emit(
                EventKind::ConceptCreated,
                now,
                EventPayload::Term(term.clone()),
            );
        } else {
            self.bus.emit(
                EventKind::ConceptAccessed,
                now,
                EventPayload::Term(term.clone()),
            );
        }

        self.access_seq += 1;
        let seq = self.access_seq;
        let priority = task.budget().priority();
        let punctuation = task.punctuation();

        let result = self
            .concepts
            .get_mut(&term)
            .expect("concept just ensured")
            .add_task(task.clone(), seq);
        self.note_evicted(&result.evicted);
        if !result.inserted {
            self.stats.tasks_rejected += 1;
            self.bus
                .emit(EventKind::TaskRejected, now, EventPayload::Task(task));
            return false;
        }
        self.count_add(punctuation);
        self.stats.tasks_added += 1;

        let activation = {
            let concept = self.concepts.get_mut(&term).expect("present");
            concept.boost_activation(priority * ACTIVATION_BOOST, seq);
            concept.activation()
        };
        self.index.update_activation(&term, activation);

        if priority > self.config.priority_threshold {
            self.focus.insert(term.clone());
        } else {
            self.focus.remove(&term);
        }

        self.bus
            .emit(EventKind::TaskAdded, now, EventPayload::Task(task));

        if self.config.enable_adaptive_forgetting
            && self.resource_tracker().pressure() > self.config.memory_pressure_threshold
        {
            self.adaptive_forget(now);
        }
        true
    }

    /// Revise `task` against the concept's strongest belief when their
    /// evidence is disjoint. The revision replaces the parent belief and
    /// `task` itself is not stored. Returns the surviving belief.
    pub fn try_revise(&mut self, task: &Task, now: i64) -> Option<Task> {
        if !task.is_belief() {
            return None;
        }
        let term = task.term();
        let existing = self
            .concepts
            .get(term)?
            .best_belief_by_confidence()?
            .clone();
        let stamp = Stamp::merge(existing.stamp(), task.stamp(), now)?;
        let truth = Truth::revision(existing.truth()?, task.truth()?);
        let budget = Budget::new(
            existing.budget().priority().max(task.budget().priority()),
            existing.budget().durability().max(task.budget().durability()),
            truth.expectation(),
        );
        let revised = Task::new(
            term.clone(),
            Punctuation::Belief,
            Some(truth),
            stamp,
            budget,
        )
        .ok()?;

        if self
            .concepts
            .get_mut(term)
            .and_then(|c| c.remove_task(existing.id()))
            .is_some()
        {
            self.count_remove(Punctuation::Belief);
        }
        self.stats.revisions += 1;
        self.add_task(revised.clone(), now);
        Some(revised)
    }

    pub fn get_concept(&self, term: &Term) -> Option<&Concept> {
        self.concepts.get(term)
    }

    /// Read-with-access: bumps the concept's access state and announces it.
    pub fn touch_concept(&mut self, term: &Term, now: i64) -> Option<&Concept> {
        self.access_seq += 1;
        let seq = self.access_seq;
        let concept = self.concepts.get_mut(term)?;
        concept.touch(seq);
        self.bus.emit(
            EventKind::ConceptAccessed,
            now,
            EventPayload::Term(term.clone()),
        );
        Some(self.concepts.get(term).expect("present"))
    }

    /// Remove a concept and synchronously purge the focus set and indexes.
    pub fn remove_concept(&mut self, term: &Term, now: i64) -> Option<Concept> {
        // shift_remove keeps insertion order, which FIFO forgetting reads.
        let concept = self.concepts.shift_remove(term)?;
        for kind in [Punctuation::Belief, Punctuation::Goal, Punctuation::Question] {
            for _ in 0..concept.bag(kind).len() {
                self.count_remove(kind);
            }
        }
        self.focus.remove(term);
        self.index.remove(term);
        self.stats.concepts_forgotten += 1;
        self.bus.emit(
            EventKind::ConceptForgotten,
            now,
            EventPayload::Term(term.clone()),
        );
        Some(concept)
    }

    pub fn concepts_by_criteria<P>(&self, pred: P) -> Vec<&Concept>
    where
        P: Fn(&Concept) -> bool,
    {
        self.concepts.values().filter(|c| pred(c)).collect()
    }

    /// Concepts ranked by the composite scorer, best first.
    pub fn most_active_concepts(&self, limit: usize) -> Vec<&Concept> {
        let mut ranked: Vec<&Concept> = self.concepts.values().collect();
        ranked.sort_by(|a, b| {
            self.scorer
                .score(b)
                .partial_cmp(&self.scorer.score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }

    pub fn boost_concept_activation(&mut self, term: &Term, delta: f32) {
        self.access_seq += 1;
        let seq = self.access_seq;
        let Some(concept) = self.concepts.get_mut(term) else {
            return;
        };
        concept.boost_activation(delta, seq);
        let activation = concept.activation();
        self.index.update_activation(term, activation);
    }

    pub fn update_concept_quality(&mut self, term: &Term, delta: f32) {
        if let Some(concept) = self.concepts.get_mut(term) {
            concept.adjust_quality(delta);
        }
    }

    /// Decay one bag entry after it served as a premise.
    pub fn decay_task_priority(&mut self, term: &Term, kind: Punctuation, id: u64, rate: f32) {
        if let Some(concept) = self.concepts.get_mut(term) {
            concept.bag_mut(kind).decay_entry(id, rate);
        }
    }

    /// Decay one concept's activation (end-of-step upkeep for the concept
    /// a cycle visited).
    pub fn decay_concept_activation(&mut self, term: &Term, rate: f32) {
        let Some(concept) = self.concepts.get_mut(term) else {
            return;
        };
        concept.decay_activation(rate);
        let activation = concept.activation();
        self.index.update_activation(term, activation);
    }

    /// Pop-preference selection for the reasoning cycle: the best belief,
    /// else the best goal, else the best question. Marks the concept and
    /// the chosen entry as accessed.
    pub fn select_task(&mut self, term: &Term) -> Option<Task> {
        self.access_seq += 1;
        let seq = self.access_seq;
        let concept = self.concepts.get_mut(term)?;
        concept.touch(seq);
        for kind in [Punctuation::Belief, Punctuation::Goal, Punctuation::Question] {
            if let Some(task) = concept.bag_mut(kind).select() {
                return Some(task);
            }
        }
        None
    }

    /// Called once per reasoning cycle.
    pub fn note_cycle(&mut self) {
        self.cycles_since_consolidation += 1;
    }

    pub fn cycles_since_consolidation(&self) -> u64 {
        self.cycles_since_consolidation
    }

    pub fn last_consolidation_time(&self) -> i64 {
        self.last_consolidation_time
    }

    /// Interval-gated consolidation; a no-op when not yet due.
    pub fn consolidate(&mut self, now: i64) -> bool {
        if self.cycles_since_consolidation < self.config.consolidation_interval {
            return false;
        }
        self.force_consolidate(now);
        true
    }

    /// Decay, propagate activation, prune, and repair indexes.
    pub(crate) fn force_consolidate(&mut self, now: i64) {
        self.bus
            .emit(EventKind::ConsolidationStart, now, EventPayload::None);
        self.validate(now);

        let terms: Vec<Term> = self.concepts.keys().cloned().collect();
        for term in &terms {
            let (evicted, activation) = {
                let concept = self.concepts.get_mut(term).expect("present");
                let evicted = concept.apply_decay(
                    self.config.activation_decay_rate,
                    self.config.priority_decay_rate,
                );
                (evicted, concept.activation())
            };
            self.note_evicted(&evicted);
            self.index.update_activation(term, activation);
        }

        // Activation flows one hop from a compound to its live components.
        let mut boosts: Vec<(Term, f32)> = Vec::new();
        for term in &terms {
            let Some(concept) = self.concepts.get(term) else {
                continue;
            };
            let activation = concept.activation();
            if activation <= PRUNE_ACTIVATION {
                continue;
            }
            for component in term.components() {
                if self.concepts.contains_key(component) {
                    boosts.push((component.clone(), activation * ACTIVATION_PROPAGATION));
                }
            }
        }
        for (term, delta) in boosts {
            self.boost_concept_activation(&term, delta);
        }

        let dead: Vec<Term> = self
            .concepts
            .values()
            .filter(|c| c.total_tasks() == 0 && c.activation() < PRUNE_ACTIVATION)
            .map(|c| c.term().clone())
            .collect();
        for term in dead {
            self.remove_concept(&term, now);
        }

        if self.index_dirty {
            self.rebuild_index();
        }

        self.cycles_since_consolidation = 0;
        self.last_consolidation_time = now;
        self.bus
            .emit(EventKind::ConsolidationEnd, now, EventPayload::None);
    }

    /// Audit counters and indexes against the concept table. Mismatches
    /// emit `memory.corruption`, self-heal the counters, and flag the index
    /// for rebuild at the next consolidation.
    pub fn validate(&mut self, now: i64) -> bool {
        let mut beliefs = 0;
        let mut goals = 0;
        let mut questions = 0;
        for concept in self.concepts.values() {
            beliefs += concept.bag(Punctuation::Belief).len();
            goals += concept.bag(Punctuation::Goal).len();
            questions += concept.bag(Punctuation::Question).len();
        }
        let total = beliefs + goals + questions;

        let counters_ok = total == self.stats.total_tasks
            && beliefs == self.stats.beliefs
            && goals == self.stats.goals
            && questions == self.stats.questions;
        let index_ok = self.index.is_consistent(self.concepts.keys());

        if counters_ok && index_ok {
            return true;
        }
        warn!(
            "memory corruption at t={} (counters_ok={}, index_ok={})",
            now, counters_ok, index_ok
        );
        self.bus
            .emit(EventKind::MemoryCorruption, now, EventPayload::None);
        self.stats.total_tasks = total;
        self.stats.beliefs = beliefs;
        self.stats.goals = goals;
        self.stats.questions = questions;
        if !index_ok {
            self.index_dirty = true;
        }
        false
    }

    /// Two consecutive failed rebuilds leave the memory unusable.
    pub fn is_fatal(&self) -> bool {
        self.rebuild_failures >= 2
    }

    fn rebuild_index(&mut self) {
        let entries: Vec<(Term, f32, i64)> = self
            .concepts
            .values()
            .map(|c| (c.term().clone(), c.activation(), c.created_at()))
            .collect();
        self.index
            .rebuild(entries.iter().map(|(t, a, c)| (t, *a, *c)));
        if self.index.is_consistent(self.concepts.keys()) {
            self.index_dirty = false;
            self.rebuild_failures = 0;
        } else {
            self.rebuild_failures += 1;
            warn!("index rebuild failed ({} consecutive)", self.rebuild_failures);
        }
    }

    fn evict_one(&mut self, now: i64) -> bool {
        let strategy = forget::strategy_for(self.config.forget_policy);
        match strategy.select_victim(&self.concepts, &self.stats) {
            Some(term) => self.remove_concept(&term, now).is_some(),
            None => false,
        }
    }

    fn adaptive_forget(&mut self, now: i64) {
        let mut guard = self.concepts.len();
        while guard > 0
            && self.resource_tracker().pressure() > self.config.memory_pressure_threshold
        {
            if !self.evict_one(now) {
                break;
            }
            guard -= 1;
        }
    }

    fn count_add(&mut self, kind: Punctuation) {
        self.stats.total_tasks += 1;
        match kind {
            Punctuation::Belief => self.stats.beliefs += 1,
            Punctuation::Goal => self.stats.goals += 1,
            Punctuation::Question => self.stats.questions += 1,
        }
    }

    fn count_remove(&mut self, kind: Punctuation) {
        self.stats.total_tasks = self.stats.total_tasks.saturating_sub(1);
        let slot = match kind {
            Punctuation::Belief => &mut self.stats.beliefs,
            Punctuation::Goal => &mut self.stats.goals,
            Punctuation::Question => &mut self.stats.questions,
        };
        *slot = slot.saturating_sub(1);
    }

    fn note_evicted(&mut self, evicted: &[Task]) {
        for task in evicted {
            self.count_remove(task.punctuation());
            self.stats.tasks_evicted += 1;
        }
    }

    // Snapshot plumbing.
    pub(crate) fn access_seq(&self) -> u64 {
        self.access_seq
    }

    pub(crate) fn restore_parts(
        &mut self,
        stats: MemoryStats,
        focus: HashSet<Term>,
        access_seq: u64,
        cycles_since_consolidation: u64,
        last_consolidation_time: i64,
    ) {
        self.stats = stats;
        self.focus = focus;
        self.access_seq = access_seq;
        self.cycles_since_consolidation = cycles_since_consolidation;
        self.last_consolidation_time = last_consolidation_time;
    }

    pub(crate) fn insert_restored_concept(&mut self, concept: Concept) {
        let term = concept.term().clone();
        self.index
            .insert(&term, concept.activation(), concept.created_at());
        self.concepts.insert(term, concept);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::OccurrenceTime;
    use crate::term::{Op, TermFactory};

    fn memory(config: ReasonerConfig) -> Memory {
        Memory::new(config, EventBus::new())
    }

    fn belief(f: &TermFactory, name: &str, priority: f32) -> Task {
        Task::belief(
            f.atom(name),
            Truth::default_judgment(),
            OccurrenceTime::Eternal,
            0,
        )
        .with_budget(Budget::new(priority, 0.5, 0.5))
    }

    #[test]
    fn test_add_creates_concept_and_counts() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        assert!(m.add_task(belief(&f, "cat", 0.7), 0));

        assert_eq!(m.len(), 1);
        assert_eq!(m.stats().concepts_created, 1);
        assert_eq!(m.stats().tasks_added, 1);
        assert_eq!(m.stats().beliefs, 1);
        assert_eq!(m.stats().total_tasks, 1);
        assert!(m.index().contains(&f.atom("cat")));
    }

    #[test]
    fn test_focus_threshold() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        m.add_task(belief(&f, "hot", 0.9), 0);
        m.add_task(belief(&f, "cold", 0.2), 0);

        assert!(m.focus().contains(&f.atom("hot")));
        assert!(!m.focus().contains(&f.atom("cold")));

        // A later low-priority task drops the concept out of focus.
        m.add_task(belief(&f, "hot", 0.1), 1);
        assert!(!m.focus().contains(&f.atom("hot")));
    }

    #[test]
    fn test_concept_cap_one_eviction_per_creation() {
        let f = TermFactory::new();
        let mut config = ReasonerConfig::default();
        config.max_concepts = 3;
        let mut m = memory(config);

        m.add_task(belief(&f, "a", 0.5), 0);
        m.add_task(belief(&f, "b", 0.2), 0);
        m.add_task(belief(&f, "c", 0.6), 0);
        assert_eq!(m.len(), 3);

        m.add_task(belief(&f, "d", 0.9), 1);
        assert_eq!(m.len(), 3);
        assert_eq!(m.stats().concepts_forgotten, 1);
        // "b" had the lowest aggregate priority.
        assert!(!m.contains(&f.atom("b")));
        assert!(m.contains(&f.atom("d")));
    }

    #[test]
    fn test_lru_forgetting() {
        let f = TermFactory::new();
        let mut config = ReasonerConfig::default();
        config.max_concepts = 2;
        config.forget_policy = ForgetPolicy::Lru;
        let mut m = memory(config);

        m.add_task(belief(&f, "a", 0.5), 0);
        m.add_task(belief(&f, "b", 0.9), 1);
        m.touch_concept(&f.atom("a"), 2);
        m.add_task(belief(&f, "c", 0.5), 3);

        assert!(m.contains(&f.atom("a")));
        assert!(m.contains(&f.atom("c")));
        assert!(!m.contains(&f.atom("b")));
    }

    #[test]
    fn test_fifo_forgetting() {
        let f = TermFactory::new();
        let mut config = ReasonerConfig::default();
        config.max_concepts = 2;
        config.forget_policy = ForgetPolicy::Fifo;
        let mut m = memory(config);

        m.add_task(belief(&f, "a", 0.1), 0);
        m.add_task(belief(&f, "b", 0.9), 1);
        m.add_task(belief(&f, "c", 0.5), 2);

        assert!(!m.contains(&f.atom("a")));
        assert!(m.contains(&f.atom("b")));
    }

    #[test]
    fn test_revision_replaces_parent() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        let term = f
            .statement(Op::Inheritance, f.atom("a"), f.atom("b"))
            .unwrap();

        let first = Task::belief(term.clone(), Truth::new(0.8, 0.9), OccurrenceTime::Eternal, 0);
        m.add_task(first, 0);

        let second = Task::belief(term.clone(), Truth::new(0.6, 0.9), OccurrenceTime::Eternal, 1);
        let revised = m.try_revise(&second, 1).expect("disjoint evidence");

        let truth = revised.truth().unwrap();
        assert!((truth.frequency() - 0.7).abs() < 1.0e-3);
        assert!((truth.confidence() - 18.0 / 19.0).abs() < 1.0e-3);

        // Exactly one belief survives.
        let concept = m.get_concept(&term).unwrap();
        assert_eq!(concept.bag(Punctuation::Belief).len(), 1);
        assert_eq!(m.stats().revisions, 1);
        assert_eq!(m.stats().beliefs, 1);
    }

    #[test]
    fn test_revision_refused_on_overlap() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        let term = f
            .statement(Op::Inheritance, f.atom("a"), f.atom("b"))
            .unwrap();

        let first = Task::belief(term.clone(), Truth::new(0.8, 0.9), OccurrenceTime::Eternal, 0);
        m.add_task(first.clone(), 0);
        // Same task again: overlapping evidence, no revision.
        assert!(m.try_revise(&first, 1).is_none());
    }

    #[test]
    fn test_remove_concept_purges_everything() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        m.add_task(belief(&f, "cat", 0.9), 0);
        assert!(m.focus().contains(&f.atom("cat")));

        let removed = m.remove_concept(&f.atom("cat"), 1).unwrap();
        assert_eq!(removed.term(), &f.atom("cat"));
        assert!(!m.focus().contains(&f.atom("cat")));
        assert!(!m.index().contains(&f.atom("cat")));
        assert_eq!(m.stats().total_tasks, 0);
        assert_eq!(m.stats().concepts_forgotten, 1);
    }

    #[test]
    fn test_consolidation_gating() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        m.add_task(belief(&f, "cat", 0.9), 0);

        assert!(!m.consolidate(1));
        for _ in 0..10 {
            m.note_cycle();
        }
        assert!(m.consolidate(11));
        assert_eq!(m.cycles_since_consolidation(), 0);
        assert_eq!(m.last_consolidation_time(), 11);

        // Immediately after, not due again.
        assert!(!m.consolidate(12));
    }

    #[test]
    fn test_consolidation_decays_and_prunes() {
        let f = TermFactory::new();
        let mut config = ReasonerConfig::default();
        config.activation_decay_rate = 0.5;
        let mut m = memory(config);
        m.add_task(belief(&f, "cat", 0.9), 0);
        let before = m.get_concept(&f.atom("cat")).unwrap().activation();

        for _ in 0..10 {
            m.note_cycle();
        }
        m.consolidate(10);
        let after = m.get_concept(&f.atom("cat")).unwrap().activation();
        assert!(after < before);
    }

    #[test]
    fn test_validate_self_heals() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        m.add_task(belief(&f, "cat", 0.9), 0);
        assert!(m.validate(0));

        // Sabotage a counter.
        m.stats.total_tasks = 99;
        assert!(!m.validate(1));
        // Healed.
        assert_eq!(m.stats().total_tasks, 1);
        assert!(m.validate(2));
        assert!(!m.is_fatal());
    }

    #[test]
    fn test_most_active_ranking() {
        let f = TermFactory::new();
        let mut m = memory(ReasonerConfig::default());
        m.add_task(belief(&f, "quiet", 0.1), 0);
        m.add_task(belief(&f, "loud", 0.9), 0);
        m.boost_concept_activation(&f.atom("loud"), 1.0);

        let ranked = m.most_active_concepts(1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].term(), &f.atom("loud"));
    }

    #[test]
    fn test_pressure_and_adaptive_forgetting() {
        let f = TermFactory::new();
        let mut config = ReasonerConfig::default();
        config.max_concepts = 4;
        config.max_tasks_per_concept = 1;
        config.memory_pressure_threshold = 0.5;
        let mut m = memory(config);

        m.add_task(belief(&f, "a", 0.2), 0);
        m.add_task(belief(&f, "b", 0.8), 0);
        // Capacity 4 tasks; the third add crosses 0.5 and evicts the
        // weakest concept back under the threshold.
        m.add_task(belief(&f, "c", 0.7), 0);
        assert!(m.resource_tracker().pressure() <= 0.5);
        assert!(m.len() < 3);
    }

    #[test]
    fn test_single_slot_table_swaps_concepts() {
        let f = TermFactory::new();
        let mut config = ReasonerConfig::default();
        config.max_concepts = 1;
        config.enable_adaptive_forgetting = false;
        let mut m = memory(config);
        m.add_task(belief(&f, "a", 0.5), 0);
        // A second concept forces an eviction of the first, succeeding.
        assert!(m.add_task(belief(&f, "b", 0.9), 1));
        assert_eq!(m.len(), 1);
        assert!(m.contains(&f.atom("b")));
    }
}
