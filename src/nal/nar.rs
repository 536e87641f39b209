//! The reasoner
//!
//! `NAR` owns every mutable piece of the core — memory, rule registry,
//! strategies, link graph, clock, plan cache — and runs the attention loop
//! on the caller's thread: select a concept by activation, pop its best
//! task, form premises, dispatch rules, ingest the results, maintain.
//! External callers interact through the submission API; each call is
//! atomic at reasoning-step granularity and every outcome is a value.

use crate::budget::Budget;
use crate::config::ReasonerConfig;
use crate::event::{Event, EventBus, EventKind, EventPayload};
use crate::link::TermLinkGraph;
use crate::memory::{Memory, MemorySnapshot, MemoryStats, SnapshotError};
use crate::nal::unify::{substitute, unify, Bindings};
use crate::nal::{OpMask, Rule, RuleContext, RuleRegistry};
use crate::parser;
use crate::stamp::Stamp;
use crate::strategy::{
    DecompositionStrategy, PremiseCandidate, PremiseStrategy, StrategyContext, TaskMatchStrategy,
    TermLinkStrategy,
};
use crate::task::{Punctuation, Task};
use crate::term::{Op, Term, TermFactory};
use crate::time::Clock;
use crate::truth::Truth;
use crossbeam::channel::Receiver;
use lru::LruCache;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Narsese did not parse.
    Parse(String),
    /// A bare variable cannot be a task term.
    VariableTerm,
    /// A belief with this exact evidential base is already held.
    Duplicate,
    /// Storage refused the task (bag or concept capacity).
    Capacity,
}

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted {
        /// The task merged with an existing belief instead of inserting.
        revised: bool,
    },
    Rejected(RejectReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// What a call to `step` accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub requested: usize,
    pub executed: usize,
    /// Derived tasks that were actually stored.
    pub derived: usize,
    pub deadline_hit: bool,
    /// The memory declared itself unrecoverable; the loop stopped.
    pub fatal: bool,
}

/// Typed outcome of an out-of-core collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorOutcome<T> {
    Ready(T),
    TimedOut,
}

/// Wait on a collaborator channel with a deadline; lateness is a value,
/// not an error.
pub fn await_collaborator<T>(rx: &Receiver<T>, timeout: Duration) -> CollaboratorOutcome<T> {
    match rx.recv_timeout(timeout) {
        Ok(value) => CollaboratorOutcome::Ready(value),
        Err(_) => CollaboratorOutcome::TimedOut,
    }
}

/// Read-only summary of a concept.
#[derive(Debug, Clone)]
pub struct ConceptView {
    pub term: Term,
    pub activation: f32,
    pub quality: f32,
    pub use_count: u64,
    pub beliefs: usize,
    pub goals: usize,
    pub questions: usize,
}

/// Per-strategy accounting surfaced by `stats`.
#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub name: &'static str,
    pub candidates_generated: u64,
    pub successful_pairs: u64,
    pub effectiveness: f32,
}

/// Engine-level statistics.
#[derive(Debug, Clone)]
pub struct NarStats {
    pub cycle: u64,
    pub time: i64,
    pub concepts: usize,
    pub focus: usize,
    pub derived: u64,
    pub memory: MemoryStats,
    pub strategies: Vec<StrategyReport>,
}

#[derive(Debug, Clone)]
struct PlanEntry {
    depth: u32,
    expanded: bool,
    subgoals: Vec<Term>,
}

enum IngestOutcome {
    Stored,
    Revised,
    Duplicate,
    Refused,
}

/// The non-axiomatic reasoner.
pub struct NAR {
    config: ReasonerConfig,
    factory: TermFactory,
    memory: Memory,
    rules: RuleRegistry,
    strategies: Vec<Box<dyn PremiseStrategy>>,
    links: TermLinkGraph,
    bus: EventBus,
    housekeeping_rx: Receiver<Event>,
    clock: Clock,
    cycle: u64,
    rng: StdRng,
    plans: LruCache<String, PlanEntry>,
    derived_total: u64,
}

impl NAR {
    pub fn new(config: ReasonerConfig) -> Result<Self, crate::config::ConfigError> {
        config.validate()?;
        let bus = EventBus::new();
        let housekeeping_rx = bus.subscribe();
        let memory = Memory::new(config.clone(), bus.clone());
        let plan_cache =
            NonZeroUsize::new(config.plan_cache_size).expect("validated positive");
        Ok(NAR {
            rng: StdRng::seed_from_u64(config.rng_seed),
            links: TermLinkGraph::new(config.strategy.max_links),
            plans: LruCache::new(plan_cache),
            strategies: vec![
                Box::new(DecompositionStrategy::new()),
                Box::new(TermLinkStrategy::new()),
                Box::new(TaskMatchStrategy::new()),
            ],
            rules: RuleRegistry::with_defaults(),
            factory: TermFactory::new(),
            clock: Clock::new(),
            cycle: 0,
            derived_total: 0,
            housekeeping_rx,
            memory,
            bus,
            config,
        })
    }

    pub fn factory(&self) -> &TermFactory {
        &self.factory
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Subscribe to the event stream.
    pub fn events(&self) -> Receiver<Event> {
        self.bus.subscribe()
    }

    /// Parse a Narsese term against this engine's interning table.
    pub fn term(&self, input: &str) -> Result<Term, parser::ParseError> {
        parser::parse_term(input, &self.factory)
    }

    /// Parse and submit one Narsese sentence.
    pub fn submit(&mut self, line: &str) -> SubmitOutcome {
        match parser::parse_task(line, &self.factory, self.clock.now()) {
            Ok(task) => self.submit_task(task),
            Err(e) => {
                self.bus.emit(
                    EventKind::TaskRejected,
                    self.clock.now(),
                    EventPayload::Text(e.to_string()),
                );
                SubmitOutcome::Rejected(RejectReason::Parse(e.to_string()))
            }
        }
    }

    /// Submit an already-built task.
    pub fn submit_task(&mut self, task: Task) -> SubmitOutcome {
        if task.term().is_variable() {
            self.bus.emit(
                EventKind::TaskRejected,
                self.clock.now(),
                EventPayload::Task(task),
            );
            return SubmitOutcome::Rejected(RejectReason::VariableTerm);
        }
        match self.ingest(task) {
            IngestOutcome::Stored => SubmitOutcome::Accepted { revised: false },
            IngestOutcome::Revised => SubmitOutcome::Accepted { revised: true },
            IngestOutcome::Duplicate => SubmitOutcome::Rejected(RejectReason::Duplicate),
            IngestOutcome::Refused => SubmitOutcome::Rejected(RejectReason::Capacity),
        }
    }

    /// Run `n` reasoning cycles.
    pub fn step(&mut self, n: usize) -> StepReport {
        self.step_with_deadline(n, None)
    }

    /// Run up to `n` cycles within a wall-clock budget. A cycle past the
    /// deadline finishes its current rule application and yields.
    pub fn step_with_deadline(&mut self, n: usize, budget: Option<Duration>) -> StepReport {
        let deadline = budget.map(|d| Instant::now() + d);
        let mut report = StepReport {
            requested: n,
            ..StepReport::default()
        };
        for _ in 0..n {
            if self.memory.is_fatal() {
                report.fatal = true;
                break;
            }
            report.derived += self.cycle_once(deadline);
            report.executed += 1;
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    report.deadline_hit = true;
                    break;
                }
            }
        }
        report
    }

    /// Best-confidence belief matching the term; query variables unify.
    pub fn query(&self, term: &Term) -> Option<Task> {
        if term.has_query_var() {
            let mut best: Option<Task> = None;
            for concept in self.memory.concepts() {
                let Some(belief) = concept.best_belief_by_confidence() else {
                    continue;
                };
                let mut bindings = Bindings::new();
                if !unify(term, belief.term(), &mut bindings) {
                    continue;
                }
                let confidence =
                    |t: &Task| t.truth().map(|t| t.confidence()).unwrap_or(0.0);
                if best.as_ref().map(|b| confidence(belief) > confidence(b)).unwrap_or(true) {
                    best = Some(belief.clone());
                }
            }
            best
        } else {
            self.memory
                .get_concept(term)?
                .best_belief_by_confidence()
                .cloned()
        }
    }

    /// Read a concept without marking access.
    pub fn get_concept(&self, term: &Term) -> Option<ConceptView> {
        self.memory.get_concept(term).map(Self::view)
    }

    /// Read a concept, marking access (LRU forgetting sees this).
    pub fn touch_concept(&mut self, term: &Term) -> Option<ConceptView> {
        let now = self.clock.now();
        self.memory.touch_concept(term, now).map(Self::view)
    }

    pub fn stats(&self) -> NarStats {
        NarStats {
            cycle: self.cycle,
            time: self.clock.now(),
            concepts: self.memory.len(),
            focus: self.memory.focus().len(),
            derived: self.derived_total,
            memory: self.memory.stats().clone(),
            strategies: self
                .strategies
                .iter()
                .map(|s| StrategyReport {
                    name: s.name(),
                    candidates_generated: s.stats().candidates_generated,
                    successful_pairs: s.stats().successful_pairs,
                    effectiveness: s.effectiveness(),
                })
                .collect(),
        }
    }

    /// Idempotent when not due.
    pub fn consolidate(&mut self) -> bool {
        self.memory.consolidate(self.clock.now())
    }

    pub fn register_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.register(rule);
    }

    pub fn register_strategy(&mut self, strategy: Box<dyn PremiseStrategy>) {
        self.strategies.push(strategy);
    }

    /// Rescale one strategy's candidate priorities at runtime. Returns
    /// whether the strategy was found.
    pub fn scale_strategy(&mut self, name: &str, scale: f32) -> bool {
        for strategy in &mut self.strategies {
            if strategy.name() == name {
                strategy.set_priority_scale(scale);
                return true;
            }
        }
        false
    }

    /// Subgoal terms cached for a goal, if it was expanded.
    pub fn cached_plan(&self, goal: &Term) -> Option<Vec<Term>> {
        self.plans
            .peek(&goal.to_string())
            .filter(|e| e.expanded)
            .map(|e| e.subgoals.clone())
    }

    pub fn clear_plans(&mut self) {
        self.plans.clear();
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        self.memory.snapshot()
    }

    /// Replace the memory from a snapshot and rebuild the link layer.
    pub fn restore(&mut self, snapshot: &MemorySnapshot) -> Result<(), SnapshotError> {
        self.memory = Memory::restore(snapshot, &self.factory, self.bus.clone())?;
        self.links.clear();
        let mut tasks = Vec::new();
        for concept in self.memory.concepts() {
            for kind in [Punctuation::Belief, Punctuation::Goal, Punctuation::Question] {
                tasks.extend(concept.bag(kind).iter().cloned());
            }
        }
        for task in &tasks {
            self.links.ingest(task);
        }
        Ok(())
    }

    fn view(concept: &crate::concept::Concept) -> ConceptView {
        ConceptView {
            term: concept.term().clone(),
            activation: concept.activation(),
            quality: concept.quality(),
            use_count: concept.use_count(),
            beliefs: concept.bag(Punctuation::Belief).len(),
            goals: concept.bag(Punctuation::Goal).len(),
            questions: concept.bag(Punctuation::Question).len(),
        }
    }

    fn cycle_once(&mut self, deadline: Option<Instant>) -> usize {
        let now = self.clock.advance();
        self.cycle += 1;
        self.bus.emit(
            EventKind::StepStart,
            now,
            EventPayload::Count(self.cycle as usize),
        );
        self.memory.note_cycle();

        let mut derived = 0;
        let visited = self.select_concept_term();
        if let Some(term) = &visited {
            if let Some(task) = self.memory.select_task(term) {
                self.memory.decay_task_priority(
                    term,
                    task.punctuation(),
                    task.id(),
                    self.config.priority_decay_rate,
                );
                match task.punctuation() {
                    Punctuation::Belief => derived += self.forward_inference(&task, deadline),
                    Punctuation::Goal => derived += self.backward_chain(&task),
                    Punctuation::Question => self.answer_question(&task),
                }
            }
        }

        if let Some(term) = &visited {
            self.memory
                .decay_concept_activation(term, self.config.activation_decay_rate);
        }
        self.memory.consolidate(now);
        self.drain_housekeeping();

        self.derived_total += derived as u64;
        self.bus
            .emit(EventKind::StepEnd, now, EventPayload::Count(derived));
        derived
    }

    /// Activation-weighted concept choice, preferring the focus set. A
    /// small floor keeps idle concepts reachable.
    fn select_concept_term(&mut self) -> Option<Term> {
        let pool: Vec<(Term, f32)> = if !self.memory.focus().is_empty() {
            self.memory
                .focus()
                .iter()
                .map(|t| {
                    let activation = self
                        .memory
                        .get_concept(t)
                        .map(|c| c.activation())
                        .unwrap_or(0.0);
                    (t.clone(), activation)
                })
                .collect()
        } else {
            self.memory
                .concepts()
                .map(|c| (c.term().clone(), c.activation()))
                .collect()
        };
        if pool.is_empty() {
            return None;
        }
        const FLOOR: f32 = 0.01;
        let total: f32 = pool.iter().map(|(_, a)| a + FLOOR).sum();
        let mut roll = self.rng.gen::<f32>() * total;
        for (term, activation) in &pool {
            roll -= activation + FLOOR;
            if roll <= 0.0 {
                return Some(term.clone());
            }
        }
        pool.into_iter().next_back().map(|(t, _)| t)
    }

    fn collect_candidates(&mut self, primary: &Task) -> Vec<(usize, PremiseCandidate)> {
        let ctx = StrategyContext {
            memory: &self.memory,
            links: &self.links,
            factory: &self.factory,
            now: self.clock.now(),
            config: &self.config.strategy,
        };
        let mut all = Vec::new();
        for (i, strategy) in self.strategies.iter_mut().enumerate() {
            for candidate in strategy.generate(primary, &ctx) {
                all.push((i, candidate));
            }
        }
        all.sort_by(|(_, a), (_, b)| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        all.truncate(self.config.max_premises_per_step);
        all
    }

    fn forward_inference(&mut self, primary: &Task, deadline: Option<Instant>) -> usize {
        let mut derived = 0;

        for task in self.dispatch_single(primary) {
            if self.ingest_derived(task) {
                derived += 1;
            }
        }

        for (strategy_idx, candidate) in self.collect_candidates(primary) {
            if deadline.map(|d| Instant::now() >= d).unwrap_or(false) {
                break;
            }
            let secondary = candidate.source.clone().or_else(|| {
                self.memory
                    .get_concept(&candidate.term)
                    .and_then(|c| c.best_belief_by_confidence().cloned())
            });
            let Some(secondary) = secondary else {
                continue;
            };
            if secondary.id() == primary.id() {
                continue;
            }
            let results = self.dispatch_pair(primary, &secondary);
            if results.is_empty() {
                continue;
            }
            self.strategies[strategy_idx].record_success();
            for task in results {
                if self.ingest_derived(task) {
                    derived += 1;
                }
            }
        }
        derived
    }

    fn dispatch_pair(&self, primary: &Task, secondary: &Task) -> Vec<Task> {
        let ctx = RuleContext {
            factory: &self.factory,
            now: self.clock.now(),
        };
        let mut out = Vec::new();
        for rule in self
            .rules
            .double_matching(OpMask::of(primary.term()), OpMask::of(secondary.term()))
        {
            out.extend(rule.apply(primary, Some(secondary), &ctx));
        }
        out
    }

    fn dispatch_single(&self, primary: &Task) -> Vec<Task> {
        let ctx = RuleContext {
            factory: &self.factory,
            now: self.clock.now(),
        };
        let mut out = Vec::new();
        for rule in self.rules.single_matching(OpMask::of(primary.term())) {
            out.extend(rule.apply(primary, None, &ctx));
        }
        out
    }

    /// Expand a goal backwards: implications whose consequent unifies with
    /// the goal term contribute their antecedents as subgoals, up to the
    /// configured depth. Expansions are cached by goal term.
    fn backward_chain(&mut self, goal: &Task) -> usize {
        let now = self.clock.now();
        let key = goal.term().to_string();
        let entry = self.plans.get(&key).cloned();
        if entry.as_ref().map(|e| e.expanded).unwrap_or(false) {
            return 0;
        }
        let depth = entry.map(|e| e.depth).unwrap_or(0);
        if depth as usize >= self.config.max_plan_depth {
            return 0;
        }
        let Some(goal_truth) = goal.truth().copied() else {
            return 0;
        };

        let mut implication_terms: Vec<Term> = self
            .memory
            .index()
            .with_operator(Op::Implication)
            .cloned()
            .collect();
        implication_terms.sort_by_key(|t| (t.complexity(), t.to_string()));

        let mut subgoals = Vec::new();
        let mut derived = 0;
        for term in implication_terms {
            let Some(belief) = self
                .memory
                .get_concept(&term)
                .and_then(|c| c.best_belief_by_confidence().cloned())
            else {
                continue;
            };
            let (Some(antecedent), Some(consequent)) = (term.subject(), term.predicate()) else {
                continue;
            };
            let mut bindings = Bindings::new();
            if !unify(consequent, goal.term(), &mut bindings) {
                continue;
            }
            let subgoal_term = substitute(antecedent, &bindings, &self.factory);
            let Some(belief_truth) = belief.truth().copied() else {
                continue;
            };
            let truth = Truth::deduction(&goal_truth, &belief_truth);
            let Some(stamp) = Stamp::merge(goal.stamp(), belief.stamp(), now) else {
                continue;
            };
            let budget = Budget::derived(goal.budget(), belief.budget(), truth.expectation());
            let Ok(subgoal) = Task::new(
                subgoal_term.clone(),
                Punctuation::Goal,
                Some(truth),
                stamp,
                budget,
            ) else {
                continue;
            };

            let child_key = subgoal_term.to_string();
            if self.plans.peek(&child_key).is_none() {
                self.plans.put(
                    child_key,
                    PlanEntry {
                        depth: depth + 1,
                        expanded: false,
                        subgoals: Vec::new(),
                    },
                );
            }
            subgoals.push(subgoal_term);
            if self.ingest_derived(subgoal) {
                derived += 1;
            }
        }

        self.plans.put(
            key,
            PlanEntry {
                depth,
                expanded: true,
                subgoals,
            },
        );
        derived
    }

    fn answer_question(&mut self, question: &Task) {
        let Some(answer) = self.query(question.term()) else {
            return;
        };
        let now = self.clock.now();
        self.bus
            .emit(EventKind::Output, now, EventPayload::Task(answer.clone()));
        // Answering a question is evidence the concept carries value.
        self.memory.boost_concept_activation(answer.term(), 0.1);
        self.memory.update_concept_quality(answer.term(), 0.05);
    }

    fn ingest_derived(&mut self, task: Task) -> bool {
        if task.is_belief() && self.is_duplicate_belief(&task) {
            return false;
        }
        self.bus.emit(
            EventKind::TaskDerived,
            self.clock.now(),
            EventPayload::Task(task.clone()),
        );
        matches!(
            self.ingest(task),
            IngestOutcome::Stored | IngestOutcome::Revised
        )
    }

    fn ingest(&mut self, task: Task) -> IngestOutcome {
        let now = self.clock.now();
        if task.is_belief() {
            if self.is_duplicate_belief(&task) {
                return IngestOutcome::Duplicate;
            }
            if let Some(revised) = self.memory.try_revise(&task, now) {
                self.links.ingest(&revised);
                self.drain_housekeeping();
                return IngestOutcome::Revised;
            }
        }
        let stored = self.memory.add_task(task.clone(), now);
        if stored {
            self.links.ingest(&task);
            if task.is_question() {
                self.answer_question(&task);
            }
        }
        self.drain_housekeeping();
        if stored {
            IngestOutcome::Stored
        } else {
            IngestOutcome::Refused
        }
    }

    /// A belief resting on exactly the evidence of one already held adds
    /// nothing; re-derivations die here.
    fn is_duplicate_belief(&self, task: &Task) -> bool {
        let Some(concept) = self.memory.get_concept(task.term()) else {
            return false;
        };
        let mut incoming: Vec<u64> = task.stamp().evidence().to_vec();
        incoming.sort_unstable();
        concept.bag(Punctuation::Belief).iter().any(|held| {
            let mut base: Vec<u64> = held.stamp().evidence().to_vec();
            base.sort_unstable();
            base == incoming
        })
    }

    /// The link layer lives outside memory; forgotten concepts are purged
    /// from it by draining the event stream.
    fn drain_housekeeping(&mut self) {
        while let Ok(event) = self.housekeeping_rx.try_recv() {
            if event.kind == EventKind::ConceptForgotten {
                if let EventPayload::Term(term) = event.payload {
                    self.links.remove_term(&term);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    fn nar() -> NAR {
        NAR::new(ReasonerConfig::default()).unwrap()
    }

    #[test]
    fn test_submit_parses_and_stores() {
        let mut n = nar();
        assert!(n.submit("<bird --> animal>. %1.0;0.9%").is_accepted());
        let term = n.term("<bird --> animal>").unwrap();
        assert!(n.get_concept(&term).is_some());
        assert_eq!(n.stats().memory.beliefs, 1);
    }

    #[test]
    fn test_submit_rejects_garbage() {
        let mut n = nar();
        let out = n.submit("not narsese !!");
        assert!(matches!(
            out,
            SubmitOutcome::Rejected(RejectReason::Parse(_))
        ));
        assert_eq!(n.stats().concepts, 0);
    }

    #[test]
    fn test_submit_rejects_variable_term() {
        let mut n = nar();
        let out = n.submit("$x.");
        assert_eq!(out, SubmitOutcome::Rejected(RejectReason::VariableTerm));
    }

    #[test]
    fn test_revision_on_resubmission() {
        let mut n = nar();
        assert_eq!(
            n.submit("<a --> b>. %0.8;0.9%"),
            SubmitOutcome::Accepted { revised: false }
        );
        assert_eq!(
            n.submit("<a --> b>. %0.6;0.9%"),
            SubmitOutcome::Accepted { revised: true }
        );
        let term = n.term("<a --> b>").unwrap();
        let belief = n.query(&term).unwrap();
        assert!((belief.truth().unwrap().frequency() - 0.7).abs() < 1.0e-3);
        assert_eq!(n.get_concept(&term).unwrap().beliefs, 1);
    }

    #[test]
    fn test_cycle_counter_monotone() {
        let mut n = nar();
        n.submit("<a --> b>.");
        let before = n.cycle_count();
        let report = n.step(5);
        assert_eq!(report.executed, 5);
        assert_eq!(n.cycle_count(), before + 5);
    }

    #[test]
    fn test_step_on_empty_memory() {
        let mut n = nar();
        let report = n.step(3);
        assert_eq!(report.executed, 3);
        assert_eq!(report.derived, 0);
    }

    #[test]
    fn test_query_with_query_variable() {
        let mut n = nar();
        n.submit("<robin --> bird>. %1.0;0.9%");
        n.submit("<robin --> tree>. %1.0;0.4%");
        let pattern = n.term("<robin --> ?what>").unwrap();
        let best = n.query(&pattern).unwrap();
        assert_eq!(best.term(), &n.term("<robin --> bird>").unwrap());
    }

    #[test]
    fn test_deadline_yields() {
        let mut n = nar();
        n.submit("<a --> b>.");
        let report = n.step_with_deadline(1_000_000, Some(Duration::from_millis(1)));
        assert!(report.deadline_hit);
        assert!(report.executed < 1_000_000);
    }

    #[test]
    fn test_await_collaborator_timeout() {
        let (tx, rx) = unbounded::<u32>();
        assert_eq!(
            await_collaborator(&rx, Duration::from_millis(5)),
            CollaboratorOutcome::TimedOut
        );
        tx.send(7).unwrap();
        assert_eq!(
            await_collaborator(&rx, Duration::from_millis(5)),
            CollaboratorOutcome::Ready(7)
        );
    }

    #[test]
    fn test_strategy_accounting_surfaces() {
        let mut n = nar();
        n.submit("<robin --> bird>. %1.0;0.9%");
        n.submit("<bird --> animal>. %1.0;0.9%");
        n.step(30);
        let stats = n.stats();
        let total: u64 = stats
            .strategies
            .iter()
            .map(|s| s.candidates_generated)
            .sum();
        assert!(total > 0);
        for s in &stats.strategies {
            assert!(s.successful_pairs <= s.candidates_generated);
        }

        assert!(n.scale_strategy("taskmatch", 0.5));
        assert!(!n.scale_strategy("no-such-strategy", 0.5));
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut n = nar();
        n.submit("<robin --> bird>. %1.0;0.9%");
        n.submit("<bird --> animal>. %1.0;0.9%");
        n.step(10);
        let snap = n.snapshot();
        let stats_before = n.stats();

        let mut fresh = nar();
        fresh.restore(&snap).unwrap();
        assert_eq!(fresh.stats().concepts, stats_before.concepts);
        assert_eq!(fresh.stats().memory, stats_before.memory);

        // The restored engine keeps reasoning.
        let report = fresh.step(5);
        assert_eq!(report.executed, 5);
    }
}
