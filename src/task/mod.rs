//! Tasks in NARS
//!
//! A task is the unit of work the reasoner schedules: a term, a punctuation
//! mark saying what kind of work it is, an optional truth value, an evidence
//! stamp, and a budget. Tasks are immutable; "modification" means cloning
//! with an override.

use crate::budget::Budget;
use crate::stamp::{OccurrenceTime, Stamp};
use crate::term::Term;
use crate::truth::Truth;
use std::fmt;
use thiserror::Error;

/// Task kinds, by surface punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuation {
    /// `.` — a judgment about what is.
    Belief,
    /// `!` — a desired state.
    Goal,
    /// `?` — a request for a belief.
    Question,
}

impl Punctuation {
    pub fn symbol(&self) -> char {
        match self {
            Punctuation::Belief => '.',
            Punctuation::Goal => '!',
            Punctuation::Question => '?',
        }
    }

    pub fn from_symbol(c: char) -> Option<Punctuation> {
        Some(match c {
            '.' => Punctuation::Belief,
            '!' => Punctuation::Goal,
            '?' => Punctuation::Question,
            _ => return None,
        })
    }

    /// Beliefs and goals carry truth values; questions do not.
    pub fn needs_truth(&self) -> bool {
        !matches!(self, Punctuation::Question)
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Errors from task construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("belief and goal tasks require a truth value")]
    MissingTruth,
    #[error("question tasks cannot carry a truth value")]
    UnexpectedTruth,
    #[error("task builder is missing a {0}")]
    MissingField(&'static str),
}

/// An immutable reasoning task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    term: Term,
    punctuation: Punctuation,
    truth: Option<Truth>,
    stamp: Stamp,
    budget: Budget,
}

impl Task {
    pub fn new(
        term: Term,
        punctuation: Punctuation,
        truth: Option<Truth>,
        stamp: Stamp,
        budget: Budget,
    ) -> Result<Self, TaskError> {
        match (punctuation.needs_truth(), truth.is_some()) {
            (true, false) => return Err(TaskError::MissingTruth),
            (false, true) => return Err(TaskError::UnexpectedTruth),
            _ => {}
        }
        Ok(Task {
            term,
            punctuation,
            truth,
            stamp,
            budget,
        })
    }

    /// An input belief with a fresh stamp.
    pub fn belief(term: Term, truth: Truth, occurrence: OccurrenceTime, now: i64) -> Self {
        Task {
            term,
            punctuation: Punctuation::Belief,
            truth: Some(truth),
            stamp: Stamp::input(occurrence, now),
            budget: Budget::default_input(),
        }
    }

    /// An input goal with a fresh stamp.
    pub fn goal(term: Term, truth: Truth, occurrence: OccurrenceTime, now: i64) -> Self {
        Task {
            term,
            punctuation: Punctuation::Goal,
            truth: Some(truth),
            stamp: Stamp::input(occurrence, now),
            budget: Budget::default_input(),
        }
    }

    /// An input question with a fresh stamp.
    pub fn question(term: Term, now: i64) -> Self {
        Task {
            term,
            punctuation: Punctuation::Question,
            truth: None,
            stamp: Stamp::input(OccurrenceTime::Eternal, now),
            budget: Budget::default_input(),
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn punctuation(&self) -> Punctuation {
        self.punctuation
    }

    pub fn truth(&self) -> Option<&Truth> {
        self.truth.as_ref()
    }

    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Stable identity for storage and dedup.
    pub fn id(&self) -> u64 {
        self.stamp.serial()
    }

    pub fn is_belief(&self) -> bool {
        matches!(self.punctuation, Punctuation::Belief)
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.punctuation, Punctuation::Goal)
    }

    pub fn is_question(&self) -> bool {
        matches!(self.punctuation, Punctuation::Question)
    }

    /// Input tasks rest on their own serial only.
    pub fn is_input(&self) -> bool {
        self.stamp.evidence().len() <= 1
    }

    pub fn complexity(&self) -> u32 {
        self.term.complexity()
    }

    /// Clone with a different budget.
    pub fn with_budget(&self, budget: Budget) -> Self {
        let mut t = self.clone();
        t.budget = budget;
        t
    }

    /// Clone with a different truth. Panics in debug builds if the
    /// punctuation forbids one.
    pub fn with_truth(&self, truth: Truth) -> Self {
        debug_assert!(self.punctuation.needs_truth());
        let mut t = self.clone();
        t.truth = Some(truth);
        t
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.truth {
            Some(truth) => write!(f, "{}{} {}", self.term, self.punctuation, truth),
            None => write!(f, "{}{}", self.term, self.punctuation),
        }
    }
}

/// Builder for tasks with non-default stamps or budgets.
pub struct TaskBuilder {
    term: Option<Term>,
    punctuation: Option<Punctuation>,
    truth: Option<Truth>,
    occurrence: OccurrenceTime,
    creation_time: i64,
    stamp: Option<Stamp>,
    budget: Budget,
}

impl TaskBuilder {
    pub fn new() -> Self {
        TaskBuilder {
            term: None,
            punctuation: None,
            truth: None,
            occurrence: OccurrenceTime::Eternal,
            creation_time: 0,
            stamp: None,
            budget: Budget::default_input(),
        }
    }

    pub fn term(mut self, term: Term) -> Self {
        self.term = Some(term);
        self
    }

    pub fn punctuation(mut self, punctuation: Punctuation) -> Self {
        self.punctuation = Some(punctuation);
        self
    }

    pub fn truth(mut self, truth: Truth) -> Self {
        self.truth = Some(truth);
        self
    }

    pub fn occurrence(mut self, occurrence: OccurrenceTime) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn creation_time(mut self, now: i64) -> Self {
        self.creation_time = now;
        self
    }

    /// Use an explicit stamp instead of a fresh input stamp.
    pub fn stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = Some(stamp);
        self
    }

    pub fn budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn build(self) -> Result<Task, TaskError> {
        let term = self.term.ok_or(TaskError::MissingField("term"))?;
        let punctuation = self
            .punctuation
            .ok_or(TaskError::MissingField("punctuation"))?;
        let stamp = self
            .stamp
            .unwrap_or_else(|| Stamp::input(self.occurrence, self.creation_time));
        Task::new(term, punctuation, self.truth, stamp, self.budget)
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}
