//! Event bus
//!
//! In-process pub/sub for introspection. Subscribers get an unbounded
//! channel receiver; emission never blocks on a subscriber, and receivers
//! that hang up are pruned on the next emit.

use crate::task::Task;
use crate::term::Term;
use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// The kinds of events the core emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskAdded,
    TaskDerived,
    TaskRejected,
    ConceptCreated,
    ConceptAccessed,
    ConceptForgotten,
    ConsolidationStart,
    ConsolidationEnd,
    StepStart,
    StepEnd,
    MemoryCorruption,
    Output,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::TaskAdded => "task.added",
            EventKind::TaskDerived => "task.derived",
            EventKind::TaskRejected => "task.rejected",
            EventKind::ConceptCreated => "concept.created",
            EventKind::ConceptAccessed => "concept.accessed",
            EventKind::ConceptForgotten => "concept.forgotten",
            EventKind::ConsolidationStart => "consolidation.start",
            EventKind::ConsolidationEnd => "consolidation.end",
            EventKind::StepStart => "step.start",
            EventKind::StepEnd => "step.end",
            EventKind::MemoryCorruption => "memory.corruption",
            EventKind::Output => "output",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What an event carries.
#[derive(Debug, Clone)]
pub enum EventPayload {
    None,
    Task(Task),
    Term(Term),
    Text(String),
    Count(usize),
}

/// A single observable event.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Logical time at emission.
    pub at: i64,
    pub payload: EventPayload,
}

/// Cloneable handle to the shared subscriber list.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Sender<Event>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a subscriber; events flow until the receiver is dropped.
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Deliver an event to every live subscriber without blocking.
    pub fn emit(&self, kind: EventKind, at: i64, payload: EventPayload) {
        let mut subs = self.subscribers.lock();
        if subs.is_empty() {
            return;
        }
        let event = Event { kind, at, payload };
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
