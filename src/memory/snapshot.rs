//! Memory snapshots
//!
//! Structural serialization of the whole memory. Terms travel as their
//! canonical Narsese strings and are re-interned through the parser on
//! load, so snapshots stay readable and the interning table never leaks
//! into the format. Versions are semver strings; a loader accepts any
//! minor of its own major version.

use crate::bag::EvictionPolicy;
use crate::budget::Budget;
use crate::concept::Concept;
use crate::config::ReasonerConfig;
use crate::event::EventBus;
use crate::memory::{Memory, MemoryStats, ResourceTracker};
use crate::parser::{self, ParseError};
use crate::stamp::{OccurrenceTime, Stamp};
use crate::task::{Punctuation, Task, TaskError};
use crate::term::TermFactory;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format version written by this build.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Errors from snapshot restore.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {0} (this build reads {SNAPSHOT_VERSION})")]
    Version(String),
    #[error("unreadable term '{0}': {1}")]
    Term(String, ParseError),
    #[error("unreadable task: {0}")]
    Task(TaskError),
    #[error("unknown punctuation '{0}'")]
    Punctuation(char),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub term: String,
    pub punctuation: char,
    /// (frequency, confidence); absent for questions.
    pub truth: Option<(f32, f32)>,
    pub serial: u64,
    /// Occurrence step; `None` means eternal.
    pub occurrence: Option<i64>,
    pub creation_time: i64,
    pub evidence: Vec<u64>,
    /// (priority, durability, quality).
    pub budget: (f32, f32, f32),
}

impl TaskSnapshot {
    pub fn of(task: &Task) -> Self {
        TaskSnapshot {
            term: task.term().to_string(),
            punctuation: task.punctuation().symbol(),
            truth: task.truth().map(|t| (t.frequency(), t.confidence())),
            serial: task.stamp().serial(),
            occurrence: match task.stamp().occurrence() {
                OccurrenceTime::Eternal => None,
                OccurrenceTime::At(t) => Some(t),
            },
            creation_time: task.stamp().creation_time(),
            evidence: task.stamp().evidence().to_vec(),
            budget: (
                task.budget().priority(),
                task.budget().durability(),
                task.budget().quality(),
            ),
        }
    }

    pub fn restore(&self, factory: &TermFactory) -> Result<Task, SnapshotError> {
        let term = parser::parse_term(&self.term, factory)
            .map_err(|e| SnapshotError::Term(self.term.clone(), e))?;
        let punctuation = Punctuation::from_symbol(self.punctuation)
            .ok_or(SnapshotError::Punctuation(self.punctuation))?;
        let occurrence = match self.occurrence {
            None => OccurrenceTime::Eternal,
            Some(t) => OccurrenceTime::At(t),
        };
        let stamp = Stamp::restore(
            self.serial,
            occurrence,
            self.creation_time,
            self.evidence.clone(),
        );
        let (p, d, q) = self.budget;
        Task::new(
            term,
            punctuation,
            self.truth.map(|(f, c)| crate::truth::Truth::new(f, c)),
            stamp,
            Budget::new(p, d, q),
        )
        .map_err(SnapshotError::Task)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptSnapshot {
    pub term: String,
    pub created_at: i64,
    pub last_accessed: u64,
    pub activation: f32,
    pub use_count: u64,
    pub quality: f32,
    pub beliefs: Vec<TaskSnapshot>,
    pub goals: Vec<TaskSnapshot>,
    pub questions: Vec<TaskSnapshot>,
    pub version: String,
}

impl ConceptSnapshot {
    pub fn of(concept: &Concept) -> Self {
        let dump = |kind: Punctuation| -> Vec<TaskSnapshot> {
            concept.bag(kind).iter().map(TaskSnapshot::of).collect()
        };
        ConceptSnapshot {
            term: concept.term().to_string(),
            created_at: concept.created_at(),
            last_accessed: concept.last_accessed(),
            activation: concept.activation(),
            use_count: concept.use_count(),
            quality: concept.quality(),
            beliefs: dump(Punctuation::Belief),
            goals: dump(Punctuation::Goal),
            questions: dump(Punctuation::Question),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    pub fn restore(
        &self,
        factory: &TermFactory,
        max_tasks: usize,
        policy: EvictionPolicy,
    ) -> Result<Concept, SnapshotError> {
        let term = parser::parse_term(&self.term, factory)
            .map_err(|e| SnapshotError::Term(self.term.clone(), e))?;
        let mut concept = Concept::new(term, max_tasks, policy, self.created_at);
        for snap in self
            .beliefs
            .iter()
            .chain(&self.goals)
            .chain(&self.questions)
        {
            let task = snap.restore(factory)?;
            concept.add_task(task, self.last_accessed);
        }
        concept.set_activation(self.activation);
        concept.set_quality(self.quality);
        concept.set_use_count(self.use_count);
        concept.set_last_accessed(self.last_accessed);
        Ok(concept)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub version: String,
    pub config: ReasonerConfig,
    pub concepts: Vec<ConceptSnapshot>,
    pub focus_concept_terms: Vec<String>,
    pub stats: MemoryStats,
    pub resource_tracker: ResourceTracker,
    pub access_seq: u64,
    pub cycles_since_consolidation: u64,
    pub last_consolidation_time: i64,
}

/// Accept any minor/patch of the same major version.
fn version_compatible(found: &str) -> bool {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    match (major(found), major(SNAPSHOT_VERSION)) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

impl Memory {
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            config: self.config().clone(),
            concepts: self.concepts().map(ConceptSnapshot::of).collect(),
            focus_concept_terms: self.focus().iter().map(|t| t.to_string()).collect(),
            stats: self.stats().clone(),
            resource_tracker: self.resource_tracker(),
            access_seq: self.access_seq(),
            cycles_since_consolidation: self.cycles_since_consolidation(),
            last_consolidation_time: self.last_consolidation_time(),
        }
    }

    pub fn restore(
        snapshot: &MemorySnapshot,
        factory: &TermFactory,
        bus: EventBus,
    ) -> Result<Memory, SnapshotError> {
        if !version_compatible(&snapshot.version) {
            return Err(SnapshotError::Version(snapshot.version.clone()));
        }
        let config = snapshot.config.clone();
        let policy = match config.forget_policy {
            crate::config::ForgetPolicy::Priority => EvictionPolicy::Priority,
            crate::config::ForgetPolicy::Lru => EvictionPolicy::Lru,
            crate::config::ForgetPolicy::Fifo => EvictionPolicy::Fifo,
        };
        let max_tasks = config.max_tasks_per_concept;
        let mut memory = Memory::new(config, bus);
        for concept_snap in &snapshot.concepts {
            let concept = concept_snap.restore(factory, max_tasks, policy)?;
            memory.insert_restored_concept(concept);
        }
        let mut focus = HashSet::new();
        for term in &snapshot.focus_concept_terms {
            let term = parser::parse_term(term, factory)
                .map_err(|e| SnapshotError::Term(term.clone(), e))?;
            if memory.contains(&term) {
                focus.insert(term);
            }
        }
        memory.restore_parts(
            snapshot.stats.clone(),
            focus,
            snapshot.access_seq,
            snapshot.cycles_since_consolidation,
            snapshot.last_consolidation_time,
        );
        Ok(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Op;
    use crate::truth::Truth;

    fn populated() -> (TermFactory, Memory) {
        let f = TermFactory::new();
        let mut m = Memory::new(ReasonerConfig::default(), EventBus::new());
        let st = f
            .statement(Op::Inheritance, f.atom("bird"), f.atom("animal"))
            .unwrap();
        m.add_task(
            Task::belief(st.clone(), Truth::new(1.0, 0.9), OccurrenceTime::Eternal, 0),
            0,
        );
        m.add_task(Task::question(st, 1), 1);
        m.add_task(
            Task::goal(
                f.atom("fly"),
                Truth::default_judgment(),
                OccurrenceTime::Eternal,
                2,
            ),
            2,
        );
        (f, m)
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let (f, m) = populated();
        let snap = m.snapshot();
        let restored = Memory::restore(&snap, &f, EventBus::new()).unwrap();

        assert_eq!(restored.len(), m.len());
        assert_eq!(restored.stats(), m.stats());
        assert_eq!(restored.focus().len(), m.focus().len());
        for concept in m.concepts() {
            let other = restored.get_concept(concept.term()).expect("concept kept");
            assert_eq!(other.total_tasks(), concept.total_tasks());
            assert_eq!(other.use_count(), concept.use_count());
            assert!((other.activation() - concept.activation()).abs() < 1.0e-5);
            for kind in [Punctuation::Belief, Punctuation::Goal, Punctuation::Question] {
                let mut a: Vec<u64> = concept.bag(kind).iter().map(|t| t.id()).collect();
                let mut b: Vec<u64> = other.bag(kind).iter().map(|t| t.id()).collect();
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_round_trip_through_json() {
        let (f, m) = populated();
        let json = serde_json::to_string(&m.snapshot()).unwrap();
        let snap: MemorySnapshot = serde_json::from_str(&json).unwrap();
        let restored = Memory::restore(&snap, &f, EventBus::new()).unwrap();
        assert_eq!(restored.len(), m.len());
        assert_eq!(restored.stats(), m.stats());
    }

    #[test]
    fn test_version_gate() {
        let (f, m) = populated();
        let mut snap = m.snapshot();
        snap.version = "1.9.7".to_string();
        assert!(Memory::restore(&snap, &f, EventBus::new()).is_ok());

        snap.version = "2.0.0".to_string();
        assert!(matches!(
            Memory::restore(&snap, &f, EventBus::new()),
            Err(SnapshotError::Version(_))
        ));

        snap.version = "junk".to_string();
        assert!(Memory::restore(&snap, &f, EventBus::new()).is_err());
    }

    #[test]
    fn test_task_snapshot_round_trip() {
        let f = TermFactory::new();
        let st = f
            .statement(Op::Implication, f.atom("p"), f.atom("q"))
            .unwrap();
        let task = Task::belief(st, Truth::new(0.8, 0.7), OccurrenceTime::At(42), 5);
        let snap = TaskSnapshot::of(&task);
        let back = snap.restore(&f).unwrap();

        assert_eq!(back.id(), task.id());
        assert_eq!(back.term(), task.term());
        assert_eq!(back.stamp().occurrence(), OccurrenceTime::At(42));
        assert_eq!(back.stamp().evidence(), task.stamp().evidence());
        assert_eq!(back.truth(), task.truth());
    }
}
