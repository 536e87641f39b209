//! Priority bags
//!
//! A bag is a capacity-bounded collection of tasks keyed by identity and
//! ordered by priority for selection. The bag owns a mutable priority per
//! entry (seeded from the task budget) so attention can decay without
//! touching the immutable task. Selection order is total: priority
//! descending, insertion sequence ascending.

use crate::task::Task;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What gets displaced when a full bag accepts a new task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicy {
    /// Displace the lowest-priority entry, but only for a higher-priority
    /// newcomer.
    Priority,
    /// Displace the least recently touched entry.
    Lru,
    /// Displace the oldest entry.
    Fifo,
}

/// Result of an insertion attempt.
#[derive(Debug, Default)]
pub struct BagAddResult {
    pub inserted: bool,
    pub evicted: Vec<Task>,
}

#[derive(Debug, Clone)]
struct BagEntry {
    task: Task,
    priority: f32,
    seq: u64,
    touched: u64,
}

/// A capacity-bounded priority collection of tasks.
#[derive(Debug)]
pub struct PriorityBag {
    entries: IndexMap<u64, BagEntry>,
    capacity: usize,
    policy: EvictionPolicy,
    min_priority: f32,
    next_seq: u64,
}

impl PriorityBag {
    pub const DEFAULT_MIN_PRIORITY: f32 = 0.01;

    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        PriorityBag {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
            policy,
            min_priority: Self::DEFAULT_MIN_PRIORITY,
            next_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrink or grow the cap; shrinking evicts per policy.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<Task> {
        self.capacity = capacity.max(1);
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(task) = self.evict_one() {
                evicted.push(task);
            } else {
                break;
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.entries.get(&id).map(|e| &e.task)
    }

    /// The bag-local priority of an entry.
    pub fn priority_of(&self, id: u64) -> Option<f32> {
        self.entries.get(&id).map(|e| e.priority)
    }

    /// Insert a task. A full bag displaces per its eviction policy; under
    /// the `Priority` policy a newcomer weaker than the weakest entry is
    /// refused. The bag never exceeds its capacity.
    pub fn add(&mut self, task: Task) -> BagAddResult {
        let id = task.id();
        let priority = task.budget().priority();

        if let Some(entry) = self.entries.get_mut(&id) {
            // Same identity: refresh in place.
            entry.task = task;
            entry.priority = priority;
            entry.touched = self.next_seq;
            self.next_seq += 1;
            return BagAddResult {
                inserted: true,
                evicted: Vec::new(),
            };
        }

        let mut result = BagAddResult::default();
        if self.entries.len() >= self.capacity {
            if self.policy == EvictionPolicy::Priority {
                let weakest = self
                    .entries
                    .values()
                    .map(|e| e.priority)
                    .fold(f32::INFINITY, f32::min);
                if priority <= weakest {
                    return result;
                }
            }
            if let Some(task) = self.evict_one() {
                result.evicted.push(task);
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            id,
            BagEntry {
                task,
                priority,
                seq,
                touched: seq,
            },
        );
        result.inserted = true;
        result
    }

    pub fn remove(&mut self, id: u64) -> Option<Task> {
        self.entries.shift_remove(&id).map(|e| e.task)
    }

    /// The highest-priority task, ties broken by insertion order.
    pub fn peek(&self) -> Option<&Task> {
        self.best_entry().map(|e| &e.task)
    }

    /// Like [`peek`](Self::peek), but marks the entry as touched for LRU
    /// accounting.
    pub fn select(&mut self) -> Option<Task> {
        let id = self.best_entry().map(|e| e.task.id())?;
        let touched = self.next_seq;
        self.next_seq += 1;
        let entry = self.entries.get_mut(&id)?;
        entry.touched = touched;
        Some(entry.task.clone())
    }

    /// All tasks, highest priority first.
    pub fn items_in_priority_order(&self) -> Vec<&Task> {
        let mut entries: Vec<&BagEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        entries.into_iter().map(|e| &e.task).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.entries.values().map(|e| &e.task)
    }

    /// Decay every entry's priority by `rate`; entries falling below the
    /// floor are evicted and returned.
    pub fn apply_decay(&mut self, rate: f32) -> Vec<Task> {
        let rate = rate.clamp(0.0, 1.0);
        for entry in self.entries.values_mut() {
            entry.priority *= 1.0 - rate;
        }
        let floor = self.min_priority;
        let dead: Vec<u64> = self
            .entries
            .iter()
            .filter(|(_, e)| e.priority < floor)
            .map(|(id, _)| *id)
            .collect();
        dead.into_iter()
            .filter_map(|id| self.remove(id))
            .collect()
    }

    /// Decay a single entry, used after it has been selected as a premise.
    pub fn decay_entry(&mut self, id: u64, rate: f32) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.priority *= 1.0 - rate.clamp(0.0, 1.0);
        }
    }

    pub fn average_priority(&self) -> f32 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.values().map(|e| e.priority).sum::<f32>() / self.entries.len() as f32
    }

    fn best_entry(&self) -> Option<&BagEntry> {
        self.entries.values().min_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        })
    }

    fn evict_one(&mut self) -> Option<Task> {
        let victim = match self.policy {
            EvictionPolicy::Priority => self.entries.values().min_by(|a, b| {
                a.priority
                    .partial_cmp(&b.priority)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            }),
            EvictionPolicy::Lru => self.entries.values().min_by_key(|e| e.touched),
            EvictionPolicy::Fifo => self.entries.values().min_by_key(|e| e.seq),
        };
        let id = victim.map(|e| e.task.id())?;
        self.remove(id)
    }
}
