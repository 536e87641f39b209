//! Secondary indexes over the concept table
//!
//! Keys only, never concept state: every index maps into the set of concept
//! terms and resolves through the memory. Maintained incrementally on
//! add/remove; rebuilt wholesale when flagged dirty.

use crate::term::{Op, Term, TermKind};
use hashbrown::{HashMap, HashSet};

/// Width of a temporal bucket in logical steps.
pub const TEMPORAL_BUCKET_SPAN: i64 = 3600;

/// Activation bucket at 0.1 granularity, in `0..=9`.
fn activation_bucket(activation: f32) -> u8 {
    ((activation * 10.0) as u8).min(9)
}

fn temporal_bucket(created_at: i64) -> i64 {
    created_at.div_euclid(TEMPORAL_BUCKET_SPAN)
}

/// Incremental secondary indexes for concept lookup.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    by_atom: HashMap<String, HashSet<Term>>,
    by_operator: HashMap<Op, HashSet<Term>>,
    /// component term -> compound concept terms referring to it
    by_component: HashMap<Term, HashSet<Term>>,
    by_complexity: HashMap<u32, HashSet<Term>>,
    by_activation: HashMap<u8, HashSet<Term>>,
    by_temporal: HashMap<i64, HashSet<Term>>,
    /// Bucket each term was filed under, so updates stay consistent.
    activation_of: HashMap<Term, u8>,
    created_of: HashMap<Term, i64>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.activation_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activation_of.is_empty()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.activation_of.contains_key(term)
    }

    pub fn insert(&mut self, term: &Term, activation: f32, created_at: i64) {
        if self.contains(term) {
            self.remove(term);
        }
        match term.kind() {
            TermKind::Atom(a) => {
                self.by_atom
                    .entry(a.name().to_string())
                    .or_default()
                    .insert(term.clone());
            }
            TermKind::Compound(c) => {
                self.by_operator.entry(c.op()).or_default().insert(term.clone());
                for component in c.components() {
                    self.by_component
                        .entry(component.clone())
                        .or_default()
                        .insert(term.clone());
                }
            }
            TermKind::Var(_) => {}
        }
        self.by_complexity
            .entry(term.complexity())
            .or_default()
            .insert(term.clone());

        let ab = activation_bucket(activation);
        self.by_activation.entry(ab).or_default().insert(term.clone());
        self.activation_of.insert(term.clone(), ab);

        let tb = temporal_bucket(created_at);
        self.by_temporal.entry(tb).or_default().insert(term.clone());
        self.created_of.insert(term.clone(), tb);
    }

    pub fn remove(&mut self, term: &Term) {
        let Some(ab) = self.activation_of.remove(term) else {
            return;
        };
        match term.kind() {
            TermKind::Atom(a) => {
                prune(&mut self.by_atom, &a.name().to_string(), term);
            }
            TermKind::Compound(c) => {
                prune(&mut self.by_operator, &c.op(), term);
                for component in c.components() {
                    prune(&mut self.by_component, component, term);
                }
            }
            TermKind::Var(_) => {}
        }
        prune(&mut self.by_complexity, &term.complexity(), term);
        prune(&mut self.by_activation, &ab, term);
        if let Some(tb) = self.created_of.remove(term) {
            prune(&mut self.by_temporal, &tb, term);
        }
    }

    /// Refile a term whose activation moved to a different bucket.
    pub fn update_activation(&mut self, term: &Term, activation: f32) {
        let new_bucket = activation_bucket(activation);
        let Some(&old_bucket) = self.activation_of.get(term) else {
            return;
        };
        if old_bucket == new_bucket {
            return;
        }
        prune(&mut self.by_activation, &old_bucket, term);
        self.by_activation
            .entry(new_bucket)
            .or_default()
            .insert(term.clone());
        self.activation_of.insert(term.clone(), new_bucket);
    }

    pub fn with_atom(&self, name: &str) -> impl Iterator<Item = &Term> {
        self.by_atom.get(name).into_iter().flatten()
    }

    pub fn with_operator(&self, op: Op) -> impl Iterator<Item = &Term> {
        self.by_operator.get(&op).into_iter().flatten()
    }

    /// Compound concept terms that contain `component`.
    pub fn with_component(&self, component: &Term) -> impl Iterator<Item = &Term> {
        self.by_component.get(component).into_iter().flatten()
    }

    pub fn with_complexity(&self, complexity: u32) -> impl Iterator<Item = &Term> {
        self.by_complexity.get(&complexity).into_iter().flatten()
    }

    /// Terms whose activation fell in `[min, 1]` at last filing.
    pub fn with_activation_at_least(&self, min: f32) -> impl Iterator<Item = &Term> {
        let from = activation_bucket(min);
        (from..=9).flat_map(move |b| self.by_activation.get(&b).into_iter().flatten())
    }

    pub fn in_temporal_window(&self, time: i64) -> impl Iterator<Item = &Term> {
        self.by_temporal
            .get(&temporal_bucket(time))
            .into_iter()
            .flatten()
    }

    /// Audit against the authoritative concept set.
    pub fn is_consistent<'a>(&self, concept_terms: impl Iterator<Item = &'a Term>) -> bool {
        let live: HashSet<&Term> = concept_terms.collect();
        if live.len() != self.activation_of.len() {
            return false;
        }
        self.activation_of.keys().all(|t| live.contains(t))
    }

    /// Throw away and refile everything.
    pub fn rebuild<'a>(&mut self, concepts: impl Iterator<Item = (&'a Term, f32, i64)>) {
        *self = MemoryIndex::new();
        for (term, activation, created_at) in concepts {
            self.insert(term, activation, created_at);
        }
    }
}

fn prune<K: std::hash::Hash + Eq + Clone>(
    map: &mut HashMap<K, HashSet<Term>>,
    key: &K,
    term: &Term,
) {
    if let Some(set) = map.get_mut(key) {
        set.remove(term);
        if set.is_empty() {
            map.remove(key);
        }
    }
}
