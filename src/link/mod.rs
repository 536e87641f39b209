//! Term links
//!
//! A weighted directed graph over terms, built as tasks are ingested:
//! compound terms link to their components and back. The TermLink strategy
//! walks these edges to propose secondary premises.

use crate::task::Task;
use crate::term::Term;
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Weighted term-to-term links.
pub struct TermLinkGraph {
    graph: DiGraph<Term, f32>,
    nodes: HashMap<Term, NodeIndex>,
    /// Out-degree bound per term.
    max_links: usize,
}

impl TermLinkGraph {
    pub fn new(max_links: usize) -> Self {
        TermLinkGraph {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            max_links: max_links.max(1),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn node(&mut self, term: &Term) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(term) {
            return idx;
        }
        let idx = self.graph.add_node(term.clone());
        self.nodes.insert(term.clone(), idx);
        idx
    }

    /// Add or strengthen the link `from -> to`. The out-degree bound drops
    /// the weakest outgoing edge when exceeded.
    pub fn link(&mut self, from: &Term, to: &Term, weight: f32) {
        if from == to {
            return;
        }
        let a = self.node(from);
        let b = self.node(to);
        if let Some(edge) = self.graph.find_edge(a, b) {
            let w = self.graph.edge_weight_mut(edge).expect("edge exists");
            *w = w.max(weight);
            return;
        }
        self.graph.add_edge(a, b, weight);

        let outgoing: Vec<_> = self
            .graph
            .edges_directed(a, Direction::Outgoing)
            .map(|e| (e.id(), *e.weight()))
            .collect();
        if outgoing.len() > self.max_links {
            if let Some((weakest, _)) = outgoing
                .into_iter()
                .min_by(|(_, x), (_, y)| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
            {
                self.graph.remove_edge(weakest);
            }
        }
    }

    /// Outgoing neighbors of `term`, strongest first.
    pub fn neighbors(&self, term: &Term) -> Vec<(Term, f32)> {
        let Some(&idx) = self.nodes.get(term) else {
            return Vec::new();
        };
        let mut out: Vec<(Term, f32)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (self.graph[e.target()].clone(), *e.weight()))
            .collect();
        out.sort_by(|(ta, wa), (tb, wb)| {
            wb.partial_cmp(wa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ta.to_string().cmp(&tb.to_string()))
        });
        out
    }

    /// Link a task's term to its components (one level deep, both ways),
    /// weighted by the task's priority.
    pub fn ingest(&mut self, task: &Task) {
        let term = task.term();
        if !term.is_compound() {
            return;
        }
        let weight = task.budget().priority();
        for component in term.components().to_vec() {
            self.link(term, &component, weight);
            self.link(&component, term, weight);
        }
    }

    /// Remove a term and all its links. Called synchronously when the
    /// owning concept is forgotten.
    pub fn remove_term(&mut self, term: &Term) {
        let Some(idx) = self.nodes.remove(term) else {
            return;
        };
        self.graph.remove_node(idx);
        // remove_node swaps the last node into the freed slot; fix the map.
        if let Some(moved) = self.graph.node_weight(idx) {
            self.nodes.insert(moved.clone(), idx);
        }
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.nodes.clear();
    }
}
