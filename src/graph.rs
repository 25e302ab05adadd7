//! Fact/rule dependency graph
//!
//! The graph is built once from the full rule set and the initial facts.
//! Facts live in an insertion-ordered arena keyed by name; vertices refer to
//! rules by their stable index rather than holding references, so the
//! mutually-referencing fact/rule structure contains no ownership cycles.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::rule::{Rule, RuleId};
use crate::truth::Truth;

/// Vertex for one atomic proposition.
#[derive(Debug, Clone)]
pub struct FactVertex {
    /// The fact's name, unique across the graph.
    pub name: String,
    /// Memoized truth value for the current epoch; `None` is unresolved.
    pub state: Option<Truth>,
    /// Whether the fact is part of the current initial-fact set.
    pub is_initial: bool,
    /// Rules whose conclusion mentions this fact.
    pub concluding_rules: Vec<RuleId>,
    /// Rules whose premise mentions this fact. Informational; the resolver
    /// only walks `concluding_rules`.
    pub referencing_rules: Vec<RuleId>,
}

impl FactVertex {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: None,
            is_initial: false,
            concluding_rules: Vec::new(),
            referencing_rules: Vec::new(),
        }
    }
}

/// The dependency graph: one canonical vertex per distinct fact name.
#[derive(Debug, Clone, Default)]
pub struct FactGraph {
    vertices: IndexMap<String, FactVertex>,
}

impl FactGraph {
    /// Builds the graph in a single pass over the rules.
    ///
    /// Every fact name appearing in any premise, any conclusion, or the
    /// initial set gets exactly one vertex; the first reference creates it
    /// and later references reuse it. Initial facts start TRUE even when no
    /// rule ever mentions them.
    pub fn build(rules: &[Rule], initial_facts: &BTreeSet<String>) -> Self {
        let mut graph = FactGraph::default();
        for (id, rule) in rules.iter().enumerate() {
            for name in rule.conclusion.facts() {
                graph.ensure(&name).concluding_rules.push(id);
            }
            for name in rule.premise.facts() {
                graph.ensure(&name).referencing_rules.push(id);
            }
        }
        for name in initial_facts {
            graph.seed_initial(name);
        }
        graph
    }

    /// Returns the vertex for `name`, creating it if absent.
    pub fn ensure(&mut self, name: &str) -> &mut FactVertex {
        self.vertices
            .entry(name.to_string())
            .or_insert_with(|| FactVertex::new(name))
    }

    /// Looks up a vertex by name.
    pub fn get(&self, name: &str) -> Option<&FactVertex> {
        self.vertices.get(name)
    }

    /// Memoizes a truth value for an existing vertex.
    pub fn set_state(&mut self, name: &str, value: Truth) {
        if let Some(vertex) = self.vertices.get_mut(name) {
            vertex.state = Some(value);
        }
    }

    /// Marks `name` as an initial fact with state TRUE, creating the vertex
    /// on demand.
    pub fn seed_initial(&mut self, name: &str) {
        let vertex = self.ensure(name);
        vertex.state = Some(Truth::True);
        vertex.is_initial = true;
    }

    /// Clears all memoized state and initial markers. Used when an external
    /// assertion starts a new epoch; callers re-seed the initial facts
    /// afterwards.
    pub fn reset(&mut self) {
        for vertex in self.vertices.values_mut() {
            vertex.state = None;
            vertex.is_initial = false;
        }
    }

    /// Iterates vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &FactVertex> {
        self.vertices.values()
    }

    /// Number of distinct facts known to the graph.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the graph has no vertices at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
