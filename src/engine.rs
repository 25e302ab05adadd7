//! Inference engine: resolver, evaluator, and explanation journal
//!
//! The engine answers `query(fact)` by recursively trying every rule that can
//! conclude the fact. Premises are evaluated with Kleene three-valued logic;
//! fact references inside a premise re-enter the resolver, which is where
//! recursion and cycles come from. Results are memoized on the graph
//! vertices until an external assertion starts a new epoch.
//!
//! Resolution has no error path: a cycle resolves to UNKNOWN, a
//! contradiction resolves to UNKNOWN with an explicit journal line, and a
//! fact nothing can prove falls back to the closed-world default FALSE.

use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use serde::Serialize;

use crate::expr::{BinaryOp, Expr};
use crate::graph::FactGraph;
use crate::rule::{Rule, RuleId};
use crate::truth::Truth;

/// Ordered reasoning lines per fact, appended as the resolver decides.
///
/// Identical lines are never appended twice for the same fact within one
/// epoch, so re-querying a memoized fact does not duplicate its trail.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: IndexMap<String, Vec<String>>,
}

impl Journal {
    fn record(&mut self, fact: &str, line: String) {
        let lines = self.entries.entry(fact.to_string()).or_default();
        if !lines.iter().any(|existing| *existing == line) {
            lines.push(line);
        }
    }

    /// Reasoning lines for `fact`, in append order. Empty if the fact was
    /// never queried or resolved; that is not an error.
    pub fn lines(&self, fact: &str) -> &[String] {
        self.entries.get(fact).map(Vec::as_slice).unwrap_or(&[])
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Counters for engine activity, reset only when the engine is dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineStats {
    /// Top-level queries answered.
    pub queries: usize,
    /// Rule premises considered across all resolutions.
    pub rules_evaluated: usize,
    /// Distinct facts found on their own resolution path.
    pub cycles_detected: usize,
    /// Facts proved both true and false in one epoch.
    pub contradictions: usize,
    /// External assertions that started a new epoch.
    pub invalidations: usize,
}

/// The inference engine over one rule base and one initial-fact set.
pub struct Engine {
    rules: Vec<Rule>,
    graph: FactGraph,
    initial_facts: BTreeSet<String>,
    /// Rules whose premise evaluated TRUE in the current epoch. A fired
    /// rule's conclusion is already established, so its premise is never
    /// re-evaluated; this is what keeps `A => B | C` from being re-derived
    /// when C is resolved after B.
    fired: HashSet<RuleId>,
    /// Facts that were found on their own resolution path this epoch.
    cycles: HashSet<String>,
    /// Facts whose memoized value has already been surfaced in the journal.
    surfaced: HashSet<String>,
    journal: Journal,
    stats: EngineStats,
}

impl Engine {
    /// Builds an engine from parsed rules and the initial-fact set.
    pub fn new(rules: Vec<Rule>, initial_facts: BTreeSet<String>) -> Self {
        let graph = FactGraph::build(&rules, &initial_facts);
        Self {
            rules,
            graph,
            initial_facts,
            fired: HashSet::new(),
            cycles: HashSet::new(),
            surfaced: HashSet::new(),
            journal: Journal::default(),
            stats: EngineStats::default(),
        }
    }

    /// Determines the truth value of `name`.
    ///
    /// Each call starts a fresh recursion path; memoized results from
    /// earlier queries in the same epoch are reused.
    pub fn query(&mut self, name: &str) -> Truth {
        self.stats.queries += 1;
        debug!("query {name}");
        let mut path = IndexSet::new();
        let value = self.resolve(name, &mut path);
        debug!("query {name} -> {value}");
        value
    }

    /// Reasoning lines recorded for `name`, in append order.
    pub fn explain(&self, name: &str) -> &[String] {
        self.journal.lines(name)
    }

    /// Asserts a fact's truth value from outside, starting a new epoch.
    ///
    /// A positive assertion adds the fact to the initial set so it survives
    /// future invalidations; a negative assertion removes it. Either way all
    /// derived state, the fired-rule cache, and the journal are discarded so
    /// stale conclusions cannot leak into the new epoch. After a negative
    /// assertion the fact is pinned FALSE for the current epoch.
    pub fn assert_fact(&mut self, name: &str, value: bool) {
        debug!("assert {name} = {value}");
        if value {
            self.initial_facts.insert(name.to_string());
        } else {
            self.initial_facts.remove(name);
        }
        self.invalidate();
        if !value {
            self.graph.ensure(name);
            self.graph.set_state(name, Truth::False);
        }
    }

    /// Activity counters for this engine instance.
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// The rule base, indexed by `RuleId`.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The fact/rule dependency graph.
    pub fn graph(&self) -> &FactGraph {
        &self.graph
    }

    /// The current initial-fact set, including interactive assertions.
    pub fn initial_facts(&self) -> &BTreeSet<String> {
        &self.initial_facts
    }

    /// Discards everything derived in the current epoch and re-seeds the
    /// initial facts.
    fn invalidate(&mut self) {
        self.stats.invalidations += 1;
        self.graph.reset();
        for name in &self.initial_facts {
            self.graph.seed_initial(name);
        }
        self.fired.clear();
        self.cycles.clear();
        self.surfaced.clear();
        self.journal.clear();
    }

    /// Recursive entry point of the resolver.
    ///
    /// `path` holds the facts currently being resolved, innermost last. It
    /// is pushed after the cycle check and popped on the single exit below
    /// the rule loop; the cycle-detected return happens before the push, so
    /// the push/pop discipline holds on every exit.
    fn resolve(&mut self, name: &str, path: &mut IndexSet<String>) -> Truth {
        let (state, is_initial, rule_ids) = match self.graph.get(name) {
            None => {
                // Never mentioned by any rule or initial fact: closed-world.
                self.journal.record(name, format!("No data about {name}."));
                return Truth::False;
            }
            Some(vertex) => (
                vertex.state,
                vertex.is_initial,
                vertex.concluding_rules.clone(),
            ),
        };

        if let Some(known) = state {
            if self.surfaced.insert(name.to_string()) {
                if is_initial {
                    self.journal.record(name, format!("{name} is an initial fact."));
                } else {
                    self.journal
                        .record(name, format!("{name} is already known to be {known}."));
                }
            }
            return known;
        }

        if path.contains(name) {
            trace!("cycle: {name} is already on the resolution path");
            if self.cycles.insert(name.to_string()) {
                self.stats.cycles_detected += 1;
            }
            // The ancestor call still in progress owns the final decision;
            // do not memoize here.
            return Truth::Unknown;
        }
        path.insert(name.to_string());

        let mut proved_true = false;
        let mut proved_false = false;
        let mut ambiguous = false;

        for id in rule_ids {
            self.stats.rules_evaluated += 1;
            let premise_value = if self.fired.contains(&id) {
                Truth::True
            } else {
                let premise = Rc::clone(&self.rules[id].premise);
                self.eval(&premise, path)
            };
            match premise_value {
                Truth::True => {
                    self.fired.insert(id);
                    let conclusion = Rc::clone(&self.rules[id].conclusion);
                    let text = self.rules[id].text.clone();
                    if conclusion.guarantees(name) {
                        trace!("rule {id} proves {name} true");
                        self.graph.set_state(name, Truth::True);
                        self.journal.record(
                            name,
                            format!("Rule '{text}' fires and conclusively sets {name} true."),
                        );
                        proved_true = true;
                    } else if conclusion.negates(name) {
                        trace!("rule {id} proves {name} false");
                        self.graph.set_state(name, Truth::False);
                        self.journal.record(
                            name,
                            format!("Rule '{text}' fires and conclusively sets {name} false."),
                        );
                        proved_false = true;
                    } else {
                        // Disjunctive conclusion: the rule fired but does not
                        // pin this particular fact down.
                        self.journal.record(
                            name,
                            format!("Rule '{text}' fires but does not uniquely identify {name}."),
                        );
                        ambiguous = true;
                    }
                }
                Truth::Unknown => ambiguous = true,
                Truth::False => {}
            }
        }

        let popped = path.pop();
        debug_assert_eq!(popped.as_deref(), Some(name));

        if proved_true && proved_false {
            self.stats.contradictions += 1;
            self.journal.record(
                name,
                format!("Contradiction: some rules set {name} true, others false."),
            );
            self.graph.set_state(name, Truth::Unknown);
            return Truth::Unknown;
        }
        if proved_true {
            return Truth::True;
        }
        if proved_false {
            return Truth::False;
        }
        if ambiguous {
            self.graph.set_state(name, Truth::Unknown);
            if self.cycles.contains(name) {
                self.journal
                    .record(name, format!("Cycle detected while evaluating {name}."));
            }
            return Truth::Unknown;
        }

        self.graph.set_state(name, Truth::False);
        self.journal
            .record(name, format!("No rule proved {name}; keeping default FALSE."));
        Truth::False
    }

    /// Evaluates an expression tree under the current partial assignment.
    ///
    /// Fact references are the only re-entry into the resolver. The binary
    /// connectives evaluate both sides and combine the results per Kleene,
    /// so a FALSE conjunct still dominates an UNKNOWN sibling.
    fn eval(&mut self, expr: &Expr, path: &mut IndexSet<String>) -> Truth {
        match expr {
            Expr::Fact(name) => self.resolve(name, path),
            Expr::Not(child) => self.eval(child, path).negate(),
            Expr::Binary { op, left, right } => {
                let left = self.eval(left, path);
                let right = self.eval(right, path);
                match op {
                    BinaryOp::And => left.and(right),
                    BinaryOp::Or => left.or(right),
                    BinaryOp::Xor => left.xor(right),
                }
            }
        }
    }
}
