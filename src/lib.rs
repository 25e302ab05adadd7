//! Expert System - Propositional Inference with Three-Valued Logic
//!
//! This crate answers queries over a set of inference rules and initially
//! known facts, using Kleene three-valued logic (TRUE / FALSE / UNKNOWN),
//! and records a human-readable explanation trail for every answer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Inference Engine                     │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │                    Resolver                        │  │
//! │  │  Rule firing │ Cycle guard │ Contradiction check  │  │
//! │  └───────────────────────────────────────────────────┘  │
//! │                          │                               │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │              Three-Valued Evaluator                │  │
//! │  │        Kleene AND / OR │ strict XOR / NOT          │  │
//! │  └───────────────────────────────────────────────────┘  │
//! │                          │                               │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │               Dependency Graph                     │  │
//! │  │   Fact vertices │ concluding / referencing rules   │  │
//! │  └───────────────────────────────────────────────────┘  │
//! │                                                          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use expert_system::{parser, Engine, Truth};
//!
//! let file = parser::load_str("A + B => C\n=AB\n?C\n").unwrap();
//! let mut engine = Engine::new(file.rules, file.initial_facts);
//!
//! assert_eq!(engine.query("C"), Truth::True);
//! for line in engine.explain("C") {
//!     println!("{line}");
//! }
//! ```

pub mod engine;
pub mod error;
pub mod expr;
pub mod graph;
pub mod parser;
pub mod repl;
pub mod rule;
pub mod truth;

// Re-exports
pub use engine::{Engine, EngineStats, Journal};
pub use error::{Error, Result};
pub use expr::{BinaryOp, Expr};
pub use graph::{FactGraph, FactVertex};
pub use parser::{KnowledgeFile, RuleParser};
pub use repl::{Reply, Session};
pub use rule::{Rule, RuleId};
pub use truth::Truth;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
