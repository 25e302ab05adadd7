//! Expert System CLI
//!
//! Loads an input file of rules, initial facts (`=...`), and queries
//! (`?...`), answers each query with its explanation trail, and optionally
//! drops into an interactive session.
//!
//! ## Usage
//!
//! ```bash
//! # Answer the file's queries
//! expert-system rules.txt
//!
//! # Same, then keep the session open for +X / -X / ?X
//! expert-system rules.txt --interactive
//!
//! # Machine-readable output
//! expert-system rules.txt --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use expert_system::{parser, Engine, Session, Truth};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Propositional expert system with three-valued inference"
)]
struct Cli {
    /// Input file with rules, initial facts (=...), and queries (?...)
    file: PathBuf,

    /// Drop into an interactive session after answering the file's queries
    #[arg(short, long)]
    interactive: bool,

    /// Emit query results as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// One answered query, for `--json` output.
#[derive(Serialize)]
struct QueryReport {
    fact: String,
    value: Truth,
    explanation: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> expert_system::Result<()> {
    let file = parser::load_file(&cli.file)?;

    let initial: Vec<&str> = file.initial_facts.iter().map(String::as_str).collect();
    if !cli.json {
        if initial.is_empty() {
            println!("Initial facts: (none)");
        } else {
            println!("Initial facts: {}", initial.join(" "));
        }
    }

    let mut engine = Engine::new(file.rules, file.initial_facts);

    let mut reports = Vec::new();
    for fact in &file.queries {
        let value = engine.query(fact);
        if cli.json {
            reports.push(QueryReport {
                fact: fact.clone(),
                value,
                explanation: engine.explain(fact).to_vec(),
            });
        } else {
            println!("?{fact}: {value}");
            for line in engine.explain(fact) {
                println!("   {line}");
            }
            println!();
        }
    }

    if cli.json {
        // Report structs hold only strings and enums; serialization cannot
        // fail in practice.
        match serde_json::to_string_pretty(&reports) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("error: cannot serialize report: {e}"),
        }
    }

    if cli.interactive {
        if let Err(e) = Session::new(&mut engine).run() {
            eprintln!("error: interactive session failed: {e}");
        }
    }

    Ok(())
}
