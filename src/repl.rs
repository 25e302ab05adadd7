//! Interactive session
//!
//! The REPL lets the user assert facts (`+X` / `-X`), re-query (`?X`), and
//! inspect the engine between assertions. Every assertion starts a new
//! epoch: derived facts are recomputed on the next query instead of being
//! served stale.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use crate::engine::Engine;

/// What the session should do after handling one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text and keep going.
    Output(String),
    /// Nothing to say (blank input).
    Silent,
    /// Leave the session.
    Quit,
}

/// An interactive session over one engine.
pub struct Session<'a> {
    engine: &'a mut Engine,
}

impl<'a> Session<'a> {
    pub fn new(engine: &'a mut Engine) -> Self {
        Self { engine }
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        writeln!(stdout, "Interactive mode. Type 'help' for commands.")?;
        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            match self.execute(&line) {
                Reply::Output(text) => writeln!(stdout, "{text}")?,
                Reply::Silent => {}
                Reply::Quit => break,
            }
        }
        Ok(())
    }

    /// Handles one input line and returns the reply to print.
    pub fn execute(&mut self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::Silent;
        }
        if let Some(rest) = line.strip_prefix('+') {
            return self.assert_all(rest, true);
        }
        if let Some(rest) = line.strip_prefix('-') {
            return self.assert_all(rest, false);
        }
        if let Some(rest) = line.strip_prefix('?') {
            return self.query_all(rest);
        }
        match line {
            "facts" => Reply::Output(self.list_facts()),
            "rules" => Reply::Output(self.list_rules()),
            "stats" => {
                let stats = self.engine.stats();
                Reply::Output(
                    serde_json::to_string_pretty(stats)
                        .unwrap_or_else(|_| format!("{stats:?}")),
                )
            }
            "help" => Reply::Output(HELP.to_string()),
            "quit" | "exit" => Reply::Quit,
            other => Reply::Output(format!(
                "Unrecognized command '{other}'. Type 'help' for commands."
            )),
        }
    }

    fn assert_all(&mut self, names: &str, value: bool) -> Reply {
        let mut out = String::new();
        for name in names.trim().chars() {
            if !name.is_ascii_uppercase() {
                return Reply::Output(format!(
                    "Invalid fact name '{name}': facts are single uppercase letters."
                ));
            }
            self.engine.assert_fact(&name.to_string(), value);
            let shown = if value { "TRUE" } else { "FALSE" };
            let _ = writeln!(out, "{name} set to {shown}; derived facts reset.");
        }
        Reply::Output(out.trim_end().to_string())
    }

    fn query_all(&mut self, names: &str) -> Reply {
        let mut out = String::new();
        for name in names.trim().chars() {
            if !name.is_ascii_uppercase() {
                return Reply::Output(format!(
                    "Invalid fact name '{name}': facts are single uppercase letters."
                ));
            }
            let name = name.to_string();
            let value = self.engine.query(&name);
            let _ = writeln!(out, "?{name}: {value}");
            let lines = self.engine.explain(&name);
            if lines.is_empty() {
                let _ = writeln!(out, "   No explanation recorded.");
            }
            for line in lines {
                let _ = writeln!(out, "   {line}");
            }
        }
        Reply::Output(out.trim_end().to_string())
    }

    fn list_facts(&self) -> String {
        if self.engine.graph().is_empty() {
            return "No facts known.".to_string();
        }
        let mut out = String::new();
        for vertex in self.engine.graph().vertices() {
            let state = match vertex.state {
                Some(value) => value.to_string(),
                None => "unresolved".to_string(),
            };
            let marker = if vertex.is_initial { " (initial)" } else { "" };
            let _ = writeln!(out, "{}: {state}{marker}", vertex.name);
        }
        out.trim_end().to_string()
    }

    fn list_rules(&self) -> String {
        if self.engine.rules().is_empty() {
            return "No rules loaded.".to_string();
        }
        let mut out = String::new();
        for (id, rule) in self.engine.rules().iter().enumerate() {
            let _ = writeln!(out, "#{id}: {}", rule.text);
        }
        out.trim_end().to_string()
    }
}

const HELP: &str = "\
Commands:
  ?X     query fact X (several letters query each in turn)
  +X     assert X true (joins the initial facts, resets derived state)
  -X     assert X false (leaves the initial facts, resets derived state)
  facts  list every known fact and its current state
  rules  list the loaded rules
  stats  engine counters as JSON
  help   this text
  quit   leave the session";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::truth::Truth;

    fn engine(input: &str) -> Engine {
        let file = parser::load_str(input).unwrap();
        Engine::new(file.rules, file.initial_facts)
    }

    #[test]
    fn test_query_command() {
        let mut es = engine("A => B\n=A\n");
        let mut session = Session::new(&mut es);
        match session.execute("?B") {
            Reply::Output(text) => {
                assert!(text.contains("?B: TRUE"));
                assert!(text.contains("conclusively sets B true"));
            }
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[test]
    fn test_assert_then_requery() {
        let mut es = engine("A => B\n");
        assert_eq!(es.query("B"), Truth::False);

        let mut session = Session::new(&mut es);
        session.execute("+A");
        match session.execute("?B") {
            Reply::Output(text) => assert!(text.contains("?B: TRUE")),
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_assertion() {
        let mut es = engine("A => B\n=A\n");
        let mut session = Session::new(&mut es);
        session.execute("-A");
        match session.execute("?AB") {
            Reply::Output(text) => {
                assert!(text.contains("?A: FALSE"));
                assert!(text.contains("?B: FALSE"));
            }
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[test]
    fn test_quit_and_blank() {
        let mut es = engine("");
        let mut session = Session::new(&mut es);
        assert_eq!(session.execute("  "), Reply::Silent);
        assert_eq!(session.execute("quit"), Reply::Quit);
    }

    #[test]
    fn test_unrecognized_command() {
        let mut es = engine("");
        let mut session = Session::new(&mut es);
        match session.execute("frobnicate") {
            Reply::Output(text) => assert!(text.contains("Unrecognized")),
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_fact_letter() {
        let mut es = engine("");
        let mut session = Session::new(&mut es);
        match session.execute("+a") {
            Reply::Output(text) => assert!(text.contains("Invalid fact name")),
            other => panic!("expected output, got {other:?}"),
        }
    }
}
