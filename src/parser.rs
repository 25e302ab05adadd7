//! Tokenizer, expression parser, and input-file loader
//!
//! Expressions use single uppercase letters as facts and the operators
//! `!` (NOT), `+` (AND), `^` (XOR), `|` (OR), with parentheses for grouping.
//! Infix text is converted to an [`Expr`] tree with the shunting-yard
//! algorithm. Input files mix rule lines (`A + B => C`, `A <=> B`), initial
//! facts (`=AB`), queries (`?C`), and `#` comments.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};
use crate::expr::{BinaryOp, Expr};
use crate::rule::Rule;

/// One lexical token of the rule language.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Fact(String),
    Not,
    And,
    Or,
    Xor,
    Implies,
    Iff,
    LParen,
    RParen,
}

/// Operators parked on the shunting-yard stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackOp {
    Not,
    Bin(BinaryOp),
    LParen,
}

fn precedence(op: StackOp) -> u8 {
    match op {
        StackOp::Not => 4,
        StackOp::Bin(BinaryOp::And) => 3,
        StackOp::Bin(BinaryOp::Xor) => 2,
        StackOp::Bin(BinaryOp::Or) => 1,
        StackOp::LParen => 0,
    }
}

/// Parser for rule lines and standalone expressions.
pub struct RuleParser {
    token_re: Regex,
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleParser {
    /// Creates a parser. The token pattern is a compile-time constant, so
    /// building it cannot fail at runtime.
    pub fn new() -> Self {
        Self {
            token_re: Regex::new(r"^\s*([A-Z]|!|\+|\||\^|\(|\)|<=>|=>)\s*")
                .expect("token pattern is valid"),
        }
    }

    /// Parses one rule line into its expanded rules: one for `=>`, two
    /// sharing trees for `<=>`.
    pub fn parse_rule_line(&self, line: &str) -> Result<Vec<Rule>> {
        let text = line.trim();
        if let Some((lhs, rhs)) = text.split_once("<=>") {
            let premise = self.parse_expression(lhs)?;
            let conclusion = self.parse_expression(rhs)?;
            let (forward, backward) = Rule::biconditional(premise, conclusion, text);
            Ok(vec![forward, backward])
        } else if let Some((lhs, rhs)) = text.split_once("=>") {
            let premise = self.parse_expression(lhs)?;
            let conclusion = self.parse_expression(rhs)?;
            Ok(vec![Rule::new(premise, conclusion, text)])
        } else {
            Err(Error::MalformedRule(text.to_string()))
        }
    }

    /// Parses an infix expression into a tree.
    ///
    /// Precedence, tightest first: `!`, `+`, `^`, `|`. The binary operators
    /// are left-associative, `!` is right-associative.
    pub fn parse_expression(&self, text: &str) -> Result<Expr> {
        let mut output: Vec<Expr> = Vec::new();
        let mut ops: Vec<StackOp> = Vec::new();

        for token in self.tokenize(text)? {
            match token {
                Token::Fact(name) => output.push(Expr::Fact(name)),
                Token::Not => ops.push(StackOp::Not),
                Token::And => Self::push_binary(BinaryOp::And, &mut ops, &mut output, text)?,
                Token::Xor => Self::push_binary(BinaryOp::Xor, &mut ops, &mut output, text)?,
                Token::Or => Self::push_binary(BinaryOp::Or, &mut ops, &mut output, text)?,
                Token::LParen => ops.push(StackOp::LParen),
                Token::RParen => loop {
                    match ops.pop() {
                        Some(StackOp::LParen) => break,
                        Some(op) => Self::reduce(op, &mut output, text)?,
                        None => {
                            return Err(Error::MismatchedParentheses(text.trim().to_string()))
                        }
                    }
                },
                // An implication arrow inside an expression side means the
                // line was not split where the caller thought it was.
                Token::Implies | Token::Iff => {
                    return Err(Error::MalformedRule(text.trim().to_string()))
                }
            }
        }

        while let Some(op) = ops.pop() {
            if op == StackOp::LParen {
                return Err(Error::MismatchedParentheses(text.trim().to_string()));
            }
            Self::reduce(op, &mut output, text)?;
        }

        if output.len() == 1 {
            Ok(output.pop().expect("length checked above"))
        } else {
            Err(Error::MalformedExpression(text.trim().to_string()))
        }
    }

    fn push_binary(
        op: BinaryOp,
        ops: &mut Vec<StackOp>,
        output: &mut Vec<Expr>,
        text: &str,
    ) -> Result<()> {
        let incoming = precedence(StackOp::Bin(op));
        while let Some(&top) = ops.last() {
            if top == StackOp::LParen {
                break;
            }
            // NOT is right-associative and pops only on strictly greater
            // precedence; the binary operators pop on ties too.
            let pops = match top {
                StackOp::Not => precedence(top) > incoming,
                _ => precedence(top) >= incoming,
            };
            if !pops {
                break;
            }
            let top = ops.pop().expect("peeked above");
            Self::reduce(top, output, text)?;
        }
        ops.push(StackOp::Bin(op));
        Ok(())
    }

    fn reduce(op: StackOp, output: &mut Vec<Expr>, text: &str) -> Result<()> {
        let malformed = || Error::MalformedExpression(text.trim().to_string());
        match op {
            StackOp::Not => {
                let child = output.pop().ok_or_else(malformed)?;
                output.push(Expr::not(child));
            }
            StackOp::Bin(op) => {
                let right = output.pop().ok_or_else(malformed)?;
                let left = output.pop().ok_or_else(malformed)?;
                output.push(Expr::binary(op, left, right));
            }
            StackOp::LParen => return Err(malformed()),
        }
        Ok(())
    }

    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let rest = &text[pos..];
            if rest.trim().is_empty() {
                break;
            }
            let caps = self.token_re.captures(rest).ok_or_else(|| Error::BadToken {
                position: pos,
                snippet: rest.trim_start().chars().take(10).collect(),
            })?;
            let whole = caps.get(0).expect("group 0 is the whole match");
            let raw = caps.get(1).expect("token group is not optional").as_str();
            pos += whole.end();
            tokens.push(match raw {
                "!" => Token::Not,
                "+" => Token::And,
                "|" => Token::Or,
                "^" => Token::Xor,
                "=>" => Token::Implies,
                "<=>" => Token::Iff,
                "(" => Token::LParen,
                ")" => Token::RParen,
                fact => Token::Fact(fact.to_string()),
            });
        }
        Ok(tokens)
    }
}

/// Parsed contents of one input file.
#[derive(Debug, Default)]
pub struct KnowledgeFile {
    /// Rules in file order, biconditionals already expanded.
    pub rules: Vec<Rule>,
    /// Facts declared true by `=...` lines.
    pub initial_facts: BTreeSet<String>,
    /// Facts to answer, in file order, from `?...` lines.
    pub queries: Vec<String>,
}

/// Parses rules, initial facts, and queries from input text.
pub fn load_str(input: &str) -> Result<KnowledgeFile> {
    let parser = RuleParser::new();
    let mut file = KnowledgeFile::default();
    for raw in input.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('=') {
            file.initial_facts.extend(fact_list(rest)?);
        } else if let Some(rest) = line.strip_prefix('?') {
            file.queries.extend(fact_list(rest)?);
        } else {
            file.rules.extend(parser.parse_rule_line(line)?);
        }
    }
    Ok(file)
}

/// Reads and parses an input file.
pub fn load_file(path: &Path) -> Result<KnowledgeFile> {
    let input = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    load_str(&input)
}

fn fact_list(text: &str) -> Result<Vec<String>> {
    text.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                Ok(c.to_string())
            } else {
                Err(Error::InvalidFactName(text.trim().to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(text: &str) -> Expr {
        RuleParser::new().parse_expression(text).unwrap()
    }

    #[test]
    fn test_single_fact() {
        assert_eq!(parse("A"), Expr::fact("A"));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(parse("A + B | C").to_string(), "((A+B)|C)");
        assert_eq!(parse("A | B + C").to_string(), "(A|(B+C))");
    }

    #[test]
    fn test_xor_sits_between_and_and_or() {
        assert_eq!(parse("A ^ B | C").to_string(), "((A^B)|C)");
        assert_eq!(parse("A ^ B + C").to_string(), "(A^(B+C))");
    }

    #[test]
    fn test_not_binds_tightest() {
        assert_eq!(parse("!A + B").to_string(), "(!A+B)");
        assert_eq!(parse("!!A").to_string(), "!!A");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse("A + B + C").to_string(), "((A+B)+C)");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(parse("(A | B) + C").to_string(), "((A|B)+C)");
        assert_eq!(parse("!(A + B)").to_string(), "!(A+B)");
    }

    #[test]
    fn test_bad_token_reports_position() {
        let err = RuleParser::new().parse_expression("A + b").unwrap_err();
        match err {
            Error::BadToken { position, snippet } => {
                assert_eq!(position, 4);
                assert!(snippet.starts_with('b'));
            }
            other => panic!("expected BadToken, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_parentheses() {
        let parser = RuleParser::new();
        assert!(matches!(
            parser.parse_expression("(A + B"),
            Err(Error::MismatchedParentheses(_))
        ));
        assert!(matches!(
            parser.parse_expression("A + B)"),
            Err(Error::MismatchedParentheses(_))
        ));
    }

    #[test]
    fn test_empty_and_dangling_expressions() {
        let parser = RuleParser::new();
        assert!(matches!(
            parser.parse_expression(""),
            Err(Error::MalformedExpression(_))
        ));
        assert!(matches!(
            parser.parse_expression("A +"),
            Err(Error::MalformedExpression(_))
        ));
        assert!(matches!(
            parser.parse_expression("!"),
            Err(Error::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_implication_rule() {
        let rules = RuleParser::new().parse_rule_line("A + B => C").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].premise.to_string(), "(A+B)");
        assert_eq!(rules[0].conclusion.to_string(), "C");
        assert_eq!(rules[0].text, "A + B => C");
    }

    #[test]
    fn test_biconditional_expands_to_two_rules() {
        let rules = RuleParser::new().parse_rule_line("A <=> B").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].premise.to_string(), "A");
        assert_eq!(rules[0].conclusion.to_string(), "B");
        assert_eq!(rules[1].premise.to_string(), "B");
        assert_eq!(rules[1].conclusion.to_string(), "A");
    }

    #[test]
    fn test_rule_without_arrow_is_rejected() {
        assert!(matches!(
            RuleParser::new().parse_rule_line("A + B"),
            Err(Error::MalformedRule(_))
        ));
    }

    #[test]
    fn test_double_arrow_is_rejected() {
        assert!(matches!(
            RuleParser::new().parse_rule_line("A => B => C"),
            Err(Error::MalformedRule(_))
        ));
    }

    #[test]
    fn test_load_str() {
        let input = "\
# graduation example
A + B => C   # conjunction
D <=> E
=AB
?CD
";
        let file = load_str(input).unwrap();
        assert_eq!(file.rules.len(), 3); // biconditional expanded
        assert_eq!(
            file.initial_facts,
            ["A".to_string(), "B".to_string()].into_iter().collect()
        );
        assert_eq!(file.queries, vec!["C".to_string(), "D".to_string()]);
    }

    #[test]
    fn test_load_str_rejects_lowercase_fact_list() {
        assert!(matches!(
            load_str("=ab"),
            Err(Error::InvalidFactName(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "A => B").unwrap();
        writeln!(tmp, "=A").unwrap();
        writeln!(tmp, "?B").unwrap();

        let file = load_file(tmp.path()).unwrap();
        assert_eq!(file.rules.len(), 1);
        assert_eq!(file.queries, vec!["B".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/nonexistent/rules.txt")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
