//! Expression trees for premises and conclusions
//!
//! An expression is an immutable tree built once by the parser and never
//! mutated afterwards. Rules hold their trees behind `Rc`, so a biconditional
//! expanded into two rules shares the same two trees in swapped roles.

use std::collections::BTreeSet;
use std::fmt;

/// A binary connective inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Conjunction, written `+`.
    And,
    /// Disjunction, written `|`.
    Or,
    /// Exclusive or, written `^`.
    Xor,
}

impl BinaryOp {
    /// Returns the operator's surface syntax.
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::And => '+',
            BinaryOp::Or => '|',
            BinaryOp::Xor => '^',
        }
    }
}

/// A node in a premise or conclusion tree.
///
/// The enum is closed: the evaluator and the conclusion analyses below match
/// exhaustively, so an invalid node kind cannot exist by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A reference to an atomic proposition by name.
    Fact(String),
    /// Negation of a sub-expression.
    Not(Box<Expr>),
    /// A binary connective applied to two sub-expressions.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Convenience constructor for a fact reference.
    pub fn fact(name: impl Into<String>) -> Self {
        Expr::Fact(name.into())
    }

    /// Convenience constructor for a negation.
    pub fn not(child: Expr) -> Self {
        Expr::Not(Box::new(child))
    }

    /// Convenience constructor for a binary node.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Collects the distinct fact names mentioned anywhere in this tree.
    pub fn facts(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_facts(&mut out);
        out
    }

    fn collect_facts(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Fact(name) => {
                out.insert(name.clone());
            }
            Expr::Not(child) => child.collect_facts(out),
            Expr::Binary { left, right, .. } => {
                left.collect_facts(out);
                right.collect_facts(out);
            }
        }
    }

    /// Whether this tree, read as a rule conclusion, guarantees that `name`
    /// is true whenever the rule fires.
    ///
    /// A bare fact reference guarantees itself, and AND propagates a
    /// guarantee through either branch. OR and XOR never guarantee a
    /// specific operand, and a negated subtree guarantees nothing.
    pub fn guarantees(&self, name: &str) -> bool {
        match self {
            Expr::Fact(fact) => fact == name,
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => left.guarantees(name) || right.guarantees(name),
            _ => false,
        }
    }

    /// Whether this tree, read as a rule conclusion, forces `name` false
    /// whenever the rule fires: the conclusion is `!name`, or an
    /// AND-conjunction containing `!name`.
    pub fn negates(&self, name: &str) -> bool {
        match self {
            Expr::Not(child) => matches!(child.as_ref(), Expr::Fact(fact) if fact == name),
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => left.negates(name) || right.negates(name),
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Fact(name) => f.write_str(name),
            Expr::Not(child) => write!(f, "!{child}"),
            Expr::Binary { op, left, right } => {
                write!(f, "({left}{}{right})", op.symbol())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_and_b() -> Expr {
        Expr::binary(BinaryOp::And, Expr::fact("A"), Expr::fact("B"))
    }

    #[test]
    fn test_display() {
        assert_eq!(a_and_b().to_string(), "(A+B)");
        assert_eq!(Expr::not(Expr::fact("A")).to_string(), "!A");
        let nested = Expr::binary(BinaryOp::Or, a_and_b(), Expr::not(Expr::fact("C")));
        assert_eq!(nested.to_string(), "((A+B)|!C)");
    }

    #[test]
    fn test_facts_are_deduplicated() {
        let e = Expr::binary(BinaryOp::Xor, a_and_b(), Expr::fact("A"));
        let names: Vec<_> = e.facts().into_iter().collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_and_conclusion_guarantees_both_conjuncts() {
        let c = a_and_b();
        assert!(c.guarantees("A"));
        assert!(c.guarantees("B"));
        assert!(!c.guarantees("C"));
    }

    #[test]
    fn test_or_and_xor_guarantee_nothing() {
        let or = Expr::binary(BinaryOp::Or, Expr::fact("A"), Expr::fact("B"));
        let xor = Expr::binary(BinaryOp::Xor, Expr::fact("A"), Expr::fact("B"));
        assert!(!or.guarantees("A"));
        assert!(!xor.guarantees("B"));
    }

    #[test]
    fn test_negated_fact_does_not_guarantee() {
        assert!(!Expr::not(Expr::fact("A")).guarantees("A"));
    }

    #[test]
    fn test_negates() {
        let neg = Expr::not(Expr::fact("C"));
        assert!(neg.negates("C"));
        assert!(!neg.negates("A"));

        // !C + D still conclusively sets C false
        let conj = Expr::binary(BinaryOp::And, Expr::not(Expr::fact("C")), Expr::fact("D"));
        assert!(conj.negates("C"));
        assert!(!conj.negates("D"));

        // but !C | D does not
        let disj = Expr::binary(BinaryOp::Or, Expr::not(Expr::fact("C")), Expr::fact("D"));
        assert!(!disj.negates("C"));
    }
}
