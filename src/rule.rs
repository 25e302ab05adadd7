//! Inference rules
//!
//! A rule is one premise tree implying one conclusion tree, plus the original
//! source text kept for explanation output. Rules are identified by their
//! position in the engine's rule vector; that index is stable for the
//! lifetime of the engine.

use std::rc::Rc;

use crate::expr::Expr;

/// Stable identity of a rule: its index in the engine's rule vector.
pub type RuleId = usize;

/// One inference rule: `premise => conclusion`.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The condition that must evaluate TRUE for the rule to fire.
    pub premise: Rc<Expr>,
    /// What the rule establishes when it fires.
    pub conclusion: Rc<Expr>,
    /// Original source line, used verbatim in explanation messages.
    pub text: String,
}

impl Rule {
    /// Creates a rule from freshly parsed trees.
    pub fn new(premise: Expr, conclusion: Expr, text: impl Into<String>) -> Self {
        Self {
            premise: Rc::new(premise),
            conclusion: Rc::new(conclusion),
            text: text.into(),
        }
    }

    /// Expands a biconditional `lhs <=> rhs` into the two implication rules
    /// it stands for. Both rules share the same two trees in swapped roles.
    pub fn biconditional(lhs: Expr, rhs: Expr, text: impl Into<String>) -> (Rule, Rule) {
        let text = text.into();
        let lhs = Rc::new(lhs);
        let rhs = Rc::new(rhs);
        let forward = Rule {
            premise: Rc::clone(&lhs),
            conclusion: Rc::clone(&rhs),
            text: text.clone(),
        };
        let backward = Rule {
            premise: rhs,
            conclusion: lhs,
            text,
        };
        (forward, backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BinaryOp;

    #[test]
    fn test_rule_holds_source_text() {
        let rule = Rule::new(Expr::fact("A"), Expr::fact("B"), "A => B");
        assert_eq!(rule.text, "A => B");
        assert_eq!(rule.premise.to_string(), "A");
        assert_eq!(rule.conclusion.to_string(), "B");
    }

    #[test]
    fn test_biconditional_shares_trees() {
        let lhs = Expr::binary(BinaryOp::And, Expr::fact("A"), Expr::fact("B"));
        let rhs = Expr::fact("C");
        let (forward, backward) = Rule::biconditional(lhs, rhs, "A + B <=> C");

        assert!(Rc::ptr_eq(&forward.premise, &backward.conclusion));
        assert!(Rc::ptr_eq(&forward.conclusion, &backward.premise));
        assert_eq!(forward.text, backward.text);
    }
}
