//! Three-valued (Kleene) truth values
//!
//! Every fact in the system is TRUE, FALSE, or UNKNOWN. The connectives
//! follow strong Kleene semantics: FALSE dominates UNKNOWN under AND,
//! TRUE dominates UNKNOWN under OR, and XOR/NOT propagate UNKNOWN strictly
//! because their result depends on the exact value of every operand.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The truth value of a fact or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Truth {
    /// The fact is established as true.
    True,
    /// The fact is established as false.
    False,
    /// The fact cannot be determined from the rules and initial facts.
    Unknown,
}

impl Truth {
    /// Kleene conjunction: FALSE dominates UNKNOWN.
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// Kleene disjunction: TRUE dominates UNKNOWN.
    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Exclusive or. Unlike AND/OR there is no dominant operand, so any
    /// UNKNOWN side makes the whole result UNKNOWN.
    pub fn xor(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::Unknown, _) | (_, Truth::Unknown) => Truth::Unknown,
            (a, b) => {
                if (a == Truth::True) != (b == Truth::True) {
                    Truth::True
                } else {
                    Truth::False
                }
            }
        }
    }

    /// Logical negation; UNKNOWN propagates.
    pub fn negate(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    /// Returns `true` only for `Truth::True`.
    pub fn is_true(self) -> bool {
        self == Truth::True
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Truth::True => "TRUE",
            Truth::False => "FALSE",
            Truth::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Truth::{False, True, Unknown};

    const ALL: [Truth; 3] = [True, False, Unknown];

    #[test]
    fn test_and_table() {
        // FALSE dominates regardless of the other side
        for v in ALL {
            assert_eq!(False.and(v), False);
            assert_eq!(v.and(False), False);
        }
        assert_eq!(True.and(True), True);
        assert_eq!(True.and(Unknown), Unknown);
        assert_eq!(Unknown.and(True), Unknown);
        assert_eq!(Unknown.and(Unknown), Unknown);
    }

    #[test]
    fn test_or_table() {
        for v in ALL {
            assert_eq!(True.or(v), True);
            assert_eq!(v.or(True), True);
        }
        assert_eq!(False.or(False), False);
        assert_eq!(False.or(Unknown), Unknown);
        assert_eq!(Unknown.or(False), Unknown);
        assert_eq!(Unknown.or(Unknown), Unknown);
    }

    #[test]
    fn test_xor_table() {
        for v in ALL {
            assert_eq!(Unknown.xor(v), Unknown);
            assert_eq!(v.xor(Unknown), Unknown);
        }
        assert_eq!(True.xor(True), False);
        assert_eq!(True.xor(False), True);
        assert_eq!(False.xor(True), True);
        assert_eq!(False.xor(False), False);
    }

    #[test]
    fn test_negate() {
        assert_eq!(True.negate(), False);
        assert_eq!(False.negate(), True);
        assert_eq!(Unknown.negate(), Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(True.to_string(), "TRUE");
        assert_eq!(False.to_string(), "FALSE");
        assert_eq!(Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&True).unwrap(), "\"TRUE\"");
        assert_eq!(serde_json::to_string(&Unknown).unwrap(), "\"UNKNOWN\"");
    }
}
