//! Error types for the expert system.
//!
//! Only the parsing and loading surface is fallible. Resolution never
//! returns an error: cycles, contradictions, and missing data are all
//! expressed as UNKNOWN/FALSE results plus explanation lines.

use thiserror::Error;

/// A specialized `Result` type for expert system operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while loading rules, facts, and queries.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The tokenizer hit input it does not recognize.
    #[error("bad token at position {position}: ...{snippet}")]
    BadToken { position: usize, snippet: String },

    /// Parentheses in an expression do not balance.
    #[error("mismatched parentheses in '{0}'")]
    MismatchedParentheses(String),

    /// An expression side was empty or did not reduce to a single tree.
    #[error("malformed expression '{0}'")]
    MalformedExpression(String),

    /// A rule line is missing `=>` / `<=>` or misuses one inside a side.
    #[error("malformed rule: {0}")]
    MalformedRule(String),

    /// A fact list (`=...` or `?...`) contained something other than
    /// single uppercase letters.
    #[error("invalid fact name '{0}': facts are single uppercase letters")]
    InvalidFactName(String),

    /// The input file could not be read.
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}
