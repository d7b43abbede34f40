//! Compiles a small regular-expression language into a Thompson NFA and
//! decides whether whole strings are accepted by it.
//!
//! The supported syntax is single-character alphanumeric symbols, escapes
//! (`\n`, `\t`, `\r`, `\\`, or `\` before any other character), the empty
//! string `ε`, character classes `[abc]`, grouping, the postfix operators
//! `*`, `+` and `?`, explicit concatenation `.` and alternation `|`.
//!
//! ```
//! let nfa = thompson::compile("a.b*|c").unwrap();
//! assert!(thompson::accepts(&nfa, "abbb"));
//! assert!(!thompson::accepts(&nfa, "ab c"));
//! ```

pub mod ast;
pub mod batch;
pub mod dot;
pub mod error;
pub mod nfa;
pub mod postfix;
pub mod regex;
pub mod rewrite;
pub mod symbol;

pub use crate::ast::AST;
pub use crate::error::CompileError;
pub use crate::nfa::NFA;
pub use crate::regex::Regex;
pub use crate::symbol::decode_literal;

/// Runs the whole pipeline on `expression`.
pub fn compile(expression: &str) -> error::Result<NFA> {
    Regex::new(expression).map(Regex::into_nfa)
}

pub fn accepts(nfa: &NFA, input: &str) -> bool {
    nfa.accepts(input)
}
