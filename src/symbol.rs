use std::fmt;

use crate::error::{CompileError, Result};

pub const ESCAPE: char = '\\';
pub const EPSILON: char = 'ε';

/// Resolves the character following an escape marker.
///
/// This is the only escape table in the crate: the tokenizer, the matcher and
/// `decode_literal` all go through it.
pub fn resolve_escape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '\\' => '\\',
        _ => c,
    }
}

/// A leaf of the expression: what an AST literal holds and what labels an NFA edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Symbol {
    Char(char),
    // Keeps the raw character after '\'; resolved only when matching.
    Escaped(char),
    Epsilon,
}

impl Symbol {
    pub fn matches(&self, c: char) -> bool {
        match self {
            Symbol::Char(s) => *s == c,
            Symbol::Escaped(s) => resolve_escape(*s) == c,
            Symbol::Epsilon => false,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{}", c),
            Symbol::Escaped(c) => write!(f, "{}{}", ESCAPE, c),
            Symbol::Epsilon => write!(f, "{}", EPSILON),
        }
    }
}

/// Symbols a test string may be written with: alphanumerics and epsilon.
pub fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || c == EPSILON
}

/// Decodes a test string as written in an input record.
///
/// A lone `ε` stands for the empty string.
pub fn decode_literal(s: &str) -> Result<String> {
    if s == EPSILON.to_string() {
        return Ok(String::new());
    }
    let mut decoded = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            let escaped = chars.next().ok_or(CompileError::IncompleteEscape)?;
            decoded.push(resolve_escape(escaped));
        } else {
            decoded.push(c);
        }
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaped_matches_resolved() {
        assert!(Symbol::Escaped('n').matches('\n'));
        assert!(Symbol::Escaped('\\').matches('\\'));
        assert!(Symbol::Escaped('+').matches('+'));
        assert!(!Symbol::Escaped('n').matches('n'));
        assert!(Symbol::Char('n').matches('n'));
        assert!(!Symbol::Epsilon.matches('ε'));
    }

    #[test]
    fn test_display_raw_form() {
        assert_eq!(Symbol::Escaped('t').to_string(), "\\t");
        assert_eq!(Symbol::Epsilon.to_string(), "ε");
        assert_eq!(Symbol::Char('a').to_string(), "a");
    }

    #[test]
    fn test_decode_literal() -> Result<()> {
        assert_eq!(decode_literal("ε")?, "");
        assert_eq!(decode_literal("a\\tb\\n")?, "a\tb\n");
        assert_eq!(decode_literal("\\\\x")?, "\\x");
        assert_eq!(decode_literal("\\q")?, "q");
        assert_eq!(decode_literal("aεb")?, "aεb");
        Ok(())
    }

    #[test]
    fn test_decode_trailing_escape() {
        assert_eq!(decode_literal("ab\\"), Err(CompileError::IncompleteEscape));
    }
}
