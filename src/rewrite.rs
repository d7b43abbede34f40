//! String-level rewriting that runs before tokenization.
//!
//! The three passes run in order: `expand_classes` removes `[...]`,
//! `insert_concatenation` makes every concatenation an explicit `.`, and
//! `desugar_operators` rewrites the `+` and `?` suffixes so only `.`, `|`
//! and `*` remain for the shunting-yard pass.

use std::ops::Range;

use crate::error::{CompileError, Result};
use crate::symbol::{is_symbol_char, EPSILON, ESCAPE};

/// Expands `[abc]` into `(a|b|c)`. Escape pairs are copied through untouched.
pub fn expand_classes(expr: &str) -> Result<String> {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            ESCAPE => {
                let escaped = *chars.get(i + 1).ok_or(CompileError::IncompleteEscape)?;
                out.push(ESCAPE);
                out.push(escaped);
                i += 2;
            }
            '[' => {
                let members = &chars[i + 1..];
                let close = members
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or(CompileError::InvalidCharacterClass)?;
                if close == 0 {
                    return Err(CompileError::InvalidCharacterClass);
                }
                out.push('(');
                for (n, &member) in members[..close].iter().enumerate() {
                    if n > 0 {
                        out.push('|');
                    }
                    out.push(member);
                }
                out.push(')');
                i += close + 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Splits an expression into logical units: an escape pair or a single char.
fn units(chars: &[char]) -> Vec<&[char]> {
    let mut units = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let len = if chars[i] == ESCAPE && i + 1 < chars.len() {
            2
        } else {
            1
        };
        units.push(&chars[i..i + len]);
        i += len;
    }
    units
}

fn ends_operand(unit: &[char]) -> bool {
    match unit {
        [ESCAPE, _] => true,
        [c] => matches!(*c, '*' | '+' | '?' | ')') || is_symbol_char(*c),
        _ => false,
    }
}

fn starts_operand(unit: &[char]) -> bool {
    match unit {
        [ESCAPE, ..] => true,
        [c] => *c == '(' || is_symbol_char(*c),
        _ => false,
    }
}

/// Inserts an explicit `.` wherever two operands are implicitly concatenated.
pub fn insert_concatenation(expr: &str) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let units = units(&chars);
    let mut out = String::with_capacity(expr.len() * 2);
    for (n, unit) in units.iter().enumerate() {
        out.extend(unit.iter());
        if let Some(next) = units.get(n + 1) {
            if ends_operand(unit) && starts_operand(next) {
                out.push('.');
            }
        }
    }
    out
}

/// Whether `buf[idx]` is the second half of an escape pair.
fn is_escaped(buf: &[char], idx: usize) -> bool {
    let markers = buf[..idx].iter().rev().take_while(|&&c| c == ESCAPE).count();
    markers % 2 == 1
}

fn matching_open(buf: &[char], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for j in (0..=close).rev() {
        if is_escaped(buf, j) {
            continue;
        }
        match buf[j] {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
    }
    None
}

fn operand_start(buf: &[char], end: usize) -> Option<usize> {
    let last = end.checked_sub(1)?;
    if is_escaped(buf, last) {
        return Some(last - 1);
    }
    match buf[last] {
        ')' => matching_open(buf, last),
        '*' => operand_start(buf, last),
        c if is_symbol_char(c) => Some(last),
        _ => None,
    }
}

/// Finds the operand a `+`/`?` applies to in the output emitted so far.
///
/// Trailing `.` operators are not part of the operand and are dropped along
/// with it when the operand is rewritten.
fn locate_operand(buf: &[char]) -> Option<Range<usize>> {
    let mut end = buf.len();
    while end > 0 && buf[end - 1] == '.' && !is_escaped(buf, end - 1) {
        end -= 1;
    }
    operand_start(buf, end).map(|start| start..end)
}

/// Rewrites `X+` into `(X.X*)` and `X?` into `(X|ε)`.
pub fn desugar_operators(expr: &str) -> Result<String> {
    let chars: Vec<char> = expr.chars().collect();
    let mut out: Vec<char> = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            ESCAPE => {
                let escaped = *chars.get(i + 1).ok_or(CompileError::IncompleteEscape)?;
                out.push(ESCAPE);
                out.push(escaped);
                i += 2;
                continue;
            }
            op @ ('+' | '?') => {
                let range = locate_operand(&out).ok_or(CompileError::MissingOperand(op))?;
                let operand = out[range.clone()].to_vec();
                out.truncate(range.start);
                out.push('(');
                out.extend_from_slice(&operand);
                if op == '+' {
                    out.push('.');
                    out.extend_from_slice(&operand);
                    out.push('*');
                } else {
                    out.push('|');
                    out.push(EPSILON);
                }
                out.push(')');
            }
            c => out.push(c),
        }
        i += 1;
    }
    Ok(out.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_class() -> Result<()> {
        assert_eq!(expand_classes("[abc]")?, "(a|b|c)");
        assert_eq!(expand_classes("x[ab]*y")?, "x(a|b)*y");
        assert_eq!(expand_classes("[a]")?, "(a)");
        Ok(())
    }

    #[test]
    fn test_expand_class_keeps_escapes() -> Result<()> {
        assert_eq!(expand_classes("\\[a\\]")?, "\\[a\\]");
        assert_eq!(expand_classes("\\\\[ab]")?, "\\\\(a|b)");
        Ok(())
    }

    #[test]
    fn test_expand_class_errors() {
        assert_eq!(expand_classes("[ab"), Err(CompileError::InvalidCharacterClass));
        assert_eq!(expand_classes("a[]"), Err(CompileError::InvalidCharacterClass));
        assert_eq!(expand_classes("ab\\"), Err(CompileError::IncompleteEscape));
    }

    #[test]
    fn test_insert_concat() {
        assert_eq!(insert_concatenation(""), "");
        assert_eq!(insert_concatenation("a"), "a");
        assert_eq!(insert_concatenation("ab"), "a.b");
        assert_eq!(insert_concatenation("a*b"), "a*.b");
        assert_eq!(insert_concatenation("(a|b)c"), "(a|b).c");
        assert_eq!(insert_concatenation("a(b)"), "a.(b)");
        assert_eq!(insert_concatenation("a+b?c"), "a+.b?.c");
        assert_eq!(insert_concatenation("aεb"), "a.ε.b");
    }

    #[test]
    fn test_insert_concat_leaves_operators() {
        assert_eq!(insert_concatenation("a|b"), "a|b");
        assert_eq!(insert_concatenation("a.b"), "a.b");
        assert_eq!(insert_concatenation("(a)"), "(a)");
    }

    #[test]
    fn test_insert_concat_escape_unit() {
        assert_eq!(insert_concatenation("a\\n"), "a.\\n");
        assert_eq!(insert_concatenation("\\nb"), "\\n.b");
        assert_eq!(insert_concatenation("\\(\\)"), "\\(.\\)");
        assert_eq!(insert_concatenation("\\*a"), "\\*.a");
    }

    #[test]
    fn test_desugar_plus() -> Result<()> {
        assert_eq!(desugar_operators("a+")?, "(a.a*)");
        assert_eq!(desugar_operators("a+.b")?, "(a.a*).b");
        assert_eq!(desugar_operators("b.a+")?, "b.(a.a*)");
        Ok(())
    }

    #[test]
    fn test_desugar_optional() -> Result<()> {
        assert_eq!(desugar_operators("a?")?, "(a|ε)");
        assert_eq!(desugar_operators("x.(a|b)?")?, "x.((a|b)|ε)");
        Ok(())
    }

    #[test]
    fn test_desugar_group() -> Result<()> {
        assert_eq!(desugar_operators("(a.b)+")?, "((a.b).(a.b)*)");
        assert_eq!(desugar_operators("((a)|b)?")?, "(((a)|b)|ε)");
        assert_eq!(desugar_operators("(a.\\))+")?, "((a.\\)).(a.\\))*)");
        Ok(())
    }

    #[test]
    fn test_desugar_skips_trailing_dots() -> Result<()> {
        assert_eq!(desugar_operators("a.+")?, "(a.a*)");
        Ok(())
    }

    #[test]
    fn test_desugar_escaped_operand() -> Result<()> {
        assert_eq!(desugar_operators("\\n+")?, "(\\n.\\n*)");
        assert_eq!(desugar_operators("\\)?")?, "(\\)|ε)");
        assert_eq!(desugar_operators("\\+")?, "\\+");
        Ok(())
    }

    #[test]
    fn test_desugar_starred_operand() -> Result<()> {
        assert_eq!(desugar_operators("a*?")?, "(a*|ε)");
        Ok(())
    }

    #[test]
    fn test_desugar_missing_operand() {
        assert_eq!(desugar_operators("+a"), Err(CompileError::MissingOperand('+')));
        assert_eq!(desugar_operators("a|?"), Err(CompileError::MissingOperand('?')));
        assert_eq!(desugar_operators("a)+"), Err(CompileError::MissingOperand('+')));
        assert_eq!(desugar_operators("a\\"), Err(CompileError::IncompleteEscape));
    }
}
