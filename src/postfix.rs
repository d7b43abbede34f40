use std::fmt;

use crate::error::{CompileError, Result};
use crate::symbol::{Symbol, EPSILON, ESCAPE};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token {
    Literal(Symbol),
    Star,        // '*'
    Plus,        // '+'
    Optional,    // '?'
    Concat,      // '.'
    Alternation, // '|'
    OpenGroup,   // '('
    CloseGroup,  // ')'
}

impl Token {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '*' => Self::Star,
            '+' => Self::Plus,
            '?' => Self::Optional,
            '.' => Self::Concat,
            '|' => Self::Alternation,
            '(' => Self::OpenGroup,
            ')' => Self::CloseGroup,
            _ => return None,
        })
    }

    /// Binding strength for the shunting-yard pass. `+` and `?` have none:
    /// they must be desugared away before conversion.
    fn precedence(&self) -> Option<u8> {
        match self {
            Self::Star => Some(3),
            Self::Concat => Some(2),
            Self::Alternation => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(symbol) => write!(f, "{}", symbol),
            Token::Star => write!(f, "*"),
            Token::Plus => write!(f, "+"),
            Token::Optional => write!(f, "?"),
            Token::Concat => write!(f, "."),
            Token::Alternation => write!(f, "|"),
            Token::OpenGroup => write!(f, "("),
            Token::CloseGroup => write!(f, ")"),
        }
    }
}

/// Splits an expression into tokens, skipping whitespace.
///
/// Also accepts hand-written postfix, which may still contain `+` and `?`.
pub fn tokenize(expr: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(expr.len());
    let mut chars = expr.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            ESCAPE => {
                let escaped = chars.next().ok_or(CompileError::IncompleteEscape)?;
                Token::Literal(Symbol::Escaped(escaped))
            }
            EPSILON => Token::Literal(Symbol::Epsilon),
            c if c.is_alphanumeric() => Token::Literal(Symbol::Char(c)),
            c => Token::from_char(c).ok_or(CompileError::UnrecognizedCharacter(c))?,
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Converts a desugared infix expression to postfix order.
pub fn to_postfix(expr: &str) -> Result<Vec<Token>> {
    let tokens = tokenize(expr)?;
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Literal(_) => output.push(token),
            Token::OpenGroup => operators.push(token),
            Token::CloseGroup => loop {
                match operators.pop() {
                    Some(Token::OpenGroup) => break,
                    Some(op) => output.push(op),
                    None => return Err(CompileError::UnbalancedParentheses),
                }
            },
            Token::Plus => return Err(CompileError::UnrecognizedCharacter('+')),
            Token::Optional => return Err(CompileError::UnrecognizedCharacter('?')),
            Token::Star | Token::Concat | Token::Alternation => {
                let precedence = token.precedence();
                while operators
                    .last()
                    .and_then(Token::precedence)
                    .map_or(false, |top| precedence <= Some(top))
                {
                    output.extend(operators.pop());
                }
                operators.push(token);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op == Token::OpenGroup {
            return Err(CompileError::UnbalancedParentheses);
        }
        output.push(op);
    }
    Ok(output)
}

/// Renders a token stream the way it is reported: space separated.
pub fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
