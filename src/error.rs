use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Incomplete escape: '\\' at end of expression")]
    IncompleteEscape,
    #[error("Invalid character class: empty or unterminated '['")]
    InvalidCharacterClass,
    #[error("Missing operand for '{0}'")]
    MissingOperand(char),
    #[error("Unbalanced expression: {0} nodes left on the stack")]
    UnbalancedExpression(usize),
    #[error("Unrecognized character '{0}'")]
    UnrecognizedCharacter(char),
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("Unsupported operator '{0}'")]
    UnsupportedOperator(String),
}

pub type Result<T> = core::result::Result<T, CompileError>;
