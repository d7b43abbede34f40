use crate::error::{CompileError, Result};
use crate::postfix::Token;
use crate::symbol::Symbol;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AST {
    Literal(Symbol),
    Concat(Box<AST>, Box<AST>),      // '.'
    Alternation(Box<AST>, Box<AST>), // '|'
    Star(Box<AST>),                  // '*'
    Plus(Box<AST>),                  // '+'
    Optional(Box<AST>),              // '?'
}

impl AST {
    /// The operator or symbol a node is drawn with.
    pub fn label(&self) -> String {
        match self {
            AST::Literal(symbol) => symbol.to_string(),
            AST::Concat(..) => ".".to_string(),
            AST::Alternation(..) => "|".to_string(),
            AST::Star(_) => "*".to_string(),
            AST::Plus(_) => "+".to_string(),
            AST::Optional(_) => "?".to_string(),
        }
    }

    /// Children left to right.
    pub fn children(&self) -> Vec<&AST> {
        match self {
            AST::Literal(_) => vec![],
            AST::Concat(left, right) | AST::Alternation(left, right) => vec![&**left, &**right],
            AST::Star(child) | AST::Plus(child) | AST::Optional(child) => vec![&**child],
        }
    }
}

/// Builds an `AST` from a postfix token stream.
pub struct Parser {
    stack: Vec<AST>,
}

impl Parser {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn parse(&mut self, postfix: &[Token]) -> Result<AST> {
        ParserVM::new(self, postfix).parse()
    }

    fn reset(&mut self) {
        self.stack.clear();
    }
}

struct ParserVM<'a> {
    parser: &'a mut Parser,
    postfix: &'a [Token],
}

impl<'a> ParserVM<'a> {
    fn new(parser: &'a mut Parser, postfix: &'a [Token]) -> Self {
        Self { parser, postfix }
    }

    fn pop_operand(&mut self, operator: char) -> Result<Box<AST>> {
        self.parser
            .stack
            .pop()
            .map(Box::new)
            .ok_or(CompileError::MissingOperand(operator))
    }

    fn parse_unary(&mut self, operator: char, node: fn(Box<AST>) -> AST) -> Result<()> {
        let child = self.pop_operand(operator)?;
        self.parser.stack.push(node(child));
        Ok(())
    }

    // The operand pushed last is the right child.
    fn parse_binary(&mut self, operator: char, node: fn(Box<AST>, Box<AST>) -> AST) -> Result<()> {
        let right = self.pop_operand(operator)?;
        let left = self.pop_operand(operator)?;
        self.parser.stack.push(node(left, right));
        Ok(())
    }

    fn finish_parse(&mut self) -> Result<AST> {
        match self.parser.stack.len() {
            1 => self
                .parser
                .stack
                .pop()
                .ok_or(CompileError::UnbalancedExpression(0)),
            n => Err(CompileError::UnbalancedExpression(n)),
        }
    }

    fn parse(&mut self) -> Result<AST> {
        self.parser.reset();
        for token in self.postfix {
            match *token {
                Token::Literal(symbol) => self.parser.stack.push(AST::Literal(symbol)),
                Token::Star => self.parse_unary('*', AST::Star)?,
                Token::Plus => self.parse_unary('+', AST::Plus)?,
                Token::Optional => self.parse_unary('?', AST::Optional)?,
                Token::Concat => self.parse_binary('.', AST::Concat)?,
                Token::Alternation => self.parse_binary('|', AST::Alternation)?,
                Token::OpenGroup | Token::CloseGroup => {
                    return Err(CompileError::UnsupportedOperator(token.to_string()))
                }
            }
        }
        self.finish_parse()
    }
}
