use log::debug;

use crate::ast::{self, AST};
use crate::error::Result;
use crate::nfa::NFA;
use crate::postfix::{self, Token};
use crate::rewrite;

/// A compiled expression, keeping the output of every pipeline stage.
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: String,
    desugared: String,
    postfix: Vec<Token>,
    ast: AST,
    nfa: NFA,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self> {
        let expanded = rewrite::expand_classes(pattern)?;
        debug!("expanded {:?} -> {:?}", pattern, expanded);
        let concatenated = rewrite::insert_concatenation(&expanded);
        debug!("concatenated: {:?}", concatenated);
        let desugared = rewrite::desugar_operators(&concatenated)?;
        debug!("desugared: {:?}", desugared);
        let postfix = postfix::to_postfix(&desugared)?;
        debug!("postfix: {}", postfix::join(&postfix));
        let ast = ast::Parser::new().parse(&postfix)?;
        let nfa = NFA::from_ast(&ast);
        debug!(
            "compiled {:?}: {} states, {} accepting",
            pattern,
            nfa.len(),
            nfa.accepting().len()
        );
        Ok(Self {
            pattern: pattern.to_string(),
            desugared,
            postfix,
            ast,
            nfa,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The expression after class expansion, concatenation and desugaring.
    pub fn desugared(&self) -> &str {
        &self.desugared
    }

    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    pub fn postfix_string(&self) -> String {
        postfix::join(&self.postfix)
    }

    pub fn ast(&self) -> &AST {
        &self.ast
    }

    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }

    pub fn into_nfa(self) -> NFA {
        self.nfa
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.nfa.accepts(input)
    }
}
