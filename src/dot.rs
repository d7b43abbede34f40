//! Graphviz DOT descriptions of an expression tree or a compiled automaton.
//!
//! Both writers only read the structures they are given. Rendering the DOT
//! text into an image is left to Graphviz.

use std::fmt::{self, Write};

use crate::ast::AST;
use crate::nfa::NFA;

fn quote(label: &str) -> String {
    let mut quoted = String::with_capacity(label.len() + 2);
    quoted.push('"');
    for c in label.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Displays an `AST` as a DOT digraph, one node per AST node.
pub struct AstDot<'a>(pub &'a AST);

impl AstDot<'_> {
    // Nodes are numbered in pre-order; returns the id given to `node`.
    fn write_node(f: &mut impl Write, node: &AST, next_id: &mut usize) -> Result<usize, fmt::Error> {
        let id = *next_id;
        *next_id += 1;
        writeln!(f, "\t{} [label={}];", id, quote(&node.label()))?;
        for child in node.children() {
            let child_id = Self::write_node(&mut *f, child, next_id)?;
            writeln!(f, "\t{} -> {};", id, child_id)?;
        }
        Ok(id)
    }
}

impl fmt::Display for AstDot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph ast {{")?;
        Self::write_node(&mut *f, self.0, &mut 0)?;
        writeln!(f, "}}")
    }
}

/// Displays an `NFA` as a left-to-right DOT digraph.
pub struct NfaDot<'a>(pub &'a NFA);

impl fmt::Display for NfaDot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nfa = self.0;
        writeln!(f, "digraph nfa {{")?;
        writeln!(f, "\trankdir=LR;")?;
        writeln!(f, "\tnode [shape=circle];")?;
        writeln!(f, "\tentry [shape=point];")?;
        writeln!(f, "\tentry -> {};", nfa.initial())?;
        for state in nfa.accepting() {
            writeln!(f, "\t{} [shape=doublecircle];", state)?;
        }
        for (id, state) in nfa.states().iter().enumerate() {
            for (symbol, targets) in &state.transitions {
                for target in targets {
                    writeln!(f, "\t{} -> {} [label={}];", id, target, quote(&symbol.to_string()))?;
                }
            }
            for target in &state.epsilon {
                writeln!(f, "\t{} -> {} [label=\"ε\"];", id, target)?;
            }
        }
        writeln!(f, "}}")
    }
}
