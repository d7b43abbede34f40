use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use crate::ast::AST;
use crate::symbol::Symbol;

pub type StateID = usize;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct State {
    pub transitions: BTreeMap<Symbol, BTreeSet<StateID>>,
    pub epsilon: BTreeSet<StateID>,
}

/// An automaton compiled from one expression.
///
/// The NFA is the arena: it owns every state, and states refer to each other
/// by index, so the back-edges created by `*` need no shared ownership.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NFA {
    states: Vec<State>,
    initial: StateID,
    accepting: BTreeSet<StateID>,
}

impl NFA {
    fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: 0,
            accepting: BTreeSet::new(),
        }
    }

    pub fn from_ast(ast: &AST) -> Self {
        let mut nfa = Self::new();
        NFABuilder::new(&mut nfa, ast).build();
        nfa
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn initial(&self) -> StateID {
        self.initial
    }

    pub fn accepting(&self) -> &BTreeSet<StateID> {
        &self.accepting
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn add_state(&mut self) -> StateID {
        self.states.push(State::default());
        self.states.len() - 1
    }

    fn add_epsilon_transition(&mut self, from: StateID, to: StateID) {
        self.states[from].epsilon.insert(to);
    }

    fn add_symbol_transition(&mut self, from: StateID, to: StateID, symbol: Symbol) {
        self.states[from]
            .transitions
            .entry(symbol)
            .or_default()
            .insert(to);
    }

    /// Every state reachable from `states` through zero or more epsilon edges.
    pub fn epsilon_closure(&self, states: impl IntoIterator<Item = StateID>) -> BTreeSet<StateID> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<StateID> = states.into_iter().collect();
        while let Some(state) = stack.pop() {
            if closure.insert(state) {
                stack.extend(self.states[state].epsilon.iter().copied());
            }
        }
        closure
    }

    /// The states reached from `states` by consuming `c`.
    pub fn step(&self, states: &BTreeSet<StateID>, c: char) -> BTreeSet<StateID> {
        states
            .iter()
            .flat_map(|&state| self.states[state].transitions.iter())
            .filter(|(symbol, _)| symbol.matches(c))
            .flat_map(|(_, next)| next.iter().copied())
            .collect()
    }

    /// Whether the whole of `input` is in the language of this automaton.
    pub fn accepts(&self, input: &str) -> bool {
        NFAVM::new(self).run(input)
    }
}

/// A start state plus the accept states of a partially built automaton.
#[derive(Clone, Debug)]
struct Fragment {
    initial: StateID,
    accepting: BTreeSet<StateID>,
}

struct NFABuilder<'a> {
    nfa: &'a mut NFA,
    ast: &'a AST,
}

impl<'a> NFABuilder<'a> {
    fn new(nfa: &'a mut NFA, ast: &'a AST) -> Self {
        Self { nfa, ast }
    }

    fn build_literal(&mut self, symbol: Symbol) -> Fragment {
        let initial = self.nfa.add_state();
        let accepting = self.nfa.add_state();
        if symbol.is_epsilon() {
            self.nfa.add_epsilon_transition(initial, accepting);
        } else {
            self.nfa.add_symbol_transition(initial, accepting, symbol);
        }
        Fragment {
            initial,
            accepting: BTreeSet::from([accepting]),
        }
    }

    fn build_concat(&mut self, left: &AST, right: &AST) -> Fragment {
        let left = self.build_node(left);
        let right = self.build_node(right);
        for &state in &left.accepting {
            self.nfa.add_epsilon_transition(state, right.initial);
        }
        Fragment {
            initial: left.initial,
            accepting: right.accepting,
        }
    }

    fn build_alternation(&mut self, left: &AST, right: &AST) -> Fragment {
        let initial = self.nfa.add_state();
        let left = self.build_node(left);
        let right = self.build_node(right);
        let accepting = self.nfa.add_state();
        self.nfa.add_epsilon_transition(initial, left.initial);
        self.nfa.add_epsilon_transition(initial, right.initial);
        for &state in left.accepting.iter().chain(&right.accepting) {
            self.nfa.add_epsilon_transition(state, accepting);
        }
        Fragment {
            initial,
            accepting: BTreeSet::from([accepting]),
        }
    }

    fn build_star(&mut self, ast: &AST) -> Fragment {
        let initial = self.nfa.add_state();
        let inner = self.build_node(ast);
        let accepting = self.nfa.add_state();
        self.nfa.add_epsilon_transition(initial, inner.initial);
        self.nfa.add_epsilon_transition(initial, accepting);
        for &state in &inner.accepting {
            self.nfa.add_epsilon_transition(state, inner.initial);
            self.nfa.add_epsilon_transition(state, accepting);
        }
        Fragment {
            initial,
            accepting: BTreeSet::from([accepting]),
        }
    }

    // X+ is X.X*, with fresh states for each copy of X.
    fn build_plus(&mut self, ast: &AST) -> Fragment {
        let once = self.build_node(ast);
        let repeated = self.build_star(ast);
        for &state in &once.accepting {
            self.nfa.add_epsilon_transition(state, repeated.initial);
        }
        Fragment {
            initial: once.initial,
            accepting: repeated.accepting,
        }
    }

    fn build_node(&mut self, ast: &AST) -> Fragment {
        match ast {
            AST::Literal(symbol) => self.build_literal(*symbol),
            AST::Concat(left, right) => self.build_concat(left, right),
            AST::Alternation(left, right) => self.build_alternation(left, right),
            AST::Star(ast) => self.build_star(ast),
            AST::Plus(ast) => self.build_plus(ast),
            AST::Optional(ast) => self.build_alternation(ast, &AST::Literal(Symbol::Epsilon)),
        }
    }

    fn build(&mut self) {
        let fragment = self.build_node(self.ast);
        self.nfa.initial = fragment.initial;
        self.nfa.accepting = fragment.accepting;
    }
}

/// Subset simulation: tracks every state the automaton could be in.
pub struct NFAVM<'a> {
    nfa: &'a NFA,
    current: BTreeSet<StateID>,
}

impl<'a> NFAVM<'a> {
    pub fn new(nfa: &'a NFA) -> Self {
        Self {
            nfa,
            current: nfa.epsilon_closure([nfa.initial]),
        }
    }

    pub fn current(&self) -> &BTreeSet<StateID> {
        &self.current
    }

    pub fn is_accepting(&self) -> bool {
        !self.current.is_disjoint(&self.nfa.accepting)
    }

    /// Consumes one character. Returns false once no state is left alive.
    pub fn step(&mut self, c: char) -> bool {
        let moved = self.nfa.step(&self.current, c);
        self.current = self.nfa.epsilon_closure(moved);
        trace!("{:?} -> {:?}", c, self.current);
        !self.current.is_empty()
    }

    pub fn run(&mut self, input: &str) -> bool {
        for c in input.chars() {
            if !self.step(c) {
                return false;
            }
        }
        self.is_accepting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    use crate::ast::Parser;
    use crate::postfix::tokenize;

    fn nfa(postfix: &str) -> Result<NFA> {
        let ast = Parser::new().parse(&tokenize(postfix)?)?;
        Ok(NFA::from_ast(&ast))
    }

    #[test]
    fn test_literal_shape() -> Result<()> {
        let nfa = nfa("a")?;
        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.initial(), 0);
        assert_eq!(nfa.accepting(), &BTreeSet::from([1]));
        assert_eq!(
            nfa.states()[0].transitions,
            BTreeMap::from([(Symbol::Char('a'), BTreeSet::from([1]))])
        );
        Ok(())
    }

    #[test]
    fn test_epsilon_literal_shape() -> Result<()> {
        let nfa = nfa("ε")?;
        assert!(nfa.states()[0].transitions.is_empty());
        assert_eq!(nfa.states()[0].epsilon, BTreeSet::from([1]));
        assert!(nfa.accepts(""));
        assert!(!nfa.accepts("ε"));
        Ok(())
    }

    #[test]
    fn test_concat_shape() -> Result<()> {
        let nfa = nfa("ab.")?;
        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.states()[1].epsilon, BTreeSet::from([2]));
        assert_eq!(nfa.accepting(), &BTreeSet::from([3]));
        Ok(())
    }

    #[test]
    fn test_star_back_edge() -> Result<()> {
        let nfa = nfa("a*")?;
        // 0: start, 1 -a-> 2, 3: accept
        assert_eq!(nfa.states()[0].epsilon, BTreeSet::from([1, 3]));
        assert_eq!(nfa.states()[2].epsilon, BTreeSet::from([1, 3]));
        assert_eq!(nfa.epsilon_closure([0]), BTreeSet::from([0, 1, 3]));
        Ok(())
    }

    #[test]
    fn test_indices_in_arena() -> Result<()> {
        let nfa = nfa("ab|*c.d+e?|.")?;
        for state in nfa.states() {
            let targets = state.transitions.values().flatten().chain(&state.epsilon);
            for &target in targets {
                assert!(target < nfa.len());
            }
        }
        assert!(nfa.accepting().iter().all(|&state| state < nfa.len()));
        Ok(())
    }

    #[test]
    fn test_accepts() -> Result<()> {
        let nfa = nfa("ab*.c|")?;
        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("abbb"));
        assert!(nfa.accepts("c"));
        assert!(!nfa.accepts(""));
        assert!(!nfa.accepts("ac"));
        assert!(!nfa.accepts("ab c"));
        Ok(())
    }

    #[test]
    fn test_direct_plus_and_optional() -> Result<()> {
        let plus = nfa("a+")?;
        assert!(!plus.accepts(""));
        assert!(plus.accepts("a"));
        assert!(plus.accepts("aaaa"));

        let optional = nfa("a?")?;
        assert!(optional.accepts(""));
        assert!(optional.accepts("a"));
        assert!(!optional.accepts("aa"));
        Ok(())
    }

    #[test]
    fn test_escaped_label() -> Result<()> {
        let nfa = nfa("\\n\\\\.")?;
        assert!(nfa.states()[0]
            .transitions
            .contains_key(&Symbol::Escaped('n')));
        assert!(nfa.accepts("\n\\"));
        assert!(!nfa.accepts("n\\"));
        Ok(())
    }

    #[test]
    fn test_vm_stops_on_dead_set() -> Result<()> {
        let nfa = nfa("ab.")?;
        let mut vm = NFAVM::new(&nfa);
        assert!(!vm.is_accepting());
        assert!(vm.step('a'));
        assert!(!vm.step('a'));
        assert!(vm.current().is_empty());
        Ok(())
    }
}
