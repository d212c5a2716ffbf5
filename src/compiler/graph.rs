/*! The compiled form of a pattern: a graph of states and transitions.

States live in an arena owned by [`StateGraph`] and are addressed by
[`StateId`], an index into the arena. The graph is inherently cyclic (`*`,
`+` and `{n,}` loop back), so transitions store target ids instead of owning
their targets; this also makes states trivially hashable for the matcher's
memoization cache. Once built, a graph is immutable and can be shared freely
across threads.

Transition order within a state is meaningful: the matcher tries transitions
in declared order, which is how greediness, laziness and alternation
priority are encoded. The graph has exactly one start state and exactly one
end state.
*/

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::parser::ast::{CharacterClass, UnicodeCategory};

/// Identifies a state within its [`StateGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StateId(u32);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the state graph.
#[derive(Debug)]
pub(crate) struct State {
    /// Outgoing transitions, in priority order.
    pub transitions: Vec<Transition>,
    /// True for the accepting state of the whole expression. The end state
    /// has no outgoing transitions.
    pub is_end: bool,
}

/// An edge of the state graph.
#[derive(Debug)]
pub(crate) struct Transition {
    pub condition: Condition,
    pub target: StateId,
}

impl Transition {
    /// True if taking the transition does not consume input.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        matches!(
            self.condition,
            Condition::Epsilon
                | Condition::StartOfWindow
                | Condition::GroupStart { .. }
                | Condition::GroupEnd { .. }
        )
    }
}

/// What a transition requires from the cursor, and the bookkeeping it
/// performs when taken.
#[derive(Debug)]
pub(crate) enum Condition {
    /// Always passes, consumes nothing.
    Epsilon,
    /// Passes only at the start of the current search window. Compiled from
    /// the `^` anchor; under the multiline option every line start is a
    /// window start.
    StartOfWindow,
    /// Passes, recording the current position as the start of the group.
    GroupStart { group: usize },
    /// Passes, completing the group's capture at the current position.
    GroupEnd { group: usize },
    /// `.`: any character, excluding the line separator unless the
    /// dot-matches-line-separators option was set at compile time.
    AnyCharacter { match_line_separators: bool },
    /// A literal character. Lowercased at compile time when matching
    /// case-insensitively.
    Character(char),
    /// A `[...]` group, a `\w`-style class, or a `\p{...}` category.
    CharacterSet(CharacterSet),
    /// Matches the text previously captured by `group`, whatever its
    /// length. A group that has not captured yet matches the empty string.
    Backreference { group: usize },
}

/// The union of items a character can be tested against.
///
/// Also covers bare classes and categories: `\d` compiles to a one-item
/// set. Negation requires a character to be present; a negated set never
/// matches at the end of the window.
#[derive(Debug)]
pub(crate) struct CharacterSet {
    pub negated: bool,
    pub items: Vec<SetItem>,
}

#[derive(Debug)]
pub(crate) enum SetItem {
    Character(char),
    Range(char, char),
    Class(CharacterClass),
    Category(UnicodeCategory),
}

impl CharacterSet {
    /// True if `c` satisfies the set.
    pub fn matches(&self, c: char) -> bool {
        let in_union = self.items.iter().any(|item| match item {
            SetItem::Character(expected) => c == *expected,
            SetItem::Range(lo, hi) => (*lo..=*hi).contains(&c),
            SetItem::Class(class) => class.contains(c),
            SetItem::Category(category) => category.contains(c),
        });
        in_union != self.negated
    }
}

impl Display for SetItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SetItem::Character(c) => write!(f, "{}", c.escape_debug()),
            SetItem::Range(lo, hi) => {
                write!(f, "{}-{}", lo.escape_debug(), hi.escape_debug())
            }
            SetItem::Class(class) => write!(f, "{class}"),
            SetItem::Category(category) => write!(f, "{category}"),
        }
    }
}

impl Display for CharacterSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}{}]",
            if self.negated { "^" } else { "" },
            self.items.iter().join(""),
        )
    }
}

/// A subgraph with a single entry and a single exit state. Every AST node
/// compiles to one of these; composition wires fragments together with
/// epsilon transitions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment {
    pub entry: StateId,
    pub exit: StateId,
}

/// The compiled, immutable automaton for a whole pattern.
#[derive(Debug)]
pub(crate) struct StateGraph {
    states: Vec<State>,
    start: StateId,
}

impl StateGraph {
    pub(crate) fn new(states: Vec<State>, start: StateId) -> Self {
        Self { states, start }
    }

    #[inline]
    pub fn start(&self) -> StateId {
        self.start
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    /// Number of states in the graph.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Iterates over all states, in id order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }
}

impl Display for StateGraph {
    /// Renders the graph as a numbered listing, one line per transition:
    ///
    /// ```text
    /// 00000: EPSILON -> 00002
    /// 00000: EPSILON -> 00001
    /// 00001: MATCH
    /// 00002: LIT 'a' -> 00003
    /// 00003: EPSILON -> 00000
    /// ```
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for (addr, state) in self.states.iter().enumerate() {
            if state.is_end {
                writeln!(f, "{addr:05}: MATCH")?;
                continue;
            }
            for transition in state.transitions.iter() {
                let target = transition.target.index();
                match &transition.condition {
                    Condition::Epsilon => {
                        writeln!(f, "{addr:05}: EPSILON -> {target:05}")?;
                    }
                    Condition::StartOfWindow => {
                        writeln!(f, "{addr:05}: ASSERT_START -> {target:05}")?;
                    }
                    Condition::GroupStart { group } => {
                        writeln!(
                            f,
                            "{addr:05}: GROUP_START({group}) -> {target:05}"
                        )?;
                    }
                    Condition::GroupEnd { group } => {
                        writeln!(
                            f,
                            "{addr:05}: GROUP_END({group}) -> {target:05}"
                        )?;
                    }
                    Condition::AnyCharacter { match_line_separators } => {
                        if *match_line_separators {
                            writeln!(f, "{addr:05}: ANY_NL -> {target:05}")?;
                        } else {
                            writeln!(f, "{addr:05}: ANY -> {target:05}")?;
                        }
                    }
                    Condition::Character(c) => {
                        writeln!(
                            f,
                            "{addr:05}: LIT '{}' -> {target:05}",
                            c.escape_debug()
                        )?;
                    }
                    Condition::CharacterSet(set) => {
                        writeln!(f, "{addr:05}: SET {set} -> {target:05}")?;
                    }
                    Condition::Backreference { group } => {
                        writeln!(f, "{addr:05}: REF({group}) -> {target:05}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Builds a [`StateGraph`] incrementally. Used by the compiler while the
/// arena is still growing and transition targets are being wired up.
pub(crate) struct GraphBuilder {
    states: Vec<State>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Adds a new state with no transitions and returns its id.
    pub fn add_state(&mut self) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(State { transitions: Vec::new(), is_end: false });
        id
    }

    /// Appends a transition to `from`. Order of insertion is the order the
    /// matcher will try them in.
    pub fn add_transition(
        &mut self,
        from: StateId,
        condition: Condition,
        target: StateId,
    ) {
        self.states[from.index()]
            .transitions
            .push(Transition { condition, target });
    }

    /// Marks `state` as the accepting state and freezes the graph.
    pub fn finish(mut self, start: StateId, end: StateId) -> StateGraph {
        self.states[end.index()].is_end = true;
        StateGraph::new(self.states, start)
    }
}
