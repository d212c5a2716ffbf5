/*! Lowers a pattern AST into a state graph.

Each AST node produces a subgraph with a single entry and a single exit
state; composition is by epsilon transitions. Greediness, laziness and
alternation priority are encoded purely in the order of a state's outgoing
transitions, which keeps the matcher free of quantifier-specific logic.

Compilation cannot fail: everything that could go wrong (syntax, bad
ranges, backreferences to non-existent groups) has already been rejected by
the parser.
*/

use crate::parser::ast::{
    Ast, CharacterGroupItem, Expression, ExpressionItem, Group, MatchItem,
    Quantifier, QuantifierKind,
};
use crate::regex::Options;
use crate::utils::fold_case;

use graph::{
    CharacterSet, Condition, Fragment, GraphBuilder, SetItem, StateGraph,
};

pub(crate) mod graph;

#[cfg(test)]
mod tests;

/// Compiles `ast` into its state graph.
pub(crate) fn compile(ast: &Ast, options: Options) -> StateGraph {
    Compiler::new(options).compile(ast)
}

struct Compiler {
    builder: GraphBuilder,
    options: Options,
}

/// What a quantifier applies to. `Copy`, so range quantifiers can compile
/// the same subtree as many times as the unrolling needs.
#[derive(Clone, Copy)]
enum Target<'a> {
    Atom(&'a MatchItem),
    Group(&'a Group),
}

impl Compiler {
    fn new(options: Options) -> Self {
        Self { builder: GraphBuilder::new(), options }
    }

    fn compile(mut self, ast: &Ast) -> StateGraph {
        if ast.anchored {
            let anchor = self.builder.add_state();
            let root = self.compile_expression(&ast.root);
            self.builder.add_transition(
                anchor,
                Condition::StartOfWindow,
                root.entry,
            );
            self.builder.finish(anchor, root.exit)
        } else {
            let root = self.compile_expression(&ast.root);
            self.builder.finish(root.entry, root.exit)
        }
    }

    fn compile_expression(&mut self, expr: &Expression) -> Fragment {
        if expr.items.is_empty() {
            return self.empty_fragment();
        }

        let mut fragments = Vec::with_capacity(expr.items.len());
        for item in expr.items.iter() {
            fragments.push(self.compile_item(item));
        }
        self.chain(&fragments)
    }

    fn compile_item(&mut self, item: &ExpressionItem) -> Fragment {
        match item {
            ExpressionItem::Match(m) => {
                self.quantified(m.quantifier, Target::Atom(&m.item))
            }
            ExpressionItem::Group(g) => {
                self.quantified(g.quantifier, Target::Group(g))
            }
            ExpressionItem::Backreference(b) => {
                let entry = self.builder.add_state();
                let exit = self.builder.add_state();
                self.builder.add_transition(
                    entry,
                    Condition::Backreference { group: b.index },
                    exit,
                );
                Fragment { entry, exit }
            }
            ExpressionItem::Alternation(alt) => {
                let entry = self.builder.add_state();
                let left = self.compile_expression(&alt.left);
                let right = self.compile_expression(&alt.right);
                let exit = self.builder.add_state();
                // The left branch is tried first.
                self.builder.add_transition(
                    entry,
                    Condition::Epsilon,
                    left.entry,
                );
                self.builder.add_transition(
                    entry,
                    Condition::Epsilon,
                    right.entry,
                );
                self.builder.add_transition(
                    left.exit,
                    Condition::Epsilon,
                    exit,
                );
                self.builder.add_transition(
                    right.exit,
                    Condition::Epsilon,
                    exit,
                );
                Fragment { entry, exit }
            }
        }
    }

    /// A single occurrence of `target`, no quantifier applied.
    fn compile_target(&mut self, target: Target) -> Fragment {
        match target {
            Target::Atom(item) => {
                let entry = self.builder.add_state();
                let exit = self.builder.add_state();
                let condition = self.atom_condition(item);
                self.builder.add_transition(entry, condition, exit);
                Fragment { entry, exit }
            }
            Target::Group(group) => {
                let entry = self.builder.add_state();
                let inner = self.compile_expression(&group.expr);
                let exit = self.builder.add_state();
                match group.index {
                    Some(group) => {
                        self.builder.add_transition(
                            entry,
                            Condition::GroupStart { group },
                            inner.entry,
                        );
                        self.builder.add_transition(
                            inner.exit,
                            Condition::GroupEnd { group },
                            exit,
                        );
                    }
                    None => {
                        self.builder.add_transition(
                            entry,
                            Condition::Epsilon,
                            inner.entry,
                        );
                        self.builder.add_transition(
                            inner.exit,
                            Condition::Epsilon,
                            exit,
                        );
                    }
                }
                Fragment { entry, exit }
            }
        }
    }

    fn quantified(
        &mut self,
        quantifier: Option<Quantifier>,
        target: Target,
    ) -> Fragment {
        let Some(Quantifier { kind, lazy }) = quantifier else {
            return self.compile_target(target);
        };
        match kind {
            QuantifierKind::ZeroOrMore => self.zero_or_more(target, lazy),
            QuantifierKind::OneOrMore => self.one_or_more(target, lazy),
            QuantifierKind::ZeroOrOne => self.zero_or_one(target, lazy),
            QuantifierKind::Range { min, max } => {
                self.repeat_range(target, min, max, lazy)
            }
        }
    }

    fn zero_or_more(&mut self, target: Target, lazy: bool) -> Fragment {
        let entry = self.builder.add_state();
        let exit = self.builder.add_state();
        let inner = self.compile_target(target);
        if lazy {
            self.builder.add_transition(entry, Condition::Epsilon, exit);
            self.builder.add_transition(entry, Condition::Epsilon, inner.entry);
        } else {
            self.builder.add_transition(entry, Condition::Epsilon, inner.entry);
            self.builder.add_transition(entry, Condition::Epsilon, exit);
        }
        // The body exits back into the fork, which decides again.
        self.builder.add_transition(inner.exit, Condition::Epsilon, entry);
        Fragment { entry, exit }
    }

    fn one_or_more(&mut self, target: Target, lazy: bool) -> Fragment {
        let inner = self.compile_target(target);
        let fork = self.builder.add_state();
        let exit = self.builder.add_state();
        self.builder.add_transition(inner.exit, Condition::Epsilon, fork);
        if lazy {
            self.builder.add_transition(fork, Condition::Epsilon, exit);
            self.builder.add_transition(fork, Condition::Epsilon, inner.entry);
        } else {
            self.builder.add_transition(fork, Condition::Epsilon, inner.entry);
            self.builder.add_transition(fork, Condition::Epsilon, exit);
        }
        Fragment { entry: inner.entry, exit }
    }

    fn zero_or_one(&mut self, target: Target, lazy: bool) -> Fragment {
        let entry = self.builder.add_state();
        let exit = self.builder.add_state();
        let inner = self.compile_target(target);
        if lazy {
            self.builder.add_transition(entry, Condition::Epsilon, exit);
            self.builder.add_transition(entry, Condition::Epsilon, inner.entry);
        } else {
            self.builder.add_transition(entry, Condition::Epsilon, inner.entry);
            self.builder.add_transition(entry, Condition::Epsilon, exit);
        }
        self.builder.add_transition(inner.exit, Condition::Epsilon, exit);
        Fragment { entry, exit }
    }

    /// `{min}`, `{min,}` and `{min,max}`: `min` chained copies of the body,
    /// followed by a star (open ranges) or by `max - min` nested optional
    /// occurrences (closed ranges).
    fn repeat_range(
        &mut self,
        target: Target,
        min: u32,
        max: Option<u32>,
        lazy: bool,
    ) -> Fragment {
        let mut fragments = Vec::new();
        for _ in 0..min {
            let fragment = self.compile_target(target);
            fragments.push(fragment);
        }
        match max {
            None => {
                let star = self.zero_or_more(target, lazy);
                fragments.push(star);
            }
            Some(max) if max > min => {
                let tail = self.optional_chain(target, max - min, lazy);
                fragments.push(tail);
            }
            Some(_) => {}
        }
        if fragments.is_empty() {
            // {0} and {0,0} match the empty string only.
            return self.empty_fragment();
        }
        self.chain(&fragments)
    }

    /// `count` optional occurrences nested as `opt(G · opt(G · ...))`, so
    /// that a later occurrence can only be taken if all earlier ones were.
    fn optional_chain(
        &mut self,
        target: Target,
        count: u32,
        lazy: bool,
    ) -> Fragment {
        let entry = self.builder.add_state();
        let exit = self.builder.add_state();
        let inner = self.compile_target(target);
        let tail_exit = if count > 1 {
            let rest = self.optional_chain(target, count - 1, lazy);
            self.builder.add_transition(
                inner.exit,
                Condition::Epsilon,
                rest.entry,
            );
            rest.exit
        } else {
            inner.exit
        };
        if lazy {
            self.builder.add_transition(entry, Condition::Epsilon, exit);
            self.builder.add_transition(entry, Condition::Epsilon, inner.entry);
        } else {
            self.builder.add_transition(entry, Condition::Epsilon, inner.entry);
            self.builder.add_transition(entry, Condition::Epsilon, exit);
        }
        self.builder.add_transition(tail_exit, Condition::Epsilon, exit);
        Fragment { entry, exit }
    }

    fn empty_fragment(&mut self) -> Fragment {
        let entry = self.builder.add_state();
        let exit = self.builder.add_state();
        self.builder.add_transition(entry, Condition::Epsilon, exit);
        Fragment { entry, exit }
    }

    /// Joins consecutive fragments with epsilon transitions.
    fn chain(&mut self, fragments: &[Fragment]) -> Fragment {
        for pair in fragments.windows(2) {
            self.builder.add_transition(
                pair[0].exit,
                Condition::Epsilon,
                pair[1].entry,
            );
        }
        Fragment {
            entry: fragments[0].entry,
            exit: fragments[fragments.len() - 1].exit,
        }
    }

    fn atom_condition(&self, item: &MatchItem) -> Condition {
        match item {
            MatchItem::AnyCharacter => Condition::AnyCharacter {
                match_line_separators: self.options.dot_matches_separators(),
            },
            MatchItem::Character(c) => Condition::Character(self.fold(*c)),
            MatchItem::CharacterClass(class) => {
                Condition::CharacterSet(CharacterSet {
                    negated: false,
                    items: vec![SetItem::Class(*class)],
                })
            }
            MatchItem::UnicodeCategory(category) => {
                Condition::CharacterSet(CharacterSet {
                    negated: false,
                    items: vec![SetItem::Category(*category)],
                })
            }
            MatchItem::CharacterGroup { negated, items } => {
                Condition::CharacterSet(CharacterSet {
                    negated: *negated,
                    items: items.iter().map(|i| self.set_item(i)).collect(),
                })
            }
        }
    }

    fn set_item(&self, item: &CharacterGroupItem) -> SetItem {
        match item {
            CharacterGroupItem::Character(c) => {
                SetItem::Character(self.fold(*c))
            }
            CharacterGroupItem::Range(lo, hi) => {
                SetItem::Range(self.fold(*lo), self.fold(*hi))
            }
            CharacterGroupItem::Class(class) => SetItem::Class(*class),
            CharacterGroupItem::Category(category) => {
                SetItem::Category(*category)
            }
        }
    }

    /// Case-insensitive patterns are matched against a lowercased input,
    /// so their literals are lowercased here at compile time.
    fn fold(&self, c: char) -> char {
        if self.options.is_case_insensitive() {
            fold_case(c)
        } else {
            c
        }
    }
}
