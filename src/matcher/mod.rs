/*! A backtracking interpreter for compiled state graphs.

The matcher preprocesses the input (case folding, window splitting), then
runs an outer loop that attempts an anchored-at-`i` match for every start
position, producing the non-overlapping left-to-right matches. The inner
match is a depth-first traversal of the state graph that tries each state's
transitions in declared order, so greediness, laziness and alternation
priority fall out of the graph itself.

Failed configurations are memoized per attempt, keyed by cursor position,
state and capture context. Configurations currently on the recursion stack
are marked in the same cache, which cuts zero-progress cycles like the one
`(a?)*` produces. An iteration budget bounds the total work; exceeding it
is the engine's only matching error.
*/

use std::ops::Range;

use rustc_hash::FxHashMap;

use crate::compiler::graph::{Condition, StateGraph, StateId};
use crate::errors::MatchError;
use crate::regex::Options;
use crate::utils::fold_case;

pub(crate) mod cursor;


use cursor::{Context, Cursor};

/// A single match found in the input.
///
/// Carries the matched range (in character offsets), the matched text, and
/// one entry per capturing group in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    range: Range<usize>,
    text: String,
    captures: Vec<Option<Capture>>,
}

impl Match {
    /// The matched range, as character offsets into the input.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Character offset at which the match starts.
    #[inline]
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// Character offset right after the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// The matched text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The capture groups, in declaration order: element 0 is group 1.
    /// Groups that didn't participate in the match are `None`.
    #[inline]
    pub fn captures(&self) -> &[Option<Capture>] {
        &self.captures
    }

    /// The capture for the 1-based group number, the same numbering
    /// backreferences use. Returns `None` for group 0, for out-of-range
    /// groups, and for groups that didn't participate in the match.
    pub fn capture(&self, group: usize) -> Option<&Capture> {
        if group == 0 {
            return None;
        }
        self.captures.get(group - 1)?.as_ref()
    }
}

/// The text captured by one group during a [`Match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    range: Range<usize>,
    text: String,
}

impl Capture {
    /// The captured range, as character offsets into the input.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The captured text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Matches one input against a compiled graph.
///
/// Owns the preprocessed input; the compiled graph is only read. One
/// matcher serves one input string; concurrent searches need separate
/// matchers.
pub(crate) struct Matcher<'r> {
    graph: &'r StateGraph,
    capture_groups: usize,
    iteration_limit: usize,
    /// The input as parsed, used for reporting matched text.
    original: Vec<char>,
    /// The input the automaton runs on: equal to `original`, or its
    /// lowercased form under the case-insensitive option.
    haystack: Vec<char>,
    /// The window(s) to search: the whole input, or one window per line
    /// under the multiline option. Windows exclude the `\n` separators.
    windows: Vec<Range<usize>>,
}

impl<'r> Matcher<'r> {
    pub fn new(
        graph: &'r StateGraph,
        options: Options,
        capture_groups: usize,
        iteration_limit: usize,
        input: &str,
    ) -> Self {
        let original: Vec<char> = input.chars().collect();

        let haystack: Vec<char> = if options.is_case_insensitive() {
            original.iter().map(|c| fold_case(*c)).collect()
        } else {
            original.clone()
        };

        let windows = if options.is_multiline() {
            let mut windows = Vec::new();
            let mut start = 0;
            for (i, c) in haystack.iter().enumerate() {
                if *c == '\n' {
                    windows.push(start..i);
                    start = i + 1;
                }
            }
            windows.push(start..haystack.len());
            windows
        } else {
            vec![0..haystack.len()]
        };

        Self {
            graph,
            capture_groups,
            iteration_limit,
            original,
            haystack,
            windows,
        }
    }

    /// All non-overlapping matches, leftmost first.
    pub fn matches(&self) -> Result<Vec<Match>, MatchError> {
        self.scan(false)
    }

    /// The leftmost match only.
    pub fn first_match(&self) -> Result<Option<Match>, MatchError> {
        Ok(self.scan(true)?.into_iter().next())
    }

    fn scan(&self, first_only: bool) -> Result<Vec<Match>, MatchError> {
        let mut matches = Vec::new();
        // One cache serves all attempts; it is cleared, not reallocated,
        // between them.
        let mut cache = Cache::default();

        for window in self.windows.iter() {
            // Start positions run through the window end inclusive, so the
            // empty window of an empty input still gets one attempt.
            let mut at = window.start;
            while at <= window.end {
                cache.clear();
                let mut attempt = Attempt {
                    graph: self.graph,
                    cursor: Cursor::new(&self.haystack, window.clone(), at),
                    cache: &mut cache,
                    iterations: 0,
                    iteration_limit: self.iteration_limit,
                };
                match attempt.run()? {
                    Some(found) => {
                        let end = found.end;
                        matches.push(self.build_match(at, found));
                        if first_only {
                            return Ok(matches);
                        }
                        // An empty match advances by one to avoid matching
                        // at the same position forever.
                        at = if end == at { at + 1 } else { end };
                    }
                    None => at += 1,
                }
            }
        }

        Ok(matches)
    }

    fn build_match(&self, start: usize, found: Found) -> Match {
        let range = start..found.end;
        let text: String = self.original[range.clone()].iter().collect();
        let captures = (1..=self.capture_groups)
            .map(|group| {
                found.context.captured(group).map(|range| Capture {
                    text: self.original[range.clone()].iter().collect(),
                    range,
                })
            })
            .collect();
        Match { range, text, captures }
    }
}

/// What the inner match returns on success: where the match ends and the
/// capture state of the successful branch.
struct Found {
    end: usize,
    context: Context,
}

type Cache = FxHashMap<CacheKey, CacheEntry>;

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    index: usize,
    state: StateId,
    context: Context,
}

enum CacheEntry {
    /// The configuration is on the current recursion stack. Reaching it
    /// again means an epsilon cycle made no progress, and the branch is
    /// abandoned.
    InProgress,
    /// The configuration was fully explored and leads to no match.
    Failed,
}

/// One anchored match attempt at a fixed start position.
struct Attempt<'a, 't> {
    graph: &'a StateGraph,
    cursor: Cursor<'t>,
    cache: &'a mut Cache,
    iterations: usize,
    iteration_limit: usize,
}

/// Outcome of a passing transition condition: how many characters it
/// consumed and the context the target state is entered with.
struct Step {
    consumed: usize,
    context: Context,
}

impl Step {
    fn stay(context: &Context) -> Self {
        Self { consumed: 0, context: context.clone() }
    }

    fn consume_one(context: &Context) -> Self {
        Self { consumed: 1, context: context.clone() }
    }
}

impl Attempt<'_, '_> {
    fn run(&mut self) -> Result<Option<Found>, MatchError> {
        self.match_state(self.graph.start(), Context::default())
    }

    fn match_state(
        &mut self,
        state: StateId,
        context: Context,
    ) -> Result<Option<Found>, MatchError> {
        self.iterations += 1;
        if self.iterations > self.iteration_limit {
            return Err(MatchError::IterationLimitExceeded {
                limit: self.iteration_limit,
            });
        }

        let graph = self.graph;
        let current = graph.state(state);

        if current.is_end {
            return Ok(Some(Found { end: self.cursor.index, context }));
        }

        let key = CacheKey { index: self.cursor.index, state, context };
        if self.cache.contains_key(&key) {
            // Failed earlier, or sitting on the current recursion stack
            // (a zero-progress cycle). Either way this branch is dead.
            return Ok(None);
        }
        self.cache.insert(key.clone(), CacheEntry::InProgress);
        let context = &key.context;

        for transition in current.transitions.iter() {
            if let Some(step) = self.step(&transition.condition, context) {
                let saved = self.cursor.index;
                self.cursor.index += step.consumed;
                let found =
                    self.match_state(transition.target, step.context)?;
                self.cursor.index = saved;
                if found.is_some() {
                    return Ok(found);
                }
            }
        }

        self.cache.insert(key, CacheEntry::Failed);
        Ok(None)
    }

    /// Evaluates a transition condition against the cursor. `None` means
    /// the transition can't be taken.
    fn step(&self, condition: &Condition, context: &Context) -> Option<Step> {
        match condition {
            Condition::Epsilon => Some(Step::stay(context)),
            Condition::StartOfWindow => {
                self.cursor.at_window_start().then(|| Step::stay(context))
            }
            Condition::GroupStart { group } => Some(Step {
                consumed: 0,
                context: context.with_open(*group, self.cursor.index),
            }),
            Condition::GroupEnd { group } => Some(Step {
                consumed: 0,
                context: context.with_captured(*group, self.cursor.index),
            }),
            Condition::AnyCharacter { match_line_separators } => {
                let c = self.cursor.char()?;
                (*match_line_separators || c != '\n')
                    .then(|| Step::consume_one(context))
            }
            Condition::Character(expected) => {
                let c = self.cursor.char()?;
                (c == *expected).then(|| Step::consume_one(context))
            }
            Condition::CharacterSet(set) => {
                let c = self.cursor.char()?;
                set.matches(c).then(|| Step::consume_one(context))
            }
            Condition::Backreference { group } => {
                match context.captured(*group) {
                    // A group that hasn't captured yet (a forward
                    // reference, or a reference from inside the group
                    // itself) matches the empty string.
                    None => Some(Step::stay(context)),
                    Some(range) => {
                        let len = range.len();
                        let at = self.cursor.index;
                        if self.cursor.remaining() >= len
                            && self.cursor.slice(range)
                                == self.cursor.slice(at..at + len)
                        {
                            Some(Step {
                                consumed: len,
                                context: context.clone(),
                            })
                        } else {
                            None
                        }
                    }
                }
            }
        }
    }
}
