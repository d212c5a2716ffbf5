/*! The compiled regular expression and its matching options.
*/

use std::str::FromStr;

use log::debug;

use crate::compiler;
use crate::compiler::graph::StateGraph;
use crate::errors::{Error, MatchError};
use crate::matcher::{Match, Matcher};
use crate::parser::Parser;

/// Default ceiling on the number of configurations an attempt may visit.
///
/// Memoization bounds the search by `window length × states × distinct
/// capture contexts`, which is ample for reasonable patterns; the limit
/// protects against pathological pattern-and-input combinations. See
/// [`Regex::iteration_limit`].
pub const DEFAULT_ITERATION_LIMIT: usize = 1 << 22;

/// Matching options, given when compiling a [`Regex`].
///
/// ```
/// # use rematch::{Options, Regex};
/// let re = Regex::with_options(
///     "abc",
///     Options::new().case_insensitive(true).multiline(true),
/// ).unwrap();
/// assert!(re.is_match("ABC"));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    case_insensitive: bool,
    multiline: bool,
    dot_matches_line_separators: bool,
}

impl Options {
    /// Returns the default options: case-sensitive, single window, `.`
    /// doesn't match line separators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match ignoring case. Both the pattern's literals and the input are
    /// lowercased with a simple one-to-one fold.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Treat every line of the input as a separate search window, making
    /// `^` match at each line start.
    pub fn multiline(mut self, yes: bool) -> Self {
        self.multiline = yes;
        self
    }

    /// Let `.` match line separators too.
    pub fn dot_matches_line_separators(mut self, yes: bool) -> Self {
        self.dot_matches_line_separators = yes;
        self
    }
}

// Getters, named like the setters. Internal users only read.
impl Options {
    pub(crate) fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub(crate) fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub(crate) fn dot_matches_separators(&self) -> bool {
        self.dot_matches_line_separators
    }
}

/// A compiled regular expression.
///
/// Compilation is pure: the compiled automaton is immutable and can be
/// shared across threads. Matching allocates its own per-search state, so
/// one `Regex` can serve any number of concurrent searches.
#[derive(Debug)]
pub struct Regex {
    pattern: String,
    options: Options,
    graph: StateGraph,
    capture_groups: usize,
    iteration_limit: usize,
}

impl Regex {
    /// Compiles `pattern` with default [`Options`].
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Self::with_options(pattern, Options::new())
    }

    /// Compiles `pattern` with the given [`Options`].
    pub fn with_options(
        pattern: &str,
        options: Options,
    ) -> Result<Self, Error> {
        let ast = Parser::new(pattern).parse()?;
        let graph = compiler::compile(&ast, options);

        debug!(
            "compiled pattern `{}` into {} states ({} capture groups)",
            pattern,
            graph.state_count(),
            ast.capture_groups,
        );

        Ok(Self {
            pattern: pattern.to_string(),
            options,
            graph,
            capture_groups: ast.capture_groups,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
        })
    }

    /// Sets the maximum number of configurations a match attempt may visit
    /// before giving up with [`MatchError::IterationLimitExceeded`].
    pub fn iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    /// The pattern this regex was compiled from.
    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The options this regex was compiled with.
    #[inline]
    pub fn options(&self) -> Options {
        self.options
    }

    /// Number of capturing groups in the pattern.
    #[inline]
    pub fn capture_group_count(&self) -> usize {
        self.capture_groups
    }

    /// True if the input contains at least one match.
    ///
    /// An exhausted iteration budget counts as no match; use
    /// [`Regex::find`] to observe the error.
    pub fn is_match(&self, input: &str) -> bool {
        matches!(self.matcher(input).first_match(), Ok(Some(_)))
    }

    /// The leftmost match, if any.
    pub fn find(&self, input: &str) -> Result<Option<Match>, MatchError> {
        self.matcher(input).first_match()
    }

    /// All non-overlapping matches, in left-to-right order.
    pub fn matches(&self, input: &str) -> Result<Vec<Match>, MatchError> {
        self.matcher(input).matches()
    }

    fn matcher<'r>(&'r self, input: &str) -> Matcher<'r> {
        Matcher::new(
            &self.graph,
            self.options,
            self.capture_groups,
            self.iteration_limit,
            input,
        )
    }

    /// The compiled automaton as a numbered listing, for debugging.
    pub fn state_graph(&self) -> String {
        self.graph.to_string()
    }
}

impl FromStr for Regex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
