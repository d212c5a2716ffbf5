/*! Matcher-side state: the input cursor and the per-branch capture context.
*/

use std::ops::Range;

use smallvec::SmallVec;

/// A position within the preprocessed input.
///
/// The cursor sees the whole character array but only reads within its
/// window: under the multiline option each line is a separate window, and
/// no consuming transition may cross a window boundary. All indices are
/// global character offsets, so reported ranges stay meaningful for the
/// original input.
pub(crate) struct Cursor<'t> {
    chars: &'t [char],
    window: Range<usize>,
    pub index: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(chars: &'t [char], window: Range<usize>, index: usize) -> Self {
        Self { chars, window, index }
    }

    /// True at the beginning of the search window, where `^` matches.
    #[inline]
    pub fn at_window_start(&self) -> bool {
        self.index == self.window.start
    }

    /// The character under the cursor, or `None` at the window end.
    #[inline]
    pub fn char(&self) -> Option<char> {
        if self.index < self.window.end {
            Some(self.chars[self.index])
        } else {
            None
        }
    }

    /// Characters left between the cursor and the window end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.window.end.saturating_sub(self.index)
    }

    /// A slice of the input by global offsets.
    #[inline]
    pub fn slice(&self, range: Range<usize>) -> &'t [char] {
        &self.chars[range]
    }
}

/// Per-branch capture state.
///
/// Contexts are immutable: taking a group-boundary transition produces an
/// updated copy, so sibling branches of the backtracking search can't see
/// each other's captures. The context is part of the memoization key, which
/// keeps the cache sound in the presence of quantified capturing groups.
///
/// Both lists are kept sorted by group index, so that equal capture states
/// always compare (and hash) equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct Context {
    /// Start offsets of the groups entered so far.
    open: SmallVec<[(usize, usize); 2]>,
    /// Completed captures. A quantified group overwrites its entry on every
    /// iteration, so the last iteration wins.
    captured: SmallVec<[(usize, Range<usize>); 2]>,
}

impl Context {
    /// The start offset recorded for `group`, if it has been entered.
    pub fn open_group(&self, group: usize) -> Option<usize> {
        self.open
            .binary_search_by_key(&group, |item| item.0)
            .ok()
            .map(|i| self.open[i].1)
    }

    /// The range captured by `group`, if it has completed at least once.
    pub fn captured(&self, group: usize) -> Option<Range<usize>> {
        self.captured
            .binary_search_by_key(&group, |item| item.0)
            .ok()
            .map(|i| self.captured[i].1.clone())
    }

    /// Returns a context with `group` opened at `start`.
    pub fn with_open(&self, group: usize, start: usize) -> Self {
        let mut ctx = self.clone();
        match ctx.open.binary_search_by_key(&group, |item| item.0) {
            Ok(i) => ctx.open[i].1 = start,
            Err(i) => ctx.open.insert(i, (group, start)),
        }
        ctx
    }

    /// Returns a context where `group` has captured from its recorded start
    /// up to `end`.
    pub fn with_captured(&self, group: usize, end: usize) -> Self {
        let start = self.open_group(group).unwrap_or(end);
        let mut ctx = self.clone();
        match ctx.captured.binary_search_by_key(&group, |item| item.0) {
            Ok(i) => ctx.captured[i].1 = start..end,
            Err(i) => ctx.captured.insert(i, (group, start..end)),
        }
        ctx
    }
}
