/*! A backtracking regular-expression engine written in Rust from scratch.

A pattern is compiled into a nondeterministic finite automaton (NFA) whose
transitions encode both character consumption and capture-group bookkeeping,
and the automaton is then evaluated against an input string by a backtracking
interpreter with memoization. The engine supports a classical subset of regex
syntax: greedy and lazy quantifiers, alternation, capturing and non-capturing
groups, character classes and groups, Unicode general categories,
backreferences, range quantifiers, and the start-of-string anchor.

There are two main types in this crate: [`Regex`] and [`Match`]. A [`Regex`]
is built from a pattern string (plus an optional set of [`Options`]) and can
be used any number of times, from any number of threads, for matching input
strings. Each call to [`Regex::matches`] returns the non-overlapping
left-to-right matches found in the input, together with their capture groups.

# Example

```rust
use rematch::Regex;

let re = Regex::new("(a|b)+").unwrap();

let matches = re.matches("abba").unwrap();

assert_eq!(matches.len(), 1);
assert_eq!(matches[0].text(), "abba");
assert_eq!(matches[0].capture(1).unwrap().text(), "a");
```

Matching options are given at compile time:

```rust
use rematch::{Options, Regex};

let re = Regex::with_options(
    "^foo",
    Options::new().multiline(true),
).unwrap();

assert_eq!(re.matches("foo\nfoo").unwrap().len(), 2);
```
*/

#![deny(missing_docs)]

pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::MatchError;

pub use matcher::Capture;
pub use matcher::Match;

pub use regex::Options;
pub use regex::Regex;
pub use regex::DEFAULT_ITERATION_LIMIT;

mod compiler;
mod errors;
mod matcher;
mod parser;
mod regex;

#[cfg(test)]
mod tests;

mod utils {
    /// Lowercases a character using a simple one-to-one fold.
    ///
    /// Case-insensitive matching folds both the pattern and the input with
    /// this function. Multi-character lowercase expansions (like the one for
    /// U+0130) are truncated to their first scalar, which keeps offsets
    /// stable at the cost of not handling full Unicode case folding.
    #[inline]
    pub(crate) fn fold_case(c: char) -> char {
        c.to_lowercase().next().unwrap_or(c)
    }
}
