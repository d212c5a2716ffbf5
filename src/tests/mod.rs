/*! End-to-end tests for the whole pipeline. */

use pretty_assertions::assert_eq;

use crate::{Options, Regex};

macro_rules! assert_matches {
    ($pattern:expr, $input:expr, $expected:expr) => {
        assert_matches!($pattern, Options::new(), $input, $expected)
    };
    ($pattern:expr, $options:expr, $input:expr, $expected:expr) => {{
        let re = Regex::with_options($pattern, $options).unwrap();
        let found: Vec<(usize, usize, String)> = re
            .matches($input)
            .unwrap()
            .iter()
            .map(|m| (m.start(), m.end(), m.text().to_string()))
            .collect();
        let expected: Vec<(usize, usize, String)> = Vec::from($expected)
            .into_iter()
            .map(|(start, end, text): (usize, usize, &str)| {
                (start, end, text.to_string())
            })
            .collect();
        assert_eq!(expected, found, "pattern: {}", $pattern);
        // `is_match` and `matches` must agree.
        assert_eq!(!expected.is_empty(), re.is_match($input));
    }};
}

#[test]
fn star_matches_the_empty_input_once() {
    assert_matches!("a*", "", [(0, 0, "")]);
}

#[test]
fn star_produces_empty_matches_between_non_matches() {
    assert_matches!("a*", "aaab", [(0, 3, "aaa"), (3, 3, ""), (4, 4, "")]);
}

#[test]
fn quantified_group_keeps_the_last_capture() {
    let re = Regex::new("(a|b)+").unwrap();
    let matches = re.matches("abba").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text(), "abba");
    assert_eq!(matches[0].capture(1).unwrap().range(), 3..4);
    assert_eq!(matches[0].capture(1).unwrap().text(), "a");
}

#[test]
fn multiline_anchors_match_at_line_starts() {
    assert_matches!(
        "^foo",
        Options::new().multiline(true),
        "foo\nfoo",
        [(0, 3, "foo"), (4, 7, "foo")]
    );
    assert_matches!("^foo", "foo\nfoo", [(0, 3, "foo")]);
}

#[test]
fn backreference_matches_the_captured_text() {
    let re = Regex::new(r"(ab)\1").unwrap();
    let matches = re.matches("abab").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text(), "abab");
    assert_eq!(matches[0].capture(1).unwrap().text(), "ab");
}

#[test]
fn lazy_range_takes_the_minimum() {
    assert_matches!("a{2,3}?", "aaaa", [(0, 2, "aa"), (2, 4, "aa")]);
}

#[test]
fn greedy_range_takes_the_maximum() {
    assert_matches!("a{2,3}", "aaaa", [(0, 3, "aaa")]);
}

#[test]
fn negated_class_skips_digits() {
    assert_matches!(r"[^\d]+", "12ab34cd", [(2, 4, "ab"), (6, 8, "cd")]);
}

#[test]
fn dot_and_line_separators() {
    assert_matches!(
        ".",
        Options::new().dot_matches_line_separators(true),
        "a\nb",
        [(0, 1, "a"), (1, 2, "\n"), (2, 3, "b")]
    );
    assert_matches!(".", "a\nb", [(0, 1, "a"), (2, 3, "b")]);
}

#[test]
fn alternation_prefers_the_left_branch() {
    assert_matches!("ab|a", "ab", [(0, 2, "ab")]);
    assert_matches!("a|ab", "ab", [(0, 1, "a")]);
}

#[test]
fn matches_are_non_overlapping_and_leftmost() {
    assert_matches!("aa", "aaaa", [(0, 2, "aa"), (2, 4, "aa")]);
    assert_matches!("a+", "baaac", [(1, 4, "aaa")]);
}

#[test]
fn greedy_and_lazy_quantifiers() {
    assert_matches!("a.*b", "axbxb", [(0, 5, "axbxb")]);
    assert_matches!("a.*?b", "axbxb", [(0, 3, "axb")]);
    assert_matches!("a?", "a", [(0, 1, "a"), (1, 1, "")]);
    assert_matches!("a??", "a", [(0, 0, ""), (1, 1, "")]);
}

#[test]
fn case_insensitive_matching() {
    assert_matches!(
        "abc",
        Options::new().case_insensitive(true),
        "aBc AbC",
        [(0, 3, "aBc"), (4, 7, "AbC")]
    );
    assert_matches!(
        "[A-Z]+",
        Options::new().case_insensitive(true),
        "Hello",
        [(0, 5, "Hello")]
    );
    // Without the option, case matters.
    assert_matches!("abc", "aBc", []);
}

#[test]
fn unicode_categories() {
    assert_matches!(r"\p{Lu}+", "ABcD", [(0, 2, "AB"), (3, 4, "D")]);
    assert_matches!(r"\p{Nd}+", "a12b", [(1, 3, "12")]);
    assert_matches!(r"[\p{P}\p{S}]+", "a+b!?c", [(1, 2, "+"), (3, 5, "!?")]);
}

#[test]
fn offsets_are_character_offsets() {
    // Supplementary-plane scalars count as one position.
    assert_matches!(".", "😀x", [(0, 1, "😀"), (1, 2, "x")]);
    assert_matches!(r"\w+", "héllo wörld", [(0, 5, "héllo"), (6, 11, "wörld")]);
}

#[test]
fn word_class_covers_letters_digits_and_underscore() {
    assert_matches!(r"\w+", "a_1-b", [(0, 3, "a_1"), (4, 5, "b")]);
    assert_matches!(r"\W", "a-b", [(1, 2, "-")]);
}

#[test]
fn backreference_through_alternation() {
    assert_matches!(r"(a|b)\1", "aabbab", [(0, 2, "aa"), (2, 4, "bb")]);
}

#[test]
fn nested_groups_capture_independently() {
    let re = Regex::new("((a)b)").unwrap();
    assert_eq!(re.capture_group_count(), 2);
    let matches = re.matches("ab").unwrap();
    assert_eq!(matches[0].capture(1).unwrap().text(), "ab");
    assert_eq!(matches[0].capture(2).unwrap().text(), "a");
}

#[test]
fn unused_groups_report_no_capture() {
    let re = Regex::new("(a)|(b)").unwrap();
    let matches = re.matches("b").unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].capture(1).is_none());
    assert_eq!(matches[0].capture(2).unwrap().text(), "b");
}

#[test]
fn anchored_pattern_matches_once_per_window() {
    assert_matches!("^a*", "aab", [(0, 2, "aa")]);
    assert_matches!("^", "ab", [(0, 0, "")]);
}

#[test]
fn empty_lines_are_windows_too() {
    assert_matches!(
        "^a*",
        Options::new().multiline(true),
        "aa\n\nba",
        [(0, 2, "aa"), (3, 3, ""), (4, 4, "")]
    );
}

#[test]
fn find_returns_the_leftmost_match() {
    let re = Regex::new("b+").unwrap();
    let found = re.find("abbba").unwrap().unwrap();
    assert_eq!(found.range(), 1..4);
    assert!(re.find("xyz").unwrap().is_none());
}

#[test]
fn from_str_compiles_with_default_options() {
    let re: Regex = "a+".parse().unwrap();
    assert!(re.is_match("aaa"));
    assert!("(a".parse::<Regex>().is_err());
}

#[test]
fn compilation_is_idempotent() {
    let first = Regex::new("(a|b)*c{2,3}").unwrap();
    let second = Regex::new("(a|b)*c{2,3}").unwrap();
    assert_eq!(first.state_graph(), second.state_graph());
    assert_eq!(
        first.matches("abcc").unwrap(),
        second.matches("abcc").unwrap()
    );
}

#[test]
fn pattern_and_options_are_reported() {
    let options = Options::new().multiline(true);
    let re = Regex::with_options("a", options).unwrap();
    assert_eq!(re.pattern(), "a");
    assert_eq!(re.options(), options);
}

#[test]
fn escaped_metacharacters_are_literal() {
    assert_matches!(r"\(\d\+\)", "(1+)(2+)", [(0, 4, "(1+)"), (4, 8, "(2+)")]);
    assert_matches!(r"a\.b", "a.b axb", [(0, 3, "a.b")]);
}

#[test]
fn quantified_groups_recapture_per_iteration() {
    let re = Regex::new("(ab){2}").unwrap();
    let matches = re.matches("abab").unwrap();
    assert_eq!(matches[0].text(), "abab");
    // Both unrolled copies write group 1; the second one wins.
    assert_eq!(matches[0].capture(1).unwrap().range(), 2..4);
}

#[test]
fn open_range_quantifier() {
    assert_matches!("ab{1,}", "abbb ab a", [(0, 4, "abbb"), (5, 7, "ab")]);
    assert_matches!("a{2,}", "a aa aaa", [(2, 4, "aa"), (5, 8, "aaa")]);
}

#[test]
fn exact_range_quantifier() {
    assert_matches!("a{2}", "aaaa", [(0, 2, "aa"), (2, 4, "aa")]);
    assert_matches!("a{0}b", "b", [(0, 1, "b")]);
}
