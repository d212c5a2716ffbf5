use pretty_assertions::assert_eq;

use crate::compiler::compile;
use crate::parser::Parser;
use crate::regex::Options;

macro_rules! assert_graph {
    ($pattern:expr, $expected:expr) => {{
        assert_graph!($pattern, Options::new(), $expected);
    }};
    ($pattern:expr, $options:expr, $expected:expr) => {{
        let ast = Parser::new($pattern).parse().unwrap();
        let graph = compile(&ast, $options);
        assert_eq!($expected, graph.to_string());
    }};
}

#[test]
fn empty_expression() {
    assert_graph!(
        "",
        r#"
00000: EPSILON -> 00001
00001: MATCH
"#
    );
}

#[test]
fn concatenation() {
    assert_graph!(
        "ab",
        r#"
00000: LIT 'a' -> 00001
00001: EPSILON -> 00002
00002: LIT 'b' -> 00003
00003: MATCH
"#
    );
}

#[test]
fn greedy_star_tries_the_body_first() {
    assert_graph!(
        "a*",
        r#"
00000: EPSILON -> 00002
00000: EPSILON -> 00001
00001: MATCH
00002: LIT 'a' -> 00003
00003: EPSILON -> 00000
"#
    );
}

#[test]
fn lazy_star_tries_the_exit_first() {
    assert_graph!(
        "a*?",
        r#"
00000: EPSILON -> 00001
00000: EPSILON -> 00002
00001: MATCH
00002: LIT 'a' -> 00003
00003: EPSILON -> 00000
"#
    );
}

#[test]
fn plus_requires_one_pass() {
    assert_graph!(
        "a+",
        r#"
00000: LIT 'a' -> 00001
00001: EPSILON -> 00002
00002: EPSILON -> 00000
00002: EPSILON -> 00003
00003: MATCH
"#
    );
}

#[test]
fn alternation_prefers_the_left_branch() {
    assert_graph!(
        "a|b",
        r#"
00000: EPSILON -> 00001
00000: EPSILON -> 00003
00001: LIT 'a' -> 00002
00002: EPSILON -> 00005
00003: LIT 'b' -> 00004
00004: EPSILON -> 00005
00005: MATCH
"#
    );
}

#[test]
fn capturing_group_boundaries() {
    assert_graph!(
        r"(a)\1",
        r#"
00000: GROUP_START(1) -> 00001
00001: LIT 'a' -> 00002
00002: GROUP_END(1) -> 00003
00003: EPSILON -> 00004
00004: REF(1) -> 00005
00005: MATCH
"#
    );
}

#[test]
fn non_capturing_group_is_plain_epsilon() {
    assert_graph!(
        "(?:a)",
        r#"
00000: EPSILON -> 00001
00001: LIT 'a' -> 00002
00002: EPSILON -> 00003
00003: MATCH
"#
    );
}

#[test]
fn anchor_guards_the_entry() {
    assert_graph!(
        "^a",
        r#"
00000: ASSERT_START -> 00001
00001: LIT 'a' -> 00002
00002: MATCH
"#
    );
}

#[test]
fn closed_range_unrolls_with_optional_tail() {
    assert_graph!(
        "a{2,3}",
        r#"
00000: LIT 'a' -> 00001
00001: EPSILON -> 00002
00002: LIT 'a' -> 00003
00003: EPSILON -> 00004
00004: EPSILON -> 00006
00004: EPSILON -> 00005
00005: MATCH
00006: LIT 'a' -> 00007
00007: EPSILON -> 00005
"#
    );
}

#[test]
fn character_sets() {
    assert_graph!(
        r"[^a-c\d]",
        r#"
00000: SET [^a-c\d] -> 00001
00001: MATCH
"#
    );
    assert_graph!(
        r"[\w\p{Lu}]",
        r#"
00000: SET [\w\p{Lu}] -> 00001
00001: MATCH
"#
    );
}

#[test]
fn graph_invariants() {
    use crate::compiler::graph::Condition;

    let ast = Parser::new(r"^(a|b)*\1.").parse().unwrap();
    let graph = compile(&ast, Options::new());

    let mut end_states = 0;
    for state in graph.states() {
        if state.is_end {
            // Exactly one accepting state, with no way out of it.
            end_states += 1;
            assert!(state.transitions.is_empty());
        } else {
            // Every other state must lead somewhere.
            assert!(!state.transitions.is_empty());
        }
        for transition in state.transitions.iter() {
            let consuming = matches!(
                transition.condition,
                Condition::AnyCharacter { .. }
                    | Condition::Character(_)
                    | Condition::CharacterSet(_)
                    | Condition::Backreference { .. }
            );
            assert_eq!(!transition.is_epsilon(), consuming);
        }
    }
    assert_eq!(end_states, 1);
}

#[test]
fn dot_follows_the_line_separator_option() {
    assert_graph!(
        ".",
        r#"
00000: ANY -> 00001
00001: MATCH
"#
    );
    assert_graph!(
        ".",
        Options::new().dot_matches_line_separators(true),
        r#"
00000: ANY_NL -> 00001
00001: MATCH
"#
    );
}

#[test]
fn case_insensitive_compilation_folds_literals() {
    assert_graph!(
        "AB",
        Options::new().case_insensitive(true),
        r#"
00000: LIT 'a' -> 00001
00001: EPSILON -> 00002
00002: LIT 'b' -> 00003
00003: MATCH
"#
    );
    assert_graph!(
        "[A-Z]",
        Options::new().case_insensitive(true),
        r#"
00000: SET [a-z] -> 00001
00001: MATCH
"#
    );
}
