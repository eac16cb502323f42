mod support;

use ebnf::{Expr, Grammar, RuleKind};
use test_case::test_case;

use support::{alt, assert_eq_rules, init_logging, lit, rule, seq, sym};

#[test]
fn splits_an_optional_literal_out_of_a_sequence() {
    init_logging();
    let grammar = Grammar::load("[1] foo ::= 'a' 'b'?").unwrap().normalize();
    assert_eq_rules(
        &grammar,
        &[
            rule("empty", "0", RuleKind::Rule, seq(vec![])),
            rule(
                "foo",
                "1",
                RuleKind::Rule,
                seq(vec![lit("a"), sym("_foo_1")]),
            ),
            rule(
                "_foo_1",
                "1.1",
                RuleKind::Rule,
                alt(vec![sym("empty"), sym("_foo_1_term1")]),
            ),
            rule("_foo_1_term1", "1.1.term1", RuleKind::Terminal, lit("b")),
        ],
    );
}

#[test]
fn rewrites_repetition_into_a_self_referential_pair() {
    let grammar = Grammar::load("[2] bar ::= 'x'*").unwrap().normalize();
    assert_eq_rules(
        &grammar,
        &[
            rule("empty", "0", RuleKind::Rule, seq(vec![])),
            rule(
                "bar",
                "2",
                RuleKind::Rule,
                alt(vec![sym("empty"), sym("_bar_star")]),
            ),
            rule("_bar_term1", "2.term1", RuleKind::Terminal, lit("x")),
            rule(
                "_bar_star",
                "2*",
                RuleKind::Rule,
                seq(vec![sym("_bar_term1"), sym("bar")]),
            ),
        ],
    );
}

#[test]
fn extracts_every_literal_arm_of_an_alternation() {
    let grammar = Grammar::load("[3] baz ::= 'a' | 'b' | 'c'")
        .unwrap()
        .normalize();
    assert_eq_rules(
        &grammar,
        &[
            rule("empty", "0", RuleKind::Rule, seq(vec![])),
            rule(
                "baz",
                "3",
                RuleKind::Rule,
                alt(vec![
                    sym("_baz_term1"),
                    sym("_baz_term2"),
                    sym("_baz_term3"),
                ]),
            ),
            rule("_baz_term1", "3.term1", RuleKind::Terminal, lit("a")),
            rule("_baz_term2", "3.term2", RuleKind::Terminal, lit("b")),
            rule("_baz_term3", "3.term3", RuleKind::Terminal, lit("c")),
        ],
    );
}

#[test]
fn rewrites_one_or_more_through_repetition() {
    let grammar = Grammar::load("[4] list ::= item+").unwrap().normalize();
    assert_eq_rules(
        &grammar,
        &[
            rule("empty", "0", RuleKind::Rule, seq(vec![])),
            rule(
                "list",
                "4",
                RuleKind::Rule,
                seq(vec![sym("item"), sym("_list_1")]),
            ),
            rule(
                "_list_1",
                "4.1",
                RuleKind::Rule,
                alt(vec![sym("empty"), sym("_list_1_star")]),
            ),
            rule(
                "_list_1_star",
                "4.1*",
                RuleKind::Rule,
                seq(vec![sym("item"), sym("_list_1")]),
            ),
        ],
    );
}

#[test]
fn keeps_terminal_and_pass_rules_unchanged() {
    let src = "[1] a ::= W\n@terminals\n[2] W ::= 'w'?\n@pass [#x20]";
    let grammar = Grammar::load(src).unwrap().normalize();
    let terminal = grammar.get("W").unwrap();
    assert_eq!(terminal.kind, RuleKind::Terminal);
    assert_eq!(terminal.expr, Expr::Optional(Box::new(lit("w"))));
    let pass = grammar
        .rules()
        .find(|rule| rule.kind == RuleKind::Pass)
        .unwrap();
    assert_eq!(pass.expr, Expr::CharRange("#x20".to_string()));
}

#[test_case("[1] a ::= ('x' | y)+ (z - 'q')?" ; "nested grouping")]
#[test_case("[1] a ::= b? c* d+" ; "quantifier row")]
#[test_case("[1] a ::= ((a1 | b1) c1)*" ; "deep nesting")]
#[test_case("[1] a ::= 'lone'" ; "bare literal")]
#[test_case("[1] a ::= " ; "empty production")]
fn normalized_rules_are_flat(src: &str) {
    let grammar = Grammar::load(src).unwrap().normalize();
    for rule in grammar.rules() {
        assert!(
            rule.expr.is_flat(),
            "rule {} is not flat: {}",
            rule.id,
            rule.expr
        );
    }
}

#[test]
fn normalizing_twice_changes_nothing() {
    let src = "[1] doc ::= header body*\n[2] header ::= 'h' | 'H'\n[3] body ::= [a-z]+ '.'?";
    let once = Grammar::load(src).unwrap().normalize();
    let twice = once.clone().normalize();
    assert_eq!(once, twice);
}

#[test]
fn rule_ids_stay_unique() {
    let src = "[1] a ::= b? c? d?\n[2] b ::= 'x'* 'y'*";
    let grammar = Grammar::load(src).unwrap().normalize();
    let mut ids: Vec<&str> = grammar.rules().map(|rule| rule.id.as_str()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
