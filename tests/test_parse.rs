mod support;

use ebnf::{parse_expression, Expr, Grammar, RuleKind};
use test_case::test_case;

use support::{alt, lit, seq, sym};

#[test]
fn parses_sequence_with_optional() {
    let grammar = Grammar::load("[1] foo ::= 'a' 'b'?").unwrap();
    assert_eq!(grammar.len(), 1);
    let rule = grammar.get("foo").unwrap();
    assert_eq!(rule.id.as_str(), "1");
    assert_eq!(rule.kind, RuleKind::Rule);
    assert_eq!(
        rule.expr,
        seq(vec![lit("a"), Expr::Optional(Box::new(lit("b")))])
    );
}

#[test_case("a | b c", alt(vec![sym("a"), seq(vec![sym("b"), sym("c")])]) ; "alternation binds looser than sequence")]
#[test_case("a - b", Expr::Difference(Box::new(sym("a")), Box::new(sym("b"))) ; "difference of two symbols")]
#[test_case("('a' | 'b')*", Expr::ZeroOrMore(Box::new(alt(vec![lit("a"), lit("b")]))) ; "grouped repetition")]
#[test_case("a?*", Expr::ZeroOrMore(Box::new(Expr::Optional(Box::new(sym("a"))))) ; "chained quantifiers")]
#[test_case("", seq(vec![]) ; "empty right hand side")]
#[test_case("@terminal_ref x", seq(vec![sym("@terminal_ref"), sym("x")]) ; "at reference")]
#[test_case("[0-9] #x41", seq(vec![Expr::CharRange("0-9".to_string()), Expr::HexCharRef("#x41".to_string())]) ; "char class and code point")]
fn parses_expression(text: &str, expected: Expr) {
    assert_eq!(parse_expression(text).unwrap(), expected);
}

#[test]
fn difference_is_left_associative() {
    assert_eq!(
        parse_expression("Char - 'a' - 'b'").unwrap(),
        Expr::Difference(
            Box::new(Expr::Difference(Box::new(sym("Char")), Box::new(lit("a")))),
            Box::new(lit("b")),
        )
    );
}

#[test_case("[1] NAME ::= a b", RuleKind::Terminal ; "uppercase symbol")]
#[test_case("[1] N4ME ::= a b", RuleKind::Terminal ; "uppercase symbol with digit")]
#[test_case("[1] name ::= 'n'", RuleKind::Terminal ; "bare literal body")]
#[test_case("[1] name ::= [a-z]", RuleKind::Terminal ; "bare char class body")]
#[test_case("[1] name ::= #x6E", RuleKind::Terminal ; "bare code point body")]
#[test_case("[1] name ::= a b", RuleKind::Rule ; "ordinary rule")]
fn classifies_rules(src: &str, kind: RuleKind) {
    let grammar = Grammar::load(src).unwrap();
    assert_eq!(grammar.rules().next().unwrap().kind, kind);
}

#[test]
fn terminals_directive_forces_kind() {
    let src = "[1] a ::= b\n@terminals\n[2] b ::= c d";
    let grammar = Grammar::load(src).unwrap();
    assert_eq!(grammar.get("a").unwrap().kind, RuleKind::Rule);
    assert_eq!(grammar.get("b").unwrap().kind, RuleKind::Terminal);
}

#[test]
fn pass_directive_defines_unnamed_rule() {
    let grammar = Grammar::load("[1] a ::= b\n@pass [#x20#x9]").unwrap();
    let pass = grammar
        .rules()
        .find(|rule| rule.kind == RuleKind::Pass)
        .unwrap();
    assert_eq!(pass.symbol, None);
    assert_eq!(pass.id.as_str(), "0.pass");
    assert_eq!(pass.expr, Expr::CharRange("#x20#x9".to_string()));
}

#[test]
fn origin_keeps_comments_that_parsing_strips() {
    let src = "[1] a ::= 'x' /* note */ b";
    let grammar = Grammar::load(src).unwrap();
    let rule = grammar.get("a").unwrap();
    assert_eq!(rule.expr, seq(vec![lit("x"), sym("b")]));
    assert_eq!(rule.origin.as_deref(), Some("[1] a ::= 'x' /* note */ b"));
}

#[test]
fn tolerates_one_trailing_close_paren() {
    assert_eq!(parse_expression("a )").unwrap(), sym("a"));
}

#[test]
fn rejects_other_trailing_tokens() {
    let err = parse_expression("a ) b").unwrap_err();
    assert!(err.reason.contains("unexpected trailing"), "{}", err);
}

#[test]
fn rejects_dangling_difference() {
    let err = parse_expression("a -").unwrap_err();
    assert!(err.reason.contains("without a right operand"), "{}", err);
}

#[test]
fn rejects_unterminated_literal() {
    let err = Grammar::load("[1] a ::= 'x").unwrap_err();
    assert_eq!(err.line, 1);
    assert!(err.reason.contains("unterminated string literal"), "{}", err);
}

#[test]
fn reports_line_of_failing_rule() {
    let err = Grammar::load("[1] a ::= b\n[2] x ::= $").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.reason.contains("unrecognized character"), "{}", err);
}

#[test]
fn rejects_duplicate_rule_ids() {
    let err = Grammar::load("[1] a ::= b\n[1] b ::= c").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.reason.contains("duplicate rule id 1"), "{}", err);
}

#[test]
fn rejects_a_second_pass_directive() {
    let err = Grammar::load("@pass [#x20]\n@pass [#x9]").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.reason.contains("duplicate @pass"), "{}", err);
}

#[test]
fn rules_load_in_source_order() {
    let src = "[3] c ::= d\n[1] a ::= b\n[2] b ::= c";
    let grammar = Grammar::load(src).unwrap();
    let ids: Vec<&str> = grammar.rules().map(|rule| rule.id.as_str()).collect();
    assert_eq!(ids, ["3", "1", "2"]);
}
