#![allow(dead_code)]

use ebnf::{Expr, Grammar, Rule, RuleKind};

/// Routes log records into test output when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rule(symbol: &str, id: &str, kind: RuleKind, expr: Expr) -> Rule {
    Rule::new(symbol, id, kind, expr)
}

pub fn sym(name: &str) -> Expr {
    Expr::SymbolRef(name.to_string())
}

pub fn lit(text: &str) -> Expr {
    Expr::Literal(text.to_string())
}

pub fn seq(children: Vec<Expr>) -> Expr {
    Expr::Sequence(children)
}

pub fn alt(children: Vec<Expr>) -> Expr {
    Expr::Alternation(children)
}

/// Asserts that `actual` holds exactly the expected rules, comparing
/// symbol, id, kind and expression while ignoring retained source text
/// and rule order. Dumps both grammars on mismatch.
pub fn assert_eq_rules(actual: &Grammar, expected: &[Rule]) {
    let mut actual_view: Vec<_> = actual.rules().map(view).collect();
    let mut expected_view: Vec<_> = expected.iter().map(view).collect();
    actual_view.sort();
    expected_view.sort();
    if actual_view != expected_view {
        eprintln!("actual grammar:");
        eprintln!("{}", actual.to_tree_string());
        eprintln!("expected grammar:");
        let expected_grammar: Grammar = expected.iter().cloned().collect();
        eprintln!("{}", expected_grammar.to_tree_string());
        panic!("rule lists differ");
    }
}

fn view(rule: &Rule) -> (String, String, String, String) {
    (
        rule.symbol.clone().unwrap_or_default(),
        rule.id.to_string(),
        format!("{:?}", rule.kind),
        rule.expr.to_string(),
    )
}

/// Collects every symbol reference in an expression, depth first.
pub fn collect_refs(expr: &Expr, refs: &mut Vec<String>) {
    match expr {
        Expr::SymbolRef(name) => refs.push(name.clone()),
        Expr::Sequence(children) | Expr::Alternation(children) => {
            for child in children {
                collect_refs(child, refs);
            }
        }
        Expr::Difference(left, right) => {
            collect_refs(left, refs);
            collect_refs(right, refs);
        }
        Expr::Optional(inner) | Expr::ZeroOrMore(inner) | Expr::OneOrMore(inner) => {
            collect_refs(inner, refs)
        }
        _ => {}
    }
}
