//! Rewrites EBNF operator trees into flat BNF productions.
//!
//! Every rule with quantifiers, grouping or inline literals is split
//! into a chain of synthesized rules until each right-hand side is an
//! alternation of sequences over symbol references and terminal
//! leaves. Optional parts reference the distinguished `empty` rule;
//! repetition becomes a self-referential `_star` rule pair.

use std::mem;

use log::debug;

use crate::expr::Expr;
use crate::grammar::{Grammar, Rule, RuleId, RuleKind};

/// Per-parent counters for synthesized names. Scoped to one rule's
/// rewrite; synthesized rules restart from zero.
#[derive(Default)]
struct SplitCounters {
    sub: u32,
    term: u32,
}

/// The distinguished empty production, target of every optional part.
fn empty_rule() -> Rule {
    Rule::new("empty", "0", RuleKind::Rule, Expr::Sequence(vec![]))
}

/// Symbols synthesized from `parent` gain one leading underscore.
fn mangle(parent: &str, suffix: &str) -> String {
    if parent.starts_with('_') {
        format!("{}{}", parent, suffix)
    } else {
        format!("_{}{}", parent, suffix)
    }
}

/// Rewrites rules into BNF productions, accumulating the result.
#[derive(Default)]
pub struct EbnfToProductions {
    output: Vec<Rule>,
}

impl EbnfToProductions {
    /// Creates an empty rewrite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites a whole grammar, prepending the `empty` rule.
    pub fn rewrite_grammar(mut self, grammar: Grammar) -> Grammar {
        if !grammar.rules().any(|rule| rule.id.as_str() == "0") {
            self.output.push(empty_rule());
        }
        for rule in grammar.into_rules() {
            self.rewrite(rule);
        }
        self.output.into_iter().collect()
    }

    /// Rewrites one rule. Terminal and pass-through rules pass
    /// unchanged.
    pub fn rewrite(&mut self, rule: Rule) {
        if rule.kind != RuleKind::Rule {
            self.output.push(rule);
            return;
        }
        let mut counters = SplitCounters::default();
        self.reduce(rule, &mut counters);
    }

    fn reduce(&mut self, mut rule: Rule, counters: &mut SplitCounters) {
        loop {
            let parent_symbol = rule.symbol.clone().unwrap_or_default();
            let parent_id = rule.id.clone();

            // Nested operators first: each composite child moves into
            // its own synthesized rule.
            if rule.expr.has_composite_child() {
                rule.expr.for_each_child_mut(&mut |child| {
                    if child.is_composite() {
                        let extracted = mem::replace(child, Expr::Sequence(vec![]));
                        let symbol =
                            self.extract_sub(&parent_symbol, &parent_id, extracted, counters);
                        *child = Expr::SymbolRef(symbol);
                    }
                });
                continue;
            }

            // A literal operand under a quantifier gets its own
            // terminal rule before the quantifier is rewritten, so the
            // rewrite products reference it by name.
            if let Expr::Optional(inner) | Expr::ZeroOrMore(inner) | Expr::OneOrMore(inner) =
                &mut rule.expr
            {
                if inner.is_terminal_leaf() {
                    let leaf = mem::replace(&mut **inner, Expr::Sequence(vec![]));
                    let symbol = self.extract_term(&parent_symbol, &parent_id, leaf, counters);
                    **inner = Expr::SymbolRef(symbol);
                }
            }

            match mem::replace(&mut rule.expr, Expr::Sequence(vec![])) {
                Expr::Optional(inner) => {
                    debug!("[{}] {}: optional part", parent_id, parent_symbol);
                    rule.expr =
                        Expr::Alternation(vec![Expr::SymbolRef("empty".to_string()), *inner]);
                }
                Expr::ZeroOrMore(inner) => {
                    debug!("[{}] {}: repetition", parent_id, parent_symbol);
                    let star_symbol = mangle(&parent_symbol, "_star");
                    let star = Rule::new(
                        star_symbol.clone(),
                        parent_id.child("*"),
                        RuleKind::Rule,
                        Expr::Sequence(vec![*inner, Expr::SymbolRef(parent_symbol.clone())]),
                    );
                    self.rewrite(star);
                    rule.expr = Expr::Alternation(vec![
                        Expr::SymbolRef("empty".to_string()),
                        Expr::SymbolRef(star_symbol),
                    ]);
                }
                Expr::OneOrMore(inner) => {
                    debug!("[{}] {}: one-or-more", parent_id, parent_symbol);
                    rule.expr =
                        Expr::Sequence(vec![(*inner).clone(), Expr::ZeroOrMore(inner)]);
                }
                Expr::Alternation(arms) if arms.iter().any(Expr::is_terminal_leaf) => {
                    let arms = arms
                        .into_iter()
                        .map(|arm| {
                            if arm.is_terminal_leaf() {
                                let symbol =
                                    self.extract_term(&parent_symbol, &parent_id, arm, counters);
                                Expr::SymbolRef(symbol)
                            } else {
                                arm
                            }
                        })
                        .collect();
                    rule.expr = Expr::Alternation(arms);
                }
                expr => {
                    rule.expr = expr;
                    self.output.push(rule);
                    return;
                }
            }
        }
    }

    /// Moves an extracted sub-expression into a synthesized rule and
    /// rewrites it in turn.
    fn extract_sub(
        &mut self,
        parent_symbol: &str,
        parent_id: &RuleId,
        expr: Expr,
        counters: &mut SplitCounters,
    ) -> String {
        counters.sub += 1;
        let symbol = mangle(parent_symbol, &format!("_{}", counters.sub));
        let id = parent_id.child(&format!(".{}", counters.sub));
        debug!("[{}] {}: split out of {}", id, symbol, parent_symbol);
        self.rewrite(Rule::new(symbol.clone(), id, RuleKind::Rule, expr));
        symbol
    }

    /// Moves an inline literal into a synthesized terminal rule.
    fn extract_term(
        &mut self,
        parent_symbol: &str,
        parent_id: &RuleId,
        leaf: Expr,
        counters: &mut SplitCounters,
    ) -> String {
        counters.term += 1;
        let symbol = mangle(parent_symbol, &format!("_term{}", counters.term));
        let id = parent_id.child(&format!(".term{}", counters.term));
        debug!("[{}] {}: literal out of {}", id, symbol, parent_symbol);
        self.output
            .push(Rule::new(symbol.clone(), id, RuleKind::Terminal, leaf));
        symbol
    }
}

impl Grammar {
    /// Rewrites every rule into flat BNF form, prepending the `empty`
    /// rule. See [`EbnfToProductions`].
    pub fn normalize(self) -> Grammar {
        EbnfToProductions::new().rewrite_grammar(self)
    }
}
