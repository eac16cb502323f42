//! Textual renderings of a grammar: a one-line-per-rule tree dump for
//! debugging and tests, and a Turtle (RDF) writer.

use std::fmt;
use std::fmt::Write;

use crate::expr::Expr;
use crate::grammar::{Grammar, RuleKind};

fn write_tagged(f: &mut fmt::Formatter, tag: &str, children: &[Expr]) -> fmt::Result {
    write!(f, "({}", tag)?;
    for child in children {
        write!(f, " {}", child)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Sequence(children) => write_tagged(f, "seq", children),
            Expr::Alternation(children) => write_tagged(f, "alt", children),
            Expr::Difference(left, right) => write!(f, "(diff {} {})", left, right),
            Expr::Optional(inner) => write!(f, "(opt {})", inner),
            Expr::ZeroOrMore(inner) => write!(f, "(star {})", inner),
            Expr::OneOrMore(inner) => write!(f, "(plus {})", inner),
            Expr::Literal(text) => write!(f, "'{}'", text),
            Expr::CharRange(spec) => write!(f, "(range [{}])", spec),
            Expr::HexCharRef(hex) => write!(f, "(hex {})", hex),
            Expr::SymbolRef(name) => write!(f, "{}", name),
        }
    }
}

fn kind_tag(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Rule => "rule",
        RuleKind::Terminal => "terminal",
        RuleKind::Pass => "pass",
    }
}

impl Grammar {
    /// Writes the grammar as one `(kind symbol id expr)` line per rule,
    /// in rule order. Unnamed rules show `-` in place of a symbol.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        for rule in self.rules() {
            writeln!(
                out,
                "({} {} {} {})",
                kind_tag(rule.kind),
                rule.symbol.as_deref().unwrap_or("-"),
                rule.id,
                rule.expr
            )
            .expect("writing to String failed");
        }
        out
    }
}

/// Renders a grammar in Turtle under a caller-supplied namespace.
///
/// Each rule with kind `rule` or `terminal` becomes one resource: the
/// id as `rdfs:label`, the symbol as `rdf:value`, the retained source
/// text as `rdfs:comment`, and the right-hand side as `g:seq`/`g:alt`/
/// `g:diff` lists or `g:opt`/`g:star`/`g:plus` blocks. Pass-through
/// rules are not written.
pub struct TurtleWriter<'a> {
    prefix: &'a str,
    base: &'a str,
}

impl<'a> TurtleWriter<'a> {
    /// Creates a writer for the namespace `prefix` bound to the URI
    /// `base`.
    pub fn new(prefix: &'a str, base: &'a str) -> Self {
        TurtleWriter { prefix, base }
    }

    /// Renders the whole grammar to a Turtle document.
    pub fn write_grammar(&self, grammar: &Grammar) -> String {
        let mut out = String::new();
        write_header(&mut out, self.prefix, self.base).expect("writing to String failed");
        for rule in grammar.rules() {
            if rule.kind == RuleKind::Pass {
                continue;
            }
            let Some(symbol) = rule.symbol.as_deref() else {
                continue;
            };
            writeln!(out).expect("writing to String failed");
            writeln!(out, "{}:{} rdfs:label \"{}\";", self.prefix, symbol, rule.id)
                .expect("writing to String failed");
            writeln!(out, "    rdf:value \"{}\";", symbol).expect("writing to String failed");
            if let Some(origin) = &rule.origin {
                writeln!(out, "    rdfs:comment \"\"\"{}\"\"\";", escape_comment(origin))
                    .expect("writing to String failed");
            }
            self.write_body(&mut out, &rule.expr);
        }
        out
    }

    fn write_body(&self, out: &mut String, expr: &Expr) {
        match expr {
            Expr::Sequence(children) => self.write_list(out, "seq", children),
            Expr::Alternation(children) => self.write_list(out, "alt", children),
            Expr::Difference(left, right) => {
                let body = format!(
                    "    g:diff (\n        {}\n        {}\n    ) .",
                    self.node(left),
                    self.node(right)
                );
                writeln!(out, "{}", body).expect("writing to String failed");
            }
            Expr::Optional(inner) => {
                writeln!(out, "    g:opt {} .", self.node(inner)).expect("writing to String failed")
            }
            Expr::ZeroOrMore(inner) => {
                writeln!(out, "    g:star {} .", self.node(inner)).expect("writing to String failed")
            }
            Expr::OneOrMore(inner) => {
                writeln!(out, "    g:plus {} .", self.node(inner)).expect("writing to String failed")
            }
            leaf => self.write_list(out, "seq", std::slice::from_ref(leaf)),
        }
    }

    fn write_list(&self, out: &mut String, tag: &str, children: &[Expr]) {
        writeln!(out, "    g:{} (", tag).expect("writing to String failed");
        for child in children {
            writeln!(out, "        {}", self.node(child)).expect("writing to String failed");
        }
        writeln!(out, "    ) .").expect("writing to String failed");
    }

    /// Renders one expression node inline; composites become blank
    /// nodes.
    fn node(&self, expr: &Expr) -> String {
        match expr {
            Expr::SymbolRef(name) => format!("{}:{}", self.prefix, name),
            Expr::Literal(text) => format!("\"{}\"", escape_literal(text)),
            Expr::CharRange(spec) => format!("\"[{}]\"", escape_char_class(spec)),
            Expr::HexCharRef(hex) => format!("\"{}\"", escape_char_class(hex)),
            Expr::Sequence(children) => self.blank_list("seq", children),
            Expr::Alternation(children) => self.blank_list("alt", children),
            Expr::Difference(left, right) => {
                format!("[ g:diff ( {} {} ) ]", self.node(left), self.node(right))
            }
            Expr::Optional(inner) => format!("[ g:opt {} ]", self.node(inner)),
            Expr::ZeroOrMore(inner) => format!("[ g:star {} ]", self.node(inner)),
            Expr::OneOrMore(inner) => format!("[ g:plus {} ]", self.node(inner)),
        }
    }

    fn blank_list(&self, tag: &str, children: &[Expr]) -> String {
        let items: Vec<String> = children.iter().map(|child| self.node(child)).collect();
        format!("[ g:{} ( {} ) ]", tag, items.join(" "))
    }
}

fn write_header(out: &mut String, prefix: &str, base: &str) -> fmt::Result {
    writeln!(
        out,
        "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> ."
    )?;
    writeln!(out, "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .")?;
    writeln!(out, "@prefix g: <http://www.w3.org/2001/02/bnf#> .")?;
    writeln!(out, "@prefix {}: <{}> .", prefix, base)
}

/// Escapes rule source text for a triple-quoted `rdfs:comment`.
fn escape_comment(text: &str) -> String {
    let mut escaped = text
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"");
    if escaped.starts_with('"') {
        escaped.insert(0, '\\');
    }
    if escaped.ends_with('"') && !escaped.ends_with("\\\"") {
        escaped.insert(escaped.len() - 1, '\\');
    }
    escaped
}

fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escapes a character-class body for a Turtle string. Every `#xHHHH`
/// run becomes a `\uHHHH` or `\UHHHHHHHH` escape depending on its
/// digit count; everything else, a leading `^` included, is kept as
/// written.
fn escape_char_class(spec: &str) -> String {
    let mut out = String::new();
    let mut rest = spec;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("#x") {
            let end = tail
                .find(|ch: char| !ch.is_ascii_hexdigit())
                .unwrap_or(tail.len())
                .min(8);
            if end > 0 {
                let digits = &tail[..end];
                if digits.len() <= 4 {
                    write!(out, "\\u{:0>4}", digits).expect("writing to String failed");
                } else {
                    write!(out, "\\U{:0>8}", digits).expect("writing to String failed");
                }
                rest = &tail[end..];
                continue;
            }
        }
        let Some(ch) = rest.chars().next() else { break };
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
        rest = &rest[ch.len_utf8()..];
    }
    out
}
