//! Tokenizer and recursive-descent parser for the EBNF notation, and
//! the loader that turns whole grammar files into a [`Grammar`].
//!
//! Rule right-hand sides use the W3C notation: `|` for alternation,
//! juxtaposition for sequencing, `-` for difference, the postfix
//! quantifiers `? * +`, parentheses for grouping, quoted literals,
//! `[...]` character classes and `#xHHHH` code point references.

use std::fmt;
use std::mem;

use log::trace;

use crate::expr::Expr;
use crate::grammar::{Grammar, Rule, RuleId, RuleKind};
use crate::segment::{segment, Segment};

/// An error while loading a grammar.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    /// What went wrong.
    pub reason: String,
    /// One-indexed line of the offending span, or 0 when the error is
    /// not tied to a location.
    pub line: u32,
    /// The text near the error.
    pub text: String,
}

impl ParseError {
    fn new(reason: impl Into<String>, text: &str) -> Self {
        ParseError {
            reason: reason.into(),
            line: 0,
            text: text.trim().to_string(),
        }
    }

    fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}: {} near {:?}",
            self.line, self.reason, self.text
        )
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    Literal(String),
    CharRange(String),
    HexCharRef(String),
    Symbol(String),
    Op(char),
    End,
}

/// Reads one token off the front of `input`, returning it with the
/// remaining suffix.
fn next_token(input: &str) -> Result<(Token, &str), ParseError> {
    let rest = input.trim_start();
    let Some(ch) = rest.chars().next() else {
        return Ok((Token::End, rest));
    };
    match ch {
        '\'' | '"' => match rest[1..].find(ch) {
            Some(at) => Ok((
                Token::Literal(rest[1..1 + at].to_string()),
                &rest[1 + at + 1..],
            )),
            None => Err(ParseError::new("unterminated string literal", rest)),
        },
        '[' => match rest[1..].find(']') {
            Some(at) => Ok((
                Token::CharRange(rest[1..1 + at].to_string()),
                &rest[1 + at + 1..],
            )),
            None => Err(ParseError::new("unterminated character class", rest)),
        },
        '#' => {
            let Some(tail) = rest.strip_prefix("#x") else {
                return Err(ParseError::new("malformed code point reference", rest));
            };
            let end = tail
                .find(|c: char| !c.is_ascii_hexdigit())
                .unwrap_or(tail.len());
            if end == 0 {
                return Err(ParseError::new("malformed code point reference", rest));
            }
            Ok((
                Token::HexCharRef(rest[..2 + end].to_string()),
                &rest[2 + end..],
            ))
        }
        '@' => {
            let tail = &rest[1..];
            let end = tail
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(tail.len());
            if end == 0 {
                return Err(ParseError::new("stray @ without a name", rest));
            }
            Ok((Token::Symbol(rest[..1 + end].to_string()), &rest[1 + end..]))
        }
        '|' | '-' | '?' | '+' | '*' | '(' | ')' => Ok((Token::Op(ch), &rest[1..])),
        _ if ch.is_ascii_alphabetic() => {
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            Ok((Token::Symbol(rest[..end].to_string()), &rest[end..]))
        }
        _ => Err(ParseError::new(
            format!("unrecognized character {:?}", ch),
            rest,
        )),
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Literal(text) => format!("literal '{}'", text),
        Token::CharRange(spec) => format!("character class [{}]", spec),
        Token::HexCharRef(hex) => format!("code point {}", hex),
        Token::Symbol(name) => format!("symbol {}", name),
        Token::Op(op) => format!("operator {:?}", op),
        Token::End => "end of expression".to_string(),
    }
}

/// Recursive descent over one right-hand-side expression, one token of
/// lookahead.
struct ExprParser<'a> {
    cur: Token,
    rest: &'a str,
}

impl<'a> ExprParser<'a> {
    fn new(text: &'a str) -> Result<Self, ParseError> {
        let (cur, rest) = next_token(text)?;
        Ok(ExprParser { cur, rest })
    }

    fn bump(&mut self) -> Result<Token, ParseError> {
        let (next, rest) = next_token(self.rest)?;
        self.rest = rest;
        Ok(mem::replace(&mut self.cur, next))
    }

    fn alternation(&mut self) -> Result<Expr, ParseError> {
        let mut arms = vec![self.sequence()?];
        while self.cur == Token::Op('|') {
            self.bump()?;
            arms.push(self.sequence()?);
        }
        if arms.len() == 1 {
            Ok(arms.swap_remove(0))
        } else {
            Ok(Expr::Alternation(arms))
        }
    }

    fn sequence(&mut self) -> Result<Expr, ParseError> {
        let mut items = vec![];
        while !matches!(self.cur, Token::End | Token::Op('|') | Token::Op(')')) {
            items.push(self.difference()?);
        }
        if items.len() == 1 {
            Ok(items.swap_remove(0))
        } else {
            Ok(Expr::Sequence(items))
        }
    }

    fn difference(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.postfix()?;
        while self.cur == Token::Op('-') {
            self.bump()?;
            if matches!(self.cur, Token::End | Token::Op('|') | Token::Op(')')) {
                return Err(ParseError::new(
                    "difference operator without a right operand",
                    self.rest,
                ));
            }
            let right = self.postfix()?;
            left = Expr::Difference(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut inner = self.primary()?;
        loop {
            inner = match self.cur {
                Token::Op('?') => Expr::Optional(Box::new(inner)),
                Token::Op('*') => Expr::ZeroOrMore(Box::new(inner)),
                Token::Op('+') => Expr::OneOrMore(Box::new(inner)),
                _ => return Ok(inner),
            };
            self.bump()?;
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.bump()? {
            Token::Literal(text) => Ok(Expr::Literal(text)),
            Token::CharRange(spec) => Ok(Expr::CharRange(spec)),
            Token::HexCharRef(hex) => Ok(Expr::HexCharRef(hex)),
            Token::Symbol(name) => Ok(Expr::SymbolRef(name)),
            Token::Op('(') => {
                let inner = self.alternation()?;
                match self.bump()? {
                    Token::Op(')') => Ok(inner),
                    other => Err(ParseError::new(
                        format!("expected closing parenthesis, found {}", describe(&other)),
                        self.rest,
                    )),
                }
            }
            Token::End => Err(ParseError::new("unexpected end of expression", self.rest)),
            other => Err(ParseError::new(
                format!("unexpected {}", describe(&other)),
                self.rest,
            )),
        }
    }
}

/// Parses one right-hand-side expression into an operator tree.
///
/// An empty expression parses to an empty [`Expr::Sequence`]. One
/// stray closing parenthesis at the end is tolerated; anything else
/// left over after the top-level alternation is an error.
pub fn parse_expression(text: &str) -> Result<Expr, ParseError> {
    let mut parser = ExprParser::new(text)?;
    let expr = parser.alternation()?;
    if parser.cur == Token::Op(')') {
        parser.bump()?;
    }
    if parser.cur != Token::End {
        return Err(ParseError::new(
            format!("unexpected trailing {}", describe(&parser.cur)),
            text,
        ));
    }
    Ok(expr)
}

/// Splits a rule span into its id, symbol and right-hand-side text.
fn split_header(text: &str) -> Result<(RuleId, String, &str), ParseError> {
    let malformed = || ParseError::new("malformed rule header", text);
    let content = text.strip_prefix('[').ok_or_else(malformed)?;
    let (id, after) = content.split_once(']').ok_or_else(malformed)?;
    let after = after.trim_start();
    let sym_len = after
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .unwrap_or(after.len());
    if sym_len == 0 {
        return Err(malformed());
    }
    let symbol = after[..sym_len].to_string();
    let rhs = after[sym_len..]
        .trim_start()
        .strip_prefix("::=")
        .ok_or_else(malformed)?;
    Ok((RuleId::new(id.trim()), symbol, rhs))
}

/// A symbol names a terminal when it has letters and none of them is
/// lowercase.
fn is_terminal_name(symbol: &str) -> bool {
    let mut has_letter = false;
    for ch in symbol.chars() {
        if ch.is_lowercase() {
            return false;
        }
        has_letter |= ch.is_alphabetic();
    }
    has_letter
}

fn classify(symbol: &str, expr: &Expr, force_terminal: bool) -> RuleKind {
    if force_terminal || expr.is_terminal_leaf() || is_terminal_name(symbol) {
        RuleKind::Terminal
    } else {
        RuleKind::Rule
    }
}

impl Grammar {
    /// Loads a grammar from EBNF notation text.
    ///
    /// Rules appear in source order. Rules after an `@terminals`
    /// directive are terminals regardless of their name; an `@pass`
    /// expression becomes an unnamed rule with id `0.pass`. A repeated
    /// rule id or `@pass` directive is an error.
    pub fn load(src: &str) -> Result<Grammar, ParseError> {
        let mut grammar = Grammar::new();
        let mut force_terminal = false;
        for span in segment(src) {
            match span {
                Segment::Rule { line, text, origin } => {
                    let (id, symbol, rhs) =
                        split_header(&text).map_err(|err| err.at_line(line))?;
                    if grammar.rules().any(|existing| existing.id == id) {
                        return Err(
                            ParseError::new(format!("duplicate rule id {}", id), &text)
                                .at_line(line),
                        );
                    }
                    let expr = parse_expression(rhs).map_err(|err| err.at_line(line))?;
                    let kind = classify(&symbol, &expr, force_terminal);
                    trace!("loaded rule [{}] {} as {:?}", id, symbol, kind);
                    let mut rule = Rule::new(symbol, id, kind, expr);
                    rule.origin = Some(origin);
                    grammar.add_rule(rule);
                }
                Segment::Terminals { line } => {
                    trace!("line {}: rules below are terminals", line);
                    force_terminal = true;
                }
                Segment::Pass { line, text, origin } => {
                    if grammar.rules().any(|existing| existing.id.as_str() == "0.pass") {
                        return Err(ParseError::new("duplicate @pass directive", &text)
                            .at_line(line));
                    }
                    let expr = parse_expression(&text).map_err(|err| err.at_line(line))?;
                    grammar.add_rule(Rule {
                        symbol: None,
                        id: RuleId::new("0.pass"),
                        kind: RuleKind::Pass,
                        expr,
                        origin: Some(origin),
                    });
                }
            }
        }
        Ok(grammar)
    }
}
