//! Splits raw grammar text into per-rule and per-directive spans.
//!
//! A span begins at a `[id]` rule marker or at the `@terminals` /
//! `@pass` directives and runs to the start of the next span. Comments
//! are stripped from the expression text but kept in the original text
//! retained for provenance. Only the line number of each span's start
//! is tracked; diagnostics within a rule are approximate.

use log::debug;

/// One span of grammar source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// A rule definition beginning with a `[id]` marker.
    Rule {
        /// One-indexed line where the span starts.
        line: u32,
        /// Span text with comments stripped.
        text: String,
        /// Original span text, comments included.
        origin: String,
    },
    /// The `@terminals` directive. Every rule defined after it is a
    /// terminal, whatever its name looks like.
    Terminals {
        /// One-indexed line of the directive.
        line: u32,
    },
    /// The `@pass` directive and its expression.
    Pass {
        /// One-indexed line where the span starts.
        line: u32,
        /// Expression text with comments stripped.
        text: String,
        /// Original span text, comments included.
        origin: String,
    },
}

enum SpanKind {
    Rule,
    Pass,
}

struct SpanBuf {
    kind: SpanKind,
    line: u32,
    text: String,
    origin: String,
}

struct Scanner<'a> {
    rest: &'a str,
    line: u32,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner { rest: src, line: 1 }
    }

    /// Advances by `len` bytes, counting newlines, and returns the text
    /// passed over.
    fn advance(&mut self, len: usize) -> &'a str {
        let (taken, rest) = self.rest.split_at(len);
        self.line += taken.bytes().filter(|&b| b == b'\n').count() as u32;
        self.rest = rest;
        taken
    }
}

/// Splits grammar text into rule and directive spans, in source order.
///
/// Text before the first marker is ignored, as is anything that fails
/// to begin a span; the notation is permissive and errors surface
/// later, when each span is parsed.
pub fn segment(src: &str) -> Vec<Segment> {
    let mut segments = vec![];
    let mut scanner = Scanner::new(src);
    let mut cur: Option<SpanBuf> = None;

    while !scanner.rest.is_empty() {
        let rest = scanner.rest;
        if is_rule_start(rest) {
            flush(&mut segments, cur.take());
            let mut buf = SpanBuf {
                kind: SpanKind::Rule,
                line: scanner.line,
                text: String::new(),
                origin: String::new(),
            };
            // Consume the `[` here so the marker cannot retrigger.
            let taken = scanner.advance(1);
            buf.text.push_str(taken);
            buf.origin.push_str(taken);
            cur = Some(buf);
            continue;
        }
        if let Some(len) = directive_len(rest, "@terminals") {
            flush(&mut segments, cur.take());
            segments.push(Segment::Terminals {
                line: scanner.line,
            });
            scanner.advance(len);
            continue;
        }
        if let Some(len) = directive_len(rest, "@pass") {
            flush(&mut segments, cur.take());
            cur = Some(SpanBuf {
                kind: SpanKind::Pass,
                line: scanner.line,
                text: String::new(),
                origin: "@pass".to_string(),
            });
            scanner.advance(len);
            continue;
        }
        if rest.starts_with("/*") {
            // Comments do not nest.
            let len = rest.find("*/").map(|at| at + 2).unwrap_or(rest.len());
            let taken = scanner.advance(len);
            if let Some(buf) = cur.as_mut() {
                buf.origin.push_str(taken);
                buf.text.push(' ');
            }
            continue;
        }
        // Quoted strings and character classes are copied opaquely so
        // that their content cannot start a span or open a comment.
        let len = match rest.as_bytes()[0] {
            b'\'' | b'"' => delimited_len(rest, rest.as_bytes()[0] as char),
            b'[' => rest.find(']').map(|at| at + 1).unwrap_or(rest.len()),
            _ => rest.chars().next().map(char::len_utf8).unwrap_or(0),
        };
        let taken = scanner.advance(len);
        if let Some(buf) = cur.as_mut() {
            buf.text.push_str(taken);
            buf.origin.push_str(taken);
        }
    }
    flush(&mut segments, cur.take());
    debug!("segmented {} spans", segments.len());
    segments
}

fn flush(segments: &mut Vec<Segment>, buf: Option<SpanBuf>) {
    let Some(buf) = buf else { return };
    let text = buf.text.trim().to_string();
    let origin = buf.origin.trim().to_string();
    segments.push(match buf.kind {
        SpanKind::Rule => Segment::Rule {
            line: buf.line,
            text,
            origin,
        },
        SpanKind::Pass => Segment::Pass {
            line: buf.line,
            text,
            origin,
        },
    });
}

/// Length of a quoted token including both delimiters, or the whole
/// remaining text when the closing quote is missing.
fn delimited_len(rest: &str, quote: char) -> usize {
    match rest[1..].find(quote) {
        Some(at) => at + 1 + quote.len_utf8(),
        None => rest.len(),
    }
}

/// A `[` starts a rule only when its bracketed content is a dotted rule
/// number followed by a symbol name and `::=`. Any other `[` is
/// character-class text.
fn is_rule_start(rest: &str) -> bool {
    let Some(content) = rest.strip_prefix('[') else {
        return false;
    };
    let Some(end) = content.find(']') else {
        return false;
    };
    let id = &content[..end];
    if id.is_empty() || !id.as_bytes()[0].is_ascii_digit() {
        return false;
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '.')
    {
        return false;
    }
    let after = content[end + 1..].trim_start();
    let sym_len = after
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .unwrap_or(after.len());
    if sym_len == 0 || !after.as_bytes()[0].is_ascii_alphabetic() {
        return false;
    }
    after[sym_len..].trim_start().starts_with("::=")
}

fn directive_len(rest: &str, name: &str) -> Option<usize> {
    let tail = rest.strip_prefix(name)?;
    match tail.chars().next() {
        Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => None,
        _ => Some(name.len()),
    }
}
