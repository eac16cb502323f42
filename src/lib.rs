//! Normalizes W3C-style EBNF grammars into plain BNF.
//!
//! Grammars in the notation used by the XML, SPARQL and Turtle
//! specifications are loaded into an operator-tree form, rewritten
//! into flat BNF productions, consolidated so that structurally equal
//! terminal rules merge, and rendered as a tree dump or a Turtle
//! document.
//!
//! ```
//! use ebnf::Grammar;
//!
//! let src = "[1] greeting ::= 'hello'? name\n[2] name ::= [a-z]+";
//! let mut grammar = Grammar::load(src)?.normalize();
//! grammar.consolidate();
//! assert!(grammar.rules().all(|rule| rule.expr.is_flat()));
//! # Ok::<(), ebnf::ParseError>(())
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod consolidate;
mod expr;
mod grammar;
mod normalize;
mod parse;
mod segment;
mod serialize;

pub use crate::expr::Expr;
pub use crate::grammar::{Grammar, Rule, RuleId, RuleKind};
pub use crate::normalize::EbnfToProductions;
pub use crate::parse::{parse_expression, ParseError};
pub use crate::segment::{segment, Segment};
pub use crate::serialize::TurtleWriter;
