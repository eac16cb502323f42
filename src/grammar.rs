//! Definitions of the grammar type and its rules. Each rule carries a
//! dotted numeric identifier which defines the order of the final
//! grammar, a classification, and the operator tree of its right-hand
//! side.

use std::cmp::Ordering;
use std::fmt;

use crate::expr::Expr;

/// A dotted rule identifier such as `12`, `12.1`, `2*` or `12.1.term1`.
///
/// Identifiers order by their leading numeric component first; ties are
/// broken by comparing the full text lexicographically.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleId(String);

impl RuleId {
    /// Creates an identifier from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        RuleId(id.into())
    }

    /// Returns the textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives a child identifier by appending a suffix, such as `.1`,
    /// `.term2` or `*`.
    pub fn child(&self, suffix: &str) -> RuleId {
        RuleId(format!("{}{}", self.0, suffix))
    }

    fn leading_number(&self) -> u64 {
        let digits: &str = {
            let end = self
                .0
                .find(|ch: char| !ch.is_ascii_digit())
                .unwrap_or(self.0.len());
            &self.0[..end]
        };
        digits.parse().unwrap_or(0)
    }
}

impl Ord for RuleId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.leading_number()
            .cmp(&other.leading_number())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for RuleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        RuleId::new(id)
    }
}

/// Classification of a rule.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleKind {
    /// An ordinary nonterminal production.
    Rule,
    /// A rule whose right-hand side denotes literal text or characters.
    Terminal,
    /// The pass-through rule defined with `@pass`, matched between
    /// tokens and discarded.
    Pass,
}

/// One named production.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    /// The grammar symbol this rule defines. `None` only for the
    /// pass-through rule.
    pub symbol: Option<String>,
    /// The rule's identifier.
    pub id: RuleId,
    /// The rule's classification.
    pub kind: RuleKind,
    /// The right-hand-side operator tree.
    pub expr: Expr,
    /// The original source text of the rule, retained for provenance.
    /// Never consulted by any transformation.
    pub origin: Option<String>,
}

impl Rule {
    /// Creates a new named rule with no retained source text.
    pub fn new(symbol: impl Into<String>, id: impl Into<RuleId>, kind: RuleKind, expr: Expr) -> Self {
        Rule {
            symbol: Some(symbol.into()),
            id: id.into(),
            kind,
            expr,
            origin: None,
        }
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        RuleId::new(id)
    }
}

/// An ordered collection of rules. No two rules share an identifier.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grammar {
    /// The array of rules.
    rules: Vec<Rule>,
}

impl Grammar {
    /// Creates an empty grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule to this grammar.
    pub fn add_rule(&mut self, rule: Rule) {
        debug_assert!(
            self.rules.iter().all(|existing| existing.id != rule.id),
            "duplicate rule id {}",
            rule.id
        );
        self.rules.push(rule);
    }

    /// Returns an iterator over the list of rules.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Returns an iterator over mutable references to the rules.
    pub fn rules_mut(&mut self) -> impl Iterator<Item = &mut Rule> {
        self.rules.iter_mut()
    }

    /// Consumes the grammar, returning its rules in order.
    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    /// Returns the rule defining the given symbol, if any.
    pub fn get(&self, symbol: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.symbol.as_deref() == Some(symbol))
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Checks whether the grammar has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sorts the rule array by identifier order.
    pub fn sort(&mut self) {
        self.rules.sort_by(|a, b| a.id.cmp(&b.id));
    }

    /// Retains only the rules specified by the predicate.
    pub fn retain(&mut self, f: impl FnMut(&Rule) -> bool) {
        self.rules.retain(f);
    }
}

impl FromIterator<Rule> for Grammar {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Grammar {
            rules: iter.into_iter().collect(),
        }
    }
}
