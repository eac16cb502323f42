//! Operator trees for rule right-hand sides.

/// One node of a rule's right-hand-side operator tree.
///
/// Children of `Sequence` and `Alternation` are ordered; the order is
/// preserved through every transformation for reproducible output.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// Concatenation of child expressions.
    Sequence(Vec<Expr>),
    /// Choice between child expressions.
    Alternation(Vec<Expr>),
    /// Matches the left operand, except where the right operand matches.
    Difference(Box<Expr>, Box<Expr>),
    /// Zero or one occurrence.
    Optional(Box<Expr>),
    /// Zero or more occurrences.
    ZeroOrMore(Box<Expr>),
    /// One or more occurrences.
    OneOrMore(Box<Expr>),
    /// A quoted string.
    Literal(String),
    /// A character class, stored without the surrounding brackets.
    CharRange(String),
    /// A code point reference, stored as written (`#xHHHH`).
    HexCharRef(String),
    /// A reference to another rule by symbol name.
    SymbolRef(String),
}

impl Expr {
    /// Determines whether this node is an operator over child expressions.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Expr::Sequence(_)
                | Expr::Alternation(_)
                | Expr::Difference(..)
                | Expr::Optional(_)
                | Expr::ZeroOrMore(_)
                | Expr::OneOrMore(_)
        )
    }

    /// Determines whether this node denotes literal text or characters
    /// rather than another rule.
    pub fn is_terminal_leaf(&self) -> bool {
        matches!(
            self,
            Expr::Literal(_) | Expr::CharRange(_) | Expr::HexCharRef(_)
        )
    }

    /// Determines whether the tree is in BNF form: no quantifiers, and no
    /// operator nested directly inside another operator.
    pub fn is_flat(&self) -> bool {
        match self {
            Expr::Sequence(children) | Expr::Alternation(children) => {
                children.iter().all(|child| !child.is_composite())
            }
            Expr::Difference(left, right) => !left.is_composite() && !right.is_composite(),
            Expr::Optional(_) | Expr::ZeroOrMore(_) | Expr::OneOrMore(_) => false,
            _ => true,
        }
    }

    /// Applies `f` to every direct child, allowing in-place replacement.
    /// Does nothing for leaves.
    pub(crate) fn for_each_child_mut(&mut self, f: &mut impl FnMut(&mut Expr)) {
        match self {
            Expr::Sequence(children) | Expr::Alternation(children) => {
                for child in children {
                    f(child);
                }
            }
            Expr::Difference(left, right) => {
                f(left);
                f(right);
            }
            Expr::Optional(inner) | Expr::ZeroOrMore(inner) | Expr::OneOrMore(inner) => f(inner),
            _ => {}
        }
    }

    /// Like [`fn for_each_child_mut`], over immutable references.
    ///
    /// [`fn for_each_child_mut`]: Self::for_each_child_mut
    pub(crate) fn for_each_child(&self, f: &mut impl FnMut(&Expr)) {
        match self {
            Expr::Sequence(children) | Expr::Alternation(children) => {
                for child in children {
                    f(child);
                }
            }
            Expr::Difference(left, right) => {
                f(left);
                f(right);
            }
            Expr::Optional(inner) | Expr::ZeroOrMore(inner) | Expr::OneOrMore(inner) => f(inner),
            _ => {}
        }
    }

    /// Determines whether any direct child is an operator node.
    pub(crate) fn has_composite_child(&self) -> bool {
        let mut found = false;
        self.for_each_child(&mut |child| found |= child.is_composite());
        found
    }
}
