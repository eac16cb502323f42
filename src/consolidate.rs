//! Merges structurally equal terminal rules into one canonical rule.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use log::debug;

use crate::expr::Expr;
use crate::grammar::{Grammar, RuleId, RuleKind};

impl Grammar {
    /// Finds terminal rules whose right-hand sides are equal by
    /// content, keeps the one with the lowest id, rewrites every
    /// reference to a dropped duplicate, and leaves the grammar sorted
    /// by id. Running it again on the result changes nothing.
    pub fn consolidate(&mut self) {
        self.sort();

        let mut canonical: HashMap<Expr, String> = HashMap::new();
        let mut replace: HashMap<String, String> = HashMap::new();
        let mut duplicates: HashSet<RuleId> = HashSet::new();
        for rule in self.rules() {
            if rule.kind != RuleKind::Terminal {
                continue;
            }
            let Some(symbol) = rule.symbol.clone() else {
                continue;
            };
            match canonical.entry(rule.expr.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(symbol);
                }
                Entry::Occupied(slot) => {
                    debug!("merging terminal {} into {}", symbol, slot.get());
                    duplicates.insert(rule.id.clone());
                    // A repeated definition of the same symbol needs no
                    // reference rewrite, only the drop.
                    if slot.get() != &symbol {
                        replace.insert(symbol, slot.get().clone());
                    }
                }
            }
        }
        if duplicates.is_empty() {
            return;
        }

        // Rules are flat here, so references sit at the top level or
        // one level down. Deeper recursion is unnecessary.
        if !replace.is_empty() {
            let substitute = |expr: &mut Expr| {
                if let Expr::SymbolRef(name) = expr {
                    if let Some(canon) = replace.get(name.as_str()) {
                        *name = canon.clone();
                    }
                }
            };
            for rule in self.rules_mut() {
                substitute(&mut rule.expr);
                rule.expr.for_each_child_mut(&mut |child| substitute(child));
            }
        }

        self.retain(|rule| !duplicates.contains(&rule.id));
    }
}
