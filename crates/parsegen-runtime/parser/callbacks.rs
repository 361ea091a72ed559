use crate::types::{ActionId, ProductionId, Symbol};

/// The producer-facing hook invoked on every reduce. `kids` is the popped stack slice in source order;
/// the returned [`Symbol`] is pushed in their place. The default
/// implementation (no registered action) is a plain CST merge: a
/// nonterminal node whose children are exactly `kids`.
pub trait SemanticActions {
  fn reduce(&mut self, production: ProductionId, action: ActionId, nonterminal_name: &str, nonterminal_id: u32, kids: Vec<Symbol>) -> Symbol;
}

/// Builds a bare concrete-syntax-tree node for every reduce, ignoring
/// `action` entirely — the behavior a grammar with no semantic actions
/// attached gets for free.
pub struct CstBuilder;

impl SemanticActions for CstBuilder {
  fn reduce(&mut self, _production: ProductionId, _action: ActionId, nonterminal_name: &str, nonterminal_id: u32, kids: Vec<Symbol>) -> Symbol {
    let loc = kids.first().map(|k| k.loc.clone()).unwrap_or_default();
    Symbol::nonterminal(nonterminal_name, nonterminal_id, loc, kids)
  }
}
