//! The grammar model: symbols, productions, FIRST/FOLLOW,
//! nullability, and precedence chains, all built against the LR builder's
//! `S'`/`EOF` id conventions.

pub mod production;
pub mod sets;
pub mod symbol;

pub use production::Production;
pub use symbol::{Assoc, CSymbol, PrecedenceLink, ProductionId, SymbolId, SymbolKind, EOF_SYMBOL_ID, FIRST_USER_SYMBOL_ID, START_SYMBOL_ID};

use std::collections::BTreeMap;

/// The frozen (once LR construction begins) grammar object built up by a
/// front-end producer and
/// consumed by the LR builder and lexer compiler.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
  pub symbols: BTreeMap<SymbolId, CSymbol>,
  pub productions: Vec<Production>,
  pub start_symbol: SymbolId,
  pub error_symbol: SymbolId,
  next_id: SymbolId,
  literals: BTreeMap<String, SymbolId>,
}

impl Grammar {
  /// A fresh grammar with `S'` (id 1) and `EOF` (id 2) pre-declared (spec
  /// §4.G, "Symbol ids").
  pub fn new() -> Self {
    let mut symbols = BTreeMap::new();
    symbols.insert(START_SYMBOL_ID, CSymbol::new("$start", START_SYMBOL_ID, SymbolKind::Nonterminal));
    symbols.insert(EOF_SYMBOL_ID, CSymbol::new("EOF", EOF_SYMBOL_ID, SymbolKind::Eof));

    Self {
      symbols,
      productions: Vec::new(),
      start_symbol: START_SYMBOL_ID,
      error_symbol: 0,
      next_id: FIRST_USER_SYMBOL_ID,
      literals: BTreeMap::new(),
    }
  }

  fn fresh_id(&mut self) -> SymbolId {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Declares a new terminal, nonterminal, or action symbol, returning its
  /// freshly assigned id. The reserved `error` nonterminal (panic-mode
  /// recovery's synchronization token, spec §4.I) is recognized by name and
  /// its id recorded on `self.error_symbol`.
  pub fn declare_symbol(&mut self, name: impl Into<String>, kind: SymbolKind) -> SymbolId {
    let name = name.into();
    let id = self.fresh_id();
    if name == "error" {
      self.error_symbol = id;
    }
    self.symbols.insert(id, CSymbol::new(name, id, kind));
    id
  }

  /// Interns a quoted-literal terminal by spelling, returning the same id
  /// on repeat references.
  pub fn intern_literal(&mut self, spelling: impl Into<String>) -> SymbolId {
    let spelling = spelling.into();
    if let Some(&id) = self.literals.get(&spelling) {
      return id;
    }
    let id = self.fresh_id();
    self.symbols.insert(id, CSymbol::new(spelling.clone(), id, SymbolKind::Literal));
    self.literals.insert(spelling, id);
    id
  }

  /// Appends a new production, assigning it the next production number.
  pub fn add_production(&mut self, lhs: SymbolId, rhs: Vec<SymbolId>) -> ProductionId {
    let number = self.productions.len() as ProductionId;
    let prod = Production::new(lhs, rhs, number);
    self.productions.push(prod);
    if let Some(sym) = self.symbols.get_mut(&lhs) {
      sym.productions.push(number);
    }
    number
  }

  /// Sets the user-declared start symbol and synthesizes the augmenting
  /// production `S' -> start` that every LR construction needs.
  pub fn set_start_symbol(&mut self, start: SymbolId) {
    self.start_symbol = start;
    self.add_production(START_SYMBOL_ID, vec![start]);
  }

  /// Runs nullability/FIRST/FOLLOW to a fixed point and infers
  /// precedence for every production that didn't declare one explicitly
  ///.
  pub fn finish(&mut self) {
    sets::compute(&mut self.symbols, &self.productions);

    let symbols = &self.symbols;
    for prod in &mut self.productions {
      prod.infer_precedence(|sym, kind| symbols.get(&sym).and_then(|s| s.precedence_of(kind)).map(|l| (l.kind, l.priority)));
    }
  }

  pub fn symbol(&self, id: SymbolId) -> Option<&CSymbol> {
    self.symbols.get(&id)
  }

  pub fn production(&self, id: ProductionId) -> Option<&Production> {
    self.productions.get(id as usize)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn arithmetic_grammar_infers_precedence_and_follow() {
    // E -> E '+' E | E '*' E | NUM, left 1 '+', left 2 '*'.
    let mut g = Grammar::new();
    let e = g.declare_symbol("E", SymbolKind::Nonterminal);
    let plus = g.intern_literal("+");
    let star = g.intern_literal("*");
    let num = g.declare_symbol("NUM", SymbolKind::Terminal);

    g.symbols.get_mut(&plus).unwrap().declare_precedence(Assoc::Left, 1);
    g.symbols.get_mut(&star).unwrap().declare_precedence(Assoc::Left, 2);

    g.add_production(e, vec![e, plus, e]);
    g.add_production(e, vec![e, star, e]);
    g.add_production(e, vec![num]);
    g.set_start_symbol(e);
    g.finish();

    let plus_prod = &g.productions[0];
    assert_eq!(plus_prod.precedence, Some((Assoc::Left, 1)));
    let star_prod = &g.productions[1];
    assert_eq!(star_prod.precedence, Some((Assoc::Left, 2)));

    assert!(g.symbol(START_SYMBOL_ID).unwrap().follow.contains(&EOF_SYMBOL_ID));
  }

  #[test]
  fn literals_intern_by_spelling() {
    let mut g = Grammar::new();
    let a = g.intern_literal("+");
    let b = g.intern_literal("+");
    assert_eq!(a, b);
  }
}
