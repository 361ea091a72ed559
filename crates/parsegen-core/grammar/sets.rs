use super::production::Production;
use super::symbol::{CSymbol, SymbolId, EOF_SYMBOL_ID, START_SYMBOL_ID};
use std::collections::BTreeMap;

/// Computes nullability, FIRST, and FOLLOW as least fixed points over the
/// grammar's productions. Mutates `symbols` in place; safe to
/// call again after productions change, since every set only grows.
pub fn compute(symbols: &mut BTreeMap<SymbolId, CSymbol>, productions: &[Production]) {
  compute_nullable(symbols, productions);
  compute_first(symbols, productions);
  compute_follow(symbols, productions);
}

/// A nonterminal is nullable iff it has a production whose RHS is entirely
/// nullable symbols (including the empty RHS) — spec §4.G.
fn compute_nullable(symbols: &mut BTreeMap<SymbolId, CSymbol>, productions: &[Production]) {
  loop {
    let mut changed = false;
    for prod in productions {
      if symbols.get(&prod.lhs).map(|s| s.nullable).unwrap_or(false) {
        continue;
      }
      let rhs_nullable = prod.rhs.iter().all(|id| symbols.get(id).map(|s| s.nullable).unwrap_or(false));
      if rhs_nullable {
        if let Some(sym) = symbols.get_mut(&prod.lhs) {
          sym.nullable = true;
          changed = true;
        }
      }
    }
    if !changed {
      break;
    }
  }
}

fn compute_first(symbols: &mut BTreeMap<SymbolId, CSymbol>, productions: &[Production]) {
  // Terminals, literals, and EOF are their own FIRST set.
  let ids: Vec<SymbolId> = symbols.keys().copied().collect();
  for id in ids {
    if symbols[&id].is_terminal_like() {
      symbols.get_mut(&id).unwrap().first.insert(id);
    }
  }

  loop {
    let mut changed = false;
    for prod in productions {
      let mut to_add: Vec<SymbolId> = Vec::new();
      for &sym in &prod.rhs {
        let sym_first = symbols.get(&sym).map(|s| s.first.clone()).unwrap_or_default();
        to_add.extend(sym_first);
        if !symbols.get(&sym).map(|s| s.nullable).unwrap_or(false) {
          break;
        }
      }
      let lhs = symbols.get_mut(&prod.lhs).unwrap();
      for id in to_add {
        changed |= lhs.first.insert(id);
      }
    }
    if !changed {
      break;
    }
  }
}

/// `FOLLOW(start) ⊇ {EOFSymbol}`.
fn compute_follow(symbols: &mut BTreeMap<SymbolId, CSymbol>, productions: &[Production]) {
  if let Some(start) = symbols.get_mut(&START_SYMBOL_ID) {
    start.follow.insert(EOF_SYMBOL_ID);
  }

  loop {
    let mut changed = false;
    for prod in productions {
      for (i, &sym) in prod.rhs.iter().enumerate() {
        if !symbols.get(&sym).map(|s| !s.is_terminal_like()).unwrap_or(false) {
          continue;
        }
        let rest = &prod.rhs[i + 1..];
        let mut to_add: Vec<SymbolId> = Vec::new();
        let mut rest_nullable = true;
        for &next in rest {
          let next_first = symbols.get(&next).map(|s| s.first.clone()).unwrap_or_default();
          to_add.extend(next_first);
          if !symbols.get(&next).map(|s| s.nullable).unwrap_or(false) {
            rest_nullable = false;
            break;
          }
        }
        if rest_nullable {
          let lhs_follow = symbols.get(&prod.lhs).map(|s| s.follow.clone()).unwrap_or_default();
          to_add.extend(lhs_follow);
        }
        let sym_entry = symbols.get_mut(&sym).unwrap();
        for id in to_add {
          changed |= sym_entry.follow.insert(id);
        }
      }
    }
    if !changed {
      break;
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::symbol::SymbolKind;

  fn sym(id: SymbolId, name: &str, kind: SymbolKind) -> (SymbolId, CSymbol) {
    (id, CSymbol::new(name, id, kind))
  }

  #[test]
  fn nullability_and_follow_fixpoint_for_optional_tail() {
    // S' -> S; S -> 'a' T; T -> 'b' | <empty>
    let s_prime = START_SYMBOL_ID;
    let s = 10;
    let t = 11;
    let a = 3;
    let b = 4;

    let mut symbols = BTreeMap::from([
      sym(s_prime, "S'", SymbolKind::Nonterminal),
      sym(s, "S", SymbolKind::Nonterminal),
      sym(t, "T", SymbolKind::Nonterminal),
      sym(a, "a", SymbolKind::Terminal),
      sym(b, "b", SymbolKind::Terminal),
      sym(EOF_SYMBOL_ID, "EOF", SymbolKind::Eof),
    ]);

    let productions = vec![
      Production::new(s_prime, vec![s], 0),
      Production::new(s, vec![a, t], 1),
      Production::new(t, vec![b], 2),
      Production::new(t, vec![], 3),
    ];

    compute(&mut symbols, &productions);

    assert!(symbols[&t].nullable);
    assert!(!symbols[&s].nullable);
    assert!(symbols[&s_prime].follow.contains(&EOF_SYMBOL_ID));
    // T is nullable, so whatever follows S's "a T" tail (EOF here) must
    // propagate into FOLLOW(T) as well.
    assert!(symbols[&t].follow.contains(&EOF_SYMBOL_ID));
    assert!(symbols[&s].first.contains(&a));
  }
}
