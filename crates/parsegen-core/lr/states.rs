use super::item::{closure, Item, ItemList};
use crate::grammar::{Grammar, SymbolId, START_SYMBOL_ID};
use std::collections::BTreeMap;

pub type StateId = u32;

/// One LR(0) state: its accessing symbol (the
/// symbol labeling the transition into this state; `None` for the start
/// state), its canonical item list, and the transitions it offers.
#[derive(Debug, Clone)]
pub struct ParseState {
  pub id: StateId,
  pub accessing_symbol: Option<SymbolId>,
  pub items: ItemList,
  pub transitions: BTreeMap<SymbolId, StateId>,
}

/// The full LR(0) automaton: states plus a lookup from `(StateId, SymbolId)`
/// back to the target, used by both the goto graph and the lookahead
/// relations built on top of it.
#[derive(Debug, Clone, Default)]
pub struct StateGraph {
  pub states: Vec<ParseState>,
}

impl StateGraph {
  pub fn goto(&self, from: StateId, sym: SymbolId) -> Option<StateId> {
    self.states[from as usize].transitions.get(&sym).copied()
  }

  /// Follows a chain of symbols from `from`, returning the resulting state
  /// if every step in the chain is defined — used by the lookahead
  /// relations to test "does shifting β from p' land at p".
  pub fn goto_chain(&self, from: StateId, symbols: &[SymbolId]) -> Option<StateId> {
    let mut cur = from;
    for &sym in symbols {
      cur = self.goto(cur, sym)?;
    }
    Some(cur)
  }
}

/// Builds the goto graph:
/// starting from the closure of the augmenting item `S' → ·start`, BFS over
/// every grammar symbol that some item in the current state has a dot
/// before, deduplicating states whose item lists match pointwise *and*
/// whose accessing symbol matches.
pub fn build(g: &Grammar) -> StateGraph {
  let start_prod = g
    .symbols
    .get(&START_SYMBOL_ID)
    .and_then(|s| s.productions.first().copied())
    .expect("grammar must have a start production; call Grammar::set_start_symbol first");

  let start_items = closure(vec![Item::start(start_prod)], g);

  let mut states = vec![ParseState { id: 0, accessing_symbol: None, items: start_items, transitions: BTreeMap::new() }];
  // Canonical key: (accessing symbol, item list) -> state id, for dedup.
  let mut canon: BTreeMap<(Option<SymbolId>, ItemList), StateId> = BTreeMap::new();
  canon.insert((None, states[0].items.clone()), 0);

  let mut cursor = 0usize;
  while cursor < states.len() {
    let id = states[cursor].id;
    let items = states[cursor].items.clone();
    cursor += 1;

    // Every symbol some item in this state has its dot immediately before.
    let mut symbols: Vec<SymbolId> = items.iter().filter_map(|item| item.symbol_at_dot(g)).collect();
    symbols.sort();
    symbols.dedup();

    for sym in symbols {
      let advanced: ItemList = items.iter().filter(|item| item.symbol_at_dot(g) == Some(sym)).map(Item::advance).collect();
      let target_items = closure(advanced, g);
      let key = (Some(sym), target_items.clone());

      let target_id = if let Some(&existing) = canon.get(&key) {
        existing
      } else {
        let new_id = states.len() as StateId;
        states.push(ParseState { id: new_id, accessing_symbol: Some(sym), items: target_items, transitions: BTreeMap::new() });
        canon.insert(key, new_id);
        new_id
      };

      states[id as usize].transitions.insert(sym, target_id);
    }
  }

  StateGraph { states }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::SymbolKind;

  fn arithmetic_grammar() -> Grammar {
    // E -> E '+' E | NUM
    let mut g = Grammar::new();
    let e = g.declare_symbol("E", SymbolKind::Nonterminal);
    let plus = g.intern_literal("+");
    let num = g.declare_symbol("NUM", SymbolKind::Terminal);
    g.add_production(e, vec![e, plus, e]);
    g.add_production(e, vec![num]);
    g.set_start_symbol(e);
    g.finish();
    g
  }

  #[test]
  fn state_zero_has_no_accessing_symbol() {
    let g = arithmetic_grammar();
    let graph = build(&g);
    assert!(graph.states[0].accessing_symbol.is_none());
  }

  #[test]
  fn goto_chain_follows_multiple_shifts() {
    let g = arithmetic_grammar();
    let graph = build(&g);
    let num = g.symbol(3).unwrap().id; // first declared after reserved ids: E=3? declared order E,+,NUM
    let _ = num;
    // There must be a state reachable by shifting NUM from state 0.
    let num_id = g.symbols.values().find(|s| s.name == "NUM").unwrap().id;
    let target = graph.goto_chain(0, &[num_id]);
    assert!(target.is_some());
  }

  #[test]
  fn identical_item_lists_with_same_accessing_symbol_are_deduplicated() {
    let g = arithmetic_grammar();
    let graph = build(&g);
    // No two states should have exactly the same (accessing_symbol, items).
    for (i, a) in graph.states.iter().enumerate() {
      for b in &graph.states[i + 1..] {
        assert!(a.accessing_symbol != b.accessing_symbol || a.items != b.items);
      }
    }
  }
}
