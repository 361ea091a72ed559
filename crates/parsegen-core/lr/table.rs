use std::collections::{BTreeMap, BTreeSet};

use parsegen_runtime::types::{CompiledParser, ParseTable, ParserEntry, ProductionInfo};

use crate::grammar::{Grammar, START_SYMBOL_ID};
use crate::journal::Journal;

use super::conflict::{self, Decision};
use super::lookahead::Lookaheads;
use super::states::StateGraph;

/// Assembles the frozen [`CompiledParser`] from a goto graph and its
/// lookahead sets, breaking every shift/reduce and reduce/reduce conflict
/// along the way via [`conflict::resolve`].
pub fn build(g: &Grammar, graph: &StateGraph, lookaheads: &Lookaheads, journal: &mut Journal) -> CompiledParser {
  let config = *journal.config();
  let start_production = g.productions.iter().find(|p| p.lhs == START_SYMBOL_ID).map(|p| p.number);

  let mut table = ParseTable::new();

  for state in &graph.states {
    let mut reduce_candidates: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for item in &state.items {
      if item.is_complete(g) {
        for la in lookaheads.get(state.id, item.production) {
          reduce_candidates.entry(la).or_default().push(item.production);
        }
      }
    }

    let shiftable: BTreeSet<u32> = state.transitions.keys().filter(|&&sym| g.symbol(sym).map(|s| s.is_terminal_like()).unwrap_or(false)).copied().collect();

    let mut terminals: BTreeSet<u32> = shiftable.clone();
    terminals.extend(reduce_candidates.keys().copied());

    for terminal in terminals {
      let can_shift = shiftable.contains(&terminal);
      let candidates = reduce_candidates.get(&terminal).cloned().unwrap_or_default();
      let decision = conflict::resolve(g, &config, journal, state.id, terminal, can_shift, &candidates);

      let entry = match decision {
        Decision::Shift => {
          let target = state.transitions.get(&terminal).copied().expect("shift decision implies a transition exists");
          ParserEntry::Shift { target, pre_action: None }
        }
        Decision::Reduce(p) if Some(p) == start_production => ParserEntry::Accept { production: p },
        Decision::Reduce(p) => {
          let pop_depth = g.production(p).map(|prod| prod.pop_depth()).unwrap_or(0);
          ParserEntry::Reduce { production: p, pop_depth, action: 0 }
        }
        Decision::Neither => continue,
      };

      table.insert(state.id, terminal, entry);
    }

    // Gotos never compete with a reduce (nonterminal ids don't appear as
    // lookaheads), so every nonterminal transition becomes an unconditional
    // Shift entry keyed on (state, nonterminal_id) — see the driver's doc
    // comment on why gotos share the shift keyspace instead of a table of
    // their own.
    for (&sym, &target) in &state.transitions {
      if !g.symbol(sym).map(|s| s.is_terminal_like()).unwrap_or(false) {
        table.insert(state.id, sym, ParserEntry::Shift { target, pre_action: None });
      }
    }
  }

  let mut terminal_ids = BTreeMap::new();
  let mut error_symbol_id = g.error_symbol;
  for sym in g.symbols.values() {
    if sym.is_terminal_like() {
      terminal_ids.insert(sym.name.clone(), sym.id);
    }
    if sym.id == g.error_symbol {
      error_symbol_id = sym.id;
    }
  }

  let mut productions = BTreeMap::new();
  for prod in &g.productions {
    let nonterminal_name = g.symbol(prod.lhs).map(|s| s.name.clone()).unwrap_or_default();
    productions.insert(prod.number, ProductionInfo { nonterminal_name, nonterminal_id: prod.lhs });
  }

  CompiledParser { table, start_state: 0, terminal_ids, error_symbol_id, productions }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::{Assoc, SymbolKind};
  use crate::journal::LexParseConfig;
  use crate::lr::{lookahead, states};

  fn arithmetic_grammar() -> Grammar {
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
    g
  }

  #[test]
  fn builds_a_table_with_shifts_and_reduces_and_an_accept() {
    let g = arithmetic_grammar();
    let graph = states::build(&g);
    let config = LexParseConfig::new();
    let la = lookahead::compute(&g, &graph, &config);
    let mut journal = Journal::new(config);

    let parser = build(&g, &graph, &la, &mut journal);
    assert!(!parser.table.is_empty());

    let has_accept = (0..graph.states.len() as u32).any(|state| {
      let eof = 2u32; // EOF_SYMBOL_ID
      matches!(parser.table.get(state, eof), Some(ParserEntry::Accept { .. }))
    });
    assert!(has_accept, "an accept entry must exist on EOF in some state");

    assert_eq!(parser.terminal_ids.get("NUM").copied(), g.symbols.values().find(|s| s.name == "NUM").map(|s| s.id));
  }

  #[test]
  fn nonterminal_transitions_become_goto_entries() {
    // Every state with an outgoing nonterminal transition must have a goto
    // entry, or the driver's post-reduce lookup would dead-end.
    let g = arithmetic_grammar();
    let graph = states::build(&g);
    let config = LexParseConfig::new();
    let la = lookahead::compute(&g, &graph, &config);
    let mut journal = Journal::new(config);
    let parser = build(&g, &graph, &la, &mut journal);

    let e = g.symbols.values().find(|s| s.name == "E").unwrap().id;
    let has_goto = (0..graph.states.len() as u32).any(|state| matches!(parser.table.get(state, e), Some(ParserEntry::Shift { .. })));
    assert!(has_goto, "a goto on E must exist in some state");
  }

  #[test]
  fn reduce_reduce_free_grammar_reports_no_conflicts() {
    let g = arithmetic_grammar();
    let graph = states::build(&g);
    let config = LexParseConfig::new();
    let la = lookahead::compute(&g, &graph, &config);
    let mut journal = Journal::new(config);
    let _ = build(&g, &graph, &la, &mut journal);
    assert!(!journal.report().has_critical_errors());
  }
}
