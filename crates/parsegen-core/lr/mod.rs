//! LR(0)/LALR(1) table construction: item closure and the goto graph, the
//! DeRemer/Pennello lookahead relations, conflict resolution, and final
//! table assembly into the runtime's frozen `CompiledParser`.

pub mod conflict;
pub mod item;
pub mod lookahead;
pub mod states;
pub mod table;

pub use conflict::Decision;
pub use item::{Item, ItemList};
pub use lookahead::Lookaheads;
pub use states::{ParseState, StateGraph, StateId};

use crate::grammar::Grammar;
use crate::journal::Journal;
use parsegen_runtime::types::CompiledParser;

/// Runs the full LR pipeline — goto graph, lookahead sets, conflict
/// resolution, table assembly — against a finished [`Grammar`].
pub fn compile(g: &Grammar, journal: &mut Journal) -> CompiledParser {
  let graph = states::build(g);
  let la = lookahead::compute(g, &graph, journal.config());
  table::build(g, &graph, &la, journal)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::SymbolKind;
  use crate::journal::LexParseConfig;

  #[test]
  fn compiles_a_trivial_grammar_end_to_end() {
    let mut g = Grammar::new();
    let s = g.declare_symbol("S", SymbolKind::Nonterminal);
    let num = g.declare_symbol("NUM", SymbolKind::Terminal);
    g.add_production(s, vec![num]);
    g.set_start_symbol(s);
    g.finish();

    let mut journal = Journal::new(LexParseConfig::new());
    let parser = compile(&g, &mut journal);
    assert!(!parser.table.is_empty());
    assert!(!journal.report().has_critical_errors());
  }
}
