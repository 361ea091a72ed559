use crate::grammar::{Assoc, Grammar, ProductionId, SymbolId};
use crate::journal::{CompileError, Journal, LexParseConfig};

use super::states::StateId;

/// The outcome of resolving a `(state, terminal)` cell that has more than
/// one candidate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Shift,
  Reduce(ProductionId),
  /// A `nonassoc` declaration at matching precedence: neither action is
  /// taken, so the cell is simply left empty (a syntax error at parse
  /// time rather than an arbitrary pick).
  Neither,
}

/// Resolves one `(state, terminal)` cell given its competing reduce
/// candidates and whether a shift is also available, recording every
/// conflict it had to break to `journal`.
pub fn resolve(
  g: &Grammar,
  config: &LexParseConfig,
  journal: &mut Journal,
  state: StateId,
  terminal: SymbolId,
  can_shift: bool,
  reduce_candidates: &[ProductionId],
) -> Decision {
  let chosen_reduce = match reduce_candidates {
    [] => None,
    [only] => Some(*only),
    many => {
      let lowest = *many.iter().min().unwrap();
      let name = g.symbol(terminal).map(|s| s.name.clone()).unwrap_or_default();
      journal.report_mut().add_error(CompileError::GrammarConflict {
        loc: Default::default(),
        message: format!("reduce/reduce conflict between productions {many:?} on lookahead `{name}`; resolved in favor of production {lowest} (lowest number)"),
        on_symbol: name,
      });
      Some(lowest)
    }
  };

  match (can_shift, chosen_reduce) {
    (false, None) => Decision::Neither,
    (true, None) => Decision::Shift,
    (false, Some(p)) => Decision::Reduce(p),
    (true, Some(p)) => resolve_shift_reduce(g, config, journal, state, terminal, p),
  }
}

fn resolve_shift_reduce(g: &Grammar, config: &LexParseConfig, journal: &mut Journal, state: StateId, terminal: SymbolId, production: ProductionId) -> Decision {
  let terminal_prec = g.symbol(terminal).and_then(|s| s.current_precedence());
  let prod_prec = g.production(production).and_then(|p| p.precedence);

  let (terminal_assoc, terminal_level) = match terminal_prec {
    Some(link) => (Some(link.kind), link.priority),
    None => (None, 0),
  };
  let (_, prod_level) = match prod_prec {
    Some((assoc, level)) => (Some(assoc), level),
    None => (None, 0),
  };

  match (terminal_prec, prod_prec) {
    (None, _) | (_, None) => {
      let name = g.symbol(terminal).map(|s| s.name.clone()).unwrap_or_default();
      journal.report_mut().add_error(CompileError::GrammarConflict {
        loc: Default::default(),
        message: format!(
          "shift/reduce conflict in state {state} on lookahead `{name}` with no precedence declared on one side; defaulting to {}",
          if config.PREFER_SHIFT_ON_UNDEFINED_PRECEDENCE { "shift" } else { "reduce" }
        ),
        on_symbol: name,
      });
      if config.PREFER_SHIFT_ON_UNDEFINED_PRECEDENCE {
        Decision::Shift
      } else {
        Decision::Reduce(production)
      }
    }
    _ if terminal_level > prod_level => Decision::Shift,
    _ if prod_level > terminal_level => Decision::Reduce(production),
    _ => match terminal_assoc {
      Some(Assoc::Left) => Decision::Reduce(production),
      Some(Assoc::Right) => Decision::Shift,
      Some(Assoc::NonAssoc) => Decision::Neither,
      _ => Decision::Shift,
    },
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::SymbolKind;

  fn grammar_with_plus_star() -> (Grammar, SymbolId, SymbolId, ProductionId, ProductionId) {
    let mut g = Grammar::new();
    let e = g.declare_symbol("E", SymbolKind::Nonterminal);
    let plus = g.intern_literal("+");
    let star = g.intern_literal("*");
    g.symbols.get_mut(&plus).unwrap().declare_precedence(Assoc::Left, 1);
    g.symbols.get_mut(&star).unwrap().declare_precedence(Assoc::Left, 2);
    let num = g.declare_symbol("NUM", SymbolKind::Terminal);
    let p_plus = g.add_production(e, vec![e, plus, e]);
    let _p_star = g.add_production(e, vec![e, star, e]);
    let _p_num = g.add_production(e, vec![num]);
    g.set_start_symbol(e);
    g.finish();
    (g, plus, star, p_plus, _p_star)
  }

  #[test]
  fn left_assoc_same_level_reduces() {
    let (g, plus, _star, p_plus, _) = grammar_with_plus_star();
    let mut j = Journal::new(LexParseConfig::new());
    let decision = resolve(&g, &LexParseConfig::new(), &mut j, 0, plus, true, &[p_plus]);
    assert_eq!(decision, Decision::Reduce(p_plus));
  }

  #[test]
  fn higher_level_on_terminal_shifts() {
    let (g, _plus, star, _p_plus, p_star) = grammar_with_plus_star();
    // Reducing a '+'-headed production but the lookahead is the
    // higher-precedence '*': shift wins.
    let p_plus_prod = g.productions.iter().find(|p| p.rhs.len() == 3).unwrap().number;
    let mut j = Journal::new(LexParseConfig::new());
    let decision = resolve(&g, &LexParseConfig::new(), &mut j, 0, star, true, &[p_plus_prod]);
    assert_eq!(decision, Decision::Shift);
    let _ = p_star;
  }

  #[test]
  fn reduce_reduce_conflict_picks_lowest_production_and_reports() {
    let (g, _plus, _star, _p_plus, _) = grammar_with_plus_star();
    let num_terminal = g.symbols.values().find(|s| s.name == "NUM").unwrap().id;
    let mut j = Journal::new(LexParseConfig::new());
    let decision = resolve(&g, &LexParseConfig::new(), &mut j, 0, num_terminal, false, &[2, 1]);
    assert_eq!(decision, Decision::Reduce(1));
    assert!(!j.report().errors().is_empty());
  }

  #[test]
  fn undefined_precedence_defaults_to_shift_and_warns() {
    let mut g = Grammar::new();
    let e = g.declare_symbol("E", SymbolKind::Nonterminal);
    let num = g.declare_symbol("NUM", SymbolKind::Terminal);
    let p = g.add_production(e, vec![num]);
    g.set_start_symbol(e);
    g.finish();
    let mut j = Journal::new(LexParseConfig::new());
    let decision = resolve(&g, &LexParseConfig::new(), &mut j, 0, num, true, &[p]);
    assert_eq!(decision, Decision::Shift);
    assert!(!j.report().errors().is_empty());
  }
}
