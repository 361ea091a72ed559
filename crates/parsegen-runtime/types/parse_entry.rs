use std::collections::BTreeMap;

pub type StateId = u32;
pub type SymbolId = u32;
pub type ProductionId = u32;
pub type ActionId = u32;

/// One cell of the compiled parse table,
/// collapsing the teacher's `ParserShift`/`ParserReduce` subclass split
/// into a sum type per the REDESIGN FLAGS in spec §9.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserEntry {
  /// Shift the current lookahead, transition to `target`, and optionally
  /// run a pre-action that glues intermediate semantic symbols before the
  /// new state is pushed.
  Shift { target: StateId, pre_action: Option<ActionId> },
  /// Reduce by `production`, popping `pop_depth` stack entries.
  Reduce { production: ProductionId, pop_depth: u32, action: ActionId },
  /// Accept: `production` is the grammar's start production.
  Accept { production: ProductionId },
}

/// One outgoing edge of a parse state over a single grammar symbol: the
/// shift target (if any) and the reduces this symbol enables. The LALR-only auxiliary sets (`DR`, `Read`, `Follow`,
/// `reads`/`includes`/`lookback`) live only in `parsegen_core::lr` during
/// construction — they are not part of the frozen runtime artifact.
#[derive(Debug, Clone, Default)]
pub struct Transition {
  pub symbol: SymbolId,
  pub shift: Option<StateId>,
  pub reduces: BTreeMap<ProductionId, ParserEntry>,
}

/// The compiled `(state, lookahead) -> ParserEntry` table produced by LR
/// construction and consulted by the parser driver
///. Conflict resolution guarantees at most one entry
/// per `(state, terminal)` pair.
#[derive(Debug, Clone, Default)]
pub struct ParseTable {
  entries: BTreeMap<(StateId, SymbolId), ParserEntry>,
}

impl ParseTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, state: StateId, lookahead: SymbolId) -> Option<&ParserEntry> {
    self.entries.get(&(state, lookahead))
  }

  /// Inserts an entry, returning the previous one if the slot was already
  /// occupied — callers use this to detect unresolved conflicts before
  /// they reach the runtime table.
  pub fn insert(&mut self, state: StateId, lookahead: SymbolId, entry: ParserEntry) -> Option<ParserEntry> {
    self.entries.insert((state, lookahead), entry)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Every `(state, lookahead) -> entry` cell, in ascending key order — a
  /// codec's encode pass walks this to persist the table.
  pub fn iter(&self) -> impl Iterator<Item = (&(StateId, SymbolId), &ParserEntry)> {
    self.entries.iter()
  }
}

impl FromIterator<((StateId, SymbolId), ParserEntry)> for ParseTable {
  fn from_iter<I: IntoIterator<Item = ((StateId, SymbolId), ParserEntry)>>(iter: I) -> Self {
    Self { entries: iter.into_iter().collect() }
  }
}
