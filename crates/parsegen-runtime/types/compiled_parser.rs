use super::parse_entry::{ParseTable, ProductionId, StateId, SymbolId};
use std::collections::BTreeMap;

/// The nonterminal a production reduces to, kept alongside the table so the
/// driver can look up the goto symbol for a reduce without a separate
/// grammar-facing lookup.
#[derive(Debug, Clone)]
pub struct ProductionInfo {
  pub nonterminal_name: String,
  pub nonterminal_id: SymbolId,
}

/// The frozen output of LR table construction: the table
/// itself, the terminal class-name → symbol-id map a scanned [`Token`]'s
/// `class_name` is resolved through, the reserved `Error` symbol id panic
/// mode shifts, and enough production metadata to drive a reduce.
#[derive(Debug, Clone, Default)]
pub struct CompiledParser {
  pub table: ParseTable,
  pub start_state: StateId,
  pub terminal_ids: BTreeMap<String, SymbolId>,
  pub error_symbol_id: SymbolId,
  pub productions: BTreeMap<ProductionId, ProductionInfo>,
}

impl CompiledParser {
  pub fn terminal_id(&self, class_name: &str) -> Option<SymbolId> {
    self.terminal_ids.get(class_name).copied()
  }

  pub fn production(&self, id: ProductionId) -> Option<&ProductionInfo> {
    self.productions.get(&id)
  }
}
