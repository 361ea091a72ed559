use super::charset::CharCategorizer;
use super::dfa::{Dfa, DfaId};
use std::collections::BTreeMap;

/// The frozen output of DFA construction: one shared DFA
/// arena, the character categorizer it was built against, and the
/// start-condition name → root-state map a `begin()` call switches
/// between.
#[derive(Debug, Clone, Default)]
pub struct CompiledLexer {
  pub dfa: Dfa,
  pub categorizer: CharCategorizer,
  pub starts: BTreeMap<String, DfaId>,
  /// Whether an `EOF` character predicate was referenced anywhere in the
  /// grammar; governs whether `next_token` synthesizes an EOF token or
  /// returns the `None` sentinel.
  pub using_eof: bool,
}

impl CompiledLexer {
  pub fn root(&self, start_condition: &str) -> DfaId {
    *self.starts.get(start_condition).unwrap_or(&self.dfa.start)
  }
}
