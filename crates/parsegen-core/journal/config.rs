#![allow(non_snake_case)]

/// Knobs for a single grammar compilation run, in a chained-builder style.
///
/// Unlike a parser-shape config that steers recursive-descent vs LR vs
/// peeking vs forking generation, `LexParseConfig` only steers two axes:
/// LALR vs SLR lookahead and the panic-mode recovery budget.
#[derive(Debug, Clone, Copy)]
pub struct LexParseConfig {
  /// When `true`, lookahead is computed via the reads/includes/lookback
  /// relations (§4.H.2). When `false`, falls back to plain `FOLLOW(A)` (SLR).
  pub USE_LALR: bool,
  /// Case-fold the lexeme before consulting a state's reserved-word table.
  pub FOLD_RESERVED_WORD_CASE: bool,
  /// On a shift/reduce conflict with no precedence declared on either side,
  /// prefer shift (and emit a `GrammarConflict` warning) rather than reduce.
  pub PREFER_SHIFT_ON_UNDEFINED_PRECEDENCE: bool,
  /// Panic-mode recovery aborts with a fatal `TooManyErrors` once the
  /// recovered-error counter reaches this value.
  pub MAX_RECOVERABLE_ERRORS: u32,
}

impl Default for LexParseConfig {
  fn default() -> Self {
    Self {
      USE_LALR: true,
      FOLD_RESERVED_WORD_CASE: false,
      PREFER_SHIFT_ON_UNDEFINED_PRECEDENCE: true,
      MAX_RECOVERABLE_ERRORS: 1000,
    }
  }
}

impl LexParseConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lalr(mut self) -> Self {
    self.USE_LALR = true;
    self
  }

  pub fn slr(mut self) -> Self {
    self.USE_LALR = false;
    self
  }

  pub fn fold_reserved_word_case(mut self, fold: bool) -> Self {
    self.FOLD_RESERVED_WORD_CASE = fold;
    self
  }

  pub fn max_errors(mut self, n: u32) -> Self {
    self.MAX_RECOVERABLE_ERRORS = n;
    self
  }

  /// Mirrors `ParserConfig::to_classification` — a coarse read of which
  /// lookahead strategy a generated table set will exercise.
  pub fn conflict_uses_lalr(&self) -> bool {
    self.USE_LALR
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn slr_and_lalr_are_mutually_exclusive() {
    assert!(!LexParseConfig::new().slr().conflict_uses_lalr());
    assert!(LexParseConfig::new().lalr().conflict_uses_lalr());
  }

  #[test]
  fn max_errors_overrides_default() {
    let cfg = LexParseConfig::new().max_errors(1);
    assert_eq!(cfg.MAX_RECOVERABLE_ERRORS, 1);
  }
}
