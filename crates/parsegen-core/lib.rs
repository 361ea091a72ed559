//! Grammar compilation: regex/NFA/DFA lowering for the lexer half and
//! LALR(1)/LR(0) table construction for the parser half, against the
//! portable runtime types in `parsegen_runtime`.
//!
//! This crate is the generator; it is not required to be `Send`/`Sync` —
//! it runs once, up front, to produce the frozen artifacts the runtime
//! crate drives at lex/parse time.

pub mod dfa_build;
pub mod grammar;
pub mod journal;
pub mod lex_rule;
pub mod lr;
pub mod nfa_build;
pub mod regex;

pub use lex_rule::{LexRule, ReservedWords};

use grammar::Grammar;
use journal::{Journal, LexParseConfig};
use parsegen_runtime::types::{CompiledLexer, CompiledParser};

/// The frozen pair of compiled artifacts a lexer/parser driver needs: the
/// DFA-backed lexer and the LALR/LR table-backed parser, built from the
/// same grammar in one pass. Plain data, so `Arc<CompiledLexParse>` is
/// shareable across threads once generation is done.
#[derive(Debug, Clone, Default)]
pub struct CompiledLexParse {
  pub lexer: CompiledLexer,
  pub parser: CompiledParser,
}

/// Compiles a lexer rule set and a finished [`Grammar`] into a
/// [`CompiledLexParse`], returning the [`Journal`] of diagnostics raised
/// along the way. Callers inspect `journal.report().has_critical_errors()`
/// before trusting the result the way `ErrorHandler::throw_exceptions`
/// gates runtime errors.
pub fn compile(rules: &[LexRule], g: &Grammar, config: LexParseConfig) -> (CompiledLexParse, Journal) {
  let mut journal = Journal::new(config);

  let using_eof = rules.iter().any(|r| matches!(r.class_name.as_deref(), Some("EOF")));
  let lexer = match nfa_build::build(rules, using_eof) {
    Ok(built) => dfa_build::build(built),
    Err(err) => {
      journal.report_mut().add_error(err);
      CompiledLexer::default()
    }
  };

  let parser = lr::compile(g, &mut journal);

  (CompiledLexParse { lexer, parser }, journal)
}

#[cfg(test)]
mod test {
  use super::*;
  use grammar::SymbolKind;
  use regex::Regex;

  #[test]
  fn compiles_a_minimal_lexer_and_parser_together() {
    let rules = vec![LexRule::new(0, Regex::Plus(Box::new(Regex::Named(parsegen_runtime::types::CharClass::Digit)))).with_class("NUM")];

    let mut g = Grammar::new();
    let s = g.declare_symbol("S", SymbolKind::Nonterminal);
    let num = g.declare_symbol("NUM", SymbolKind::Terminal);
    g.add_production(s, vec![num]);
    g.set_start_symbol(s);
    g.finish();

    let (compiled, journal) = compile(&rules, &g, LexParseConfig::new());
    assert!(!journal.report().has_critical_errors());
    assert!(!compiled.parser.table.is_empty());
    assert!(compiled.lexer.starts.contains_key("YYINITIAL"));
  }
}
