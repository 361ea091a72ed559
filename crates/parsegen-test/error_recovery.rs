//! Scenario 4: panic-mode recovery over a malformed statement list.
//!
//! Grammar: `S -> stmt ';' S | stmt ';' | error ';'`, `stmt -> IDENT`.
//! Identifiers are single letters here so adjacent statements (`y y`) need
//! no whitespace-skipping machinery to tokenize as two distinct tokens.

use parsegen_core::grammar::{Grammar, SymbolKind};
use parsegen_core::journal::LexParseConfig;
use parsegen_core::regex::Regex;
use parsegen_core::{compile, CompiledLexParse, LexRule};
use parsegen_runtime::types::CharClass;

use pretty_assertions::assert_eq;

use crate::support::parse;

fn statement_list_grammar() -> Grammar {
  let mut g = Grammar::new();
  let s = g.declare_symbol("S", SymbolKind::Nonterminal);
  let stmt = g.declare_symbol("stmt", SymbolKind::Nonterminal);
  let ident = g.declare_symbol("IDENT", SymbolKind::Terminal);
  let semi = g.intern_literal(";");
  let error = g.declare_symbol("error", SymbolKind::Nonterminal);

  g.add_production(stmt, vec![ident]);
  g.add_production(s, vec![stmt, semi, s]);
  g.add_production(s, vec![stmt, semi]);
  g.add_production(s, vec![error, semi]);
  g.set_start_symbol(s);
  g.finish();
  g
}

fn statement_list_rules() -> Vec<LexRule> {
  vec![
    LexRule::new(0, Regex::Named(CharClass::Lower)).with_class("IDENT"),
    LexRule::new(1, Regex::Char(';')).with_class(";"),
  ]
}

fn compiled_statement_list() -> CompiledLexParse {
  let g = statement_list_grammar();
  let rules = statement_list_rules();
  let (compiled, journal) = compile(&rules, &g, LexParseConfig::new());
  assert!(!journal.report().has_critical_errors(), "{:?}", journal.report().errors());
  compiled
}

#[test]
fn duplicated_statement_and_trailing_statement_both_recover() {
  let compiled = compiled_statement_list();
  let (root, parser) = parse(&compiled, "x;yy;z;");
  assert_eq!(parser.error_count(), 2);
  assert_eq!(root.name, "S");
}

#[test]
fn well_formed_input_needs_no_recovery() {
  let compiled = compiled_statement_list();
  let (root, parser) = parse(&compiled, "x;y;z;");
  assert_eq!(parser.error_count(), 0);
  assert_eq!(root.name, "S");
}
