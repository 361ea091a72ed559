//! Scenario 2: reserved-word reclassification, tokenizing without a parser.

use std::collections::BTreeMap;

use parsegen_core::lex_rule::ReservedWords;
use parsegen_core::regex::Regex;
use parsegen_core::{dfa_build, nfa_build, LexRule};
use parsegen_runtime::lexer::Lexer;
use parsegen_runtime::types::CharClass;

use pretty_assertions::assert_eq;

fn ident_automaton() -> parsegen_runtime::types::CompiledLexer {
  let mut words = BTreeMap::new();
  words.insert("if".to_string(), "IF".to_string());
  words.insert("else".to_string(), "ELSE".to_string());
  let reserved = ReservedWords { case_fold: false, words };

  let rules = vec![
    LexRule::new(0, Regex::Plus(Box::new(Regex::Named(CharClass::Lower)))).with_class("ID").with_reserved_words(reserved),
    LexRule::new(1, Regex::Plus(Box::new(Regex::Named(CharClass::WhiteSpace)))).with_class("WS"),
  ];

  let built = nfa_build::build(&rules, false).expect("rule set compiles");
  dfa_build::build(built)
}

fn tokenize(source: &str) -> Vec<(String, String)> {
  let automaton = ident_automaton();
  let mut lexer = Lexer::start(source, &automaton);
  let mut old_actions = parsegen_runtime::lexer::NullOldActions;

  let mut out = Vec::new();
  while let Some(tok) = lexer.next_token(&mut old_actions).expect("no illegal characters") {
    if tok.class_name == "WS" {
      continue;
    }
    out.push((tok.class_name, tok.lexeme));
  }
  out
}

#[test]
fn reserved_words_reclassify_matching_identifiers() {
  assert_eq!(
    tokenize("if foo"),
    vec![("IF".to_string(), "if".to_string()), ("ID".to_string(), "foo".to_string())]
  );
}

#[test]
fn non_reserved_identifiers_keep_the_generic_class() {
  assert_eq!(tokenize("else elsewhere"), vec![("ELSE".to_string(), "else".to_string()), ("ID".to_string(), "elsewhere".to_string())]);
}
