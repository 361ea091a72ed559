//! Grammar/lexer fixtures shared across the end-to-end scenarios.

use parsegen_core::grammar::{Assoc, Grammar, SymbolKind};
use parsegen_core::journal::LexParseConfig;
use parsegen_core::regex::Regex;
use parsegen_core::{compile, CompiledLexParse, LexRule};
use parsegen_runtime::lexer::{Lexer, NullOldActions, SymbolFactory};
use parsegen_runtime::parser::{CstBuilder, Parser};
use parsegen_runtime::types::{CharClass, SourceLineInfo, Symbol};
use parsegen_runtime::RuntimeResult;

/// A [`SymbolFactory`] for grammars with no bespoke token types: every
/// terminal is just a plain `Symbol::terminal` wrapping the scanned lexeme.
pub struct PlainSymbolFactory;
impl SymbolFactory for PlainSymbolFactory {
  fn create(&self, class_name: &str, _lexeme: &str, loc: SourceLineInfo) -> RuntimeResult<Symbol> {
    Ok(Symbol::terminal(class_name, 0, loc))
  }
}

/// `E -> E '+' E | E '*' E | NUM`, `left 1 '+'`, `left 2 '*'` (scenario 1).
pub fn arithmetic_grammar() -> Grammar {
  let mut g = Grammar::new();
  let e = g.declare_symbol("E", SymbolKind::Nonterminal);
  let num = g.declare_symbol("NUM", SymbolKind::Terminal);
  let plus = g.intern_literal("+");
  let star = g.intern_literal("*");
  g.symbols.get_mut(&plus).unwrap().declare_precedence(Assoc::Left, 1);
  g.symbols.get_mut(&star).unwrap().declare_precedence(Assoc::Left, 2);
  g.add_production(e, vec![e, plus, e]);
  g.add_production(e, vec![e, star, e]);
  g.add_production(e, vec![num]);
  g.set_start_symbol(e);
  g.finish();
  g
}

pub fn arithmetic_lex_rules() -> Vec<LexRule> {
  vec![
    LexRule::new(0, Regex::Plus(Box::new(Regex::Named(CharClass::Digit)))).with_class("NUM"),
    LexRule::new(1, Regex::Char('+')).with_class("+"),
    LexRule::new(2, Regex::Char('*')).with_class("*"),
  ]
}

pub fn compiled_arithmetic() -> CompiledLexParse {
  let g = arithmetic_grammar();
  let rules = arithmetic_lex_rules();
  let (compiled, journal) = compile(&rules, &g, LexParseConfig::new());
  assert!(!journal.report().has_critical_errors(), "{:?}", journal.report().errors());
  compiled
}

/// Drives `source` through a fresh [`Parser`] built against `compiled`,
/// returning the root CST node and the parser used (so callers can inspect
/// `error_count()`/`errors()` afterward).
pub fn parse<'a>(compiled: &'a CompiledLexParse, source: &str) -> (Symbol, Parser<'a>) {
  let lexer = Lexer::start(source, &compiled.lexer);
  let mut parser = Parser::new(lexer, &compiled.parser, 1000);
  let mut old_actions = NullOldActions;
  let factory = PlainSymbolFactory;
  let mut semantic = CstBuilder;
  let root = parser.parse(&mut old_actions, &factory, &mut semantic).expect("parse should not hard-fail");
  (root, parser)
}
