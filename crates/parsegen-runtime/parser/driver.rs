use super::callbacks::SemanticActions;
use super::error_handler::ErrorHandler;
use crate::errors::{RuntimeError, RuntimeResult};
use crate::lexer::{Lexer, OldActions, SymbolFactory};
use crate::types::{CompiledParser, ParserEntry, SourceLineInfo, StateId, Symbol, SymbolId, Token};

/// Stack-based shift/reduce driver: consults a [`CompiledParser`]
/// table one lookahead at a time, shifting scanned [`Token`]s and reducing
/// by dispatching to a [`SemanticActions`] implementation, with panic-mode
/// recovery (synthetic `Error` symbol + token discard) on syntax errors.
///
/// Gotos are not a separate table: a goto out of state `s` over nonterminal
/// `n` is stored as `ParserEntry::Shift` keyed on `(s, n)`, the same way a
/// terminal shift is — both live in the same `(StateId, SymbolId)` keyspace.
pub struct Parser<'a> {
  lexer: Lexer<'a>,
  tables: &'a CompiledParser,
  errors: ErrorHandler,
  stack: Vec<(StateId, Symbol)>,
  lookahead: Option<Token>,
}

impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>, tables: &'a CompiledParser, max_errors: u32) -> Self {
    let sentinel = Symbol::nonterminal("$start", 0, SourceLineInfo::default(), Vec::new());
    Self {
      lexer,
      tables,
      errors: ErrorHandler::new(max_errors),
      stack: vec![(tables.start_state, sentinel)],
      lookahead: None,
    }
  }

  /// Runs the error handler in eager-abort mode: the first syntax error is
  /// returned instead of triggering panic-mode recovery.
  pub fn throw_exceptions(mut self) -> Self {
    self.errors.throw_exceptions = true;
    self
  }

  pub fn error_count(&self) -> u32 {
    self.errors.count()
  }

  pub fn errors(&self) -> &[RuntimeError] {
    self.errors.errors()
  }

  fn fill_lookahead(&mut self, old_actions: &mut dyn OldActions) -> RuntimeResult<()> {
    if self.lookahead.is_none() {
      self.lookahead = self.lexer.next_token(old_actions)?;
    }
    Ok(())
  }

  fn lookahead_symbol_id(&self) -> RuntimeResult<SymbolId> {
    match &self.lookahead {
      Some(tok) => self
        .tables
        .terminal_id(&tok.class_name)
        .ok_or_else(|| RuntimeError::SyntaxError { loc: tok.loc.clone(), found: tok.class_name.clone() }),
      None => self
        .tables
        .terminal_id("EOF")
        .ok_or_else(|| RuntimeError::InternalInvariant("grammar has no EOF terminal".into())),
    }
  }

  fn lookahead_loc(&self) -> SourceLineInfo {
    self.lookahead.as_ref().map(|t| t.loc.clone()).unwrap_or_default()
  }

  /// Drives the parse to completion, returning the root [`Symbol`] of the
  /// resulting concrete syntax tree. `factory` is consulted on every shift
  /// to instantiate the terminal `Symbol` pushed for that token — a
  /// grammar with no custom registrations can pass a factory that just
  /// wraps the token in a plain terminal `Symbol`.
  pub fn parse(&mut self, old_actions: &mut dyn OldActions, factory: &dyn SymbolFactory, semantic: &mut dyn SemanticActions) -> RuntimeResult<Symbol> {
    loop {
      self.fill_lookahead(old_actions)?;
      let top_state = self.stack.last().unwrap().0;
      let lookahead_id = self.lookahead_symbol_id()?;

      match self.tables.table.get(top_state, lookahead_id).cloned() {
        Some(ParserEntry::Shift { target, pre_action }) => {
          let _ = pre_action;
          let tok = self.lookahead.take().expect("lookahead present after fill");
          let mut sym = factory.create(&tok.class_name, &tok.lexeme, tok.loc)?;
          sym.id = lookahead_id;
          self.stack.push((target, sym));
        }
        Some(ParserEntry::Reduce { production, pop_depth, action }) => {
          self.reduce(production, pop_depth, action, semantic)?;
        }
        Some(ParserEntry::Accept { production }) => {
          return self.accept(production, semantic);
        }
        None => {
          self.recover(old_actions)?;
        }
      }
    }
  }

  fn reduce(&mut self, production: u32, pop_depth: u32, action: u32, semantic: &mut dyn SemanticActions) -> RuntimeResult<()> {
    let info = self
      .tables
      .production(production)
      .ok_or_else(|| RuntimeError::InternalInvariant(format!("no production info for {production}")))?
      .clone();

    let split = self
      .stack
      .len()
      .checked_sub(pop_depth as usize)
      .ok_or_else(|| RuntimeError::InternalInvariant("reduce pop_depth exceeds stack depth".into()))?;

    if split == 0 {
      return Err(RuntimeError::InternalInvariant("reduce would pop the start sentinel".into()));
    }

    let kids: Vec<Symbol> = self.stack.split_off(split).into_iter().map(|(_, sym)| sym).collect();
    let mut reduced = semantic.reduce(production, action, &info.nonterminal_name, info.nonterminal_id, kids);
    reduced.inherit_position_if_unset();

    let goto_state = self.stack.last().unwrap().0;
    let target = match self.tables.table.get(goto_state, info.nonterminal_id) {
      Some(ParserEntry::Shift { target, .. }) => *target,
      _ => return Err(RuntimeError::InternalInvariant(format!("no goto from state {goto_state} on nonterminal {}", info.nonterminal_name))),
    };
    self.stack.push((target, reduced));
    Ok(())
  }

  fn accept(&mut self, production: u32, semantic: &mut dyn SemanticActions) -> RuntimeResult<Symbol> {
    let info = self.tables.production(production).cloned();
    let kids: Vec<Symbol> = self.stack.split_off(1).into_iter().map(|(_, sym)| sym).collect();
    Ok(match info {
      Some(info) => semantic.reduce(production, 0, &info.nonterminal_name, info.nonterminal_id, kids),
      None => kids.into_iter().next().unwrap_or_else(|| Symbol::nonterminal("$start", 0, SourceLineInfo::default(), Vec::new())),
    })
  }

  /// Panic-mode recovery: unwind the stack
  /// until a state that accepts the synthetic `Error` symbol is found,
  /// shift it, then discard lookahead tokens until one resynchronizes
  /// (some table entry exists for the post-shift state).
  fn recover(&mut self, old_actions: &mut dyn OldActions) -> RuntimeResult<()> {
    let loc = self.lookahead_loc();
    let found = self.lookahead.as_ref().map(|t| t.class_name.clone()).unwrap_or_else(|| "EOF".to_string());
    self.errors.record(RuntimeError::SyntaxError { loc: loc.clone(), found })?;

    let error_id = self.tables.error_symbol_id;
    while self.stack.len() > 1 {
      let state = self.stack.last().unwrap().0;
      if matches!(self.tables.table.get(state, error_id), Some(ParserEntry::Shift { .. })) {
        break;
      }
      self.stack.pop();
    }

    let state = self.stack.last().unwrap().0;
    let target = match self.tables.table.get(state, error_id) {
      Some(ParserEntry::Shift { target, .. }) => *target,
      _ => return Err(RuntimeError::UnexpectedEof { loc }),
    };
    self.stack.push((target, Symbol::error(loc)));

    loop {
      self.fill_lookahead(old_actions)?;
      let lookahead_id = self.lookahead_symbol_id()?;
      if self.lookahead.is_none() || self.tables.table.get(target, lookahead_id).is_some() {
        return Ok(());
      }
      self.lookahead = None;
    }
  }
}
