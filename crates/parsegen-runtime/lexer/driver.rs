use super::callbacks::OldActions;
use super::char_reader::CharReader;
use crate::errors::{RuntimeError, RuntimeResult};
use crate::types::{CompiledLexer, DfaId, SourceLineInfo, Token};

/// Scans a buffer against a [`CompiledLexer`]'s DFA: longest match with
/// mark/restore backtracking to the last accepting state, start-condition
/// switching, and reserved-word reclassification.
///
/// The state machine named in the spec ({copy, slash-seen, ...} for
/// `CharReader`) has no counterpart here — `Lexer` only needs a LIFO
/// pushback stack to unwind past the longest match's accepting state back
/// to where it was marked.
pub struct Lexer<'a> {
  reader: CharReader,
  automaton: &'a CompiledLexer,
  start_condition: String,
  match_start: usize,
  yytext: String,
  pushback: Vec<char>,
}

impl<'a> Lexer<'a> {
  pub fn start(source: &str, automaton: &'a CompiledLexer) -> Self {
    Self {
      reader: CharReader::new(source),
      automaton,
      start_condition: "YYINITIAL".to_string(),
      match_start: 0,
      yytext: String::new(),
      pushback: Vec::new(),
    }
  }

  /// Switches the DFA root used for the next token.
  pub fn begin(&mut self, start_condition: impl Into<String>) {
    self.start_condition = start_condition.into();
  }

  pub fn yytext(&self) -> &str {
    &self.yytext
  }

  pub fn yypos(&self) -> usize {
    self.match_start
  }

  pub fn source_line_info(&self, pos: usize) -> SourceLineInfo {
    self.reader.tracker().locate(pos)
  }

  /// Non-destructively inspects the next character without consuming it.
  pub fn peek_char(&mut self) -> RuntimeResult<Option<char>> {
    match self.raw_advance()? {
      Some(c) => {
        self.pushback.push(c);
        Ok(Some(c))
      }
      None => Ok(None),
    }
  }

  /// Consumes and returns the next character.
  pub fn advance(&mut self) -> RuntimeResult<Option<char>> {
    self.raw_advance()
  }

  /// Pushes a character back so the next `advance`/`peek_char` sees it
  /// again — used by semantic actions that over-read.
  pub fn unget_char(&mut self, ch: char) {
    self.pushback.push(ch);
  }

  fn raw_advance(&mut self) -> RuntimeResult<Option<char>> {
    if let Some(c) = self.pushback.pop() {
      return Ok(Some(c));
    }
    self.reader.read()
  }

  /// Scans and returns the next token, or `Ok(None)` at end of input (when
  /// the grammar never referenced the `EOF` predicate) or `Ok(Some(eof))`
  /// when it did.
  pub fn next_token(&mut self, old_actions: &mut dyn OldActions) -> RuntimeResult<Option<Token>> {
    self.match_start = self.reader.pos().saturating_sub(self.pushback.len());

    let mut state = self.automaton.root(&self.start_condition);
    let mut consumed: Vec<char> = Vec::new();
    let mut mark: Option<(DfaId, usize)> = None;

    if self.automaton.dfa.node(state).is_accepting() {
      mark = Some((state, 0));
    }

    loop {
      let c = match self.raw_advance()? {
        Some(c) => c,
        None => break,
      };
      match self.automaton.dfa.transition(&self.automaton.categorizer, state, c) {
        Some(next_state) => {
          consumed.push(c);
          state = next_state;
          if self.automaton.dfa.node(state).is_accepting() {
            mark = Some((state, consumed.len()));
          }
        }
        None => {
          self.pushback.push(c);
          break;
        }
      }
    }

    let (accepting_state, mark_len) = match mark {
      Some(m) => m,
      None => {
        return match consumed.first() {
          None => match self.peek_char()? {
            None => self.eof_token(),
            Some(found) => Err(RuntimeError::IllegalCharacter { loc: self.source_line_info(self.match_start), found }),
          },
          Some(&found) => Err(RuntimeError::IllegalCharacter { loc: self.source_line_info(self.match_start), found }),
        };
      }
    };

    // Back out any characters read past the last accepting state so the
    // next token's scan sees them again.
    for &c in consumed[mark_len..].iter().rev() {
      self.pushback.push(c);
    }

    self.yytext = consumed[..mark_len].iter().collect();
    self.try_actions(accepting_state, old_actions)
  }

  fn eof_token(&self) -> RuntimeResult<Option<Token>> {
    if self.automaton.using_eof {
      Ok(Some(Token::new("EOF", "", self.match_start, self.source_line_info(self.match_start))))
    } else {
      Ok(None)
    }
  }

  /// Walks the accept list head-first, invoking `old_actions` for each
  /// until one is accepted (`reject` stays `false`), then applies the
  /// reserved-word table if the state carries one.
  fn try_actions(&mut self, state: DfaId, old_actions: &mut dyn OldActions) -> RuntimeResult<Option<Token>> {
    let node = self.automaton.dfa.node(state);
    let mut class_name = node.class_name.clone();

    for &action_id in &node.actions {
      let mut reject = false;
      old_actions.run(action_id, &mut self.yytext, &mut reject);
      if !reject {
        break;
      }
    }

    if let Some(table) = self.automaton.dfa.reserved_words(state) {
      if let Some(mapped) = table.lookup(&self.yytext) {
        class_name = Some(mapped.to_string());
      }
    }

    match class_name {
      Some(name) => Ok(Some(Token::new(name, self.yytext.clone(), self.match_start, self.source_line_info(self.match_start)))),
      None => {
        if node.is_accepting() {
          Err(RuntimeError::IllegalCharacter { loc: self.source_line_info(self.match_start), found: self.yytext.chars().next().unwrap_or('\0') })
        } else {
          Ok(None)
        }
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::types::{CharCategorizer, Dfa};
  use std::collections::BTreeMap;

  struct NoopActions;
  impl OldActions for NoopActions {
    fn run(&mut self, _action_id: u32, _lexeme: &mut String, _reject: &mut bool) {}
  }

  /// Builds a tiny DFA recognizing `=` as ASSIGN and `==` as EQ, to cover
  /// the longest-match-with-backtrack scenario from spec §8 scenario 6.
  fn eq_assign_automaton() -> CompiledLexer {
    let mut cc = CharCategorizer::new();
    cc.use_char('=');

    let mut dfa = Dfa::new();
    let s0 = dfa.new_node();
    let s1 = dfa.new_node();
    let s2 = dfa.new_node();
    dfa.node_mut(s1).accept(0, Some("ASSIGN".into()));
    dfa.node_mut(s2).accept(1, Some("EQ".into()));
    dfa.node_mut(s0).transitions.insert('=', s1);
    dfa.node_mut(s1).transitions.insert('=', s2);
    dfa.start = s0;

    let mut starts = BTreeMap::new();
    starts.insert("YYINITIAL".to_string(), s0);

    CompiledLexer { dfa, categorizer: cc, starts, using_eof: false }
  }

  #[test]
  fn longest_match_with_backtrack() {
    let automaton = eq_assign_automaton();
    let mut lexer = Lexer::start("===", &automaton);
    let mut actions = NoopActions;

    let t1 = lexer.next_token(&mut actions).unwrap().unwrap();
    assert_eq!(t1.class_name, "EQ");
    assert_eq!(t1.lexeme, "==");

    let t2 = lexer.next_token(&mut actions).unwrap().unwrap();
    assert_eq!(t2.class_name, "ASSIGN");
    assert_eq!(t2.lexeme, "=");

    assert!(lexer.next_token(&mut actions).unwrap().is_none());
  }
}
