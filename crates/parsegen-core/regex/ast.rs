use super::parser::Parser as RegexParser;
use crate::journal::error::CompileError;
use parsegen_runtime::types::{CharCategorizer, CharClass, Nfa, NfaArc, NfaId, SourceLineInfo};
use std::collections::BTreeMap;

/// One node of a parsed regular expression. Each node knows how
/// to print itself, greedily match against a string slice, and lower itself
/// into a Thompson-construction NFA fragment.
///
/// `Alt` tries every branch when matching — not just the first — so an
/// alternation can never silently fail to reach a later option.
#[derive(Debug, Clone, PartialEq)]
pub enum Regex {
  /// A single literal character.
  Char(char),
  /// `.` — matches anything except `\n`.
  AnyExceptNewline,
  /// A named character predicate (`{Letter}`, `{Digit}`, a user `defines`
  /// entry already expanded at parse time, ...).
  Named(CharClass),
  /// `[...]` / `[^...]` — an explicit set of characters, optionally negated.
  Range { chars: Vec<char>, negated: bool },
  /// A quoted string literal (`'...'`, `"..."`, or `U"..."`).
  Literal { text: String, case_insensitive: bool },
  /// `AB` — sequential composition.
  Concat(Vec<Regex>),
  /// `A|B` — both branches are viable matches.
  Alt(Vec<Regex>),
  /// `A?`
  Opt(Box<Regex>),
  /// `A*`
  Star(Box<Regex>),
  /// `A+`
  Plus(Box<Regex>),
}

impl Regex {
  /// Parses `src` as a complete regex, expanding `{name}` references against
  /// `defines` first (a named-regex table, distinct from a character-class
  /// name) and falling back to [`CharCategorizer::test_from_name`] when a
  /// brace reference isn't in `defines`.
  pub fn parse(src: &str, defines: &BTreeMap<String, String>, loc: SourceLineInfo) -> Result<Regex, CompileError> {
    RegexParser::new(src, defines, loc).parse_top()
  }

  /// Greedy match length starting at `pos` in `text`, capped at `max`, or
  /// `None` if this node cannot match at `pos` at all. Used by generation-time
  /// regex validation tooling, not by the compiled DFA (which is what the
  /// runtime actually scans with).
  pub fn match_len(&self, text: &[char], pos: usize, max: usize) -> Option<usize> {
    if pos > max {
      return None;
    }
    match self {
      Regex::Char(c) => (text.get(pos) == Some(c)).then_some(1),
      Regex::AnyExceptNewline => matches!(text.get(pos), Some(c) if *c != '\n').then_some(1),
      Regex::Named(class) => matches!(text.get(pos), Some(c) if CharClass::of(*c) == *class).then_some(1),
      Regex::Range { chars, negated } => match text.get(pos) {
        Some(c) => {
          let hit = chars.contains(c);
          (hit != *negated).then_some(1)
        }
        None => None,
      },
      Regex::Literal { text: lit, case_insensitive } => {
        let lit_chars: Vec<char> = lit.chars().collect();
        if pos + lit_chars.len() > max + 1 {
          return None;
        }
        let slice = text.get(pos..pos + lit_chars.len())?;
        let eq = if *case_insensitive {
          slice.iter().zip(&lit_chars).all(|(a, b)| a.to_ascii_uppercase() == b.to_ascii_uppercase())
        } else {
          slice == lit_chars.as_slice()
        };
        eq.then_some(lit_chars.len())
      }
      Regex::Concat(parts) => {
        let mut cursor = pos;
        for part in parts {
          let len = part.match_len(text, cursor, max)?;
          cursor += len;
        }
        Some(cursor - pos)
      }
      Regex::Alt(branches) => {
        // Try every branch; the longest successful match wins.
        branches.iter().filter_map(|b| b.match_len(text, pos, max)).max()
      }
      Regex::Opt(sub) => Some(sub.match_len(text, pos, max).unwrap_or(0)),
      Regex::Star(sub) => {
        let mut cursor = pos;
        while let Some(len) = sub.match_len(text, cursor, max) {
          if len == 0 {
            break;
          }
          cursor += len;
        }
        Some(cursor - pos)
      }
      Regex::Plus(sub) => {
        let first = sub.match_len(text, pos, max)?;
        let mut cursor = pos + first;
        while let Some(len) = sub.match_len(text, cursor, max) {
          if len == 0 {
            break;
          }
          cursor += len;
        }
        Some(cursor - pos)
      }
    }
  }

  /// Thompson construction: lowers this
  /// node into a new `(start, end)` NFA fragment. Every concrete character
  /// this node can match is registered with `cats` via `use_char` so the
  /// DFA's eventual transition keys are sufficient to distinguish it.
  pub fn build(&self, nfa: &mut Nfa, cats: &mut CharCategorizer) -> (NfaId, NfaId) {
    match self {
      Regex::Char(c) => {
        cats.use_char(*c);
        let (s, e) = (nfa.new_node(), nfa.new_node());
        nfa.add_arc(s, NfaArc::Char(*c, e));
        (s, e)
      }
      Regex::AnyExceptNewline => {
        cats.use_char('\n');
        let (s, e) = (nfa.new_node(), nfa.new_node());
        nfa.add_arc(s, NfaArc::CharExcept(vec!['\n'], e));
        (s, e)
      }
      Regex::Named(class) => {
        cats.use_class(*class);
        let (s, e) = (nfa.new_node(), nfa.new_node());
        nfa.add_arc(s, NfaArc::Class(*class, e));
        (s, e)
      }
      Regex::Range { chars, negated } => {
        let (s, e) = (nfa.new_node(), nfa.new_node());
        if *negated {
          // A negated range is a single predicate: anything not in `chars`.
          for c in chars {
            cats.use_char(*c);
          }
          nfa.add_arc(s, NfaArc::CharExcept(chars.clone(), e));
        } else {
          for c in chars {
            cats.use_char(*c);
            nfa.add_arc(s, NfaArc::Char(*c, e));
          }
        }
        (s, e)
      }
      Regex::Literal { text, case_insensitive } => {
        let s = nfa.new_node();
        let mut cur = s;
        for c in text.chars() {
          let next = nfa.new_node();
          if *case_insensitive {
            for variant in [c.to_ascii_uppercase(), c.to_ascii_lowercase()] {
              cats.use_char(variant);
              nfa.add_arc(cur, NfaArc::Char(variant, next));
            }
          } else {
            cats.use_char(c);
            nfa.add_arc(cur, NfaArc::Char(c, next));
          }
          cur = next;
        }
        (s, cur)
      }
      Regex::Concat(parts) => {
        let start = nfa.new_node();
        let mut cur = start;
        for part in parts {
          let (sub_start, sub_end) = part.build(nfa, cats);
          nfa.add_arc(cur, NfaArc::Epsilon(sub_start));
          cur = sub_end;
        }
        let end = nfa.new_node();
        nfa.add_arc(cur, NfaArc::Epsilon(end));
        (start, end)
      }
      Regex::Alt(branches) => {
        let start = nfa.new_node();
        let end = nfa.new_node();
        for branch in branches {
          let (sub_start, sub_end) = branch.build(nfa, cats);
          nfa.add_arc(start, NfaArc::Epsilon(sub_start));
          nfa.add_arc(sub_end, NfaArc::Epsilon(end));
        }
        (start, end)
      }
      Regex::Opt(sub) => {
        let (sub_start, sub_end) = sub.build(nfa, cats);
        let start = nfa.new_node();
        let end = nfa.new_node();
        nfa.add_arc(start, NfaArc::Epsilon(sub_start));
        nfa.add_arc(sub_end, NfaArc::Epsilon(end));
        nfa.add_arc(start, NfaArc::Epsilon(end));
        (start, end)
      }
      Regex::Star(sub) => {
        let (sub_start, sub_end) = sub.build(nfa, cats);
        let start = nfa.new_node();
        let end = nfa.new_node();
        nfa.add_arc(start, NfaArc::Epsilon(sub_start));
        nfa.add_arc(start, NfaArc::Epsilon(end));
        nfa.add_arc(sub_end, NfaArc::Epsilon(sub_start));
        nfa.add_arc(sub_end, NfaArc::Epsilon(end));
        (start, end)
      }
      Regex::Plus(sub) => {
        let (sub_start, sub_end) = sub.build(nfa, cats);
        let end = nfa.new_node();
        nfa.add_arc(sub_end, NfaArc::Epsilon(sub_start));
        nfa.add_arc(sub_end, NfaArc::Epsilon(end));
        (sub_start, end)
      }
    }
  }
}

impl std::fmt::Display for Regex {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Regex::Char(c) => write!(f, "{c}"),
      Regex::AnyExceptNewline => write!(f, "."),
      Regex::Named(class) => write!(f, "{{{class:?}}}"),
      Regex::Range { chars, negated } => {
        write!(f, "[{}", if *negated { "^" } else { "" })?;
        for c in chars {
          write!(f, "{c}")?;
        }
        write!(f, "]")
      }
      Regex::Literal { text, .. } => write!(f, "'{text}'"),
      Regex::Concat(parts) => parts.iter().try_for_each(|p| write!(f, "{p}")),
      Regex::Alt(branches) => {
        for (i, b) in branches.iter().enumerate() {
          if i > 0 {
            write!(f, "|")?;
          }
          write!(f, "{b}")?;
        }
        Ok(())
      }
      Regex::Opt(sub) => write!(f, "({sub})?"),
      Regex::Star(sub) => write!(f, "({sub})*"),
      Regex::Plus(sub) => write!(f, "({sub})+"),
    }
  }
}
