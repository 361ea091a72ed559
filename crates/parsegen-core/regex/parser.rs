use super::ast::Regex;
use crate::journal::error::CompileError;
use parsegen_runtime::types::SourceLineInfo;
use std::collections::BTreeMap;

/// Recursive-descent parser over a regex source string.
///
/// `atom ::= '(' regex ')' | '[' ['^'] range-body ']' | '\'' ... '\'' |
///           '"' ... '"' | U'"' ... '"' | '\\' escape | '{' name '}' |
///           '.' | literal char`
/// `suffix ::= '?' | '*' | '+'`
/// `regex ::= atom suffix? ( '|' regex | regex )?`
pub(super) struct Parser<'a> {
  chars: Vec<char>,
  pos: usize,
  defines: &'a BTreeMap<String, String>,
  loc: SourceLineInfo,
}

impl<'a> Parser<'a> {
  pub fn new(src: &str, defines: &'a BTreeMap<String, String>, loc: SourceLineInfo) -> Self {
    Self { chars: src.chars().collect(), pos: 0, defines, loc }
  }

  fn peek(&self) -> Option<char> {
    self.chars.get(self.pos).copied()
  }

  fn peek_at(&self, n: usize) -> Option<char> {
    self.chars.get(self.pos + n).copied()
  }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek();
    if c.is_some() {
      self.pos += 1;
    }
    c
  }

  fn err(&self, message: impl Into<String>) -> CompileError {
    CompileError::IllformedRegex {
      loc: self.loc.clone(),
      message: message.into(),
      inline_message: self.chars[self.pos.min(self.chars.len())..].iter().collect(),
    }
  }

  fn expect(&mut self, want: char) -> Result<(), CompileError> {
    match self.bump() {
      Some(c) if c == want => Ok(()),
      _ => Err(self.err(format!("expected `{want}`"))),
    }
  }

  pub fn parse_top(mut self) -> Result<Regex, CompileError> {
    let node = self.parse_regex()?;
    if self.pos != self.chars.len() {
      return Err(self.err("unexpected trailing input"));
    }
    Ok(node)
  }

  /// `regex ::= atom suffix? ( '|' regex | regex )?`
  fn parse_regex(&mut self) -> Result<Regex, CompileError> {
    let first = self.parse_suffixed()?;
    let mut concat_parts = vec![first];
    let mut alt_branches: Vec<Regex> = Vec::new();

    loop {
      match self.peek() {
        Some('|') => {
          self.bump();
          alt_branches.push(Self::fold_concat(std::mem::take(&mut concat_parts)));
          concat_parts.push(self.parse_suffixed()?);
        }
        Some(c) if c != ')' && c != ']' => {
          concat_parts.push(self.parse_suffixed()?);
        }
        _ => break,
      }
    }

    alt_branches.push(Self::fold_concat(concat_parts));
    Ok(if alt_branches.len() == 1 { alt_branches.pop().unwrap() } else { Regex::Alt(alt_branches) })
  }

  fn fold_concat(parts: Vec<Regex>) -> Regex {
    if parts.len() == 1 {
      parts.into_iter().next().unwrap()
    } else {
      Regex::Concat(parts)
    }
  }

  /// `atom suffix?`
  fn parse_suffixed(&mut self) -> Result<Regex, CompileError> {
    let atom = self.parse_atom()?;
    Ok(match self.peek() {
      Some('?') => {
        self.bump();
        Regex::Opt(Box::new(atom))
      }
      Some('*') => {
        self.bump();
        Regex::Star(Box::new(atom))
      }
      Some('+') => {
        self.bump();
        Regex::Plus(Box::new(atom))
      }
      _ => atom,
    })
  }

  fn parse_atom(&mut self) -> Result<Regex, CompileError> {
    match self.peek() {
      None => Err(self.err("expected an atom, found end of input")),
      Some('(') => {
        self.bump();
        let inner = self.parse_regex()?;
        self.expect(')')?;
        Ok(inner)
      }
      Some('[') => {
        self.bump();
        self.parse_range()
      }
      Some('\'') => {
        self.bump();
        let text = self.parse_quoted('\'')?;
        Ok(Regex::Literal { text, case_insensitive: false })
      }
      Some('"') => {
        self.bump();
        let text = self.parse_quoted('"')?;
        Ok(Regex::Literal { text, case_insensitive: false })
      }
      Some('U') if self.peek_at(1) == Some('"') => {
        self.bump();
        self.bump();
        let text = self.parse_quoted('"')?;
        Ok(Regex::Literal { text, case_insensitive: true })
      }
      Some('\\') => {
        self.bump();
        self.parse_escape().map(Regex::Char)
      }
      Some('{') => {
        self.bump();
        self.parse_named()
      }
      Some('.') => {
        self.bump();
        Ok(Regex::AnyExceptNewline)
      }
      Some(c) => {
        self.bump();
        Ok(Regex::Char(c))
      }
    }
  }

  fn parse_quoted(&mut self, close: char) -> Result<String, CompileError> {
    let mut out = String::new();
    loop {
      match self.bump() {
        None => return Err(self.err(format!("unterminated string literal, expected closing `{close}`"))),
        Some(c) if c == close => return Ok(out),
        Some('\\') => out.push(self.parse_escape()?),
        Some(c) => out.push(c),
      }
    }
  }

  /// Escape alphabet: `\r \t \v \n \0 \\ \" \'` plus `\<octal>`.
  fn parse_escape(&mut self) -> Result<char, CompileError> {
    match self.bump() {
      Some('r') => Ok('\r'),
      Some('t') => Ok('\t'),
      Some('v') => Ok('\x0B'),
      Some('n') => Ok('\n'),
      Some('0') if !matches!(self.peek(), Some(c) if c.is_digit(8)) => Ok('\0'),
      Some('\\') => Ok('\\'),
      Some('"') => Ok('"'),
      Some('\'') => Ok('\''),
      Some(c) if c.is_digit(8) => {
        let mut digits = String::from(c);
        while digits.len() < 3 {
          match self.peek() {
            Some(d) if d.is_digit(8) => {
              digits.push(d);
              self.bump();
            }
            _ => break,
          }
        }
        let code = u32::from_str_radix(&digits, 8).map_err(|_| self.err("invalid octal escape"))?;
        char::from_u32(code).ok_or_else(|| self.err("octal escape is not a valid char"))
      }
      Some(other) => Err(self.err(format!("unknown escape sequence `\\{other}`"))),
      None => Err(self.err("dangling `\\` at end of input")),
    }
  }

  /// `'[' ['^'] range-body ']'`. `range-body` is a run of literal chars and
  /// `\`-escapes; no nested character classes.
  fn parse_range(&mut self) -> Result<Regex, CompileError> {
    let negated = if self.peek() == Some('^') {
      self.bump();
      true
    } else {
      false
    };

    let mut chars = Vec::new();
    loop {
      match self.peek() {
        None => return Err(self.err("unterminated character class, expected `]`")),
        Some(']') => {
          self.bump();
          break;
        }
        Some('\\') => {
          self.bump();
          chars.push(self.parse_escape()?);
        }
        Some(a) => {
          self.bump();
          // `a-z` style range shorthand.
          if self.peek() == Some('-') && !matches!(self.peek_at(1), Some(']') | None) {
            self.bump();
            let b = match self.peek() {
              Some('\\') => {
                self.bump();
                self.parse_escape()?
              }
              Some(b) => {
                self.bump();
                b
              }
              None => return Err(self.err("unterminated range")),
            };
            if b < a {
              return Err(self.err("character range is out of order"));
            }
            let mut c = a;
            while c <= b {
              chars.push(c);
              if c == char::MAX {
                break;
              }
              c = char::from_u32(c as u32 + 1).unwrap_or(char::MAX);
            }
          } else {
            chars.push(a);
          }
        }
      }
    }

    Ok(Regex::Range { chars, negated })
  }

  /// `'{' name '}'` — a named regex expansion from the `defines` table
  /// (parsed recursively), or a named character predicate.
  fn parse_named(&mut self) -> Result<Regex, CompileError> {
    let mut name = String::new();
    loop {
      match self.bump() {
        None => return Err(self.err("unterminated `{...}` reference, expected `}`")),
        Some('}') => break,
        Some(c) => name.push(c),
      }
    }

    if let Some(expansion) = self.defines.get(&name) {
      return Parser::new(expansion, self.defines, self.loc.clone()).parse_top();
    }

    named_char_class(&name).map(Regex::Named).ok_or_else(|| CompileError::UnknownCharset { loc: self.loc.clone(), name })
  }
}

fn named_char_class(name: &str) -> Option<parsegen_runtime::types::CharClass> {
  use parsegen_runtime::types::CharClass;
  Some(match name {
    "Upper" => CharClass::Upper,
    "Lower" => CharClass::Lower,
    "Letter" => CharClass::Letter,
    "Digit" => CharClass::Digit,
    "Number" => CharClass::Number,
    "Symbol" => CharClass::Symbol,
    "Punctuation" => CharClass::Punctuation,
    "WhiteSpace" => CharClass::WhiteSpace,
    "Separator" => CharClass::Separator,
    _ => return None,
  })
}
