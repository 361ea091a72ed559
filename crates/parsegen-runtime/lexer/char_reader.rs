use crate::errors::{RuntimeError, RuntimeResult};
use crate::types::LineTracker;

/// `//…\n` and `/*…*/` comment stripping, `\r` elision, and `# <n> "file"`
/// line-directive handling, wrapped around a random-access character
/// buffer.
///
/// The state machine named in the spec ({copy, slash-seen, c_comment,
/// c_comment_star, cpp_comment, eof}) is realized here as the control
/// flow of `read()` itself rather than an explicit `enum` — there is no
/// state that outlives a single `read()` call other than the one-char
/// pushback slot, so naming it separately would just be bookkeeping.
pub struct CharReader {
  chars: Vec<(usize, char)>,
  cursor: usize,
  pushback: Option<(usize, char)>,
  at_line_start: bool,
  tracker: LineTracker,
}

impl CharReader {
  pub fn new(source: &str) -> Self {
    Self {
      chars: source.char_indices().collect(),
      cursor: 0,
      pushback: None,
      at_line_start: true,
      tracker: LineTracker::new(),
    }
  }

  pub fn tracker(&self) -> &LineTracker {
    &self.tracker
  }

  pub fn pos(&self) -> usize {
    match self.pushback {
      Some((pos, _)) => pos,
      None => self.chars.get(self.cursor).map(|(pos, _)| *pos).unwrap_or_else(|| self.chars.last().map(|(p, c)| p + c.len_utf8()).unwrap_or(0)),
    }
  }

  fn raw_next(&mut self) -> Option<(usize, char)> {
    if let Some(pb) = self.pushback.take() {
      return Some(pb);
    }
    let item = self.chars.get(self.cursor).copied();
    if item.is_some() {
      self.cursor += 1;
    }
    item
  }

  fn unget(&mut self, item: (usize, char)) {
    self.pushback = Some(item);
  }

  fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
    self.chars.get(self.cursor + n).copied()
  }

  /// Attempts to parse a `# <digits> "filename"` directive starting right
  /// after the `#` at offset `hash_pos`. On success, consumes through the
  /// trailing newline and installs the directive on the tracker. On
  /// failure, the cursor is left untouched so the `#` is re-read as an
  /// ordinary character.
  fn try_line_directive(&mut self, hash_pos: usize) -> bool {
    let start_cursor = self.cursor;
    let mut n = 0usize;
    let skip_spaces = |reader: &Self, mut i: usize| {
      while matches!(reader.peek_nth(i), Some((_, ' ')) | Some((_, '\t'))) {
        i += 1;
      }
      i
    };

    n = skip_spaces(self, n);
    let digit_start = n;
    while matches!(self.peek_nth(n), Some((_, c)) if c.is_ascii_digit()) {
      n += 1;
    }
    if n == digit_start {
      self.cursor = start_cursor;
      return false;
    }
    let digits: String = (digit_start..n).filter_map(|i| self.peek_nth(i).map(|(_, c)| c)).collect();

    n = skip_spaces(self, n);
    if !matches!(self.peek_nth(n), Some((_, '"'))) {
      self.cursor = start_cursor;
      return false;
    }
    n += 1;
    let name_start = n;
    while !matches!(self.peek_nth(n), Some((_, '"')) | None) {
      n += 1;
    }
    if !matches!(self.peek_nth(n), Some((_, '"'))) {
      self.cursor = start_cursor;
      return false;
    }
    let filename: String = (name_start..n).filter_map(|i| self.peek_nth(i).map(|(_, c)| c)).collect();
    n += 1;

    // Consume through the trailing newline, if present.
    while !matches!(self.peek_nth(n), Some((_, '\n')) | None) {
      n += 1;
    }
    if matches!(self.peek_nth(n), Some((_, '\n'))) {
      n += 1;
    }

    self.cursor = start_cursor + n;
    let line: u32 = digits.parse().unwrap_or(1);
    self.tracker.set_directive(line, filename);
    let _ = hash_pos;
    true
  }

  /// Reads the next logical character, stripping comments and `\r`, and
  /// interpreting line directives. Returns `Ok(None)` at end of input.
  pub fn read(&mut self) -> RuntimeResult<Option<char>> {
    loop {
      let (pos, ch) = match self.raw_next() {
        Some(v) => v,
        None => return Ok(None),
      };

      match ch {
        '\r' => continue,
        '\n' => {
          self.tracker.newline(pos + 1);
          self.at_line_start = true;
          return Ok(Some('\n'));
        }
        '#' if self.at_line_start => {
          if self.try_line_directive(pos) {
            self.at_line_start = true;
            continue;
          }
          self.at_line_start = false;
          return Ok(Some('#'));
        }
        '/' => match self.raw_next() {
          Some((_, '/')) => {
            let start = pos;
            loop {
              match self.raw_next() {
                Some((npos, '\n')) => {
                  self.tracker.comment(start, npos - start);
                  self.unget((npos, '\n'));
                  break;
                }
                Some(_) => continue,
                None => {
                  self.tracker.comment(start, self.pos().saturating_sub(start));
                  break;
                }
              }
            }
            continue;
          }
          Some((_, '*')) => {
            let start = pos;
            loop {
              match self.raw_next() {
                Some((_, '*')) => match self.raw_next() {
                  Some((end_pos, '/')) => {
                    self.tracker.comment(start, end_pos + 1 - start);
                    break;
                  }
                  Some((npos, '\n')) => {
                    self.tracker.newline(npos + 1);
                    continue;
                  }
                  Some(_) => continue,
                  None => return Err(RuntimeError::UnterminatedComment { loc: self.tracker.locate(start) }),
                },
                Some((npos, '\n')) => {
                  self.tracker.newline(npos + 1);
                  continue;
                }
                Some(_) => continue,
                None => return Err(RuntimeError::UnterminatedComment { loc: self.tracker.locate(start) }),
              }
            }
            self.at_line_start = false;
            continue;
          }
          Some(other) => {
            self.unget(other);
            self.at_line_start = false;
            return Ok(Some('/'));
          }
          None => {
            self.at_line_start = false;
            return Ok(Some('/'));
          }
        },
        _ => {
          self.at_line_start = false;
          return Ok(Some(ch));
        }
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn drain(reader: &mut CharReader) -> String {
    let mut out = String::new();
    while let Some(c) = reader.read().unwrap() {
      out.push(c);
    }
    out
  }

  #[test]
  fn strips_line_comments() {
    let mut r = CharReader::new("a // comment\nb\n");
    assert_eq!(drain(&mut r), "a \nb\n");
  }

  #[test]
  fn strips_block_comments_and_counts_embedded_newlines() {
    let mut r = CharReader::new("a/*\n\n*/b");
    assert_eq!(drain(&mut r), "ab");
  }

  #[test]
  fn unterminated_block_comment_is_an_error() {
    let mut r = CharReader::new("a/* never closed");
    assert!(r.read().unwrap().is_some()); // 'a'
    assert!(r.read().is_err());
  }

  #[test]
  fn line_directive_sets_tracker_state() {
    let mut r = CharReader::new("# 100 \"a.l\"\nabc\n");
    let ch = r.read().unwrap();
    assert_eq!(ch, Some('a'));
    let pos = r.pos() - 1;
    assert_eq!(r.tracker().locate(pos).line, 100);
  }

  #[test]
  fn carriage_returns_are_stripped() {
    let mut r = CharReader::new("a\r\nb");
    assert_eq!(drain(&mut r), "a\nb");
  }
}
