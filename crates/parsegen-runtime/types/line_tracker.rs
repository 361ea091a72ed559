use std::fmt::{self, Display};

/// A single recorded newline, together with the spans of any inline
/// comments the [`CharReader`](crate::lexer) stripped on that line. Nodes
/// are kept in descending-offset order, mirroring the teacher's
/// singly-linked-list-of-newlines approach so that `locate` is a simple
/// forward walk and `newline` rewinds are a cheap prefix pop.
#[derive(Debug, Clone)]
struct LineNode {
  offset: usize,
  comment_spans: Vec<(usize, usize)>,
}

/// Resolves a byte offset into `(file, line, column, line bounds)`.
///
/// Columns are "raw" in the sense that they skip over any inline comment
/// spans recorded on the same line before the queried offset, per spec
/// §4.A — a comment does not count towards the column a diagnostic points
/// at.
#[derive(Debug, Clone)]
pub struct LineTracker {
  line: u32,
  last_offset: usize,
  filename: Option<String>,
  /// Descending by `offset`.
  nodes: Vec<LineNode>,
}

impl Default for LineTracker {
  fn default() -> Self {
    Self { line: 0, last_offset: 0, filename: None, nodes: Vec::new() }
  }
}

impl LineTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a newline at `pos`. If `pos` is at or before the most
  /// recently recorded newline, this is a rescan: pop every node whose
  /// offset is `>= pos` and decrement the line count to match, instead of
  /// treating it as forward progress.
  pub fn newline(&mut self, pos: usize) {
    if let Some(top) = self.nodes.first() {
      if pos <= top.offset {
        let mut popped = 0u32;
        while let Some(top) = self.nodes.first() {
          if top.offset >= pos {
            self.nodes.remove(0);
            popped += 1;
          } else {
            break;
          }
        }
        self.line = self.line.saturating_sub(popped);
      }
    }
    self.nodes.insert(0, LineNode { offset: pos, comment_spans: Vec::new() });
    self.line += 1;
    self.last_offset = pos;
  }

  /// Attaches a `(pos, len)` comment span to the line current at `pos`.
  pub fn comment(&mut self, pos: usize, len: usize) {
    if let Some(top) = self.nodes.first_mut() {
      top.comment_spans.push((pos, len));
    }
  }

  /// Installs the filename and 1-based line number recorded by a
  /// `# <n> "file"` line directive.
  pub fn set_directive(&mut self, line: u32, filename: String) {
    self.filename = Some(filename);
    self.line = line.saturating_sub(1);
  }

  /// Resolves `pos` to `(line, start_of_line, raw_column, end_of_line)`.
  pub fn locate(&self, pos: usize) -> SourceLineInfo {
    let node = self.nodes.iter().find(|n| n.offset <= pos);

    let (line_no, start, spans) = match node {
      Some(n) => {
        // `nodes` is newest-first, so the node's distance from the front
        // of the list is exactly how many newer newlines preceded `pos`.
        let idx = self.nodes.iter().position(|x| x.offset == n.offset).unwrap();
        let line_no = self.line - idx as u32;
        (line_no, n.offset, n.comment_spans.as_slice())
      }
      None => (self.line + 1, 0, &[][..]),
    };

    let skipped: usize = spans
      .iter()
      .filter(|(cpos, _)| *cpos >= start && *cpos < pos)
      .map(|(_, len)| *len)
      .sum();

    let raw_column = pos.saturating_sub(start).saturating_sub(skipped);

    let end = self
      .nodes
      .iter()
      .rev()
      .find(|n| n.offset > start)
      .map(|n| n.offset)
      .unwrap_or(usize::MAX);

    SourceLineInfo {
      file: self.filename.clone(),
      line: line_no,
      column: raw_column as u32,
      start_of_line: start,
      end_of_line: end,
    }
  }
}

/// A resolved `(file, line, column)` for user-visible diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLineInfo {
  pub file: Option<String>,
  pub line: u32,
  pub column: u32,
  pub start_of_line: usize,
  pub end_of_line: usize,
}

impl Display for SourceLineInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Line {}, char {}", self.line, self.column)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn locate_is_monotonic_after_newlines() {
    let mut t = LineTracker::new();
    t.newline(10);
    t.newline(20);
    t.newline(30);

    let a = t.locate(5);
    let b = t.locate(15);
    let c = t.locate(25);
    let d = t.locate(35);

    assert!(a.line <= b.line);
    assert!(b.line <= c.line);
    assert!(c.line <= d.line);
  }

  #[test]
  fn rewind_on_rescan_decrements_line_count() {
    let mut t = LineTracker::new();
    t.newline(10);
    t.newline(20);
    t.newline(30);
    assert_eq!(t.locate(35).line, 3);

    // Rescanning from offset 15 should discard nodes at 20 and 30.
    t.newline(15);
    assert_eq!(t.locate(35).line, 2);
  }

  #[test]
  fn comment_spans_are_excluded_from_column() {
    let mut t = LineTracker::new();
    t.newline(0);
    t.comment(2, 5); // columns [2, 7) are a comment
    let info = t.locate(10);
    // 10 - 0 - 5 (comment length) = 5
    assert_eq!(info.column, 5);
  }
}
