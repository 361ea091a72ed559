use std::collections::{BTreeMap, BTreeSet};

/// A coarse character classification, standing in for the Unicode General
/// Category groups the spec calls out by name. We use the boundaries
/// `std::char`'s own classification methods already expose (`is_alphabetic`,
/// `is_numeric`, `is_whitespace`, ...) rather than shipping a full Unicode
/// category table — see `DESIGN.md` for why this is sufficient for the
/// DFA's equivalence-class purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharClass {
  Upper,
  Lower,
  Letter,
  Digit,
  Number,
  Symbol,
  Punctuation,
  WhiteSpace,
  Separator,
  Other,
}

impl CharClass {
  /// Classifies `ch` into its category. This is the "first reference"
  /// lookup a [`CharCategorizer`] performs before it has a [`Charset`] to
  /// consult.
  pub fn of(ch: char) -> Self {
    if ch.is_ascii_digit() || (ch.is_numeric() && ch.is_alphabetic() == false && ch.len_utf8() == 1) {
      Self::Digit
    } else if ch.is_uppercase() {
      Self::Upper
    } else if ch.is_lowercase() {
      Self::Lower
    } else if ch.is_alphabetic() {
      Self::Letter
    } else if ch.is_numeric() {
      Self::Number
    } else if ch.is_whitespace() {
      if ch == ' ' || ch == '\t' {
        Self::WhiteSpace
      } else {
        Self::Separator
      }
    } else if ch.is_ascii_punctuation() {
      Self::Punctuation
    } else if ch.is_control() {
      Self::Other
    } else {
      Self::Symbol
    }
  }
}

/// A character equivalence class: a Unicode-category bucket plus a
/// *generic representative* and the characters that must be kept distinct
/// from it.
///
/// Invariant: for any `c` in `category`, `filter(c)` returns `c` if it is
/// in `distinguished`, else `representative`.
#[derive(Debug, Clone)]
pub struct Charset {
  pub category: CharClass,
  pub representative: char,
  pub distinguished: BTreeSet<char>,
}

impl Charset {
  fn new(category: CharClass, representative: char) -> Self {
    Self { category, representative, distinguished: BTreeSet::new() }
  }

  /// Reconstructs a Charset from its parts, for codecs that decode a
  /// previously-serialized one rather than building it up via `use_char`.
  pub fn from_parts(category: CharClass, representative: char, distinguished: BTreeSet<char>) -> Self {
    Self { category, representative, distinguished }
  }

  /// Filters `ch`, returning its equivalence-class delegate.
  pub fn filter(&self, ch: char) -> char {
    if self.distinguished.contains(&ch) {
      ch
    } else {
      self.representative
    }
  }

  /// The width of this Charset's contribution to a DFA transition row:
  /// one slot per distinguished character, plus one for the representative.
  pub fn width(&self) -> usize {
    self.distinguished.len() + 1
  }
}

/// Maintains one [`Charset`] per [`CharClass`], seeding each lazily on
/// first reference and promoting characters into the distinguished set as
/// regexes force them apart.
#[derive(Debug, Clone, Default)]
pub struct CharCategorizer {
  classes: BTreeMap<CharClass, Charset>,
  fallback: CharClass,
}

impl CharCategorizer {
  pub fn new() -> Self {
    Self { classes: BTreeMap::new(), fallback: CharClass::Other }
  }

  /// Ensures `ch` is distinguishable from its category's representative,
  /// either by seeding a fresh Charset (first reference to the category)
  /// or by adding `ch` to an existing Charset's distinguished set.
  pub fn use_char(&mut self, ch: char) {
    let class = CharClass::of(ch);
    match self.classes.get_mut(&class) {
      Some(set) if set.representative == ch => {}
      Some(set) => {
        set.distinguished.insert(ch);
      }
      None => {
        self.classes.insert(class, Charset::new(class, ch));
      }
    }
  }

  /// Returns `ch` if it has been explicitly distinguished, else the
  /// representative of its category (or the fallback category's
  /// representative, if the category has never been referenced).
  pub fn filter(&self, ch: char) -> char {
    let class = CharClass::of(ch);
    match self.classes.get(&class) {
      Some(set) => set.filter(ch),
      None => match self.classes.get(&self.fallback) {
        Some(set) => set.representative,
        None => ch,
      },
    }
  }

  /// Resolves a named character predicate: a [`CharClass`] name, or one of
  /// the aggregate names the spec calls out (`Symbol`, `Punctuation`,
  /// `Separator`, `WhiteSpace`, `Number`, `Digit`, `Letter`, `Lower`,
  /// `Upper`, `EOF`). Marks the implicated class as used as a side effect,
  /// the way referencing a category in a regex does.
  pub fn test_from_name(&mut self, name: &str) -> Option<Box<dyn Fn(Option<char>) -> bool + Send + Sync>> {
    let class = match name {
      "Upper" => CharClass::Upper,
      "Lower" => CharClass::Lower,
      "Letter" => CharClass::Letter,
      "Digit" => CharClass::Digit,
      "Number" => CharClass::Number,
      "Symbol" => CharClass::Symbol,
      "Punctuation" => CharClass::Punctuation,
      "WhiteSpace" => CharClass::WhiteSpace,
      "Separator" => CharClass::Separator,
      "EOF" => return Some(Box::new(|c| c.is_none())),
      _ => return None,
    };

    self.use_class(class);

    Some(Box::new(move |c| match c {
      Some(c) => CharClass::of(c) == class,
      None => false,
    }))
  }

  /// Ensures `class` has a seeded representative, without distinguishing
  /// any particular character the way [`Self::use_char`] does — the
  /// registration a bare `{Digit}`/`{Letter}`/... regex node needs so the
  /// DFA builder's alphabet includes at least one character that routes
  /// through this category.
  pub fn use_class(&mut self, class: CharClass) {
    self.classes.entry(class).or_insert_with(|| Charset::new(class, representative_seed(class)));
  }

  pub fn charsets(&self) -> impl Iterator<Item = &Charset> {
    self.classes.values()
  }

  /// Reconstructs a categorizer from its decoded charsets, for codecs —
  /// `use_char` cannot do this since it always treats the first-seen
  /// character of a class as the representative, which would not
  /// necessarily match what was actually serialized.
  pub fn from_charsets(charsets: impl IntoIterator<Item = Charset>) -> Self {
    let mut classes = BTreeMap::new();
    for cs in charsets {
      classes.insert(cs.category, cs);
    }
    Self { classes, fallback: CharClass::Other }
  }
}

/// Picks a representative that actually round-trips back through
/// [`CharClass::of`] — a char whose own classification matches `class`,
/// not just one that's loosely associated with it. `'a'`/`'0'`/`' '` would
/// be wrong picks for `Letter`/`Number`/`Separator`: `of('a')` is `Lower`,
/// `of('0')` is `Digit`, `of(' ')` is `WhiteSpace`.
fn representative_seed(class: CharClass) -> char {
  match class {
    CharClass::Upper => 'A',
    CharClass::Lower => 'a',
    CharClass::Letter => '中',
    CharClass::Digit => '0',
    CharClass::Number => '½',
    CharClass::Symbol => '±',
    CharClass::Punctuation => '.',
    CharClass::WhiteSpace => ' ',
    CharClass::Separator => '\u{2028}',
    CharClass::Other => '\0',
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn filter_is_consistent_with_distinguished_set() {
    let mut cat = CharCategorizer::new();
    cat.use_char('a');
    cat.use_char('b');
    // 'a' seeded the Lower class as its representative; 'b' is distinguished.
    assert_eq!(cat.filter('a'), 'a');
    assert_eq!(cat.filter('b'), 'b');
    // 'c' was never referenced, so it collapses to the representative.
    assert_eq!(cat.filter('c'), 'a');
  }

  #[test]
  fn every_representative_seed_classifies_as_its_own_class() {
    // use_class seeds a Charset whose representative must itself route
    // through CharClass::of back to the same class, or a bare `{Letter}`/
    // `{Number}`/`{Symbol}`/`{Separator}` rule would build a DFA alphabet
    // entry that can never actually step the NFA arc it was meant to feed.
    for &class in &[
      CharClass::Upper,
      CharClass::Lower,
      CharClass::Letter,
      CharClass::Digit,
      CharClass::Number,
      CharClass::Symbol,
      CharClass::Punctuation,
      CharClass::WhiteSpace,
      CharClass::Separator,
      CharClass::Other,
    ] {
      let mut cat = CharCategorizer::new();
      cat.use_class(class);
      let rep = cat.charsets().next().unwrap().representative;
      assert_eq!(CharClass::of(rep), class, "representative {rep:?} for {class:?} misclassifies");
    }
  }

  #[test]
  fn eof_predicate_matches_only_none() {
    let mut cat = CharCategorizer::new();
    let pred = cat.test_from_name("EOF").unwrap();
    assert!(pred(None));
    assert!(!pred(Some('a')));
  }
}
