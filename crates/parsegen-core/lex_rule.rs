use crate::regex::Regex;
use std::collections::BTreeMap;

/// A reserved-word exception list attached to a lexer rule.
#[derive(Debug, Clone, Default)]
pub struct ReservedWords {
  pub case_fold: bool,
  /// spelling -> token class name.
  pub words: BTreeMap<String, String>,
}

/// One `%TokClassName pattern [%except {words}]` declaration from the
/// front-end's grammar object.
///
/// `action_id` must be assigned by the caller in NFA definition order —
/// lower ids win priority ties.
#[derive(Debug, Clone)]
pub struct LexRule {
  pub action_id: u32,
  pub pattern: Regex,
  pub class_name: Option<String>,
  pub reserved_words: Option<ReservedWords>,
  /// Start-condition names this rule is active under. Empty means
  /// "every start condition" (the common case for a single-mode lexer).
  pub start_conditions: Vec<String>,
}

impl LexRule {
  pub fn new(action_id: u32, pattern: Regex) -> Self {
    Self { action_id, pattern, class_name: None, reserved_words: None, start_conditions: Vec::new() }
  }

  pub fn with_class(mut self, name: impl Into<String>) -> Self {
    self.class_name = Some(name.into());
    self
  }

  pub fn with_reserved_words(mut self, words: ReservedWords) -> Self {
    self.reserved_words = Some(words);
    self
  }

  pub fn in_start_condition(mut self, name: impl Into<String>) -> Self {
    self.start_conditions.push(name.into());
    self
  }

  pub fn applies_to(&self, start_condition: &str) -> bool {
    self.start_conditions.is_empty() || self.start_conditions.iter().any(|s| s == start_condition)
  }
}
