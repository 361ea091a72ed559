use super::charset::CharCategorizer;
use std::collections::BTreeMap;

pub type DfaId = u32;

/// A reserved-word exception table, attached to a DFA accepting state
///. When the state produces an accept,
/// the matched lexeme is looked up here (case-folded first, if
/// `case_fold` is set) and reclassified on a hit.
#[derive(Debug, Clone, Default)]
pub struct ReservedWordTable {
  pub case_fold: bool,
  pub words: BTreeMap<String, String>,
}

impl ReservedWordTable {
  /// Looks up `lexeme`, applying case folding first if configured.
  /// Returns the token class name to reclassify to, if any.
  pub fn lookup(&self, lexeme: &str) -> Option<&str> {
    if self.case_fold {
      let folded = lexeme.to_uppercase();
      self.words.iter().find(|(k, _)| k.to_uppercase() == folded).map(|(_, v)| v.as_str())
    } else {
      self.words.get(lexeme).map(String::as_str)
    }
  }
}

/// One DFA state: a transition row keyed on *filtered* characters, an
/// ascending-by-action-id accept list (head wins ties), and optional
/// token-class/reserved-word metadata.
#[derive(Debug, Clone, Default)]
pub struct DfaNode {
  pub id: DfaId,
  pub transitions: BTreeMap<char, DfaId>,
  /// Sorted ascending by action id; `actions[0]` is the highest-priority
  /// (lowest-numbered, i.e. earliest-declared) match for this state.
  pub actions: Vec<u32>,
  pub class_name: Option<String>,
  pub reserved_words: Option<usize>,
}

impl DfaNode {
  pub fn is_accepting(&self) -> bool {
    !self.actions.is_empty()
  }

  /// Inserts `action_id` keeping `actions` sorted ascending, and adopts
  /// `class_name` only if it is offered with a strictly lower action id
  /// than any class name already recorded (earlier declarations dominate,
  /// spec §4.E "Numeric semantics").
  pub fn accept(&mut self, action_id: u32, class_name: Option<String>) {
    match self.actions.binary_search(&action_id) {
      Ok(_) => {}
      Err(pos) => self.actions.insert(pos, action_id),
    }
    if let Some(name) = class_name {
      let dominates = match self.actions.first() {
        Some(top) => action_id <= *top,
        None => true,
      };
      if dominates || self.class_name.is_none() {
        self.class_name = Some(name);
      }
    }
  }
}

/// A deterministic finite automaton over filtered characters.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
  pub nodes: Vec<DfaNode>,
  pub start: DfaId,
  pub reserved_word_tables: Vec<ReservedWordTable>,
}

impl Dfa {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn new_node(&mut self) -> DfaId {
    let id = self.nodes.len() as DfaId;
    self.nodes.push(DfaNode { id, ..Default::default() });
    id
  }

  pub fn node(&self, id: DfaId) -> &DfaNode {
    &self.nodes[id as usize]
  }

  pub fn node_mut(&mut self, id: DfaId) -> &mut DfaNode {
    &mut self.nodes[id as usize]
  }

  /// Looks up the transition for the *raw* character `ch`, filtering it
  /// through `cc` first. `transition(s, c) == transition(s, filter(c))`
  /// holds by construction since this is the only way to query a
  /// transition.
  pub fn transition(&self, cc: &CharCategorizer, id: DfaId, ch: char) -> Option<DfaId> {
    let filtered = cc.filter(ch);
    self.nodes[id as usize].transitions.get(&filtered).copied()
  }

  pub fn reserved_words(&self, id: DfaId) -> Option<&ReservedWordTable> {
    self.nodes[id as usize].reserved_words.map(|idx| &self.reserved_word_tables[idx])
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn earlier_action_id_dominates_class_name() {
    let mut node = DfaNode::default();
    node.accept(5, Some("LATE".into()));
    node.accept(2, Some("EARLY".into()));
    assert_eq!(node.class_name.as_deref(), Some("EARLY"));
    assert_eq!(node.actions, vec![2, 5]);
  }

  #[test]
  fn reserved_word_lookup_respects_case_fold() {
    let mut words = BTreeMap::new();
    words.insert("if".to_string(), "IF".to_string());
    let table = ReservedWordTable { case_fold: true, words };
    assert_eq!(table.lookup("IF"), Some("IF"));
    assert_eq!(table.lookup("If"), Some("IF"));
  }
}
