use crate::journal::error::CompileError;
use crate::lex_rule::{LexRule, ReservedWords};
use parsegen_runtime::types::{CharCategorizer, Nfa, NfaArc, NfaId, TerminalTag};
use std::collections::BTreeMap;

/// The ε-NFA lowering of a full rule set,
/// with one synthetic root per start condition epsilon-linked to the
/// fragments active in it, and a side table carrying each action's
/// reserved-word exceptions (not part of [`TerminalTag`] — the DFA builder
/// consults this by action id when it promotes an NFA accept to a DFA
/// accept).
pub struct NfaBuild {
  pub nfa: Nfa,
  pub categorizer: CharCategorizer,
  pub starts: BTreeMap<String, NfaId>,
  pub using_eof: bool,
  pub reserved_words: BTreeMap<u32, ReservedWords>,
}

/// Builds the combined NFA for every rule in `rules`. `using_eof` mirrors
/// whatever `cats.test_from_name("EOF")` recorded during pattern
/// construction — patterns never directly reference `EOF` as a matchable
/// character (it is synthesized by the lexer runtime), but a grammar may
/// still declare it was used via a named predicate in an action guard.
pub fn build(rules: &[LexRule], explicit_eof_reference: bool) -> Result<NfaBuild, CompileError> {
  let mut nfa = Nfa::new();
  let mut categorizer = CharCategorizer::new();
  let mut reserved_words = BTreeMap::new();

  let mut start_names: Vec<String> = rules.iter().flat_map(|r| r.start_conditions.clone()).collect();
  if start_names.is_empty() || !start_names.iter().any(|s| s == "YYINITIAL") {
    start_names.push("YYINITIAL".to_string());
  }
  start_names.sort();
  start_names.dedup();

  let mut starts = BTreeMap::new();

  for start_name in &start_names {
    let root = nfa.new_node();
    starts.insert(start_name.clone(), root);

    for rule in rules {
      if !rule.applies_to(start_name) {
        continue;
      }
      let (frag_start, frag_end) = rule.pattern.build(&mut nfa, &mut categorizer);
      nfa.add_arc(root, NfaArc::Epsilon(frag_start));

      nfa.nodes[frag_end as usize].terminal = Some(TerminalTag {
        action_id: rule.action_id,
        class_name: rule.class_name.clone(),
        except: rule.reserved_words.as_ref().map(|r| r.words.keys().cloned().collect()).unwrap_or_default(),
      });

      if let Some(rw) = &rule.reserved_words {
        reserved_words.insert(rule.action_id, rw.clone());
      }
    }
  }

  Ok(NfaBuild { nfa, categorizer, starts, using_eof: explicit_eof_reference, reserved_words })
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::regex::Regex;
  use std::collections::BTreeSet;

  #[test]
  fn each_rule_contributes_a_reachable_terminal() {
    let rules = vec![
      LexRule::new(0, Regex::Char('a')).with_class("A"),
      LexRule::new(1, Regex::Char('b')).with_class("B"),
    ];
    let build = build(&rules, false).unwrap();
    let root = build.starts["YYINITIAL"];
    let closure = build.nfa.epsilon_closure(&BTreeSet::from([root]));

    let after_a = build.nfa.epsilon_closure(&build.nfa.step(&closure, Some('a')));
    assert!(after_a.iter().any(|id| build.nfa.node(*id).terminal.as_ref().map(|t| t.action_id) == Some(0)));

    let after_b = build.nfa.epsilon_closure(&build.nfa.step(&closure, Some('b')));
    assert!(after_b.iter().any(|id| build.nfa.node(*id).terminal.as_ref().map(|t| t.action_id) == Some(1)));
  }

  #[test]
  fn start_condition_scoping_excludes_inactive_rules() {
    let rules = vec![
      LexRule::new(0, Regex::Char('a')).with_class("A"),
      LexRule::new(1, Regex::Char('b')).with_class("B").in_start_condition("COMMENT"),
    ];
    let build = build(&rules, false).unwrap();
    assert!(build.starts.contains_key("YYINITIAL"));
    assert!(build.starts.contains_key("COMMENT"));

    let init_root = build.starts["YYINITIAL"];
    let closure = build.nfa.epsilon_closure(&BTreeSet::from([init_root]));
    let after_b = build.nfa.epsilon_closure(&build.nfa.step(&closure, Some('b')));
    assert!(after_b.is_empty());
  }
}
