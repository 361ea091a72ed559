use crate::nfa_build::NfaBuild;
use parsegen_runtime::types::{CompiledLexer, Dfa, DfaId, NfaId, ReservedWordTable};
use std::collections::{BTreeMap, BTreeSet};

/// Subset construction: builds a [`CompiledLexer`] DFA from the
/// ε-NFA `build.nfa`, canonicalizing DFA states on the sorted NFA-id set
/// they represent and filtering transition characters
/// through `build.categorizer` so the table's width stays bounded by the
/// number of *distinguished* characters rather than the full codepoint
/// space.
pub fn build(build: NfaBuild) -> CompiledLexer {
  let NfaBuild { nfa, categorizer, starts, using_eof, reserved_words } = build;

  let mut dfa = Dfa::new();
  let mut canon: BTreeMap<Vec<NfaId>, DfaId> = BTreeMap::new();
  let mut pending: Vec<(DfaId, BTreeSet<NfaId>)> = Vec::new();

  // The alphabet a transition can be queried on: every representative and
  // every explicitly distinguished character across all charsets. Any
  // other raw character filters down to one of these before lookup, so
  // the DFA never needs a wider row (`transition(s,c) ==
  // transition(s,filter(c))` holds by construction).
  let alphabet: Vec<char> = categorizer
    .charsets()
    .flat_map(|cs| std::iter::once(cs.representative).chain(cs.distinguished.iter().copied()))
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect();

  let mut get_or_create = |dfa: &mut Dfa, canon: &mut BTreeMap<Vec<NfaId>, DfaId>, pending: &mut Vec<(DfaId, BTreeSet<NfaId>)>, set: BTreeSet<NfaId>| -> DfaId {
    let key: Vec<NfaId> = set.iter().copied().collect();
    if let Some(&id) = canon.get(&key) {
      return id;
    }
    let id = dfa.new_node();
    canon.insert(key, id);
    pending.push((id, set));
    id
  };

  let mut dfa_starts = BTreeMap::new();
  for (name, nfa_start) in &starts {
    let closure = nfa.epsilon_closure(&BTreeSet::from([*nfa_start]));
    let id = get_or_create(&mut dfa, &mut canon, &mut pending, closure);
    dfa_starts.insert(name.clone(), id);
  }
  dfa.start = *dfa_starts.get("YYINITIAL").unwrap_or(dfa_starts.values().next().unwrap_or(&0));

  let mut cursor = 0;
  while cursor < pending.len() {
    let (dfa_id, nfa_set) = pending[cursor].clone();
    cursor += 1;

    // Accepting actions: sorted ascending by action id.
    let mut terminals: Vec<_> = nfa_set
      .iter()
      .filter_map(|id| nfa.node(*id).terminal.as_ref())
      .collect();
    terminals.sort_by_key(|t| t.action_id);
    for tag in &terminals {
      dfa.node_mut(dfa_id).accept(tag.action_id, tag.class_name.clone());
    }
    if let Some(top) = terminals.first() {
      if let Some(rw) = reserved_words.get(&top.action_id) {
        let idx = dfa.reserved_word_tables.len();
        dfa.reserved_word_tables.push(ReservedWordTable { case_fold: rw.case_fold, words: rw.words.clone() });
        dfa.node_mut(dfa_id).reserved_words = Some(idx);
      }
    }

    for &ch in &alphabet {
      let stepped = nfa.step(&nfa_set, Some(ch));
      if stepped.is_empty() {
        continue;
      }
      let closure = nfa.epsilon_closure(&stepped);
      let target = get_or_create(&mut dfa, &mut canon, &mut pending, closure);
      dfa.node_mut(dfa_id).transitions.insert(ch, target);
    }
  }

  CompiledLexer { dfa, categorizer, starts: dfa_starts, using_eof }
}
