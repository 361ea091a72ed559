//! Scenario 5: round-tripping a real compiled grammar, not just the
//! handful of fixture nodes the codec crate's own unit tests use, and
//! confirming the decoded tables still drive an identical parse.

use parsegen_codec::{decode, encode};
use pretty_assertions::assert_eq;

use crate::support::{compiled_arithmetic, parse};

#[test]
fn encoding_a_full_compiled_grammar_twice_is_a_fixpoint() {
  let compiled = compiled_arithmetic();
  let first = encode(&compiled);
  let decoded = decode(&first).expect("freshly encoded bytes must decode");
  let second = encode(&decoded);
  assert_eq!(first, second);
}

#[test]
fn a_decoded_grammar_parses_identically_to_the_original() {
  let compiled = compiled_arithmetic();
  let bytes = encode(&compiled);
  let decoded = decode(&bytes).expect("freshly encoded bytes must decode");

  let (original_root, original_parser) = parse(&compiled, "1+2*3");
  let (decoded_root, decoded_parser) = parse(&decoded, "1+2*3");

  assert_eq!(original_parser.error_count(), decoded_parser.error_count());
  assert_eq!(original_root.name, decoded_root.name);
  assert_eq!(original_root.kids.len(), decoded_root.kids.len());
  assert_eq!(original_root.kids[1].name, decoded_root.kids[1].name);
}
