//! Scenario 1: precedence-driven shift/reduce decisions end to end.

use pretty_assertions::assert_eq;

use crate::support::{compiled_arithmetic, parse};

#[test]
fn plus_defers_to_star_precedence() {
  // `1+2*3` -> E('+', 1, E('*', 2, 3)): '*' binds tighter, so it nests under
  // the right operand of '+'.
  let compiled = compiled_arithmetic();
  let (root, parser) = parse(&compiled, "1+2*3");
  assert_eq!(parser.error_count(), 0);

  assert_eq!(root.name, "E");
  assert_eq!(root.kids.len(), 3);
  assert_eq!(root.kids[1].name, "+");

  let left = &root.kids[0];
  assert_eq!(left.name, "E");
  assert_eq!(left.kids.len(), 1);
  assert_eq!(left.kids[0].name, "NUM");

  let right = &root.kids[2];
  assert_eq!(right.name, "E");
  assert_eq!(right.kids.len(), 3);
  assert_eq!(right.kids[1].name, "*");
}

#[test]
fn star_then_plus_nests_the_other_way() {
  // `1*2+3` -> E('+', E('*', 1, 2), 3).
  let compiled = compiled_arithmetic();
  let (root, parser) = parse(&compiled, "1*2+3");
  assert_eq!(parser.error_count(), 0);

  assert_eq!(root.name, "E");
  assert_eq!(root.kids[1].name, "+");

  let left = &root.kids[0];
  assert_eq!(left.kids.len(), 3);
  assert_eq!(left.kids[1].name, "*");

  let right = &root.kids[2];
  assert_eq!(right.kids.len(), 1);
  assert_eq!(right.kids[0].name, "NUM");
}

#[test]
fn a_single_number_parses_without_any_operator() {
  let compiled = compiled_arithmetic();
  let (root, parser) = parse(&compiled, "42");
  assert_eq!(parser.error_count(), 0);
  assert_eq!(root.name, "E");
  assert_eq!(root.kids.len(), 1);
  assert_eq!(root.kids[0].name, "NUM");
}
