use crate::types::{SourceLineInfo, Symbol};
use crate::RuntimeResult;

/// The producer-facing hook invoked for every accepting action a DFA
/// state lists, head-first, until one is accepted. Setting `*reject` tries the next-lower-priority action
/// instead of accepting this one.
pub trait OldActions {
  fn run(&mut self, action_id: u32, lexeme: &mut String, reject: &mut bool);
}

/// Instantiates a [`Symbol`] for a recognized token class.
pub trait SymbolFactory {
  fn create(&self, class_name: &str, lexeme: &str, loc: SourceLineInfo) -> RuntimeResult<Symbol>;
}

/// An `OldActions` that runs no accept-state callbacks, useful for grammars
/// with no DFA-state semantic actions attached.
pub struct NullOldActions;

impl OldActions for NullOldActions {
  fn run(&mut self, _action_id: u32, _lexeme: &mut String, _reject: &mut bool) {}
}
