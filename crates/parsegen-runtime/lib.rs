//! Portable runtime linked into every generated lexer/parser.
//!
//! This crate owns nothing that depends on *how* a grammar was compiled —
//! only the frozen artifacts ([`Dfa`](types::Dfa), [`ParseTable`](types::ParseTable), ...)
//! and the drivers ([`lexer`], [`parser`]) that walk them. `parsegen_core`
//! depends on this crate, not the other way around, so that a compiled
//! parser can be shipped without dragging in the grammar compiler.
pub mod errors;
pub mod types;

pub mod lexer;
pub mod parser;

pub use errors::{RuntimeError, RuntimeResult};
