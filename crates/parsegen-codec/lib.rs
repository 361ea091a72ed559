//! Versioned, back-reference-aware binary (de)serialization for compiled
//! lexer/parser tables, built on the arena-indexed runtime types — DFA and
//! parse-state graphs are already addressed by stable integer ids, so the
//! only object-identity concern left is string reuse (token-class names,
//! symbol names), which the `Writer`/`Reader` pair handles via interning.

mod codec;
mod encoding;
mod reader;
mod tag;
mod writer;

pub use codec::{decode, encode, VERSION};
pub use tag::TypeTag;
