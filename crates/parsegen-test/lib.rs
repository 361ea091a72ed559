//! End-to-end coverage spanning all three crates together: a grammar and
//! lexer rule set compiled by `parsegen_core`, driven by `parsegen_runtime`,
//! round-tripped through `parsegen_codec`.
//!
//! Unit tests close to the code they exercise live in each crate; this
//! crate is for scenarios that only make sense wired end to end.

#[cfg(test)]
mod arithmetic;

#[cfg(test)]
mod reserved_words;

#[cfg(test)]
mod error_recovery;

#[cfg(test)]
mod serialization;

mod support;
