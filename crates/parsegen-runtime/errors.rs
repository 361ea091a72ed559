//! Runtime-facing error taxonomy.
//!
//! Generation-time errors live in `parsegen_core::journal::CompileError` —
//! this enum only covers failures that can occur once a grammar has already
//! been compiled: scanning, parsing, and loading a serialized table set.

use crate::types::SourceLineInfo;
use thiserror::Error;

/// Every fallible runtime operation in this workspace returns this.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Runtime error kinds, collapsing the teacher's deep `SherpaError`
/// hierarchy into one closed sum type (see spec REDESIGN FLAGS).
#[derive(Debug, Error, Clone)]
pub enum RuntimeError {
  /// No DFA transition existed for the next character, and the current
  /// state has no accepting action to backtrack to.
  #[error("{loc}: illegal character {found:?}")]
  IllegalCharacter { loc: SourceLineInfo, found: char },

  /// No parse table entry exists for `(state, lookahead)`.
  #[error("{loc}: syntax error, unexpected {found}")]
  SyntaxError { loc: SourceLineInfo, found: String },

  /// End of input arrived while the parser was not in an accepting state.
  #[error("{loc}: unexpected end of input")]
  UnexpectedEof { loc: SourceLineInfo },

  /// `/* ... */` was never closed before EOF.
  #[error("{loc}: unterminated comment")]
  UnterminatedComment { loc: SourceLineInfo },

  /// The persisted table version does not match this runtime's expected
  /// version, or the stream is otherwise structurally invalid.
  #[error("serialization mismatch: expected version {expected}, found {found}")]
  SerializationMismatch { expected: &'static str, found: String },

  /// An encoding name recorded in the stream could not be resolved.
  #[error("unknown encoding: {0}")]
  UnknownEncoding(String),

  /// A type tag in the stream is not part of the registered closed set.
  #[error("unknown type tag: {0}")]
  UnknownType(u8),

  /// `symbol_factory` has no registration for a name referenced by the
  /// compiled tables.
  #[error("no symbol factory registered for `{0}`")]
  FactoryMissing(String),

  /// A stack-shape invariant was violated during reduce. Always a bug in
  /// the table builder, never a user-input problem.
  #[error("internal invariant violated: {0}")]
  InternalInvariant(String),

  /// More than `max_errors` recoverable errors occurred during a single
  /// parse; the parse was aborted rather than continuing in panic mode.
  #[error("{loc}: too many syntax errors ({count}), aborting")]
  TooManyErrors { loc: SourceLineInfo, count: u32 },
}

impl RuntimeError {
  /// The source position this error occurred at, when one is available.
  pub fn loc(&self) -> Option<&SourceLineInfo> {
    match self {
      Self::IllegalCharacter { loc, .. }
      | Self::SyntaxError { loc, .. }
      | Self::UnexpectedEof { loc }
      | Self::UnterminatedComment { loc }
      | Self::TooManyErrors { loc, .. } => Some(loc),
      _ => None,
    }
  }

  /// `true` for errors the panic-mode recovery algorithm can attempt to
  /// recover from; `false` for errors that are always fatal.
  pub fn is_recoverable(&self) -> bool {
    matches!(self, Self::SyntaxError { .. } | Self::UnexpectedEof { .. })
  }
}
