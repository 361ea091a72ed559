use bitmask_enum::bitmask;
use parsegen_runtime::types::SourceLineInfo;

#[bitmask(u8)]
#[bitmask_config(vec_debug)]
pub enum CompileErrorSeverity {
  Critical = 0b1,
  Warning = 0b10,
  Hint = 0b100,
}

/// Every diagnostic a grammar compilation pass can raise, as one closed
/// sum type rather than an open error hierarchy with a trait-object escape
/// hatch.
#[derive(Debug, Clone)]
pub enum CompileError {
  /// A regular expression could not be parsed.
  IllformedRegex { loc: SourceLineInfo, message: String, inline_message: String },

  /// A named character predicate (`{Name}`) referenced no known category
  /// or previously-defined charset.
  UnknownCharset { loc: SourceLineInfo, name: String },

  /// A shift/reduce or reduce/reduce conflict survived precedence/
  /// associativity resolution and had to be broken arbitrarily.
  GrammarConflict { loc: SourceLineInfo, message: String, on_symbol: String },

  /// A nonterminal was referenced but never defined.
  UndefinedSymbol { loc: SourceLineInfo, name: String },

  /// Two productions declared the same nonterminal name with incompatible
  /// signatures.
  DuplicateProduction { loc: SourceLineInfo, name: String },

  /// A nonterminal is unreachable from the grammar's start symbol. Never
  /// fatal on its own — reported as a `Hint`.
  UnreachableProduction { name: String },

  /// The grammar declares no start symbol, or the declared one does not
  /// exist.
  StartSymbolMissing { name: Option<String> },

  /// A previously persisted table set failed to deserialize.
  SerializationMismatch { expected: &'static str, found: String },

  /// Wraps several related errors under one umbrella message.
  Many { message: String, errors: Vec<CompileError> },
}

impl CompileError {
  pub fn severity(&self) -> CompileErrorSeverity {
    match self {
      Self::UnreachableProduction { .. } => CompileErrorSeverity::Hint,
      Self::GrammarConflict { .. } => CompileErrorSeverity::Warning,
      Self::Many { errors, .. } => errors.iter().map(Self::severity).fold(CompileErrorSeverity::Hint, |acc, s| acc | s),
      _ => CompileErrorSeverity::Critical,
    }
  }

  pub fn is_critical(&self) -> bool {
    self.severity().contains(CompileErrorSeverity::Critical)
  }

  pub fn loc(&self) -> Option<&SourceLineInfo> {
    match self {
      Self::IllformedRegex { loc, .. } | Self::UnknownCharset { loc, .. } | Self::GrammarConflict { loc, .. } | Self::UndefinedSymbol { loc, .. } | Self::DuplicateProduction { loc, .. } => Some(loc),
      _ => None,
    }
  }
}

impl std::fmt::Display for CompileError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::IllformedRegex { loc, message, inline_message } => write!(f, "{loc}: malformed regex: {message} ({inline_message})"),
      Self::UnknownCharset { loc, name } => write!(f, "{loc}: unknown character class `{name}`"),
      Self::GrammarConflict { loc, message, on_symbol } => write!(f, "{loc}: conflict on `{on_symbol}`: {message}"),
      Self::UndefinedSymbol { loc, name } => write!(f, "{loc}: undefined symbol `{name}`"),
      Self::DuplicateProduction { loc, name } => write!(f, "{loc}: duplicate production `{name}`"),
      Self::UnreachableProduction { name } => write!(f, "production `{name}` is unreachable from the start symbol"),
      Self::StartSymbolMissing { name: Some(name) } => write!(f, "declared start symbol `{name}` does not exist"),
      Self::StartSymbolMissing { name: None } => write!(f, "grammar declares no start symbol"),
      Self::SerializationMismatch { expected, found } => write!(f, "serialization mismatch: expected version {expected}, found {found}"),
      Self::Many { message, errors } => {
        writeln!(f, "{message}")?;
        for e in errors {
          writeln!(f, "  - {e}")?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for CompileError {}
