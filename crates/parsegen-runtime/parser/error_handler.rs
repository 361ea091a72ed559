use crate::errors::RuntimeError;

/// Collects recoverable errors during a single parse and decides when to
/// give up.
///
/// `throw_exceptions` mirrors the teacher's eager-abort mode: when set, the
/// first recoverable error is returned immediately instead of being logged
/// and recovered from.
pub struct ErrorHandler {
  pub throw_exceptions: bool,
  max_errors: u32,
  counter: u32,
  errors: Vec<RuntimeError>,
}

impl ErrorHandler {
  pub fn new(max_errors: u32) -> Self {
    Self { throw_exceptions: false, max_errors, counter: 0, errors: Vec::new() }
  }

  pub fn throwing(max_errors: u32) -> Self {
    Self { throw_exceptions: true, max_errors, counter: 0, errors: Vec::new() }
  }

  /// Records a recoverable error. Returns `Err` when the caller should abort
  /// the parse outright: either `throw_exceptions` is set, or the
  /// `max_errors` threshold has been exceeded.
  pub fn record(&mut self, err: RuntimeError) -> Result<(), RuntimeError> {
    self.counter += 1;
    if self.throw_exceptions {
      return Err(err);
    }
    let loc = err.loc().cloned();
    self.errors.push(err);
    if self.counter > self.max_errors {
      return Err(RuntimeError::TooManyErrors {
        loc: loc.unwrap_or_default(),
        count: self.counter,
      });
    }
    Ok(())
  }

  pub fn count(&self) -> u32 {
    self.counter
  }

  pub fn errors(&self) -> &[RuntimeError] {
    &self.errors
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::types::SourceLineInfo;

  #[test]
  fn aborts_past_max_errors() {
    let mut handler = ErrorHandler::new(2);
    let make = || RuntimeError::SyntaxError { loc: SourceLineInfo::default(), found: "x".into() };
    assert!(handler.record(make()).is_ok());
    assert!(handler.record(make()).is_ok());
    assert!(handler.record(make()).is_err());
  }

  #[test]
  fn throwing_mode_aborts_immediately() {
    let mut handler = ErrorHandler::throwing(100);
    let err = RuntimeError::SyntaxError { loc: SourceLineInfo::default(), found: "x".into() };
    assert!(handler.record(err).is_err());
  }
}
