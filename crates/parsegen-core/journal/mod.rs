//! Diagnostics accumulated during grammar compilation.
//!
//! Trimmed to what a single-shot generation pass needs: no active-report
//! bookkeeping, no thread-shared scratch pad, since this workspace's
//! generator is not required to be `Send`.

pub mod config;
pub mod error;

pub use config::LexParseConfig;
pub use error::{CompileError, CompileErrorSeverity};

/// An ordered collection of [`CompileError`]s raised by one generation run.
#[derive(Debug, Clone, Default)]
pub struct Report {
  errors: Vec<CompileError>,
}

impl Report {
  pub fn add_error(&mut self, err: CompileError) {
    self.errors.push(err);
  }

  pub fn errors(&self) -> &[CompileError] {
    &self.errors
  }

  pub fn has_critical_errors(&self) -> bool {
    self.errors.iter().any(CompileError::is_critical)
  }

  pub fn has_warnings(&self) -> bool {
    self.errors.iter().any(|e| e.severity().contains(CompileErrorSeverity::Warning))
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }
}

/// Owns the [`Report`] for one compilation run. The sole mutation path is
/// [`Journal::report_mut`], following a `j.report_mut().add_error(..)`
/// idiom.
#[derive(Debug, Clone, Default)]
pub struct Journal {
  config: LexParseConfig,
  report: Report,
}

impl Journal {
  pub fn new(config: LexParseConfig) -> Self {
    Self { config, report: Report::default() }
  }

  pub fn config(&self) -> &LexParseConfig {
    &self.config
  }

  pub fn report(&self) -> &Report {
    &self.report
  }

  pub fn report_mut(&mut self) -> &mut Report {
    &mut self.report
  }
}
