//! Output helpers for diagnostics.

mod diagnostic;

pub use diagnostic::LintDiagnostic;
