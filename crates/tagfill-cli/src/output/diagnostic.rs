//! Miette diagnostic wrapper for template lint warnings.

use miette::{Diagnostic, NamedSource, SourceSpan};
use tagfill::LintWarning;
use thiserror::Error;

/// A miette-compatible diagnostic for one lint finding.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(tagfill::lint))]
pub struct LintDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl LintDiagnostic {
    /// Create a diagnostic from a lint warning with source context.
    pub fn from_warning(name: &str, content: &str, warning: &LintWarning) -> Self {
        let (offset, length) = warning.span();

        // Clamp the span to the content to avoid out-of-bounds labels
        let offset = offset.min(content.len());
        let length = length.min(content.len() - offset).max(1);

        let help = match warning.suggestions() {
            [] => None,
            suggestions => Some(format!("did you mean '{}'?", suggestions.join("', '"))),
        };

        LintDiagnostic {
            src: NamedSource::new(name, content.to_string()),
            span: (offset, length).into(),
            message: warning.to_string(),
            help,
        }
    }
}
